//! PostgreSQL-backed inventory store.
//!
//! Opens one `PgConnection` per request - deliberately no pool, each request
//! owns its connection for its whole lifetime. Rows are decoded dynamically by
//! the result set's own metadata, since the service makes no assumptions about
//! the table's schema beyond "serializable to JSON".

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::postgres::{PgColumn, PgConnection, PgRow};
use sqlx::{Column, Connection, Row, TypeInfo};
use uuid::Uuid;

use crate::config::DatabaseConfig;

use super::{CountSession, DbError, InventoryConn, InventoryDb, Record, Value};

/// Connection factory holding the configured descriptor and table name.
pub struct PgInventoryDb {
    url: String,
    table: String,
}

impl PgInventoryDb {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            table: config.table.clone(),
        }
    }
}

#[async_trait]
impl InventoryDb for PgInventoryDb {
    async fn open(&self) -> Result<Box<dyn InventoryConn>, DbError> {
        let conn = PgConnection::connect(&self.url).await?;
        Ok(Box::new(PgInventoryConn {
            conn,
            table: self.table.clone(),
        }))
    }
}

struct PgInventoryConn {
    conn: PgConnection,
    table: String,
}

#[async_trait]
impl InventoryConn for PgInventoryConn {
    async fn list_items(&mut self) -> Result<Vec<Record>, DbError> {
        // Table name is validated at config load; it cannot be a bind parameter.
        let sql = format!("SELECT * FROM {}", self.table);
        let rows = sqlx::query(&sql).fetch_all(&mut self.conn).await?;
        rows.iter().map(row_to_record).collect()
    }

    async fn insert_counts(&mut self, session: &CountSession) -> Result<u64, DbError> {
        let sql = format!(
            "INSERT INTO {} (item_id, item_name, quantity, recorded_at) \
             VALUES ($1, $2, $3, $4::timestamptz)",
            self.table
        );

        let mut inserted = 0;
        for item in &session.items {
            sqlx::query(&sql)
                .bind(&item.item_id)
                .bind(&item.item_name)
                .bind(item.quantity)
                .bind(&item.timestamp)
                .execute(&mut self.conn)
                .await?;
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn close(self: Box<Self>) -> Result<(), DbError> {
        self.conn.close().await.map_err(Into::into)
    }
}

/// Converts one driver row into a record, keyed by the result metadata's
/// column names in column order.
fn row_to_record(row: &PgRow) -> Result<Record, DbError> {
    row.columns()
        .iter()
        .map(|column| {
            let key = column_key(column.name(), column.ordinal());
            let value = decode_value(row, column)?;
            Ok((key, value))
        })
        .collect()
}

/// The result metadata normally names every column; a nameless one gets a
/// synthesized `column_<ordinal>` key so the record stays well-formed.
fn column_key(name: &str, ordinal: usize) -> String {
    if name.is_empty() {
        format!("column_{ordinal}")
    } else {
        name.to_string()
    }
}

/// Decodes one column into the JSON-facing value variant, dispatching on the
/// Postgres type name. Types without a natural variant are rendered as text;
/// anything that cannot decode at all fails the whole request.
fn decode_value(row: &PgRow, column: &PgColumn) -> Result<Value, DbError> {
    let idx = column.ordinal();
    let value = match column.type_info().name() {
        "BOOL" => row.try_get::<Option<bool>, _>(idx)?.map(Value::Bool),
        "INT2" => row
            .try_get::<Option<i16>, _>(idx)?
            .map(|v| Value::Integer(v.into())),
        "INT4" => row
            .try_get::<Option<i32>, _>(idx)?
            .map(|v| Value::Integer(v.into())),
        "INT8" => row.try_get::<Option<i64>, _>(idx)?.map(Value::Integer),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(idx)?
            .map(|v| Value::Float(v.into())),
        "FLOAT8" => row.try_get::<Option<f64>, _>(idx)?.map(Value::Float),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(idx)?
            .map(Value::Timestamp),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(idx)?
            .map(|v| Value::Timestamp(v.and_utc())),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(idx)?
            .map(|v| Value::Text(v.to_string())),
        "TIME" => row
            .try_get::<Option<NaiveTime>, _>(idx)?
            .map(|v| Value::Text(v.to_string())),
        "UUID" => row
            .try_get::<Option<Uuid>, _>(idx)?
            .map(|v| Value::Text(v.to_string())),
        // TEXT, VARCHAR, BPCHAR, NAME and anything else that decodes as text
        _ => row.try_get::<Option<String>, _>(idx)?.map(Value::Text),
    };

    Ok(value.unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_columns_keep_their_name() {
        assert_eq!(column_key("quantity", 2), "quantity");
    }

    #[test]
    fn nameless_columns_get_placeholder_key() {
        assert_eq!(column_key("", 0), "column_0");
        assert_eq!(column_key("", 3), "column_3");
    }
}
