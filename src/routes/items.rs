//! Inventory listing endpoint.

use axum::{extract::State, Json};

use crate::db::{self, Record};
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/items
///
/// Returns every row of the inventory table as a JSON array of records, keyed
/// by column name in column order. An empty table yields `[]`.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Record>>, AppError> {
    let items = db::fetch_items(state.db.as_ref()).await?;
    tracing::debug!(rows = items.len(), "fetched inventory items");
    Ok(Json(items))
}
