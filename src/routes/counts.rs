//! Count session submission endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::db::{self, CountSession};
use crate::error::AppError;
use crate::state::AppState;

/// Acknowledgement returned after a count session is stored.
#[derive(Debug, Serialize)]
pub struct CountAck {
    pub ok: bool,
    pub inserted: u64,
}

/// POST /api/counts
///
/// Stores one row per counted item on a single scoped connection. Failures
/// take the same 500 shape as the listing endpoint.
pub async fn submit(
    State(state): State<AppState>,
    Json(session): Json<CountSession>,
) -> Result<Json<CountAck>, AppError> {
    let inserted = db::record_counts(state.db.as_ref(), &session).await?;
    tracing::info!(session_id = ?session.id, inserted, "recorded count session");
    Ok(Json(CountAck { ok: true, inserted }))
}
