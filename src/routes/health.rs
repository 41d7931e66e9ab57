//! Liveness endpoints used by the mobile client and deploy tooling.
//!
//! Both handlers are static: they must answer even when the database is down,
//! so neither touches the backend.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Body of the test endpoint. The message text is a fixed contract with the
/// inventory client and must not change.
#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub message: &'static str,
}

/// Body of the ping endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PingResponse {
    pub ok: bool,
    pub server_time: DateTime<Utc>,
}

/// GET /api/test
pub async fn test_endpoint() -> Json<TestResponse> {
    Json(TestResponse {
        message: "Test endpoint working!",
    })
}

/// GET /api/ping
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        ok: true,
        server_time: Utc::now(),
    })
}
