//! HTTP route handlers for the inventory API.
//!
//! Routes are grouped by concern: the item listing carries a `no-store`
//! Cache-Control header because it must always reflect the live table, while
//! the liveness probes are cheap enough not to need one. CORS is wide open -
//! the API is called by a mobile client served from a different origin on the
//! LAN.
//!
//! Request tracing is enabled via middleware that generates a unique request
//! ID for each incoming request.

pub mod counts;
pub mod health;
pub mod items;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes, headers, and middleware.
pub fn create_router(state: AppState) -> Router {
    // Item listing - never cached, the client expects live data
    let item_routes = Router::new()
        .route("/api/items", get(items::list))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    // Count submission - stateful, no caching concerns
    let count_routes = Router::new().route("/api/counts", post(counts::submit));

    // Liveness probes - static payloads, no database access
    let probe_routes = Router::new()
        .route("/api/test", get(health::test_endpoint))
        .route("/api/ping", get(health::ping));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(item_routes)
        .merge(count_routes)
        .merge(probe_routes)
        .with_state(state)
        .layer(cors)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
