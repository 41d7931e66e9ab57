//! Stocktake: a JSON API over an inventory database.
//!
//! Exposes a single inventory table over HTTP: `GET /api/items` lists every
//! row as a JSON array, `POST /api/counts` records count sessions, and
//! `GET /api/test` / `GET /api/ping` are static liveness probes. Each data
//! request opens its own database connection and closes it before responding.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
