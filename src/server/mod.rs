//! HTTP API for the dashboard.
//!
//! Provides one read-only JSON endpoint per analysis domain:
//! - `GET /api/geographic`
//! - `GET /api/entity`
//! - `GET /api/classification`
//! - `GET /api/timeline`
//! - `GET /health`

pub mod routes;

pub use routes::start_server;
