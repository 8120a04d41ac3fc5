//! HTTP front end for the treasury coverage model.
//!
//! Endpoints:
//! - GET  /health: liveness
//! - POST /api/coverage: form fields → metrics JSON
//! - POST /api/coverage/card: form fields → downloadable SVG stat card

pub mod routes;
pub mod state;
