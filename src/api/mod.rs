//! API Module
//!
//! HTTP handlers and routing for the sweeper status API.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Sweep statistics
//! - `POST /sweep` - Run one sweep immediately

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
