//! Response models for the sweeper status API
//!
//! This module defines the DTOs serialized into HTTP response bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{HealthResponse, StatsResponse, SweepResponse};
