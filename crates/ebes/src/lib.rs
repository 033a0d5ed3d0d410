//! Employee Best Effort Score: recruitment activity tracking and the
//! weighted performance scores derived from it.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
pub mod tracker;
