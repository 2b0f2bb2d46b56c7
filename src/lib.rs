// lib.rs - Main library entry point for container_healthcheck

// Re-export modules that should be publicly accessible
pub mod models;
pub mod probe;
pub mod utils;

// Optionally re-export important types for convenience
pub use models::error::{ProbeError, ProbeResult};
pub use probe::executor::{ProbeExecutor, ProbeReport};
pub use utils::config::{ProbeConfig, StatusPolicy};
