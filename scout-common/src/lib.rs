//! Common types and utilities shared across webscout crates.
//!
//! This crate defines the shared error type and the observability helpers
//! used throughout the workspace. It is intentionally lightweight so that
//! every crate can depend on it without heavy transitive costs.
//!
//! - [`ScoutError`] and [`Result`]: shared error handling
//! - [`observability`]: centralised tracing/logging initialisation

pub mod observability;

/// Error types used across the webscout system.
///
/// Per-item recoverable failures (a single extraction, a single download)
/// are not errors at the core boundary; they surface as `None` from the
/// component that recovered them. This enum covers the failures that are
/// fatal to a whole call.
#[derive(thiserror::Error, Debug)]
pub enum ScoutError {
    /// A search or encyclopedia backend query failed.
    #[error("backend error: {0}")]
    Backend(String),

    /// Configuration was incomplete or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`ScoutError`].
pub type Result<T> = std::result::Result<T, ScoutError>;
