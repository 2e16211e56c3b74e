//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// The top-level error type for `ped-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{what} must be a finite, non-zero vector, got ({x}, {y})")]
    DegenerateVector { what: &'static str, x: f64, y: f64 },
}

/// Shorthand result type for `ped-core`.
pub type CoreResult<T> = Result<T, CoreError>;
