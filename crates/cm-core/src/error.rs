//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert `CmError` in
//! via `From` or wrap it as one variant.  Both patterns are acceptable;
//! prefer whichever keeps error sites clean.

use thiserror::Error;

/// The top-level error type for `cm-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CmError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid simulated time {0}: must be finite and non-negative")]
    InvalidTime(f64),
}

/// Shorthand result type for all `cm-*` crates.
pub type CmResult<T> = Result<T, CmError>;
