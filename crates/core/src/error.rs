//! Domain error model.

use thiserror::Error;

/// Result type used across the admin client crates.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Raised only for malformed static data (e.g. a navigation table that
/// violates its invariants) or unparsable identifiers. Runtime authorization
/// never produces a `DomainError`; it degrades to "not allowed".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
