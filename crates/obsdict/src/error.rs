#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors from observable mapping operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictionaryError {
    /// `get` on a key that is not present.
    #[error("key not found")]
    KeyNotFound,
    /// A mutation was attempted through a read-only view.
    #[error("mapping is read-only")]
    ReadOnly,
    /// A mapping was not the concrete variant the caller required.
    #[error("expected {expected} mapping, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}
