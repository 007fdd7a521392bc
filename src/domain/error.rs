//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid simulation parameters.
/// They are raised before a tree is built or a pass starts, never mid-traversal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid configuration: {field} = {value}: {reason}")]
    InvalidConfiguration {
        field: &'static str,
        value: i64,
        reason: &'static str,
    },
}

impl DomainError {
    pub(crate) fn negative(field: &'static str, value: i64) -> Self {
        Self::InvalidConfiguration {
            field,
            value,
            reason: "must not be negative",
        }
    }
}
