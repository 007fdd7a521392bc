//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add run-level failures.
///
/// All of them end the current run; nothing is retried.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("cannot write event: {source}")]
    SinkWrite {
        #[source]
        source: std::io::Error,
    },

    #[error("pacing interrupted")]
    Interrupted,

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
