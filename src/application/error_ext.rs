//! Error conversion helpers for sink writes

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting a sink's `io::Result` into `ApplicationResult`.
pub trait SinkResultExt<T> {
    /// Mark an I/O failure as a fatal sink write failure.
    ///
    /// # Example
    /// ```ignore
    /// sink.write_line(&line).or_sink_failure()?;
    /// ```
    fn or_sink_failure(self) -> ApplicationResult<T>;
}

impl<T> SinkResultExt<T> for io::Result<T> {
    fn or_sink_failure(self) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::SinkWrite { source })
    }
}
