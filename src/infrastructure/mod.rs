//! Infrastructure layer: sinks, pacers, random sources and wiring
//!
//! This layer implements the I/O boundary traits and assembles a run.

pub mod di;
pub mod error;
pub mod traits;

pub use error::{InfraError, InfraResult};
