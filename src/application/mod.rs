//! Application layer: the seasonal passes
//!
//! This layer drives domain trees and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod events;
pub mod simulator;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::SinkResultExt;
pub use events::{CycleReport, LeafEvent, LeafEventKind, PassReport};
pub use simulator::ForestSimulator;
