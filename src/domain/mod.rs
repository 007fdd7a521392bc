//! Domain layer: the branch tree and how it is generated
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod entities;
pub mod error;

pub use builder::{RandomSource, TreeBuilder};
pub use entities::{Branch, BranchLabel, Capacity, RootParams, MAX_ROOT_BRANCHES};
pub use error::DomainError;
