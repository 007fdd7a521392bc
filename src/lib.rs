//! Seasonal leaf-fall simulation.
//!
//! A [`domain::TreeBuilder`] grows a random tree of [`domain::Branch`]es. The
//! [`application::ForestSimulator`] then lets every leaf fall in an autumn
//! pass and regrows them in a spring pass, writing one line per leaf event
//! to an [`infrastructure::traits::EventSink`].
//!
//! - [`domain`]: the tree, its validated parameters and random generation
//! - [`application`]: the two passes and their event reports
//! - [`infrastructure`]: sinks, pacers, random sources and wiring
//! - [`cli`]: argument parsing and command dispatch
//! - [`config`]: layered settings

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
