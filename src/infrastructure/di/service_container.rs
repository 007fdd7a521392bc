//! Service container for dependency injection
//!
//! Wires the simulator to its pacer, random source and output sinks.

use std::sync::Arc;

use tracing::debug;

use crate::application::ForestSimulator;
use crate::config::Settings;
use crate::domain::{Branch, DomainError, RandomSource, TreeBuilder};
use crate::infrastructure::traits::{
    ConsoleSink, FanOutSink, LogFileSink, NoPacer, Pacer, SleepPacer, StdRandom,
};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding everything one simulation run needs.
pub struct ForestContainer {
    /// Application settings
    pub settings: Settings,

    /// Delay between leaf events
    pub pacer: Arc<dyn Pacer>,

    /// Random source for tree generation
    pub random: Box<dyn RandomSource + Send>,
}

impl ForestContainer {
    /// Create a container with real implementations.
    ///
    /// A zero pacing interval selects [`NoPacer`]. Without a configured seed
    /// the random source is seeded from OS entropy.
    pub fn new(settings: Settings) -> Self {
        let pacer: Arc<dyn Pacer> = if settings.pacing.interval_ms == 0 {
            Arc::new(NoPacer)
        } else {
            Arc::new(SleepPacer::new(settings.pacing.interval()))
        };
        let random: Box<dyn RandomSource + Send> = match settings.forest.seed {
            Some(seed) => Box::new(StdRandom::seeded(seed)),
            None => Box::new(StdRandom::from_entropy()),
        };
        Self::with_deps(settings, pacer, random)
    }

    /// Create a container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        pacer: Arc<dyn Pacer>,
        random: Box<dyn RandomSource + Send>,
    ) -> Self {
        Self {
            settings,
            pacer,
            random,
        }
    }

    pub fn simulator(&self) -> ForestSimulator {
        ForestSimulator::new(Arc::clone(&self.pacer))
    }

    /// Build the configured tree, consuming draws from the random source.
    pub fn build_tree(&mut self) -> Result<Branch, DomainError> {
        let params = self.settings.forest.root_params()?;
        Ok(TreeBuilder::new(&mut self.random).build(params))
    }

    /// Console sink, followed by the log file when one is configured.
    pub fn open_sink(&self) -> InfraResult<FanOutSink> {
        let mut sink = FanOutSink::new().with(ConsoleSink::stdout());
        if let Some(path) = &self.settings.log.file {
            let log = LogFileSink::open(path, self.settings.log.append)
                .map_err(|e| InfraError::io(format!("open log file {}", path.display()), e))?;
            debug!(path = %log.path().display(), append = self.settings.log.append, "logging events");
            sink.push(log);
        }
        Ok(sink)
    }
}
