//! Autumn and spring passes over a branch tree.
//!
//! Both passes are pre-order: a branch is driven all the way to its target
//! (empty for the fall pass, full for the grow pass) before any of its
//! children is touched. Every leaf event is written to the sink, then the
//! pacer waits once.

use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::application::error_ext::SinkResultExt;
use crate::application::events::{
    CycleReport, LeafEvent, LeafEventKind, PassReport, AUTUMN_INTRO, CYCLE_OUTRO, SPRING_INTRO,
};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Branch, Capacity};
use crate::infrastructure::traits::{EventSink, Pacer};

/// Runs fall and grow passes, pacing events with an injected [`Pacer`].
pub struct ForestSimulator {
    pacer: Arc<dyn Pacer>,
}

impl ForestSimulator {
    pub fn new(pacer: Arc<dyn Pacer>) -> Self {
        Self { pacer }
    }

    /// Let every leaf in the tree fall.
    ///
    /// Each branch sheds at most `wind_strength` leaves per burst and repeats
    /// bursts until it is bare; only then are its children visited, in order,
    /// one level deeper. Afterwards every branch holds zero leaves.
    ///
    /// # Errors
    /// A sink write failure or an interrupted pause aborts the pass at once.
    #[instrument(level = "debug", skip(self, root, sink))]
    pub fn fall(
        &self,
        root: &mut Branch,
        depth: usize,
        sink: &mut dyn EventSink,
    ) -> ApplicationResult<PassReport> {
        let mut pass = Pass::new(sink, self.pacer.as_ref());
        pass.fall(root, depth)?;
        debug!(events = pass.report.len(), "fall pass complete");
        Ok(pass.report)
    }

    /// Regrow every branch up to `capacity` leaves.
    ///
    /// A branch is filled one leaf at a time until it holds `capacity`, then
    /// its children are filled in order, one level deeper. A branch already
    /// at or above capacity emits nothing.
    ///
    /// # Errors
    /// A sink write failure or an interrupted pause aborts the pass at once.
    #[instrument(level = "debug", skip(self, root, sink))]
    pub fn grow(
        &self,
        root: &mut Branch,
        depth: usize,
        capacity: Capacity,
        sink: &mut dyn EventSink,
    ) -> ApplicationResult<PassReport> {
        let mut pass = Pass::new(sink, self.pacer.as_ref());
        pass.grow(root, depth, capacity.get())?;
        debug!(events = pass.report.len(), "grow pass complete");
        Ok(pass.report)
    }

    /// Validate a raw capacity, then run [`Self::grow`].
    ///
    /// An invalid capacity is reported before any event is emitted.
    pub fn grow_to(
        &self,
        root: &mut Branch,
        depth: usize,
        capacity: i64,
        sink: &mut dyn EventSink,
    ) -> ApplicationResult<PassReport> {
        let capacity = Capacity::new(capacity)?;
        self.grow(root, depth, capacity, sink)
    }

    /// Full cycle: autumn intro, fall pass, spring interlude, grow pass, outro.
    pub fn run_cycle(
        &self,
        tree: &mut Branch,
        capacity: Capacity,
        sink: &mut dyn EventSink,
    ) -> ApplicationResult<CycleReport> {
        sink.write_line(AUTUMN_INTRO).or_sink_failure()?;
        let fall = self.fall(tree, 0, sink)?;

        sink.write_line("").or_sink_failure()?;
        sink.write_line(SPRING_INTRO).or_sink_failure()?;
        let grow = self.grow(tree, 0, capacity, sink)?;

        sink.write_line("").or_sink_failure()?;
        sink.write_line(CYCLE_OUTRO).or_sink_failure()?;
        Ok(CycleReport { fall, grow })
    }
}

/// State of one traversal: where events go and what has been emitted.
struct Pass<'a> {
    sink: &'a mut dyn EventSink,
    pacer: &'a dyn Pacer,
    report: PassReport,
    next_node: usize,
}

impl<'a> Pass<'a> {
    fn new(sink: &'a mut dyn EventSink, pacer: &'a dyn Pacer) -> Self {
        Self {
            sink,
            pacer,
            report: PassReport::default(),
            next_node: 0,
        }
    }

    fn take_node_id(&mut self) -> usize {
        let id = self.next_node;
        self.next_node += 1;
        id
    }

    fn fall(&mut self, branch: &mut Branch, depth: usize) -> ApplicationResult<()> {
        let node = self.take_node_id();
        if branch.is_bare() {
            return Ok(());
        }

        while branch.leaf_count() > 0 {
            let burst = branch.leaf_count().min(branch.wind_strength());
            trace!(node, depth, burst, "gust");
            for _ in 0..burst {
                let remaining = branch.shed_leaf();
                self.emit(LeafEvent {
                    node,
                    depth,
                    kind: LeafEventKind::Fell,
                    count: remaining,
                })?;
            }
        }

        for child in branch.children_mut() {
            self.fall(child, depth + 1)?;
        }
        Ok(())
    }

    fn grow(&mut self, branch: &mut Branch, depth: usize, capacity: u32) -> ApplicationResult<()> {
        let node = self.take_node_id();

        while branch.leaf_count() < capacity {
            let total = branch.sprout_leaf();
            self.emit(LeafEvent {
                node,
                depth,
                kind: LeafEventKind::Grew,
                count: total,
            })?;
        }

        for child in branch.children_mut() {
            self.grow(child, depth + 1, capacity)?;
        }
        Ok(())
    }

    fn emit(&mut self, event: LeafEvent) -> ApplicationResult<()> {
        self.sink.write_line(&event.to_string()).or_sink_failure()?;
        trace!(node = event.node, depth = event.depth, kind = ?event.kind, count = event.count, "leaf event");
        self.report.push(event);
        self.pacer
            .pause()
            .map_err(|_| ApplicationError::Interrupted)
    }
}
