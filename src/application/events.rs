//! Leaf events and the narrative lines around a full cycle.

use std::fmt;

/// Opening line of a run.
pub const AUTUMN_INTRO: &str = " The forest prepares for autumn...";

/// Line between the fall and the grow pass.
pub const SPRING_INTRO: &str = " Spring breezes return. The forest begins to regrow...";

/// Closing line of a run.
pub const CYCLE_OUTRO: &str = " The cycle completes; the forest rests, ready for another year.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafEventKind {
    /// A leaf fell; `count` is what remains on the branch.
    Fell,
    /// A leaf grew; `count` is the new total on the branch.
    Grew,
}

/// One leaf falling or growing.
///
/// `node` is the branch's pre-order index within the tree the pass started
/// from, the same order as [`crate::domain::Branch::iter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafEvent {
    pub node: usize,
    pub depth: usize,
    pub kind: LeafEventKind,
    pub count: u32,
}

impl fmt::Display for LeafEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = " ".repeat(self.depth * 2);
        match self.kind {
            LeafEventKind::Fell => write!(
                f,
                "{indent} A leaf falls from branch level {} (remaining on this branch: {})",
                self.depth, self.count
            ),
            LeafEventKind::Grew => write!(
                f,
                "{indent}  A new leaf grows on branch level {} (total on this branch: {})",
                self.depth, self.count
            ),
        }
    }
}

/// Events of one pass, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    events: Vec<LeafEvent>,
}

impl PassReport {
    pub(crate) fn push(&mut self, event: LeafEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[LeafEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events emitted for a single branch.
    pub fn for_node(&self, node: usize) -> impl Iterator<Item = &LeafEvent> + '_ {
        self.events.iter().filter(move |e| e.node == node)
    }

    /// Position of the first and last event of `node`, if it emitted any.
    pub fn span_of(&self, node: usize) -> Option<(usize, usize)> {
        let first = self.events.iter().position(|e| e.node == node)?;
        let last = self.events.iter().rposition(|e| e.node == node)?;
        Some((first, last))
    }
}

/// Both passes of a full autumn-to-spring cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub fall: PassReport,
    pub grow: PassReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_fall_event_when_formatting_then_indents_by_depth() {
        let event = LeafEvent {
            node: 3,
            depth: 2,
            kind: LeafEventKind::Fell,
            count: 1,
        };
        assert_eq!(
            event.to_string(),
            "     A leaf falls from branch level 2 (remaining on this branch: 1)"
        );
    }

    #[test]
    fn given_grow_event_at_root_when_formatting_then_no_depth_indent() {
        let event = LeafEvent {
            node: 0,
            depth: 0,
            kind: LeafEventKind::Grew,
            count: 3,
        };
        assert_eq!(
            event.to_string(),
            "  A new leaf grows on branch level 0 (total on this branch: 3)"
        );
    }

    #[test]
    fn given_report_when_querying_span_then_returns_first_and_last_position() {
        let mut report = PassReport::default();
        for node in [0, 0, 1, 0] {
            report.push(LeafEvent {
                node,
                depth: node,
                kind: LeafEventKind::Fell,
                count: 0,
            });
        }
        assert_eq!(report.span_of(0), Some((0, 3)));
        assert_eq!(report.span_of(1), Some((2, 2)));
        assert_eq!(report.span_of(9), None);
        assert_eq!(report.for_node(0).count(), 3);
    }
}
