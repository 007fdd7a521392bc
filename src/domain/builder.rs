//! Random tree construction.

use tracing::{debug, instrument};

use crate::domain::entities::{Branch, RootParams};
use crate::domain::error::DomainError;

/// Leaves on a freshly generated child: uniform in `1..=CHILD_LEAVES_MAX`.
pub const CHILD_LEAVES_MAX: u32 = 3;

/// Children of a freshly generated child: uniform in `0..CHILD_BRANCHES_BOUND`.
pub const CHILD_BRANCHES_BOUND: u32 = 2;

/// Source of bounded random integers.
pub trait RandomSource {
    /// Uniformly distributed value in `[0, bound)`. `bound` must be positive.
    fn next_int(&mut self, bound: u32) -> u32;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_int(&mut self, bound: u32) -> u32 {
        (**self).next_int(bound)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_int(&mut self, bound: u32) -> u32 {
        (**self).next_int(bound)
    }
}

/// Builds branch hierarchies from root parameters and a random source.
///
/// Descendants get 1-3 leaves and 0-1 children each, drawn in that order per
/// child, depth first. With a seeded source the resulting tree is
/// reproducible.
pub struct TreeBuilder<R> {
    random: R,
}

impl<R: RandomSource> TreeBuilder<R> {
    pub fn new(random: R) -> Self {
        Self { random }
    }

    /// Build a tree from validated root parameters.
    #[instrument(level = "debug", skip(self))]
    pub fn build(&mut self, params: RootParams) -> Branch {
        let tree = self.grow_branch(
            params.initial_leaves,
            params.child_count,
            params.wind_strength,
        );
        debug!(
            nodes = tree.node_count(),
            leaves = tree.total_leaves(),
            depth = tree.depth(),
            "tree built"
        );
        tree
    }

    /// Validate raw values and build.
    pub fn try_build(
        &mut self,
        initial_leaves: i64,
        child_count: i64,
        wind_strength: i64,
    ) -> Result<Branch, DomainError> {
        let params = RootParams::new(initial_leaves, child_count, wind_strength)?;
        Ok(self.build(params))
    }

    /// Give back the random source, e.g. to inspect a test double.
    pub fn into_inner(self) -> R {
        self.random
    }

    fn grow_branch(&mut self, leaves: u32, child_count: u32, wind_strength: u32) -> Branch {
        let mut children = Vec::with_capacity(child_count as usize);
        for _ in 0..child_count {
            let child_leaves = self.random.next_int(CHILD_LEAVES_MAX) + 1;
            let child_children = self.random.next_int(CHILD_BRANCHES_BOUND);
            children.push(self.grow_branch(child_leaves, child_children, wind_strength));
        }
        Branch::new(leaves, children, wind_strength)
    }
}
