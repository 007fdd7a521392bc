//! Domain entities: the branch tree and the parameters that shape it

use std::fmt;

use crate::domain::error::DomainError;

/// A node in the simulated tree.
///
/// The number of children is fixed when the branch is built; afterwards only
/// the leaf count changes. Every branch in one tree carries the same wind
/// strength, copied down from the root at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    leaf_count: u32,
    children: Vec<Branch>,
    wind_strength: u32,
}

impl Branch {
    /// Create a branch from already-built children.
    ///
    /// `wind_strength` is coerced to at least 1.
    pub(crate) fn new(leaf_count: u32, children: Vec<Branch>, wind_strength: u32) -> Self {
        Self {
            leaf_count,
            children,
            wind_strength: wind_strength.max(1),
        }
    }

    /// Leaves currently resting on this branch.
    pub fn leaf_count(&self) -> u32 {
        self.leaf_count
    }

    /// Maximum leaves this branch sheds in one burst of the fall pass.
    pub fn wind_strength(&self) -> u32 {
        self.wind_strength
    }

    /// Child branches, in construction order.
    pub fn children(&self) -> &[Branch] {
        &self.children
    }

    /// Mutable access to the children. A slice, so the shape cannot change.
    pub(crate) fn children_mut(&mut self) -> &mut [Branch] {
        &mut self.children
    }

    /// No leaves and no children: nothing for a pass to do here.
    pub fn is_bare(&self) -> bool {
        self.leaf_count == 0 && self.children.is_empty()
    }

    /// Remove one leaf and return the remaining count.
    pub(crate) fn shed_leaf(&mut self) -> u32 {
        self.leaf_count = self.leaf_count.saturating_sub(1);
        self.leaf_count
    }

    /// Add one leaf and return the new total.
    pub(crate) fn sprout_leaf(&mut self) -> u32 {
        self.leaf_count = self.leaf_count.saturating_add(1);
        self.leaf_count
    }

    /// Number of branches in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Sum of leaf counts over this subtree.
    pub fn total_leaves(&self) -> u64 {
        self.iter().map(|(_, b)| u64::from(b.leaf_count)).sum()
    }

    /// Number of levels in this subtree (a lone branch has depth 1).
    pub fn depth(&self) -> usize {
        self.iter().map(|(d, _)| d + 1).max().unwrap_or(1)
    }

    /// Pre-order traversal yielding `(depth, branch)`, with `self` at depth 0.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: vec![(0, self)],
        }
    }

    /// Render the subtree for terminal display.
    pub fn to_display_tree(&self) -> termtree::Tree<BranchLabel> {
        termtree::Tree::new(BranchLabel {
            leaves: self.leaf_count,
        })
        .with_leaves(self.children.iter().map(Branch::to_display_tree))
    }
}

/// Pre-order iterator over a branch tree.
#[derive(Debug)]
pub struct Iter<'a> {
    stack: Vec<(usize, &'a Branch)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a Branch);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, branch) = self.stack.pop()?;
        self.stack
            .extend(branch.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, branch))
    }
}

/// Node label used by [`Branch::to_display_tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchLabel {
    pub leaves: u32,
}

impl fmt::Display for BranchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.leaves {
            1 => write!(f, "branch (1 leaf)"),
            n => write!(f, "branch ({n} leaves)"),
        }
    }
}

/// Upper bound on the root's children; every child is allocated up front.
pub const MAX_ROOT_BRANCHES: u32 = 100_000;

/// Validated parameters for the root branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootParams {
    pub initial_leaves: u32,
    pub child_count: u32,
    pub wind_strength: u32,
}

impl RootParams {
    /// Validate raw configuration values.
    ///
    /// Negative counts are rejected, as are more than [`MAX_ROOT_BRANCHES`]
    /// children. A wind strength below 1 is raised to 1.
    pub fn new(
        initial_leaves: i64,
        child_count: i64,
        wind_strength: i64,
    ) -> Result<Self, DomainError> {
        let child_count = count("child_count", child_count)?;
        if child_count > MAX_ROOT_BRANCHES {
            return Err(DomainError::InvalidConfiguration {
                field: "child_count",
                value: i64::from(child_count),
                reason: "too many root branches",
            });
        }
        Ok(Self {
            initial_leaves: count("initial_leaves", initial_leaves)?,
            child_count,
            wind_strength: to_u32("wind_strength", wind_strength.max(1))?,
        })
    }
}

/// Target leaf count per branch for the grow pass; always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Capacity(u32);

impl Capacity {
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value < 1 {
            return Err(DomainError::InvalidConfiguration {
                field: "spring_capacity",
                value,
                reason: "must be at least 1",
            });
        }
        Ok(Self(to_u32("spring_capacity", value)?))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn count(field: &'static str, value: i64) -> Result<u32, DomainError> {
    if value < 0 {
        return Err(DomainError::negative(field, value));
    }
    to_u32(field, value)
}

fn to_u32(field: &'static str, value: i64) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| DomainError::InvalidConfiguration {
        field,
        value,
        reason: "out of range",
    })
}
