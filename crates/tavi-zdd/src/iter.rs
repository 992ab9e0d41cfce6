//! Lazy enumeration of solutions.
//!
//! Walks the diagram with an explicit stack and yields one subset per
//! root-to-⊤ path. Enumeration is exponential in the worst case — it exists
//! for inspection and cross-checking, not as a substitute for
//! [`count`](crate::Zdd::count) or [`k_best`](crate::Zdd::k_best).

use crate::node::NodeId;
use crate::zdd::Zdd;

/// Iterator over all feasible subsets of a built diagram.
///
/// Each item is the ascending list of 1-based variable levels selected on
/// one root-to-⊤ path.
pub struct SolutionIter<'a> {
    zdd: &'a Zdd,
    /// Stack of (node, next_branch): 0 = explore lo, 1 = explore hi, 2 = done.
    stack: Vec<(NodeId, u8)>,
    /// Levels taken on the current path, root first (reused via push/pop).
    path: Vec<u32>,
}

impl<'a> SolutionIter<'a> {
    pub(crate) fn new(zdd: &'a Zdd) -> Self {
        let mut stack = Vec::new();
        if !zdd.root().is_null() {
            stack.push((zdd.root(), 0));
        }
        Self {
            zdd,
            stack,
            path: Vec::new(),
        }
    }
}

impl Iterator for SolutionIter<'_> {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, branch)) = self.stack.pop() {
            if id == NodeId::ZERO {
                continue;
            }
            if id == NodeId::ONE {
                // The path holds levels from the root downwards.
                let mut subset = self.path.clone();
                subset.reverse();
                return Some(subset);
            }

            let node = self.zdd.table.node(id);
            match branch {
                0 => {
                    self.stack.push((id, 1));
                    self.stack.push((node.lo, 0));
                }
                1 => {
                    self.path.push(node.level);
                    self.stack.push((id, 2));
                    self.stack.push((node.hi, 0));
                }
                _ => {
                    self.path.pop();
                }
            }
        }
        None
    }
}

impl Zdd {
    /// Iterate over every feasible subset.
    pub fn solutions(&self) -> SolutionIter<'_> {
        SolutionIter::new(self)
    }
}
