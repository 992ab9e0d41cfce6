//! Bottom-up evaluation of a finished diagram.
//!
//! All evaluators are pure functions of the node graph: they take `&self`,
//! never touch the table beyond reads, and may run concurrently once
//! [`build`](crate::Zdd::build) has returned. The generic [`fold`] carries
//! the shared memoised traversal; counting and k-best ride on top of it.
//!
//! [`fold`]: crate::Zdd::fold

use crate::error::{ZddError, ZddResult};
use crate::node::NodeId;
use crate::zdd::Zdd;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One feasible subset extracted by [`k_best`](Zdd::k_best).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Selected variables: ascending, 1-based levels.
    pub variables: Vec<u32>,
    /// Total cost of the subset under the supplied cost vector.
    pub cost: f64,
}

/// A costed root-to-⊤ path during k-best evaluation.
#[derive(Debug, Clone, PartialEq)]
struct RankedPath {
    cost: f64,
    vars: Vec<u32>,
}

/// Total order on paths: cost first, then ascending variable sequence.
/// This is the deterministic tie-break the k-best contract promises.
fn rank(a: &RankedPath, b: &RankedPath) -> Ordering {
    a.cost
        .partial_cmp(&b.cost)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.vars.cmp(&b.vars))
}

/// Combine the ranked paths of both children of a node at `level`: hi paths
/// gain the level's variable and its cost, then the best `k` survive.
fn merge_top_k(
    lo: &[RankedPath],
    hi: &[RankedPath],
    level: u32,
    level_cost: f64,
    k: usize,
) -> Vec<RankedPath> {
    let mut combined = Vec::with_capacity(lo.len() + hi.len());
    combined.extend_from_slice(lo);
    combined.extend(hi.iter().map(|p| {
        // Children sit at strictly lower levels, so appending keeps the
        // variable list ascending.
        let mut vars = p.vars.clone();
        vars.push(level);
        RankedPath {
            cost: p.cost + level_cost,
            vars,
        }
    }));
    combined.sort_by(rank);
    combined.truncate(k);
    combined
}

impl Zdd {
    /// Generic bottom-up reduction.
    ///
    /// `zero` and `one` are the values of the terminals; `combine` folds a
    /// node from its level and the values of its `lo` and `hi` children.
    /// Every node is evaluated exactly once (memoised by id) using an
    /// explicit work-stack, so diagram height does not consume call stack.
    ///
    /// An engine that has not been built evaluates to `zero`, like the
    /// empty family.
    pub fn fold<T, F>(&self, zero: T, one: T, combine: F) -> ZddResult<T>
    where
        T: Clone,
        F: Fn(u32, &T, &T) -> T,
    {
        let root = self.root;
        if root.is_null() {
            return Ok(zero);
        }

        let mut memo: FxHashMap<NodeId, T> = FxHashMap::default();
        memo.insert(NodeId::ZERO, zero);
        memo.insert(NodeId::ONE, one);

        let mut stack = vec![root];
        while let Some(&id) = stack.last() {
            if memo.contains_key(&id) {
                stack.pop();
                continue;
            }
            let node = self.get_node(id)?;
            let lo_ready = memo.contains_key(&node.lo);
            let hi_ready = memo.contains_key(&node.hi);
            if lo_ready && hi_ready {
                let value = combine(node.level, &memo[&node.lo], &memo[&node.hi]);
                memo.insert(id, value);
                stack.pop();
            } else {
                if !hi_ready {
                    stack.push(node.hi);
                }
                if !lo_ready {
                    stack.push(node.lo);
                }
            }
        }

        memo.remove(&root).ok_or(ZddError::InvalidNode(root))
    }

    /// Number of distinct root-to-⊤ paths, i.e. the number of feasible
    /// subsets. Counts beyond `u64::MAX` saturate.
    pub fn count(&self) -> ZddResult<u64> {
        self.fold(0u64, 1u64, |_, lo, hi| lo.saturating_add(*hi))
    }

    /// The `k` cheapest solutions under a linear cost vector, ascending by
    /// cost; ties break by ascending variable sequence.
    ///
    /// `costs` is 1-based: index 0 is unused and the vector must have at
    /// least `variables() + 1` entries, otherwise the call fails with
    /// [`ZddError::InvalidConstraint`]. `k = 0` yields an empty result; an
    /// infeasible (or unbuilt) diagram yields an empty result rather than
    /// an error.
    pub fn k_best(&self, k: usize, costs: &[f64]) -> ZddResult<Vec<Solution>> {
        let needed = self.variables() as usize + 1;
        if costs.len() < needed {
            return Err(ZddError::InvalidConstraint(format!(
                "cost vector has {} entries, need at least {} (1-based levels)",
                costs.len(),
                needed
            )));
        }
        if k == 0 || !self.is_built() {
            return Ok(Vec::new());
        }
        if k == 1 {
            return Ok(self.best_solution(costs)?.into_iter().collect());
        }

        let ranked = self.fold(
            Vec::new(),
            vec![RankedPath {
                cost: 0.0,
                vars: Vec::new(),
            }],
            |level, lo, hi| merge_top_k(lo, hi, level, costs[level as usize], k),
        )?;

        Ok(ranked
            .into_iter()
            .map(|p| Solution {
                variables: p.vars,
                cost: p.cost,
            })
            .collect())
    }

    /// Min-cost DP for the `k = 1` case: tracks a single best path per node
    /// instead of a list.
    fn best_solution(&self, costs: &[f64]) -> ZddResult<Option<Solution>> {
        let best = self.fold(
            None::<RankedPath>,
            Some(RankedPath {
                cost: 0.0,
                vars: Vec::new(),
            }),
            |level, lo, hi| {
                let taken = hi.as_ref().map(|p| {
                    let mut vars = p.vars.clone();
                    vars.push(level);
                    RankedPath {
                        cost: p.cost + costs[level as usize],
                        vars,
                    }
                });
                match (lo.clone(), taken) {
                    (None, taken) => taken,
                    (skipped, None) => skipped,
                    (Some(s), Some(t)) => Some(if rank(&t, &s) == Ordering::Less { t } else { s }),
                }
            },
        )?;

        Ok(best.map(|p| Solution {
            variables: p.vars,
            cost: p.cost,
        }))
    }
}
