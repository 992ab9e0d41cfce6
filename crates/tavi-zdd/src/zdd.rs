//! The ZDD engine: top-down construction with state memoisation.
//!
//! [`Zdd::build`] expands a [`ConstraintSpec`] from the highest variable
//! level down to the terminals. Each `(state, level)` pair is expanded at
//! most once — the memo keys on the specification's own state identity —
//! and every resulting `(level, lo, hi)` triple is canonicalised by the
//! [`NodeTable`], so structurally equal subproblems collapse into shared
//! subgraphs even when their states differ.
//!
//! Skip directives forward construction across levels a decision has made
//! vacuous; both skipped and expanded renditions of the same specification
//! produce the same diagram, because a level whose variable cannot be
//! selected reduces away under the zero-suppression rule.

use crate::config::{BuildConfig, CancelToken};
use crate::error::{ZddError, ZddResult};
use crate::node::{Node, NodeId};
use crate::spec::{Child, ConstraintSpec, StateKey};
use crate::table::{NodeTable, TableStats};
use rustc_hash::FxHashMap;
use std::mem;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Zero-suppressed Decision Diagram over `1..=vars` variables.
///
/// The engine is created empty (root is [`NodeId::NULL`]) and populated by
/// [`build`](Zdd::build). After a successful build the diagram is immutable;
/// evaluators such as [`count`](Zdd::count) and [`k_best`](Zdd::k_best) take
/// `&self` and may run concurrently.
pub struct Zdd {
    pub(crate) root: NodeId,
    pub(crate) table: NodeTable,
    vars: u32,
    config: BuildConfig,
}

impl Zdd {
    /// Create an engine for `vars` decision variables with default
    /// configuration.
    pub fn new(vars: u32) -> Self {
        Self::with_config(vars, BuildConfig::default())
    }

    /// Create an engine with explicit construction parameters.
    pub fn with_config(vars: u32, config: BuildConfig) -> Self {
        Self {
            root: NodeId::NULL,
            table: NodeTable::new(),
            vars,
            config,
        }
    }

    /// Construct the diagram from a constraint specification.
    ///
    /// Fails with [`ZddError::InvalidConstraint`] when the specification
    /// declares a different variable count than the engine. Timeout, memory
    /// ceiling and cancellation are checked at every expansion step.
    ///
    /// On failure the engine keeps the root of the last successful build
    /// (or [`NodeId::NULL`] if there was none); on success the new root
    /// replaces it.
    pub fn build<C: ConstraintSpec>(&mut self, spec: &C) -> ZddResult<()> {
        if spec.variables() != self.vars {
            return Err(ZddError::InvalidConstraint(format!(
                "spec declares {} variables, engine was created for {}",
                spec.variables(),
                self.vars
            )));
        }

        debug!(
            vars = self.vars,
            workers = self.config.effective_workers(),
            "building zdd"
        );

        let mut ctx = BuildCtx {
            spec,
            table: &self.table,
            memo: FxHashMap::default(),
            deadline: self.config.timeout.map(|d| Instant::now() + d),
            timeout: self.config.timeout.unwrap_or_default(),
            cancel: self.config.cancel.clone(),
            memory_limit: self.config.memory_limit_bytes,
        };

        let root = ctx.expand(spec.initial_state(), self.vars)?;

        debug!(
            root = root.raw(),
            nodes = self.table.size(),
            memo_entries = ctx.memo.len(),
            "zdd construction finished"
        );

        self.root = root;
        Ok(())
    }

    /// Root of the diagram; [`NodeId::NULL`] before the first successful
    /// build.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// True once a build has published a root.
    pub fn is_built(&self) -> bool {
        !self.root.is_null()
    }

    /// Total number of stored nodes, terminals included.
    pub fn size(&self) -> usize {
        self.table.size()
    }

    /// Number of decision variables this engine was created for.
    pub fn variables(&self) -> u32 {
        self.vars
    }

    /// Look up a node by id.
    pub fn get_node(&self, id: NodeId) -> ZddResult<Node> {
        self.table.get(id)
    }

    /// Construction parameters this engine was created with.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Statistics of the underlying node table.
    pub fn table_stats(&self) -> TableStats {
        self.table.stats()
    }
}

/// Per-build state: memo, limits and the shared table.
struct BuildCtx<'a, C: ConstraintSpec> {
    spec: &'a C,
    table: &'a NodeTable,
    memo: FxHashMap<StateKey<C::State>, NodeId>,
    deadline: Option<Instant>,
    timeout: Duration,
    cancel: Option<CancelToken>,
    memory_limit: u64,
}

impl<C: ConstraintSpec> BuildCtx<'_, C> {
    fn expand(&mut self, state: C::State, level: u32) -> ZddResult<NodeId> {
        self.checkpoint()?;

        if level == 0 {
            return Ok(if self.spec.is_valid(&state) {
                NodeId::ONE
            } else {
                NodeId::ZERO
            });
        }

        let key = StateKey::new(state, level);
        if let Some(&cached) = self.memo.get(&key) {
            return Ok(cached);
        }

        let lo = self.branch(&key, level, false)?;
        let hi = self.branch(&key, level, true)?;

        let id = self.table.add(level, lo, hi);
        self.memo.insert(key, id);
        Ok(id)
    }

    fn branch(&mut self, key: &StateKey<C::State>, level: u32, take: bool) -> ZddResult<NodeId> {
        match self.spec.child(key.state(), level, take) {
            // Violated transition: this branch contributes no solutions.
            Err(_) => Ok(NodeId::ZERO),
            Ok(Child::State(next)) => self.expand(next, level - 1),
            Ok(Child::Skip { state, skip_to }) => {
                if skip_to == 0 {
                    Ok(if self.spec.is_valid(&state) {
                        NodeId::ONE
                    } else {
                        NodeId::ZERO
                    })
                } else if skip_to < level {
                    self.expand(state, skip_to)
                } else {
                    warn!(level, skip_to, "skip directive must target a lower level");
                    Err(ZddError::InvalidVariable {
                        level: skip_to,
                        max: level - 1,
                    })
                }
            }
        }
    }

    /// Deadline, cancellation and memory ceiling, checked at every
    /// recursive entry so a failing build stops promptly.
    fn checkpoint(&self) -> ZddResult<()> {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(ZddError::Timeout(self.timeout));
            }
        }
        if let Some(cancel) = &self.cancel {
            if cancel.is_cancelled() {
                return Err(ZddError::Cancelled);
            }
        }
        if self.memory_limit > 0 {
            let memo_bytes = (self.memo.capacity()
                * (mem::size_of::<StateKey<C::State>>() + mem::size_of::<NodeId>()))
                as u64;
            let used = self.table.approx_bytes() + memo_bytes;
            if used > self.memory_limit {
                return Err(ZddError::MemoryLimit {
                    used,
                    limit: self.memory_limit,
                });
            }
        }
        Ok(())
    }
}
