//! # tavi-zdd
//!
//! Zero-suppressed Decision Diagrams (ZDD) for constraint optimisation
//! problems.
//!
//! ## The Problem
//!
//! Combinatorial selection problems — which items to pack, which servers to
//! enable, which tasks to place — have up to 2^n candidate subsets. Naively
//! enumerating the feasible ones explodes long before n gets interesting.
//!
//! ## The Solution
//!
//! A ZDD represents the whole family of feasible subsets as a shared, reduced
//! decision graph. This crate builds that graph directly from a constraint
//! specification: the application describes state transitions, the engine
//! explores both choices per variable, prunes violated branches, merges
//! equivalent states, and canonicalises every node. Counting solutions and
//! extracting the cheapest ones then run in time proportional to the graph,
//! not the solution set.
//!
//! ## Example
//!
//! ```
//! use tavi_zdd::{Child, ConstraintSpec, IntState, Violation, Zdd};
//!
//! // "At most two of five items may be selected."
//! struct AtMostTwo;
//!
//! impl ConstraintSpec for AtMostTwo {
//!     type State = IntState;
//!
//!     fn variables(&self) -> u32 {
//!         5
//!     }
//!
//!     fn initial_state(&self) -> IntState {
//!         IntState::zeros(1) // selection counter
//!     }
//!
//!     fn child(
//!         &self,
//!         state: &IntState,
//!         _level: u32,
//!         take: bool,
//!     ) -> Result<Child<IntState>, Violation> {
//!         let mut next = state.clone();
//!         if take {
//!             next.values[0] += 1;
//!             if next.values[0] > 2 {
//!                 return Err(Violation);
//!             }
//!         }
//!         Ok(Child::State(next))
//!     }
//!
//!     fn is_valid(&self, _state: &IntState) -> bool {
//!         true
//!     }
//! }
//!
//! let mut zdd = Zdd::new(5);
//! zdd.build(&AtMostTwo).unwrap();
//!
//! // C(5,0) + C(5,1) + C(5,2) feasible subsets
//! assert_eq!(zdd.count().unwrap(), 16);
//!
//! // The two cheapest subsets under unit costs
//! let costs = [0.0, 1.0, 1.0, 1.0, 1.0, 1.0];
//! let best = zdd.k_best(2, &costs).unwrap();
//! assert_eq!(best[0].variables, Vec::<u32>::new());
//! assert_eq!(best[1].variables, vec![1]);
//! ```
//!
//! ## Key Concepts
//!
//! - [`ConstraintSpec`] — the problem contract: variable count, initial
//!   state, transition function, terminal validity
//! - [`Child::Skip`] — jump across variables a decision has made vacuous
//! - [`Zdd::build`] — top-down construction with state memoisation
//! - [`Zdd::count`] / [`Zdd::k_best`] / [`Zdd::fold`] — bottom-up evaluation
//! - [`Zdd::solutions`] — lazy enumeration for inspection and testing

mod config;
mod debug;
mod error;
mod eval;
mod iter;
mod node;
mod spec;
mod states;
mod table;
mod zdd;

pub use config::{BuildConfig, CancelToken};
pub use error::{ZddError, ZddResult};
pub use eval::Solution;
pub use iter::SolutionIter;
pub use node::{Node, NodeId};
pub use spec::{Child, ConstraintSpec, ConstraintState, StateKey, Violation};
pub use states::{FloatState, IntState, MapState, StateValue};
pub use table::{NodeTable, TableStats};
pub use zdd::Zdd;
