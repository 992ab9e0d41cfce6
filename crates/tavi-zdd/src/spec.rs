//! Constraint specification contract.
//!
//! Applications describe a problem by implementing [`ConstraintSpec`] over a
//! problem-specific [`ConstraintState`]. The engine drives the specification
//! top-down: starting from [`initial_state`](ConstraintSpec::initial_state)
//! at the highest level, it asks for the successor of every `(state, level,
//! take)` combination and prunes the branches the specification rejects.
//!
//! States must behave as immutable values: the engine never mutates a state
//! it has observed and always obtains fresh ones via `Clone` or
//! [`child`](ConstraintSpec::child).

use std::hash::{Hash, Hasher};

/// Application state threaded through ZDD construction.
///
/// Implementations must ensure:
/// - `Clone` produces an independent deep copy
/// - [`state_hash`](ConstraintState::state_hash) is stable across calls for
///   an unchanged value
/// - [`state_eq`](ConstraintState::state_eq) is reflexive, symmetric and
///   transitive, and consistent with the hash (equal states hash alike)
pub trait ConstraintState: Clone {
    /// Stable fingerprint used for memo lookups.
    fn state_hash(&self) -> u64;

    /// Equality probe verifying a fingerprint match.
    fn state_eq(&self, other: &Self) -> bool;
}

/// Successor returned by [`ConstraintSpec::child`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child<S> {
    /// Ordinary successor; expansion continues one level down.
    State(S),
    /// Skip directive: continue in `state` at level `skip_to`, treating the
    /// levels in between as vacuous (their variables cannot be selected).
    ///
    /// `skip_to = 0` jumps straight to the terminal validity check.
    /// `skip_to` must be strictly below the current level.
    Skip { state: S, skip_to: u32 },
}

/// Signal that a transition is infeasible.
///
/// Returned from [`ConstraintSpec::child`] to prune the branch to ⊥. This is
/// an ordinary outcome of construction, not an error: a diagram where every
/// branch is violated simply collapses to the 0-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Violation;

/// Problem specification consumed by [`build`](crate::Zdd::build).
///
/// Variables are numbered `1..=variables()`; construction proceeds from the
/// highest level down to 1.
pub trait ConstraintSpec {
    type State: ConstraintState;

    /// Size of the variable universe.
    fn variables(&self) -> u32;

    /// Constraint state before any variable has been decided.
    fn initial_state(&self) -> Self::State;

    /// Successor of `state` after deciding the variable at `level`.
    ///
    /// `take` is true when the variable is selected. Returning
    /// `Err(Violation)` marks the branch infeasible; returning
    /// [`Child::Skip`] forwards construction across levels made vacuous by
    /// the decision.
    fn child(
        &self,
        state: &Self::State,
        level: u32,
        take: bool,
    ) -> Result<Child<Self::State>, Violation>;

    /// Decide between ⊤ and ⊥ when a path has consumed all levels.
    fn is_valid(&self, state: &Self::State) -> bool;
}

/// Memo key pairing a state with its construction level.
///
/// Hashing uses the state's own [`state_hash`](ConstraintState::state_hash)
/// and equality its [`state_eq`](ConstraintState::state_eq), so memoisation
/// never depends on a container's default hashing of opaque application data.
/// The fingerprint is computed once at creation.
#[derive(Debug)]
pub struct StateKey<S> {
    state: S,
    level: u32,
    fingerprint: u64,
}

impl<S: ConstraintState> StateKey<S> {
    pub fn new(state: S, level: u32) -> Self {
        let fingerprint = state.state_hash();
        Self {
            state,
            level,
            fingerprint,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

impl<S: ConstraintState> Hash for StateKey<S> {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        hasher.write_u64(self.fingerprint);
        hasher.write_u32(self.level);
    }
}

impl<S: ConstraintState> PartialEq for StateKey<S> {
    fn eq(&self, other: &Self) -> bool {
        self.level == other.level
            && self.fingerprint == other.fingerprint
            && self.state.state_eq(&other.state)
    }
}

impl<S: ConstraintState> Eq for StateKey<S> {}
