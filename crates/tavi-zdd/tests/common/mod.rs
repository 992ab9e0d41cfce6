//! Shared constraint specifications for integration tests.

#![allow(dead_code)]

use tavi_zdd::{Child, ConstraintSpec, IntState, Violation};

/// Accepts every transition: every subset of the universe is feasible.
pub struct FreeSpec {
    pub vars: u32,
}

impl ConstraintSpec for FreeSpec {
    type State = IntState;

    fn variables(&self) -> u32 {
        self.vars
    }

    fn initial_state(&self) -> IntState {
        IntState::zeros(0)
    }

    fn child(&self, state: &IntState, _: u32, _: bool) -> Result<Child<IntState>, Violation> {
        Ok(Child::State(state.clone()))
    }

    fn is_valid(&self, _: &IntState) -> bool {
        true
    }
}

/// At most `max` variables may be selected.
pub struct AtMostSpec {
    pub vars: u32,
    pub max: i64,
}

impl ConstraintSpec for AtMostSpec {
    type State = IntState;

    fn variables(&self) -> u32 {
        self.vars
    }

    fn initial_state(&self) -> IntState {
        IntState::zeros(1)
    }

    fn child(&self, state: &IntState, _: u32, take: bool) -> Result<Child<IntState>, Violation> {
        let mut next = state.clone();
        if take {
            next.values[0] += 1;
            if next.values[0] > self.max {
                return Err(Violation);
            }
        }
        Ok(Child::State(next))
    }

    fn is_valid(&self, _: &IntState) -> bool {
        true
    }
}

/// Rejects every transition and declares the initial state invalid.
pub struct RejectAllSpec {
    pub vars: u32,
}

impl ConstraintSpec for RejectAllSpec {
    type State = IntState;

    fn variables(&self) -> u32 {
        self.vars
    }

    fn initial_state(&self) -> IntState {
        IntState::zeros(0)
    }

    fn child(&self, _: &IntState, _: u32, _: bool) -> Result<Child<IntState>, Violation> {
        Err(Violation)
    }

    fn is_valid(&self, _: &IntState) -> bool {
        false
    }
}

/// Rejects selection of any variable; the empty subset remains feasible.
pub struct RejectTakeSpec {
    pub vars: u32,
}

impl ConstraintSpec for RejectTakeSpec {
    type State = IntState;

    fn variables(&self) -> u32 {
        self.vars
    }

    fn initial_state(&self) -> IntState {
        IntState::zeros(0)
    }

    fn child(&self, state: &IntState, _: u32, take: bool) -> Result<Child<IntState>, Violation> {
        if take {
            return Err(Violation);
        }
        Ok(Child::State(state.clone()))
    }

    fn is_valid(&self, _: &IntState) -> bool {
        true
    }
}

/// Cost vector with zero at the unused index 0 and unit cost per variable.
pub fn unit_costs(vars: u32) -> Vec<f64> {
    let mut costs = vec![0.0; vars as usize + 1];
    for c in costs.iter_mut().skip(1) {
        *c = 1.0;
    }
    costs
}
