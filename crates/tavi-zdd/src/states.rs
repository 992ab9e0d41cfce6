//! Ready-to-use constraint states.
//!
//! Most problems track a handful of counters or running sums; these helpers
//! cover that ground so a specification only has to describe transitions.
//! They are ordinary [`ConstraintState`] implementations — anything the
//! engine accepts can replace them.

use crate::spec::ConstraintState;
use rustc_hash::FxHasher;
use std::collections::BTreeMap;
use std::hash::Hasher;

/// Quantisation applied to floats before hashing (six decimals).
const FLOAT_HASH_SCALE: f64 = 1e6;
/// Tolerance for float equality.
const FLOAT_EQ_EPS: f64 = 1e-9;

fn hash_f64(hasher: &mut FxHasher, value: f64) {
    hasher.write_i64((value * FLOAT_HASH_SCALE).round() as i64);
}

fn f64_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= FLOAT_EQ_EPS
}

/// State backed by a vector of integers: counters, indices, flags as 0/1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntState {
    pub values: Vec<i64>,
}

impl IntState {
    pub fn new(values: impl Into<Vec<i64>>) -> Self {
        Self {
            values: values.into(),
        }
    }

    /// All-zero state of the given width.
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0; len],
        }
    }
}

impl ConstraintState for IntState {
    fn state_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        for v in &self.values {
            hasher.write_i64(*v);
        }
        hasher.finish()
    }

    fn state_eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

/// State backed by a vector of floats: weights, capacities, running sums.
///
/// Hashing quantises to six decimals; equality allows a 1e-9 tolerance, so
/// values meant to be distinguished should differ by more than that.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatState {
    pub values: Vec<f64>,
}

impl FloatState {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
        }
    }

    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }
}

impl ConstraintState for FloatState {
    fn state_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        for v in &self.values {
            hash_f64(&mut hasher, *v);
        }
        hasher.finish()
    }

    fn state_eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| f64_eq(*a, *b))
    }
}

/// Heterogeneous value stored in a [`MapState`].
#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl StateValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            StateValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            StateValue::Float(n) => Some(*n),
            StateValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StateValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StateValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<i64> for StateValue {
    fn from(v: i64) -> Self {
        StateValue::Int(v)
    }
}

impl From<i32> for StateValue {
    fn from(v: i32) -> Self {
        StateValue::Int(v.into())
    }
}

impl From<f64> for StateValue {
    fn from(v: f64) -> Self {
        StateValue::Float(v)
    }
}

impl From<&str> for StateValue {
    fn from(v: &str) -> Self {
        StateValue::Str(v.to_string())
    }
}

impl From<String> for StateValue {
    fn from(v: String) -> Self {
        StateValue::Str(v)
    }
}

impl From<bool> for StateValue {
    fn from(v: bool) -> Self {
        StateValue::Bool(v)
    }
}

/// Key/value state for problems whose bookkeeping does not fit fixed arrays.
///
/// Entries are kept sorted by key, so hashing is order-independent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapState {
    entries: BTreeMap<String, StateValue>,
}

impl MapState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chainable insertion, mostly for building initial states.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StateValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StateValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConstraintState for MapState {
    fn state_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        for (key, value) in &self.entries {
            hasher.write(key.as_bytes());
            match value {
                StateValue::Int(n) => {
                    hasher.write_u8(0);
                    hasher.write_i64(*n);
                }
                StateValue::Float(n) => {
                    hasher.write_u8(1);
                    hash_f64(&mut hasher, *n);
                }
                StateValue::Str(s) => {
                    hasher.write_u8(2);
                    hasher.write(s.as_bytes());
                }
                StateValue::Bool(b) => {
                    hasher.write_u8(3);
                    hasher.write_u8(u8::from(*b));
                }
            }
        }
        hasher.finish()
    }

    fn state_eq(&self, other: &Self) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        self.entries.iter().zip(&other.entries).all(|(a, b)| {
            a.0 == b.0
                && match (a.1, b.1) {
                    (StateValue::Float(x), StateValue::Float(y)) => f64_eq(*x, *y),
                    (x, y) => x == y,
                }
        })
    }
}
