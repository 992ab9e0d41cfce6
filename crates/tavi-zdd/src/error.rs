//! Engine error types.

use crate::node::NodeId;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by construction and evaluation.
///
/// A constraint [`Violation`](crate::spec::Violation) is deliberately *not*
/// represented here: a violated transition is a normal signal that prunes one
/// branch to ⊥, never an engine failure.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ZddError {
    #[error("invalid variable level {level}: expected at most {max}")]
    InvalidVariable { level: u32, max: u32 },

    #[error("invalid node id {}", .0.raw())]
    InvalidNode(NodeId),

    #[error("invalid constraint: {0}")]
    InvalidConstraint(String),

    #[error("memory limit exceeded: {used} bytes used, limit is {limit}")]
    MemoryLimit { used: u64, limit: u64 },

    #[error("construction timed out after {0:?}")]
    Timeout(Duration),

    #[error("construction cancelled")]
    Cancelled,
}

pub type ZddResult<T> = Result<T, ZddError>;
