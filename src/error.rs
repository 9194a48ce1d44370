//! Error and warning types raised by the engine.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type for a full build → schedule → extract run.
pub type Result<T> = std::result::Result<T, Error>;

/// Which end of a dependency a message refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Predecessor,
    Successor,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Predecessor => write!(f, "predecessor"),
            Endpoint::Successor => write!(f, "successor"),
        }
    }
}

/// Input records that cannot be turned into a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedInputError {
    #[error("task record #{index} has no key")]
    MissingTaskKey { index: usize },

    #[error("duplicate task key '{key}'")]
    DuplicateTaskKey { key: String },

    #[error("dependency record #{index} has no {endpoint} key")]
    MissingEndpoint { index: usize, endpoint: Endpoint },

    #[error("task '{key}' has unrecognized {field} '{value}'")]
    InvalidField {
        key: String,
        field: &'static str,
        value: String,
    },
}

/// The dependency graph is not acyclic.
///
/// `task` is the task at which ordering failed; `members` lists every task
/// in the same strongly-connected component, sorted by key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dependency cycle detected at task '{task}' (cycle members: {})", .members.join(", "))]
pub struct CycleError {
    pub task: String,
    pub members: Vec<String>,
}

/// A dependency named a task key that is not in the task set.
///
/// Non-fatal: the builder synthesizes a placeholder task for the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownReferenceWarning {
    pub key: String,
    /// Positions of the dependency records that referenced the key.
    pub referenced_by: Vec<usize>,
}

impl fmt::Display for UnknownReferenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown task '{}' referenced by {} dependenc{}; placeholder created",
            self.key,
            self.referenced_by.len(),
            if self.referenced_by.len() == 1 { "y" } else { "ies" }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    MalformedInput(#[from] MalformedInputError),

    #[error(transparent)]
    Cycle(#[from] CycleError),
}
