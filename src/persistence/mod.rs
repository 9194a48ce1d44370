//! File-backed collaborators: loading input batches, writing results back.
//!
//! Nothing in here is needed to run the engine; it only moves records
//! between disk and [`InputBatch`] / [`CriticalPathResult`].

use crate::critical_path::CriticalPathResult;
use crate::dependency::DependencyRecord;
use crate::duration::DurationPolicy;
use crate::task::TaskRecord;
use polars::prelude::PolarsError;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid json in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataframe conversion error: {0}")]
    DataFrame(#[from] PolarsError),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Engine(#[from] crate::Error),
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>) -> impl FnOnce(serde_json::Error) -> Self {
        let path = path.into();
        move |source| Self::Json { path, source }
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// One unified set of records handed to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputBatch {
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub dependencies: Vec<DependencyRecord>,
}

impl InputBatch {
    pub fn new(tasks: Vec<TaskRecord>, dependencies: Vec<DependencyRecord>) -> Self {
        Self {
            tasks,
            dependencies,
        }
    }

    /// Appends another batch; order is preserved.
    pub fn merge(&mut self, other: InputBatch) {
        self.tasks.extend(other.tasks);
        self.dependencies.extend(other.dependencies);
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.dependencies.is_empty()
    }

    pub fn compute(&self, policy: &DurationPolicy) -> crate::Result<CriticalPathResult> {
        crate::compute(self.tasks.clone(), self.dependencies.clone(), policy)
    }
}

pub mod file;

pub use file::{
    load_batch_from_dir, load_dependencies_from_json, load_policy_from_json,
    load_tasks_from_json, save_policy_to_json, save_results_to_json, save_schedule_to_csv,
};
