use crate::dependency::{Dependency, DependencyRecord};
use crate::error::{MalformedInputError, UnknownReferenceWarning};
use crate::task::{Task, TaskRecord};
use serde::Serialize;
use std::collections::HashMap;

/// Tasks and dependencies for one computation.
///
/// Every dependency endpoint resolves to a task: keys the input never
/// defined are backed by placeholder tasks appended after the real ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Graph {
    tasks: Vec<Task>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    dependencies: Vec<Dependency>,
    warnings: Vec<UnknownReferenceWarning>,
}

impl Graph {
    pub fn build(
        tasks: Vec<TaskRecord>,
        dependencies: Vec<DependencyRecord>,
    ) -> Result<Self, MalformedInputError> {
        GraphBuilder::new(tasks, dependencies).build()
    }

    pub(crate) fn from_parts(
        tasks: Vec<Task>,
        index: HashMap<String, usize>,
        dependencies: Vec<Dependency>,
        warnings: Vec<UnknownReferenceWarning>,
    ) -> Self {
        Self {
            tasks,
            index,
            dependencies,
            warnings,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, key: &str) -> Option<&Task> {
        self.position(key).map(|idx| &self.tasks[idx])
    }

    pub(crate) fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn warnings(&self) -> &[UnknownReferenceWarning] {
        &self.warnings
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|task| task.is_placeholder())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut [Task] {
        &mut self.tasks
    }

    pub(crate) fn dependencies_mut(&mut self) -> &mut [Dependency] {
        &mut self.dependencies
    }
}

pub mod builder;
pub mod schedule_dag;

pub use builder::GraphBuilder;
pub use schedule_dag::ScheduleDag;
