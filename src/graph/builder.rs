use super::Graph;
use crate::dependency::{Dependency, DependencyRecord};
use crate::error::{Endpoint, MalformedInputError, UnknownReferenceWarning};
use crate::task::{Task, TaskPriority, TaskRecord, TaskState, TaskStatus};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, warn};

pub struct GraphBuilder {
    tasks: Vec<TaskRecord>,
    dependencies: Vec<DependencyRecord>,
}

impl GraphBuilder {
    pub fn new(tasks: Vec<TaskRecord>, dependencies: Vec<DependencyRecord>) -> Self {
        Self {
            tasks,
            dependencies,
        }
    }

    pub fn build(self) -> Result<Graph, MalformedInputError> {
        // Step 1: Materialize input tasks
        let (mut tasks, mut index) = Self::collect_tasks(self.tasks)?;

        // Step 2: Validate dependency endpoints
        let dependencies = Self::collect_dependencies(self.dependencies)?;

        // Step 3: Back every dangling endpoint with a placeholder
        let warnings = Self::synthesize_placeholders(&mut tasks, &mut index, &dependencies);

        debug!(
            tasks = tasks.len(),
            dependencies = dependencies.len(),
            placeholders = warnings.len(),
            "built task graph"
        );

        Ok(Graph::from_parts(tasks, index, dependencies, warnings))
    }

    fn collect_tasks(
        records: Vec<TaskRecord>,
    ) -> Result<(Vec<Task>, HashMap<String, usize>), MalformedInputError> {
        let mut tasks = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());

        for (position, record) in records.into_iter().enumerate() {
            let task = Self::task_from_record(position, record)?;
            if index.contains_key(&task.key) {
                return Err(MalformedInputError::DuplicateTaskKey { key: task.key });
            }
            index.insert(task.key.clone(), tasks.len());
            tasks.push(task);
        }

        Ok((tasks, index))
    }

    fn task_from_record(position: usize, record: TaskRecord) -> Result<Task, MalformedInputError> {
        let key = record
            .key()
            .ok_or(MalformedInputError::MissingTaskKey { index: position })?
            .to_string();

        let status: TaskStatus = parse_field(&key, "status", record.status.as_deref())?;
        let priority: TaskPriority = parse_field(&key, "priority", record.priority.as_deref())?;
        let assignee = record
            .assignee
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        Ok(Task::with_state(
            key,
            TaskState::Real {
                title: record.title.unwrap_or_default(),
                status,
                priority,
                assignee,
            },
        ))
    }

    fn collect_dependencies(
        records: Vec<DependencyRecord>,
    ) -> Result<Vec<Dependency>, MalformedInputError> {
        records
            .into_iter()
            .enumerate()
            .map(|(position, record)| {
                let predecessor = endpoint_key(record.source.as_deref()).ok_or(
                    MalformedInputError::MissingEndpoint {
                        index: position,
                        endpoint: Endpoint::Predecessor,
                    },
                )?;
                let successor = endpoint_key(record.target.as_deref()).ok_or(
                    MalformedInputError::MissingEndpoint {
                        index: position,
                        endpoint: Endpoint::Successor,
                    },
                )?;
                let mut dependency = Dependency::new(predecessor, successor);
                dependency.label = record.label;
                Ok(dependency)
            })
            .collect()
    }

    fn synthesize_placeholders(
        tasks: &mut Vec<Task>,
        index: &mut HashMap<String, usize>,
        dependencies: &[Dependency],
    ) -> Vec<UnknownReferenceWarning> {
        let mut warnings: Vec<UnknownReferenceWarning> = Vec::new();
        let mut warning_for: HashMap<String, usize> = HashMap::new();

        for (position, dependency) in dependencies.iter().enumerate() {
            for key in [&dependency.predecessor, &dependency.successor] {
                if let Some(&warning_idx) = warning_for.get(key) {
                    let referenced_by = &mut warnings[warning_idx].referenced_by;
                    if referenced_by.last() != Some(&position) {
                        referenced_by.push(position);
                    }
                    continue;
                }
                if index.contains_key(key) {
                    continue;
                }

                index.insert(key.clone(), tasks.len());
                tasks.push(Task::placeholder(key.clone()));
                warning_for.insert(key.clone(), warnings.len());
                warnings.push(UnknownReferenceWarning {
                    key: key.clone(),
                    referenced_by: vec![position],
                });
            }
        }

        for warning in &warnings {
            warn!(key = %warning.key, "{warning}");
        }

        warnings
    }
}

fn endpoint_key(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|key| !key.is_empty())
        .map(ToOwned::to_owned)
}

/// Blank or absent labels fall back to the type's default.
fn parse_field<T>(key: &str, field: &'static str, raw: Option<&str>) -> Result<T, MalformedInputError>
where
    T: FromStr + Default,
{
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(T::default()),
        Some(value) => value
            .parse()
            .map_err(|_| MalformedInputError::InvalidField {
                key: key.to_string(),
                field,
                value: value.to_string(),
            }),
    }
}
