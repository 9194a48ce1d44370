//! Critical path extraction.
//!
//! Turns a [`Schedule`] into the report consumers read: one representative
//! chain, the full set of critical tasks and edges, and a per-task slack
//! table.

use crate::dependency::PathType;
use crate::error::UnknownReferenceWarning;
use crate::schedule::Schedule;
use crate::task::Task;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlackEntry {
    pub key: String,
    pub title: String,
    pub status: String,
    pub duration: i64,
    pub earliest_start: i64,
    pub earliest_finish: i64,
    pub latest_start: i64,
    pub latest_finish: i64,
    pub slack: i64,
    pub is_critical: bool,
    pub placeholder: bool,
}

impl SlackEntry {
    fn from_task(task: &Task) -> Self {
        Self {
            key: task.key.clone(),
            title: task.title(),
            status: task.status_label().to_string(),
            duration: task.duration.unwrap_or(0),
            earliest_start: task.earliest_start.unwrap_or(0),
            earliest_finish: task.earliest_finish.unwrap_or(0),
            latest_start: task.latest_start.unwrap_or(0),
            latest_finish: task.latest_finish.unwrap_or(0),
            slack: task.slack.unwrap_or(0),
            is_critical: task.critical(),
            placeholder: task.is_placeholder(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeFlag {
    pub predecessor: String,
    pub successor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub path_type: PathType,
}

impl EdgeFlag {
    pub fn is_critical(&self) -> bool {
        self.path_type == PathType::Critical
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalPathResult {
    /// One maximal chain of critical tasks, source to sink.
    pub chain: Vec<String>,
    pub project_duration: i64,
    pub slack: Vec<SlackEntry>,
    /// Per-dependency classification, in input order.
    pub edges: Vec<EdgeFlag>,
    /// Every zero-slack task, sorted by key.
    pub critical_tasks: Vec<String>,
    /// Every tight edge between critical tasks, sorted and deduplicated.
    pub critical_edges: Vec<(String, String)>,
    pub flagged: Vec<String>,
    pub warnings: Vec<UnknownReferenceWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalPathSummary {
    pub task_count: usize,
    pub critical_count: usize,
    pub critical_edge_count: usize,
    pub parallel_edge_count: usize,
    pub placeholder_count: usize,
    pub project_duration: i64,
    pub chain: Vec<String>,
}

impl CriticalPathSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("critical={}", self.critical_count));
        parts.push(format!("duration={}", self.project_duration));
        if self.critical_edge_count > 0 {
            parts.push(format!("critical_edges={}", self.critical_edge_count));
        }
        if self.parallel_edge_count > 0 {
            parts.push(format!("parallel_edges={}", self.parallel_edge_count));
        }
        if self.placeholder_count > 0 {
            parts.push(format!("placeholders={}", self.placeholder_count));
        }
        if !self.chain.is_empty() {
            parts.push(format!("path={}", self.chain.join("->")));
        }
        parts.join(", ")
    }
}

pub fn extract(schedule: &Schedule) -> CriticalPathResult {
    let slack: Vec<SlackEntry> = schedule.tasks().iter().map(SlackEntry::from_task).collect();

    let edges: Vec<EdgeFlag> = schedule
        .dependencies()
        .iter()
        .map(|dependency| EdgeFlag {
            predecessor: dependency.predecessor.clone(),
            successor: dependency.successor.clone(),
            label: dependency.label.clone(),
            path_type: dependency.path_type(),
        })
        .collect();

    let mut critical_tasks: Vec<String> = schedule
        .critical_tasks()
        .map(|task| task.key.clone())
        .collect();
    critical_tasks.sort();

    let critical_edges: Vec<(String, String)> = schedule
        .critical_dependencies()
        .map(|dependency| {
            (
                dependency.predecessor.clone(),
                dependency.successor.clone(),
            )
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let chain = representative_chain(schedule);
    debug!(chain = %chain.join(" -> "), "selected representative critical chain");

    CriticalPathResult {
        chain,
        project_duration: schedule.project_duration(),
        slack,
        edges,
        critical_tasks,
        critical_edges,
        flagged: schedule.flagged().to_vec(),
        warnings: schedule.warnings().to_vec(),
    }
}

/// Walks tight critical edges from the smallest critical source, always
/// stepping to the smallest successor key.
fn representative_chain(schedule: &Schedule) -> Vec<String> {
    let mut has_predecessor: HashSet<&str> = HashSet::new();
    let mut tight_successors: HashMap<&str, Vec<&str>> = HashMap::new();
    for dependency in schedule.dependencies() {
        has_predecessor.insert(dependency.successor.as_str());
        if dependency.is_critical == Some(true) {
            tight_successors
                .entry(dependency.predecessor.as_str())
                .or_default()
                .push(dependency.successor.as_str());
        }
    }

    let start = schedule
        .critical_tasks()
        .map(|task| task.key.as_str())
        .filter(|key| !has_predecessor.contains(key))
        .min();

    let Some(mut current) = start else {
        return Vec::new();
    };

    let mut chain = vec![current.to_string()];
    while let Some(&next) = tight_successors
        .get(current)
        .and_then(|successors| successors.iter().min())
    {
        chain.push(next.to_string());
        current = next;
    }
    chain
}

impl CriticalPathResult {
    pub fn slack_for(&self, key: &str) -> Option<&SlackEntry> {
        self.slack.iter().find(|entry| entry.key == key)
    }

    pub fn is_critical_task(&self, key: &str) -> bool {
        self.critical_tasks.binary_search_by(|probe| probe.as_str().cmp(key)).is_ok()
    }

    pub fn is_critical_edge(&self, predecessor: &str, successor: &str) -> bool {
        self.critical_edges
            .iter()
            .any(|(pred, succ)| pred == predecessor && succ == successor)
    }

    /// Task with the most slack; ties go to the smallest key.
    pub fn most_slack(&self) -> Option<&SlackEntry> {
        self.slack
            .iter()
            .max_by(|a, b| a.slack.cmp(&b.slack).then_with(|| b.key.cmp(&a.key)))
    }

    /// Task with the least slack; ties go to the smallest key.
    pub fn least_slack(&self) -> Option<&SlackEntry> {
        self.slack
            .iter()
            .min_by(|a, b| a.slack.cmp(&b.slack).then_with(|| a.key.cmp(&b.key)))
    }

    /// Sum of durations along the representative chain.
    pub fn chain_duration(&self) -> i64 {
        self.chain
            .iter()
            .filter_map(|key| self.slack_for(key))
            .map(|entry| entry.duration)
            .sum()
    }

    pub fn summary(&self) -> CriticalPathSummary {
        let critical_edge_count = self.edges.iter().filter(|edge| edge.is_critical()).count();
        CriticalPathSummary {
            task_count: self.slack.len(),
            critical_count: self.critical_tasks.len(),
            critical_edge_count,
            parallel_edge_count: self.edges.len() - critical_edge_count,
            placeholder_count: self.slack.iter().filter(|entry| entry.placeholder).count(),
            project_duration: self.project_duration,
            chain: self.chain.clone(),
        }
    }

    pub fn to_cli_summary(&self) -> String {
        self.summary().to_cli_summary()
    }

    /// The slack table as a DataFrame, one row per task in graph order.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let keys: Vec<&str> = self.slack.iter().map(|e| e.key.as_str()).collect();
        let statuses: Vec<&str> = self.slack.iter().map(|e| e.status.as_str()).collect();
        let int_column = |name: &'static str, get: fn(&SlackEntry) -> i64| {
            let values: Vec<i64> = self.slack.iter().map(get).collect();
            Series::new(PlSmallStr::from_static(name), values).into_column()
        };
        let critical: Vec<bool> = self.slack.iter().map(|e| e.is_critical).collect();

        let columns: Vec<Column> = vec![
            Series::new(PlSmallStr::from_static("key"), keys).into_column(),
            Series::new(PlSmallStr::from_static("status"), statuses).into_column(),
            int_column("duration", |e: &SlackEntry| e.duration),
            int_column("earliest_start", |e: &SlackEntry| e.earliest_start),
            int_column("earliest_finish", |e: &SlackEntry| e.earliest_finish),
            int_column("latest_start", |e: &SlackEntry| e.latest_start),
            int_column("latest_finish", |e: &SlackEntry| e.latest_finish),
            int_column("slack", |e: &SlackEntry| e.slack),
            Series::new(PlSmallStr::from_static("is_critical"), critical).into_column(),
        ];

        DataFrame::new(columns)
    }
}
