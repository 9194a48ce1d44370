use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use thiserror::Error;

/// Status label reported for synthesized placeholder tasks.
pub const MISSING_STATUS: &str = "missing";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized label '{0}'")]
pub struct UnknownLabel(pub String);

/// Deserializes through [`FromStr`], so policy files accept the same
/// aliases as task records.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Done,
    Blocked,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not-started",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
            TaskStatus::Blocked => "blocked",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "not-started" | "to-do" | "todo" | "open" | "new" | "backlog" => {
                Ok(TaskStatus::NotStarted)
            }
            "in-progress" | "doing" | "started" => Ok(TaskStatus::InProgress),
            "done" | "closed" | "complete" | "completed" | "resolved" => Ok(TaskStatus::Done),
            "blocked" | "on-hold" => Ok(TaskStatus::Blocked),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = UnknownLabel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
        TaskPriority::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "low" | "lowest" | "trivial" | "minor" => Ok(TaskPriority::Low),
            "medium" | "normal" => Ok(TaskPriority::Medium),
            "high" | "major" => Ok(TaskPriority::High),
            "urgent" | "highest" | "critical" | "blocker" => Ok(TaskPriority::Urgent),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for TaskPriority {
    type Error = UnknownLabel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn normalize_label(s: &str) -> String {
    s.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .collect()
}

/// A task as it arrives from a loader, before validation.
///
/// Fields the engine does not understand are kept in `extra` so they can be
/// written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(RecordKey::from(id.into())),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// The record's key, trimmed; `None` when absent or blank.
    pub fn key(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }
}

/// A record key as written in the input.
///
/// Trackers export both string and numeric ids. The engine matches on the
/// text form; the original value is what gets written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKey {
    raw: Value,
    text: String,
}

impl RecordKey {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl Deref for RecordKey {
    type Target = str;

    fn deref(&self) -> &str {
        &self.text
    }
}

impl From<String> for RecordKey {
    fn from(text: String) -> Self {
        Self {
            raw: Value::String(text.clone()),
            text,
        }
    }
}

impl From<&str> for RecordKey {
    fn from(text: &str) -> Self {
        Self::from(text.to_string())
    }
}

impl Serialize for RecordKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RecordKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let text = match &raw {
            Value::String(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            other => {
                return Err(de::Error::custom(format!(
                    "expected a string or number key, found {other}"
                )));
            }
        };
        Ok(Self { raw, text })
    }
}

/// Whether a task came from the input or was synthesized for a dangling reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskState {
    Real {
        title: String,
        status: TaskStatus,
        priority: TaskPriority,
        assignee: Option<String>,
    },
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub key: String,
    pub state: TaskState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_finish: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_finish: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_critical: Option<bool>,
}

impl Task {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self::with_state(
            key,
            TaskState::Real {
                title: title.into(),
                status: TaskStatus::default(),
                priority: TaskPriority::default(),
                assignee: None,
            },
        )
    }

    pub fn placeholder(key: impl Into<String>) -> Self {
        Self::with_state(key, TaskState::Placeholder)
    }

    pub(crate) fn with_state(key: impl Into<String>, state: TaskState) -> Self {
        Self {
            key: key.into(),
            state,
            duration: None,
            earliest_start: None,
            earliest_finish: None,
            latest_start: None,
            latest_finish: None,
            slack: None,
            is_critical: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.state, TaskState::Placeholder)
    }

    pub fn status(&self) -> Option<TaskStatus> {
        match &self.state {
            TaskState::Real { status, .. } => Some(*status),
            TaskState::Placeholder => None,
        }
    }

    pub fn priority(&self) -> Option<TaskPriority> {
        match &self.state {
            TaskState::Real { priority, .. } => Some(*priority),
            TaskState::Placeholder => None,
        }
    }

    /// Status as written to reports; placeholders report `"missing"`.
    pub fn status_label(&self) -> &'static str {
        self.status().map_or(MISSING_STATUS, |status| status.as_str())
    }

    pub fn title(&self) -> String {
        match &self.state {
            TaskState::Real { title, .. } => title.clone(),
            TaskState::Placeholder => format!("Placeholder for {}", self.key),
        }
    }

    pub fn assignee(&self) -> Option<&str> {
        match &self.state {
            TaskState::Real { assignee, .. } => assignee.as_deref(),
            TaskState::Placeholder => None,
        }
    }

    /// True once scheduled with zero slack.
    pub fn critical(&self) -> bool {
        self.is_critical == Some(true)
    }
}
