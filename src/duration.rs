//! Duration policies.
//!
//! A policy is plain data handed to the scheduler. The same task and policy
//! always produce the same duration.

use crate::task::{Task, TaskPriority, TaskState, TaskStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum DurationPolicy {
    /// Every real task takes one unit.
    #[default]
    Basic,
    /// Duration looked up from priority, then adjusted by status.
    Weighted(WeightTable),
}

/// What a status does to the priority-derived base weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum StatusOverride {
    /// Replace the duration outright.
    Fixed { duration: u32 },
    /// Scale the base weight, rounding up.
    Scale { percent: u32 },
    /// Keep the base weight but report the task.
    Flag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTable {
    pub priority_weights: BTreeMap<TaskPriority, u32>,
    pub status_overrides: BTreeMap<TaskStatus, StatusOverride>,
}

pub fn default_priority_weight(priority: TaskPriority) -> u32 {
    match priority {
        TaskPriority::Low => 1,
        TaskPriority::Medium => 2,
        TaskPriority::High => 3,
        TaskPriority::Urgent => 5,
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        let priority_weights = TaskPriority::ALL
            .into_iter()
            .map(|priority| (priority, default_priority_weight(priority)))
            .collect();
        let status_overrides = BTreeMap::from([
            (TaskStatus::Done, StatusOverride::Fixed { duration: 0 }),
            (TaskStatus::Blocked, StatusOverride::Flag),
        ]);
        Self {
            priority_weights,
            status_overrides,
        }
    }
}

impl WeightTable {
    /// Base weight for a priority; priorities absent from the map use the default table.
    pub fn priority_weight(&self, priority: TaskPriority) -> i64 {
        i64::from(self.base_weight(priority))
    }

    fn base_weight(&self, priority: TaskPriority) -> u32 {
        self.priority_weights
            .get(&priority)
            .copied()
            .unwrap_or_else(|| default_priority_weight(priority))
    }

    /// Durations never exceed `u32::MAX`; an oversized scale saturates there.
    pub fn weigh(&self, priority: TaskPriority, status: TaskStatus) -> i64 {
        let base = self.base_weight(priority);
        let weight = match self.status_overrides.get(&status) {
            Some(StatusOverride::Fixed { duration }) => *duration,
            Some(StatusOverride::Scale { percent }) => scale_up(base, *percent),
            Some(StatusOverride::Flag) | None => base,
        };
        i64::from(weight)
    }

    pub fn flags(&self, status: TaskStatus) -> bool {
        matches!(self.status_overrides.get(&status), Some(StatusOverride::Flag))
    }
}

/// `base * percent / 100`, rounded up.
fn scale_up(base: u32, percent: u32) -> u32 {
    let scaled = (u64::from(base) * u64::from(percent)).div_ceil(100);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

impl DurationPolicy {
    pub fn weighted() -> Self {
        DurationPolicy::Weighted(WeightTable::default())
    }

    pub fn duration(&self, task: &Task) -> i64 {
        match (&task.state, self) {
            (TaskState::Placeholder, _) => 0,
            (TaskState::Real { .. }, DurationPolicy::Basic) => 1,
            (
                TaskState::Real {
                    status, priority, ..
                },
                DurationPolicy::Weighted(table),
            ) => table.weigh(*priority, *status),
        }
    }

    /// Whether the policy asks for this task to be reported (e.g. blocked work).
    pub fn is_flagged(&self, task: &Task) -> bool {
        match (&task.state, self) {
            (TaskState::Real { status, .. }, DurationPolicy::Weighted(table)) => {
                table.flags(*status)
            }
            _ => false,
        }
    }
}

pub fn duration(task: &Task, policy: &DurationPolicy) -> i64 {
    policy.duration(task)
}
