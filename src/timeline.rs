//! Timeline entity definitions.
//!
//! A project's timeline is a list of [`TimelinePhase`]s. Each phase owns its
//! [`Milestone`]s and each milestone owns its [`SubTask`]s. Team members and
//! milestone dependencies are referenced by id only; a reference that no
//! longer resolves means the target is gone, never that the data is invalid.
//!
//! Field names follow the camelCase JSON the UI layer exchanges.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::*;

/// A person who can be assigned to milestones and subtasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A checklist item owned by exactly one milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    /// Team member id. Not checked against the roster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl SubTask {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        SubTask {
            id: id.into(),
            title: title.into(),
            completed: false,
            assignee: None,
            due_date: None,
        }
    }
}

/// A dated unit of work within a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,
    /// Member ids. Membership only: members outlive milestones.
    #[serde(default)]
    pub team_members: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
    /// Ids of milestones this one depends on. May dangle or form cycles.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

/// How a milestone's completion is determined.
///
/// Once a milestone has subtasks their completion ratio is authoritative and
/// the milestone's own `completed` flag is ignored for progress purposes. The
/// two are allowed to disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    /// No subtasks: the milestone's own flag.
    Explicit(bool),
    /// Counted from subtasks. `total` is never zero.
    Derived { completed: usize, total: usize },
}

impl Milestone {
    pub fn new(id: impl Into<String>, title: impl Into<String>, date: NaiveDate) -> Self {
        Milestone {
            id: id.into(),
            title: title.into(),
            date,
            completed: false,
            priority: None,
            assignee: None,
            description: None,
            notes: None,
            sub_tasks: Vec::new(),
            team_members: Vec::new(),
            attachments: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn completion_state(&self) -> CompletionState {
        if self.sub_tasks.is_empty() {
            CompletionState::Explicit(self.completed)
        } else {
            CompletionState::Derived {
                completed: self.sub_tasks.iter().filter(|t| t.completed).count(),
                total: self.sub_tasks.len(),
            }
        }
    }

    pub fn sub_task(&self, id: &str) -> Option<&SubTask> {
        self.sub_tasks.iter().find(|t| t.id == id)
    }

    pub fn sub_task_mut(&mut self, id: &str) -> Option<&mut SubTask> {
        self.sub_tasks.iter_mut().find(|t| t.id == id)
    }
}

/// A named stage of production, e.g. "Pre-Production".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePhase {
    pub id: String,
    pub name: String,
    pub status: PhaseStatus,
    /// Expected to be on or before `end_date`; not enforced.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub project_type: ProjectType,
}

impl TimelinePhase {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        status: PhaseStatus,
        start_date: NaiveDate,
        end_date: NaiveDate,
        project_type: ProjectType,
    ) -> Self {
        TimelinePhase {
            id: id.into(),
            name: name.into(),
            status,
            start_date,
            end_date,
            milestones: Vec::new(),
            color: None,
            project_type,
        }
    }

    /// True if `day` lies within `[start_date, end_date]`, both ends inclusive.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}
