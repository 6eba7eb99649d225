use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the timeline store and its persistence boundary.
///
/// The derived-state functions never fail; only mutations that name a missing
/// target and file I/O produce these.
#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid timeline file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode timeline: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Phase not found: {0}")]
    PhaseNotFound(String),

    #[error("Milestone not found: {0}")]
    MilestoneNotFound(String),

    #[error("Subtask {subtask} not found on milestone {milestone}")]
    SubTaskNotFound { milestone: String, subtask: String },

    #[error("Several milestones are titled '{title}': {}. Use an id instead.", .ids.join(", "))]
    AmbiguousMilestone { title: String, ids: Vec<String> },

    #[error("Milestone id already in use: {0}")]
    DuplicateMilestone(String),

    #[error("Project name must contain letters or digits: '{0}'")]
    InvalidProjectName(String),

    #[error("Unrecognised date: {0} (expected YYYY-MM-DD, today, tomorrow or in Nd)")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, TimelineError>;
