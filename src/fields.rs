//! Enumerations and field types for the production timeline.
//!
//! This module defines the closed value sets used by phases and milestones:
//! phase status, milestone priority and the project type a phase belongs to.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a production phase.
///
/// Assigned externally. Nothing in this crate moves a phase between states,
/// and nothing checks that only one phase is `Current` at a time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PhaseStatus {
    Upcoming,
    Current,
    Completed,
}

/// Priority classification for a milestone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// The kind of production a phase belongs to. Only used for display colors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProjectType {
    #[serde(rename = "Feature Film", alias = "feature-film")]
    FeatureFilm,
    #[serde(rename = "Short Film", alias = "short-film")]
    ShortFilm,
    #[serde(rename = "TV Series", alias = "tv-series")]
    TvSeries,
    #[serde(rename = "Documentary", alias = "documentary")]
    Documentary,
    #[serde(rename = "Commercial", alias = "commercial")]
    Commercial,
    #[serde(rename = "Music Video", alias = "music-video")]
    MusicVideo,
}

/// Format a phase status for display.
pub fn format_status(s: PhaseStatus) -> &'static str {
    match s {
        PhaseStatus::Upcoming => "Upcoming",
        PhaseStatus::Current => "Current",
        PhaseStatus::Completed => "Completed",
    }
}

/// Format a priority level for display.
pub fn format_priority(p: Option<Priority>) -> &'static str {
    match p {
        Some(Priority::Low) => "Low",
        Some(Priority::Medium) => "Medium",
        Some(Priority::High) => "High",
        None => "-",
    }
}

/// Format a project type for display.
pub fn format_project_type(t: ProjectType) -> &'static str {
    match t {
        ProjectType::FeatureFilm => "Feature Film",
        ProjectType::ShortFilm => "Short Film",
        ProjectType::TvSeries => "TV Series",
        ProjectType::Documentary => "Documentary",
        ProjectType::Commercial => "Commercial",
        ProjectType::MusicVideo => "Music Video",
    }
}
