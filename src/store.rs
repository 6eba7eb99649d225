//! The timeline store: an explicit in-memory owner of a project's phases and
//! team roster with a save/load boundary.
//!
//! The store is loaded once, mutated in memory through the methods below and
//! written back with [`Timeline::save`]. Nothing is persisted implicitly.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::colors::{ColorPair, ColorTable};
use crate::error::{Result, TimelineError};
use crate::schedule::validate_milestone_dates;
use crate::timeline::{Milestone, SubTask, TeamMember, TimelinePhase};

/// Outcome of checking a milestone's date against its owning phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCheck {
    InRange,
    OutsidePhase { start: NaiveDate, end: NaiveDate },
}

impl DateCheck {
    pub fn of(milestone: &Milestone, phase: &TimelinePhase) -> Self {
        if validate_milestone_dates(milestone, phase) {
            DateCheck::InRange
        } else {
            DateCheck::OutsidePhase {
                start: phase.start_date,
                end: phase.end_date,
            }
        }
    }

    pub fn in_range(&self) -> bool {
        matches!(self, DateCheck::InRange)
    }
}

/// A project's phases, roster and optional color overrides.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    #[serde(default)]
    pub phases: Vec<TimelinePhase>,
    #[serde(default)]
    pub team: Vec<TeamMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorTable>,
}

impl Timeline {
    /// Load a timeline from JSON. A missing file yields an empty timeline.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no timeline file, starting empty");
            return Ok(Timeline::default());
        }
        let buf = fs::read_to_string(path).map_err(|source| TimelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let timeline: Timeline = serde_json::from_str(&buf).map_err(|source| TimelineError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            path = %path.display(),
            phases = timeline.phases.len(),
            members = timeline.team.len(),
            "loaded timeline"
        );
        Ok(timeline)
    }

    /// Save to JSON using a temp file and rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        let io_err = |source: std::io::Error| TimelineError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let mut f = File::create(&tmp).map_err(io_err)?;
        f.write_all(data.as_bytes()).map_err(io_err)?;
        f.flush().map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;
        debug!(path = %path.display(), "saved timeline");
        Ok(())
    }

    pub fn phase(&self, id: &str) -> Option<&TimelinePhase> {
        self.phases.iter().find(|p| p.id == id)
    }

    /// Resolve a phase by id, then by case-insensitive name.
    pub fn resolve_phase(&self, identifier: &str) -> Result<&TimelinePhase> {
        self.phase(identifier)
            .or_else(|| {
                self.phases
                    .iter()
                    .find(|p| same_name(&p.name, identifier))
            })
            .ok_or_else(|| TimelineError::PhaseNotFound(identifier.to_string()))
    }

    /// The first milestone with this id, with the phase that owns it.
    pub fn find_milestone(&self, id: &str) -> Option<(&TimelinePhase, &Milestone)> {
        self.phases
            .iter()
            .find_map(|p| p.milestones.iter().find(|m| m.id == id).map(|m| (p, m)))
    }

    /// Resolve a milestone by id, then by case-insensitive title.
    pub fn resolve_milestone(&self, identifier: &str) -> Result<&Milestone> {
        if let Some((_, m)) = self.find_milestone(identifier) {
            return Ok(m);
        }
        let matches: Vec<&Milestone> = self
            .phases
            .iter()
            .flat_map(|p| p.milestones.iter())
            .filter(|m| same_name(&m.title, identifier))
            .collect();
        match matches.as_slice() {
            [] => Err(TimelineError::MilestoneNotFound(identifier.to_string())),
            [m] => Ok(*m),
            many => Err(TimelineError::AmbiguousMilestone {
                title: identifier.to_string(),
                ids: many.iter().map(|m| m.id.clone()).collect(),
            }),
        }
    }

    /// The first milestone with this id, in phase order. Subtask and member
    /// edits go through here and so never reach later duplicates.
    fn milestone_mut(&mut self, id: &str) -> Result<&mut Milestone> {
        self.phases
            .iter_mut()
            .flat_map(|p| p.milestones.iter_mut())
            .find(|m| m.id == id)
            .ok_or_else(|| TimelineError::MilestoneNotFound(id.to_string()))
    }

    pub fn member(&self, id: &str) -> Option<&TeamMember> {
        self.team.iter().find(|t| t.id == id)
    }

    /// Roster entries for the milestone's member ids. Ids no longer on the
    /// roster are skipped.
    pub fn assigned_members(&self, milestone: &Milestone) -> Vec<&TeamMember> {
        milestone
            .team_members
            .iter()
            .filter_map(|id| self.member(id))
            .collect()
    }

    pub fn colors_for(&self, phase: &TimelinePhase) -> ColorPair {
        match &self.colors {
            Some(table) => table.lookup(phase.project_type),
            None => ColorTable::builtin().lookup(phase.project_type),
        }
    }

    /// `m<N>` one past the highest numeric milestone suffix in use.
    pub fn next_milestone_id(&self) -> String {
        let ids = self.phases.iter().flat_map(|p| p.milestones.iter()).map(|m| m.id.as_str());
        format!("m{}", next_suffix(ids, 'm'))
    }

    /// `s<N>` one past the highest numeric subtask suffix in use.
    pub fn next_subtask_id(&self) -> String {
        let ids = self
            .phases
            .iter()
            .flat_map(|p| p.milestones.iter())
            .flat_map(|m| m.sub_tasks.iter())
            .map(|t| t.id.as_str());
        format!("s{}", next_suffix(ids, 's'))
    }

    /// Flip `completed` on every copy of the milestone. Returns the new value of
    /// the last copy flipped.
    pub fn toggle_milestone(&mut self, id: &str) -> Result<bool> {
        let mut state = None;
        for m in self.phases.iter_mut().flat_map(|p| p.milestones.iter_mut()) {
            if m.id == id {
                m.completed = !m.completed;
                state = Some(m.completed);
            }
        }
        let completed = state.ok_or_else(|| TimelineError::MilestoneNotFound(id.to_string()))?;
        debug!(milestone = id, completed, "toggled milestone");
        Ok(completed)
    }

    /// Append a milestone to a phase. Out-of-range dates are accepted and
    /// reported through the returned [`DateCheck`].
    pub fn add_milestone(&mut self, phase_id: &str, milestone: Milestone) -> Result<DateCheck> {
        if self.find_milestone(&milestone.id).is_some() {
            return Err(TimelineError::DuplicateMilestone(milestone.id));
        }
        let phase = self
            .phases
            .iter_mut()
            .find(|p| p.id == phase_id)
            .ok_or_else(|| TimelineError::PhaseNotFound(phase_id.to_string()))?;
        let check = DateCheck::of(&milestone, phase);
        warn_if_outside(&milestone, check);
        debug!(phase = phase_id, milestone = %milestone.id, "added milestone");
        phase.milestones.push(milestone);
        Ok(check)
    }

    /// Replace the milestone carrying the same id, wherever it lives.
    pub fn edit_milestone(&mut self, updated: Milestone) -> Result<DateCheck> {
        let mut check = None;
        for phase in self.phases.iter_mut() {
            let in_phase = DateCheck::of(&updated, phase);
            for m in phase.milestones.iter_mut().filter(|m| m.id == updated.id) {
                *m = updated.clone();
                check.get_or_insert(in_phase);
            }
        }
        let check = check.ok_or_else(|| TimelineError::MilestoneNotFound(updated.id.clone()))?;
        warn_if_outside(&updated, check);
        debug!(milestone = %updated.id, "edited milestone");
        Ok(check)
    }

    /// Remove the milestone from every phase. Dependencies on it elsewhere are
    /// left as they are and will no longer resolve.
    pub fn delete_milestone(&mut self, id: &str) -> Result<Milestone> {
        let mut removed = None;
        for phase in self.phases.iter_mut() {
            if let Some(pos) = phase.milestones.iter().position(|m| m.id == id) {
                let m = phase.milestones.remove(pos);
                removed.get_or_insert(m);
                phase.milestones.retain(|m| m.id != id);
            }
        }
        let removed = removed.ok_or_else(|| TimelineError::MilestoneNotFound(id.to_string()))?;
        debug!(milestone = id, "deleted milestone");
        Ok(removed)
    }

    /// Flip a subtask on the first milestone with this id. Returns its new state.
    pub fn toggle_subtask(&mut self, milestone_id: &str, subtask_id: &str) -> Result<bool> {
        let m = self.milestone_mut(milestone_id)?;
        let task = m.sub_task_mut(subtask_id).ok_or_else(|| TimelineError::SubTaskNotFound {
            milestone: milestone_id.to_string(),
            subtask: subtask_id.to_string(),
        })?;
        task.completed = !task.completed;
        debug!(milestone = milestone_id, subtask = subtask_id, completed = task.completed, "toggled subtask");
        Ok(task.completed)
    }

    /// Append a subtask to the first milestone with this id.
    pub fn add_subtask(&mut self, milestone_id: &str, subtask: SubTask) -> Result<()> {
        let m = self.milestone_mut(milestone_id)?;
        debug!(milestone = milestone_id, subtask = %subtask.id, "added subtask");
        m.sub_tasks.push(subtask);
        Ok(())
    }

    /// Remove a subtask from the first milestone with this id.
    pub fn remove_subtask(&mut self, milestone_id: &str, subtask_id: &str) -> Result<SubTask> {
        let m = self.milestone_mut(milestone_id)?;
        let pos = m
            .sub_tasks
            .iter()
            .position(|t| t.id == subtask_id)
            .ok_or_else(|| TimelineError::SubTaskNotFound {
                milestone: milestone_id.to_string(),
                subtask: subtask_id.to_string(),
            })?;
        debug!(milestone = milestone_id, subtask = subtask_id, "removed subtask");
        Ok(m.sub_tasks.remove(pos))
    }

    /// Add or remove a member id on the first milestone with this id. Returns
    /// true if the member is now assigned. The id is not checked against the
    /// roster.
    pub fn toggle_team_member(&mut self, milestone_id: &str, member_id: &str) -> Result<bool> {
        let m = self.milestone_mut(milestone_id)?;
        let assigned = if let Some(pos) = m.team_members.iter().position(|t| t == member_id) {
            m.team_members.remove(pos);
            false
        } else {
            m.team_members.push(member_id.to_string());
            true
        };
        debug!(milestone = milestone_id, member = member_id, assigned, "toggled team member");
        Ok(assigned)
    }
}

fn warn_if_outside(milestone: &Milestone, check: DateCheck) {
    if let DateCheck::OutsidePhase { start, end } = check {
        warn!(
            milestone = %milestone.id,
            date = %milestone.date,
            %start,
            %end,
            "milestone date falls outside its phase"
        );
    }
}

/// Unicode-aware case-insensitive comparison used for both phase names and
/// milestone titles.
fn same_name(candidate: &str, identifier: &str) -> bool {
    candidate.to_lowercase() == identifier.to_lowercase()
}

/// Stops at `u64::MAX` rather than wrapping; the caller's duplicate check
/// then rejects the id.
fn next_suffix<'a>(ids: impl Iterator<Item = &'a str>, prefix: char) -> u64 {
    ids.filter_map(|id| id.strip_prefix(prefix)?.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}
