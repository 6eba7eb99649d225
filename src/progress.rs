//! Progress aggregation over phases and milestones.
//!
//! All percentages are whole numbers in `0..=100`, rounded half up. Empty
//! collections yield 0 rather than an error.

use crate::timeline::{CompletionState, Milestone, TimelinePhase};

/// Round `100 * part / total` to the nearest integer, halves rounding up.
/// Returns 0 when `total` is zero.
pub fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let part = part.min(total) as u64;
    let total = total as u64;
    ((200 * part + total) / (2 * total)) as u8
}

/// Share of a phase's milestones whose `completed` flag is set.
pub fn calculate_phase_progress(phase: &TimelinePhase) -> u8 {
    let done = phase.milestones.iter().filter(|m| m.completed).count();
    percent(done, phase.milestones.len())
}

/// Progress of a single milestone.
///
/// Without subtasks this is 100 or 0 from the milestone's flag. With subtasks
/// it is the completed-subtask ratio and the flag is ignored.
pub fn calculate_milestone_progress(milestone: &Milestone) -> u8 {
    match milestone.completion_state() {
        CompletionState::Explicit(true) => 100,
        CompletionState::Explicit(false) => 0,
        CompletionState::Derived { completed, total } => percent(completed, total),
    }
}

/// Share of completed milestones across every phase.
pub fn calculate_timeline_progress(phases: &[TimelinePhase]) -> u8 {
    let (done, total) = phases
        .iter()
        .flat_map(|p| p.milestones.iter())
        .fold((0, 0), |(done, total), m| (done + m.completed as usize, total + 1));
    percent(done, total)
}

/// Milestone counts and progress for a phase listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSummary {
    pub total: usize,
    pub completed: usize,
    pub progress: u8,
}

impl PhaseSummary {
    pub fn of(phase: &TimelinePhase) -> Self {
        let completed = phase.milestones.iter().filter(|m| m.completed).count();
        PhaseSummary {
            total: phase.milestones.len(),
            completed,
            progress: calculate_phase_progress(phase),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::*;
    use crate::timeline::SubTask;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, day).unwrap()
    }

    fn phase_with(flags: &[bool]) -> TimelinePhase {
        let mut p = TimelinePhase::new(
            "p1", "Production", PhaseStatus::Current, d(1), d(31), ProjectType::FeatureFilm,
        );
        for (i, &done) in flags.iter().enumerate() {
            let mut m = Milestone::new(format!("m{}", i + 1), "Shoot day", d(i as u32 + 1));
            m.completed = done;
            p.milestones.push(m);
        }
        p
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(1, 8), 13); // 12.5 rounds up
        assert_eq!(percent(3, 3), 100);
    }

    #[test]
    fn test_phase_progress_empty_is_zero() {
        assert_eq!(calculate_phase_progress(&phase_with(&[])), 0);
    }

    #[test]
    fn test_phase_progress_two_of_three() {
        assert_eq!(calculate_phase_progress(&phase_with(&[true, true, false])), 67);
    }

    #[test]
    fn test_phase_progress_bounds() {
        let cases: [&[bool]; 5] = [&[], &[false], &[true], &[true, false, false, false], &[true; 7]];
        for flags in cases {
            let p = calculate_phase_progress(&phase_with(flags));
            assert!(p <= 100);
        }
        assert_eq!(calculate_phase_progress(&phase_with(&[true; 7])), 100);
    }

    #[test]
    fn test_milestone_progress_uses_flag_without_subtasks() {
        let mut m = Milestone::new("m", "Wrap", d(3));
        assert_eq!(calculate_milestone_progress(&m), 0);
        m.completed = true;
        assert_eq!(calculate_milestone_progress(&m), 100);
    }

    #[test]
    fn test_milestone_progress_subtasks_override_flag() {
        let mut m = Milestone::new("m", "Wrap", d(3));
        m.completed = false;
        m.sub_tasks = vec![
            SubTask { completed: true, ..SubTask::new("a", "Strike set") },
            SubTask { completed: true, ..SubTask::new("b", "Return gear") },
        ];
        assert_eq!(calculate_milestone_progress(&m), 100);

        m.completed = true;
        m.sub_tasks[1].completed = false;
        assert_eq!(calculate_milestone_progress(&m), 50);
    }

    #[test]
    fn test_timeline_progress_and_summary() {
        let phases = vec![phase_with(&[true, false]), phase_with(&[true, true])];
        assert_eq!(calculate_timeline_progress(&phases), 75);
        assert_eq!(calculate_timeline_progress(&[]), 0);

        let s = PhaseSummary::of(&phases[0]);
        assert_eq!(s, PhaseSummary { total: 2, completed: 1, progress: 50 });
    }

    #[test]
    fn test_progress_is_repeatable() {
        let p = phase_with(&[true, false, true]);
        assert_eq!(calculate_phase_progress(&p), calculate_phase_progress(&p));
        assert_eq!(p, phase_with(&[true, false, true]));
    }
}
