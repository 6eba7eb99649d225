//! Calendar lookups, ordering and date-range checks.
//!
//! Every comparison here is by calendar day. Inputs that carry a time of day
//! are truncated to their date first through [`CalendarDay`], so 23:59 on the
//! first of July still matches a milestone dated the first of July.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone};

use crate::fields::PhaseStatus;
use crate::timeline::{Milestone, TimelinePhase};

/// Anything that names a calendar day.
pub trait CalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

/// The day in the value's own timezone, not in UTC.
impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

/// All milestones, across all phases, falling on the same calendar day as
/// `date`. Phase order first, then milestone order within each phase.
pub fn get_milestones_for_date<'a, D: CalendarDay>(
    phases: &'a [TimelinePhase],
    date: &D,
) -> Vec<&'a Milestone> {
    let day = date.calendar_day();
    phases
        .iter()
        .flat_map(|p| p.milestones.iter())
        .filter(|m| m.date == day)
        .collect()
}

/// The first phase, in list order, whose inclusive date range contains `date`.
pub fn get_phase_for_date<'a, D: CalendarDay>(
    phases: &'a [TimelinePhase],
    date: &D,
) -> Option<&'a TimelinePhase> {
    let day = date.calendar_day();
    phases.iter().find(|p| p.contains(day))
}

/// The phase a timeline view opens on: the first `Current` phase, falling back
/// to the first phase.
pub fn current_phase(phases: &[TimelinePhase]) -> Option<&TimelinePhase> {
    phases
        .iter()
        .find(|p| p.status == PhaseStatus::Current)
        .or_else(|| phases.first())
}

/// A copy of `milestones` ordered by date. Milestones sharing a date keep their
/// relative input order.
pub fn sort_milestones(milestones: &[Milestone]) -> Vec<Milestone> {
    let mut sorted = milestones.to_vec();
    // Stable merge sort.
    sorted.sort_by_key(|m| m.date);
    sorted
}

/// True iff the milestone's date lies within the phase, both ends inclusive.
/// Only reports; callers decide whether to warn.
pub fn validate_milestone_dates(milestone: &Milestone, phase: &TimelinePhase) -> bool {
    phase.contains(milestone.date)
}

/// The seven days, Sunday through Saturday, of the week containing `date`.
pub fn week_dates<D: CalendarDay>(date: &D) -> [NaiveDate; 7] {
    let day = date.calendar_day();
    let start = day - Duration::days(day.weekday().num_days_from_sunday() as i64);
    std::array::from_fn(|i| start + Duration::days(i as i64))
}

/// One cell of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// True for days belonging to the previous or next month.
    pub padding: bool,
}

/// Rows x columns of a month grid: always six Sunday-first weeks.
pub const MONTH_GRID_CELLS: usize = 42;

/// A Sunday-first six-week grid for the month containing `date`, padded with
/// trailing days of the previous month and leading days of the next.
pub fn month_grid<D: CalendarDay>(date: &D) -> Vec<CalendarCell> {
    let day = date.calendar_day();
    let first = day.with_day(1).unwrap_or(day);
    let lead = first.weekday().num_days_from_sunday() as i64;
    let start = first - Duration::days(lead);
    (0..MONTH_GRID_CELLS as i64)
        .map(|i| {
            let date = start + Duration::days(i);
            CalendarCell {
                date,
                padding: date.month() != first.month(),
            }
        })
        .collect()
}

/// Parse human date input relative to `today`.
///
/// Supports `today`, `tomorrow`, `yesterday`, `in Nd` / `in Nw`, and
/// `YYYY-MM-DD`. Offsets that leave the representable date range yield `None`.
pub fn parse_date_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return today.succ_opt(),
        "yesterday" => return today.pred_opt(),
        _ => {}
    }
    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(n) = rest.strip_suffix('d').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Duration::try_days(n).and_then(|d| today.checked_add_signed(d));
        }
        if let Some(n) = rest.strip_suffix('w').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Duration::try_weeks(n).and_then(|d| today.checked_add_signed(d));
        }
    }
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Format a date relative to today ("today", "tomorrow", "in 3d", "2d ago").
pub fn format_relative(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "today".into(),
        1 => "tomorrow".into(),
        n if n > 1 => format!("in {}d", n),
        n => format!("{}d ago", -n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::ProjectType;
    use chrono::{FixedOffset, NaiveTime};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn phase(id: &str, start: NaiveDate, end: NaiveDate, milestones: Vec<Milestone>) -> TimelinePhase {
        let mut p = TimelinePhase::new(id, id, PhaseStatus::Upcoming, start, end, ProjectType::Documentary);
        p.milestones = milestones;
        p
    }

    fn fixture() -> Vec<TimelinePhase> {
        vec![
            phase(
                "pre",
                d(2024, 6, 1),
                d(2024, 7, 1),
                vec![
                    Milestone::new("a", "Locations locked", d(2024, 7, 1)),
                    Milestone::new("b", "Crew hired", d(2024, 7, 2)),
                ],
            ),
            phase(
                "prod",
                d(2024, 7, 1),
                d(2024, 8, 15),
                vec![Milestone::new("c", "First day of shoot", d(2024, 7, 1))],
            ),
        ]
    }

    #[test]
    fn test_milestones_for_date_ignores_time_of_day() {
        let phases = fixture();
        let late = d(2024, 7, 1).and_time(NaiveTime::from_hms_opt(23, 59, 0).unwrap());
        let ids: Vec<&str> = get_milestones_for_date(&phases, &late).iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        let ids: Vec<&str> = get_milestones_for_date(&phases, &d(2024, 7, 2)).iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
        assert!(get_milestones_for_date(&phases, &d(2024, 7, 3)).is_empty());
    }

    #[test]
    fn test_milestones_for_date_uses_local_day_of_zoned_input() {
        let phases = fixture();
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        // 2024-07-01 20:00 UTC is already 2024-07-02 in UTC+9.
        let zoned = tz.with_ymd_and_hms(2024, 7, 2, 5, 0, 0).unwrap();
        let found = get_milestones_for_date(&phases, &zoned);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "b");
    }

    #[test]
    fn test_phase_for_date_first_match_and_absence() {
        let phases = fixture();
        // Both phases contain 2024-07-01; list order wins.
        assert_eq!(get_phase_for_date(&phases, &d(2024, 7, 1)).unwrap().id, "pre");
        let evening = d(2024, 8, 15).and_time(NaiveTime::from_hms_opt(18, 30, 0).unwrap());
        assert_eq!(get_phase_for_date(&phases, &evening).unwrap().id, "prod");
        assert!(get_phase_for_date(&phases, &d(2024, 5, 31)).is_none());
        assert!(get_phase_for_date(&[], &d(2024, 7, 1)).is_none());
    }

    #[test]
    fn test_current_phase_fallback() {
        let mut phases = fixture();
        assert_eq!(current_phase(&phases).unwrap().id, "pre");
        phases[1].status = PhaseStatus::Current;
        assert_eq!(current_phase(&phases).unwrap().id, "prod");
        assert!(current_phase(&[]).is_none());
    }

    #[test]
    fn test_sort_is_stable_and_copies() {
        let input = vec![
            Milestone::new("late", "Picture lock", d(2024, 9, 1)),
            Milestone::new("tie1", "Rough cut", d(2024, 8, 1)),
            Milestone::new("early", "Dailies review", d(2024, 7, 1)),
            Milestone::new("tie2", "Music spotting", d(2024, 8, 1)),
        ];
        let sorted = sort_milestones(&input);
        let ids: Vec<&str> = sorted.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "tie1", "tie2", "late"]);
        assert_eq!(input[0].id, "late");
        assert_eq!(sort_milestones(&input), sorted);
    }

    #[test]
    fn test_validate_dates_inclusive_bounds() {
        let p = phase("p", d(2024, 7, 1), d(2024, 7, 31), vec![]);
        let on = |date| validate_milestone_dates(&Milestone::new("m", "x", date), &p);
        assert!(on(d(2024, 7, 1)));
        assert!(on(d(2024, 7, 31)));
        assert!(on(d(2024, 7, 15)));
        assert!(!on(d(2024, 6, 30)));
        assert!(!on(d(2024, 8, 1)));
    }

    #[test]
    fn test_week_dates_start_on_sunday() {
        // 2024-07-03 is a Wednesday.
        let week = week_dates(&d(2024, 7, 3));
        assert_eq!(week[0], d(2024, 6, 30));
        assert_eq!(week[6], d(2024, 7, 6));
        assert_eq!(week_dates(&d(2024, 6, 30))[0], d(2024, 6, 30));
    }

    #[test]
    fn test_month_grid_shape() {
        // July 2024 starts on a Monday.
        let grid = month_grid(&d(2024, 7, 17));
        assert_eq!(grid.len(), MONTH_GRID_CELLS);
        assert_eq!(grid[0], CalendarCell { date: d(2024, 6, 30), padding: true });
        assert_eq!(grid[1], CalendarCell { date: d(2024, 7, 1), padding: false });
        assert_eq!(grid.iter().filter(|c| !c.padding).count(), 31);
        assert_eq!(grid[41].date, d(2024, 8, 10));
    }

    #[test]
    fn test_parse_date_input() {
        let today = d(2024, 7, 10);
        assert_eq!(parse_date_input("today", today), Some(today));
        assert_eq!(parse_date_input(" Tomorrow ", today), Some(d(2024, 7, 11)));
        assert_eq!(parse_date_input("in 3d", today), Some(d(2024, 7, 13)));
        assert_eq!(parse_date_input("in 2w", today), Some(d(2024, 7, 24)));
        assert_eq!(parse_date_input("2024-12-25", today), Some(d(2024, 12, 25)));
        assert_eq!(parse_date_input("next-ish", today), None);
    }

    #[test]
    fn test_parse_date_input_out_of_range_offsets() {
        let today = d(2024, 7, 10);
        assert_eq!(parse_date_input("in 1000000000d", today), None);
        assert_eq!(parse_date_input("in 9223372036854775807d", today), None);
        assert_eq!(parse_date_input("in 100000000000w", today), None);
        assert_eq!(parse_date_input("in -1000000000d", today), None);
        assert_eq!(parse_date_input("tomorrow", NaiveDate::MAX), None);
        assert_eq!(parse_date_input("yesterday", NaiveDate::MIN), None);
    }

    #[test]
    fn test_format_relative() {
        let today = d(2024, 7, 10);
        assert_eq!(format_relative(today, today), "today");
        assert_eq!(format_relative(d(2024, 7, 11), today), "tomorrow");
        assert_eq!(format_relative(d(2024, 7, 15), today), "in 5d");
        assert_eq!(format_relative(d(2024, 7, 8), today), "2d ago");
    }
}
