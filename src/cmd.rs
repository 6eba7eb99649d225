//! Command implementations for the CLI interface.
//!
//! Each handler works on a loaded [`Timeline`], prints its result and, for
//! mutations, saves the timeline back to `path`.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{bail, Context};
use chrono::{Datelike, Local, NaiveDate};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::cli::Cli;
use crate::deps::{dependents, MilestonePool};
use crate::error::TimelineError;
use crate::fields::*;
use crate::progress::*;
use crate::project::{create_project, discover_projects};
use crate::schedule::*;
use crate::store::{DateCheck, Timeline};
use crate::timeline::{Milestone, SubTask, TimelinePhase};

#[derive(Subcommand)]
pub enum Commands {
    /// List phases with their date range and progress.
    Phases {
        /// Only phases with this status: upcoming | current | completed.
        #[arg(long, value_enum)]
        status: Option<PhaseStatus>,
    },

    /// Show one phase and its milestones in date order.
    Show {
        /// Phase id or name.
        phase: String,
    },

    /// View a single milestone by id or title.
    View {
        /// Milestone id or title.
        milestone: String,
    },

    /// Milestones falling on a day, and the phase containing it.
    Day {
        /// YYYY-MM-DD, "today", "tomorrow" or "in Nd".
        #[arg(default_value = "today")]
        date: String,
    },

    /// Milestones for each day of a Sunday-first week.
    Week {
        #[arg(default_value = "today")]
        date: String,
    },

    /// Month grid with the number of milestones per day.
    Calendar {
        /// Any day in the month to show.
        #[arg(long, default_value = "today")]
        month: String,
    },

    /// A milestone followed by everything it depends on.
    Chain {
        /// Milestone id or title.
        milestone: String,
    },

    /// Add a milestone to a phase.
    Add {
        /// Phase id or name.
        phase: String,
        /// Milestone title.
        title: String,
        /// Milestone date.
        #[arg(long)]
        date: String,
        /// Priority: low | medium | high.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Team member id.
        #[arg(long)]
        assignee: Option<String>,
        /// Team member ids. May be repeated and comma-separated.
        #[arg(long = "member")]
        members: Vec<String>,
        /// Milestone ids this one depends on. May be repeated and comma-separated.
        #[arg(long = "depends-on")]
        depends_on: Vec<String>,
        /// Attachment references. May be repeated and comma-separated.
        #[arg(long = "attachment")]
        attachments: Vec<String>,
    },

    /// Update fields on a milestone.
    Edit {
        /// Milestone id or title.
        milestone: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        /// Add dependency ids. May be repeated and comma-separated.
        #[arg(long = "add-dep")]
        add_deps: Vec<String>,
        /// Remove dependency ids. May be repeated and comma-separated.
        #[arg(long = "rm-dep")]
        rm_deps: Vec<String>,
        /// Clear the priority.
        #[arg(long)]
        clear_priority: bool,
    },

    /// Flip a milestone between done and not done.
    Toggle {
        /// Milestone id or title.
        milestone: String,
    },

    /// Delete a milestone. Dependencies on it are left dangling.
    Delete {
        /// Milestone id or title.
        milestone: String,
    },

    /// Manage a milestone's subtasks.
    Subtask {
        #[command(subcommand)]
        action: SubtaskAction,
    },

    /// Assign or unassign a team member on a milestone.
    Member {
        /// Milestone id or title.
        milestone: String,
        /// Team member id.
        member: String,
    },

    /// List the team roster.
    Team,

    /// List project timeline files in the data directory.
    Projects,

    /// Create an empty timeline file for a new project.
    Init {
        /// Project display name.
        name: String,
    },

    /// Replace phases and roster from a JSON export of the UI stores.
    Import {
        /// JSON file holding either a phase array or a full timeline object.
        input: String,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SubtaskAction {
    /// Add a subtask to a milestone.
    Add {
        milestone: String,
        title: String,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        due: Option<String>,
    },
    /// Flip a subtask.
    Toggle { milestone: String, subtask: String },
    /// Remove a subtask.
    Rm { milestone: String, subtask: String },
}

/// Parse a date argument relative to the local day.
pub fn parse_date_arg(s: &str) -> Result<NaiveDate, TimelineError> {
    parse_date_input(s, Local::now().date_naive()).ok_or_else(|| TimelineError::InvalidDate(s.to_string()))
}

/// Split repeated, comma-separated list arguments, dropping blanks and duplicates.
pub fn split_list(inputs: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in inputs.iter().flat_map(|s| s.split(',')) {
        let part = part.trim();
        if !part.is_empty() && !out.iter().any(|p| p == part) {
            out.push(part.to_string());
        }
    }
    out
}

/// Truncate a string to a maximum width, adding an ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// A ten-cell text progress bar.
pub fn progress_bar(pct: u8) -> String {
    let filled = (pct as usize + 5) / 10;
    format!("[{}{}] {:>3}%", "#".repeat(filled), ".".repeat(10 - filled), pct)
}

fn print_milestone_rows(milestones: &[&Milestone], today: NaiveDate) {
    println!(
        "{:<8} {:<4} {:<10} {:<10} {:<7} {:<16} {}",
        "ID", "Done", "Date", "When", "Pri", "Progress", "Title"
    );
    for m in milestones {
        println!(
            "{:<8} {:<4} {:<10} {:<10} {:<7} {:<16} {}",
            truncate(&m.id, 8),
            if m.completed { "x" } else { "" },
            m.date,
            format_relative(m.date, today),
            format_priority(m.priority),
            progress_bar(calculate_milestone_progress(m)),
            m.title
        );
    }
}

fn save(timeline: &Timeline, path: &Path) -> anyhow::Result<()> {
    timeline
        .save(path)
        .with_context(|| format!("Failed to save timeline to {}", path.display()))
}

fn report_date_check(m: &Milestone, check: DateCheck) {
    if let DateCheck::OutsidePhase { start, end } = check {
        eprintln!(
            "Warning: {} is dated {} which is outside its phase ({} to {}).",
            m.id, m.date, start, end
        );
    }
}

pub fn cmd_phases(timeline: &Timeline, status: Option<PhaseStatus>) {
    if timeline.phases.is_empty() {
        println!("No phases. Import a timeline with `reel import <file>`.");
        return;
    }
    println!(
        "{:<10} {:<20} {:<10} {:<10} {:<10} {:<9} {:<16} {}",
        "ID", "Name", "Status", "Start", "End", "Done", "Progress", "Colors"
    );
    for phase in timeline.phases.iter().filter(|p| status.map_or(true, |s| p.status == s)) {
        let summary = PhaseSummary::of(phase);
        let colors = timeline.colors_for(phase);
        println!(
            "{:<10} {:<20} {:<10} {:<10} {:<10} {:<9} {:<16} {}/{}",
            truncate(&phase.id, 10),
            truncate(&phase.name, 20),
            format_status(phase.status),
            phase.start_date,
            phase.end_date,
            format!("{}/{}", summary.completed, summary.total),
            progress_bar(summary.progress),
            colors.primary,
            colors.secondary
        );
    }
    println!();
    println!("Overall: {}", progress_bar(calculate_timeline_progress(&timeline.phases)));
    if let Some(current) = current_phase(&timeline.phases) {
        println!("Current phase: {}", current.name);
    }
}

pub fn cmd_show(timeline: &Timeline, phase: &str) -> anyhow::Result<()> {
    let phase = timeline.resolve_phase(phase)?;
    let today = Local::now().date_naive();
    println!("Phase:        {} ({})", phase.name, phase.id);
    println!("Status:       {}", format_status(phase.status));
    println!("Project type: {}", format_project_type(phase.project_type));
    println!("Dates:        {} to {}", phase.start_date, phase.end_date);
    println!("Progress:     {}", progress_bar(calculate_phase_progress(phase)));
    println!();

    let sorted = sort_milestones(&phase.milestones);
    if sorted.is_empty() {
        println!("No milestones.");
        return Ok(());
    }
    let rows: Vec<&Milestone> = sorted.iter().collect();
    print_milestone_rows(&rows, today);

    let outside: Vec<&Milestone> = sorted.iter().filter(|m| !validate_milestone_dates(m, phase)).collect();
    if !outside.is_empty() {
        println!();
        for m in outside {
            println!("Warning: {} ({}) falls outside this phase.", m.id, m.date);
        }
    }
    Ok(())
}

pub fn cmd_view(timeline: &Timeline, identifier: &str) -> anyhow::Result<()> {
    let m = timeline.resolve_milestone(identifier)?;
    let today = Local::now().date_naive();
    let phase = timeline.find_milestone(&m.id).map(|(p, _)| p);

    println!("ID:           {}", m.id);
    println!("Title:        {}", m.title);
    println!("Date:         {} ({})", m.date, format_relative(m.date, today));
    println!("Phase:        {}", phase.map(|p| p.name.as_str()).unwrap_or("-"));
    println!("Completed:    {}", if m.completed { "yes" } else { "no" });
    println!("Priority:     {}", format_priority(m.priority));
    println!("Assignee:     {}", m.assignee.as_deref().unwrap_or("-"));
    println!("Progress:     {}", progress_bar(calculate_milestone_progress(m)));
    if let Some(p) = phase {
        if !validate_milestone_dates(m, p) {
            println!("Warning:      date is outside the phase ({} to {})", p.start_date, p.end_date);
        }
    }

    let members: Vec<String> = timeline
        .assigned_members(m)
        .iter()
        .map(|t| format!("{} ({}, {})", t.name, t.role, t.department))
        .collect();
    println!("Team:         {}", if members.is_empty() { "-".into() } else { members.join(", ") });
    println!("Dependencies: {}", if m.dependencies.is_empty() { "-".into() } else { m.dependencies.join(", ") });
    if !m.attachments.is_empty() {
        println!("Attachments:  {}", m.attachments.join(", "));
    }
    println!("Description:\n{}\n", m.description.as_deref().unwrap_or("-"));
    if let Some(notes) = &m.notes {
        println!("Notes:\n{}\n", notes);
    }

    println!("Subtasks:");
    if m.sub_tasks.is_empty() {
        println!("  -");
    }
    for t in &m.sub_tasks {
        let due = t.due_date.map(|d| format!(" due {}", d)).unwrap_or_default();
        let who = t.assignee.as_deref().map(|a| format!(" @{}", a)).unwrap_or_default();
        println!("  [{}] {} (#{}){}{}", if t.completed { "x" } else { " " }, t.title, t.id, who, due);
    }
    Ok(())
}

pub fn cmd_day(timeline: &Timeline, date: &str) -> anyhow::Result<()> {
    let day = parse_date_arg(date)?;
    match get_phase_for_date(&timeline.phases, &day) {
        Some(p) => println!("{} is in phase {} ({}).", day, p.name, format_status(p.status)),
        None => println!("{} is not inside any phase.", day),
    }
    let found = get_milestones_for_date(&timeline.phases, &day);
    if found.is_empty() {
        println!("No milestones.");
    } else {
        print_milestone_rows(&found, Local::now().date_naive());
    }
    Ok(())
}

pub fn cmd_week(timeline: &Timeline, date: &str) -> anyhow::Result<()> {
    let day = parse_date_arg(date)?;
    for d in week_dates(&day) {
        let found = get_milestones_for_date(&timeline.phases, &d);
        let titles: Vec<&str> = found.iter().map(|m| m.title.as_str()).collect();
        println!(
            "{} {}  {}",
            d.format("%a"),
            d,
            if titles.is_empty() { "-".to_string() } else { titles.join(" | ") }
        );
    }
    Ok(())
}

pub fn cmd_calendar(timeline: &Timeline, month: &str) -> anyhow::Result<()> {
    let day = parse_date_arg(month)?;
    let today = Local::now().date_naive();
    println!("{:^35}", day.format("%B %Y").to_string());
    println!(" Sun  Mon  Tue  Wed  Thu  Fri  Sat");
    for week in month_grid(&day).chunks(7) {
        let row: Vec<String> = week
            .iter()
            .map(|cell| {
                if cell.padding {
                    return "   . ".to_string();
                }
                let count = get_milestones_for_date(&timeline.phases, &cell.date).len();
                let mark = if cell.date == today { '>' } else { ' ' };
                match count {
                    0 => format!("{}{:>2}  ", mark, cell.date.day()),
                    n => format!("{}{:>2}{:<2}", mark, cell.date.day(), format!("*{}", n.min(9))),
                }
            })
            .collect();
        println!("{}", row.join(""));
    }
    Ok(())
}

pub fn cmd_chain(timeline: &Timeline, identifier: &str) -> anyhow::Result<()> {
    let root = timeline.resolve_milestone(identifier)?;
    let pool = MilestonePool::new(&timeline.phases);
    let chain = pool.chain(&root.id);
    for (depth, m) in chain.iter().enumerate() {
        let marker = if depth == 0 { "*" } else { "-" };
        println!(
            "{} {} [{}] {} ({})",
            marker,
            m.title,
            if m.completed { "done" } else { "open" },
            m.date,
            m.id
        );
    }
    let missing = pool.dangling(&root.id);
    if !missing.is_empty() {
        println!("Missing dependencies: {}", missing.join(", "));
    }
    let blocked_by: Vec<&str> = chain.iter().skip(1).filter(|m| !m.completed).map(|m| m.id.as_str()).collect();
    if !blocked_by.is_empty() {
        println!("Open upstream milestones: {}", blocked_by.join(", "));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    timeline: &mut Timeline,
    path: &Path,
    phase: String,
    title: String,
    date: String,
    priority: Option<Priority>,
    desc: Option<String>,
    notes: Option<String>,
    assignee: Option<String>,
    members: Vec<String>,
    depends_on: Vec<String>,
    attachments: Vec<String>,
) -> anyhow::Result<()> {
    let phase_id = timeline.resolve_phase(&phase)?.id.clone();
    let mut m = Milestone::new(timeline.next_milestone_id(), title, parse_date_arg(&date)?);
    m.priority = priority;
    m.description = desc;
    m.notes = notes;
    m.assignee = assignee;
    m.team_members = split_list(&members);
    m.dependencies = split_list(&depends_on);
    m.attachments = split_list(&attachments);

    {
        let pool = MilestonePool::new(&timeline.phases);
        for dep in m.dependencies.iter().filter(|d| pool.get(d).is_none()) {
            eprintln!("Note: dependency {} does not exist yet.", dep);
        }
    }

    let id = m.id.clone();
    let check = timeline.add_milestone(&phase_id, m.clone())?;
    report_date_check(&m, check);
    save(timeline, path)?;
    info!(milestone = %id, phase = %phase_id, "milestone added");
    println!("Added milestone {}", id);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_edit(
    timeline: &mut Timeline,
    path: &Path,
    identifier: String,
    title: Option<String>,
    date: Option<String>,
    priority: Option<Priority>,
    desc: Option<String>,
    notes: Option<String>,
    assignee: Option<String>,
    add_deps: Vec<String>,
    rm_deps: Vec<String>,
    clear_priority: bool,
) -> anyhow::Result<()> {
    let mut m = timeline.resolve_milestone(&identifier)?.clone();
    if let Some(t) = title {
        m.title = t;
    }
    if let Some(d) = date {
        m.date = parse_date_arg(&d)?;
    }
    if clear_priority {
        m.priority = None;
    } else if priority.is_some() {
        m.priority = priority;
    }
    if desc.is_some() {
        m.description = desc;
    }
    if notes.is_some() {
        m.notes = notes;
    }
    if assignee.is_some() {
        m.assignee = assignee;
    }
    for dep in split_list(&add_deps) {
        if dep == m.id {
            bail!("A milestone cannot depend on itself.");
        }
        if !m.dependencies.contains(&dep) {
            m.dependencies.push(dep);
        }
    }
    let rm = split_list(&rm_deps);
    m.dependencies.retain(|d| !rm.contains(d));

    let check = timeline.edit_milestone(m.clone())?;
    report_date_check(&m, check);
    save(timeline, path)?;
    println!("Updated {}", m.id);
    Ok(())
}

pub fn cmd_toggle(timeline: &mut Timeline, path: &Path, identifier: &str) -> anyhow::Result<()> {
    let id = timeline.resolve_milestone(identifier)?.id.clone();
    let done = timeline.toggle_milestone(&id)?;
    save(timeline, path)?;
    println!("{} {}", if done { "Completed" } else { "Reopened" }, id);
    Ok(())
}

pub fn cmd_delete(timeline: &mut Timeline, path: &Path, identifier: &str) -> anyhow::Result<()> {
    let id = timeline.resolve_milestone(identifier)?.id.clone();
    let dependent_ids: Vec<String> = dependents(&timeline.phases, &id)
        .iter()
        .map(|m| m.id.clone())
        .collect();
    let removed = timeline.delete_milestone(&id)?;
    save(timeline, path)?;
    println!("Deleted {} ({})", removed.id, removed.title);
    if !dependent_ids.is_empty() {
        println!("Still listed as a dependency of: {}", dependent_ids.join(", "));
    }
    Ok(())
}

pub fn cmd_subtask(timeline: &mut Timeline, path: &Path, action: SubtaskAction) -> anyhow::Result<()> {
    match action {
        SubtaskAction::Add { milestone, title, assignee, due } => {
            let mid = timeline.resolve_milestone(&milestone)?.id.clone();
            let mut task = SubTask::new(timeline.next_subtask_id(), title);
            task.assignee = assignee;
            task.due_date = due.as_deref().map(parse_date_arg).transpose()?;
            let tid = task.id.clone();
            timeline.add_subtask(&mid, task)?;
            save(timeline, path)?;
            println!("Added subtask {} to {}", tid, mid);
        }
        SubtaskAction::Toggle { milestone, subtask } => {
            let mid = timeline.resolve_milestone(&milestone)?.id.clone();
            let done = timeline.toggle_subtask(&mid, &subtask)?;
            save(timeline, path)?;
            let pct = timeline
                .find_milestone(&mid)
                .map(|(_, m)| calculate_milestone_progress(m))
                .unwrap_or(0);
            println!(
                "{} {} on {} (milestone at {}%)",
                if done { "Completed" } else { "Reopened" },
                subtask,
                mid,
                pct
            );
        }
        SubtaskAction::Rm { milestone, subtask } => {
            let mid = timeline.resolve_milestone(&milestone)?.id.clone();
            let removed = timeline.remove_subtask(&mid, &subtask)?;
            save(timeline, path)?;
            println!("Removed subtask {} ({}) from {}", removed.id, removed.title, mid);
        }
    }
    Ok(())
}

pub fn cmd_member(timeline: &mut Timeline, path: &Path, milestone: &str, member: &str) -> anyhow::Result<()> {
    let mid = timeline.resolve_milestone(milestone)?.id.clone();
    if timeline.member(member).is_none() {
        eprintln!("Note: {} is not on the roster.", member);
    }
    let assigned = timeline.toggle_team_member(&mid, member)?;
    save(timeline, path)?;
    println!("{} {} {} {}", if assigned { "Assigned" } else { "Unassigned" }, member, if assigned { "to" } else { "from" }, mid);
    Ok(())
}

pub fn cmd_team(timeline: &Timeline) {
    if timeline.team.is_empty() {
        println!("No team members.");
        return;
    }
    println!("{:<8} {:<22} {:<22} {}", "ID", "Name", "Role", "Department");
    for t in &timeline.team {
        println!(
            "{:<8} {:<22} {:<22} {}",
            truncate(&t.id, 8),
            truncate(&t.name, 22),
            truncate(&t.role, 22),
            t.department
        );
    }
}

pub fn cmd_projects(data_dir: &Path) -> anyhow::Result<()> {
    let projects = discover_projects(data_dir)?;
    if projects.is_empty() {
        println!("No projects in {}.", data_dir.display());
        return Ok(());
    }
    for p in projects {
        match p.load() {
            Ok(tl) => println!(
                "{:<24} {} phases  {}",
                p.display_name,
                tl.phases.len(),
                progress_bar(calculate_timeline_progress(&tl.phases))
            ),
            Err(e) => println!("{:<24} unreadable: {}", p.display_name, e),
        }
    }
    Ok(())
}

pub fn cmd_init(data_dir: &Path, name: &str) -> anyhow::Result<()> {
    let project = create_project(name, data_dir)?;
    println!("Project '{}' at {}", project.display_name, project.file_path.display());
    Ok(())
}

/// Parse an import document: either a bare phase array or a timeline object.
/// The first non-blank character picks the shape, so errors point at the
/// document that was actually supplied.
pub fn parse_import(data: &str) -> Result<Timeline, serde_json::Error> {
    match data.trim_start().as_bytes().first() {
        Some(b'[') => Ok(Timeline {
            phases: serde_json::from_str::<Vec<TimelinePhase>>(data)?,
            ..Timeline::default()
        }),
        _ => serde_json::from_str::<Timeline>(data),
    }
}

pub fn cmd_import(timeline: &mut Timeline, path: &Path, input: &str) -> anyhow::Result<()> {
    let data = fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?;
    let imported = parse_import(&data).with_context(|| format!("Failed to parse {}", input))?;
    timeline.phases = imported.phases;
    if !imported.team.is_empty() {
        timeline.team = imported.team;
    }
    if imported.colors.is_some() {
        timeline.colors = imported.colors;
    }
    let milestones: usize = timeline.phases.iter().map(|p| p.milestones.len()).sum();
    for phase in &timeline.phases {
        for m in phase.milestones.iter().filter(|m| !validate_milestone_dates(m, phase)) {
            eprintln!("Warning: {} ({}) falls outside phase {}.", m.id, m.date, phase.name);
        }
    }
    save(timeline, path)?;
    println!(
        "Imported {} phases, {} milestones, {} team members.",
        timeline.phases.len(),
        milestones,
        timeline.team.len()
    );
    Ok(())
}

pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "reel", &mut io::stdout());
}
