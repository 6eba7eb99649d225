//! `reel` - production timeline CLI.
//!
//! ```bash
//! # Load phases exported from the planner
//! reel --project "Night Shift" import phases.json
//!
//! # Where are we?
//! reel --project "Night Shift" phases
//! reel --project "Night Shift" calendar --month 2024-07-01
//!
//! # Work the plan
//! reel --project "Night Shift" add pre "Locations locked" --date 2024-06-20 --priority high
//! reel --project "Night Shift" toggle m3
//! reel --project "Night Shift" chain "Picture lock"
//! ```
//!
//! Data lives in `~/.reel/` (or `$REEL_HOME`), one JSON file per project.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reel_timeline::cli::Cli;
use reel_timeline::cmd::*;
use reel_timeline::config::{Settings, DEFAULT_LOG_FILTER};
use reel_timeline::store::Timeline;

/// Logs go to stderr so stdout stays clean for tables.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::resolve(cli.db.as_deref(), cli.project.as_deref());
    tracing::debug!(path = %settings.timeline_path.display(), "resolved timeline file");

    // Commands that don't need a loaded timeline.
    match &cli.command {
        Commands::Completions { shell } => {
            cmd_completions(*shell);
            return Ok(());
        }
        Commands::Projects => return cmd_projects(&settings.data_dir),
        Commands::Init { name } => return cmd_init(&settings.data_dir, name),
        _ => {}
    }

    let path = settings.timeline_path.as_path();
    let mut timeline = Timeline::load(path)?;

    match cli.command {
        Commands::Completions { .. } | Commands::Projects | Commands::Init { .. } => {
            unreachable!("handled above")
        }
        Commands::Phases { status } => cmd_phases(&timeline, status),
        Commands::Show { phase } => cmd_show(&timeline, &phase)?,
        Commands::View { milestone } => cmd_view(&timeline, &milestone)?,
        Commands::Day { date } => cmd_day(&timeline, &date)?,
        Commands::Week { date } => cmd_week(&timeline, &date)?,
        Commands::Calendar { month } => cmd_calendar(&timeline, &month)?,
        Commands::Chain { milestone } => cmd_chain(&timeline, &milestone)?,
        Commands::Add {
            phase, title, date, priority, desc, notes, assignee, members, depends_on, attachments,
        } => cmd_add(
            &mut timeline, path, phase, title, date, priority, desc, notes, assignee, members,
            depends_on, attachments,
        )?,
        Commands::Edit {
            milestone, title, date, priority, desc, notes, assignee, add_deps, rm_deps, clear_priority,
        } => cmd_edit(
            &mut timeline, path, milestone, title, date, priority, desc, notes, assignee, add_deps,
            rm_deps, clear_priority,
        )?,
        Commands::Toggle { milestone } => cmd_toggle(&mut timeline, path, &milestone)?,
        Commands::Delete { milestone } => cmd_delete(&mut timeline, path, &milestone)?,
        Commands::Subtask { action } => cmd_subtask(&mut timeline, path, action)?,
        Commands::Member { milestone, member } => cmd_member(&mut timeline, path, &milestone, &member)?,
        Commands::Team => cmd_team(&timeline),
        Commands::Import { input } => cmd_import(&mut timeline, path, &input)?,
    }
    Ok(())
}
