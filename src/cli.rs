use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// File-backed production timeline.
/// Storage defaults to ~/.reel/timeline.json, a per-project file via
/// --project, or any path passed via --db.
#[derive(Parser)]
#[command(name = "reel", version, about = "Production timeline: phases, milestones and progress")]
pub struct Cli {
    /// Path to the timeline JSON file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Project name; selects <data dir>/<name>_timeline.json.
    #[arg(long, global = true)]
    pub project: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}
