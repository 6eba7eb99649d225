//! # reel_timeline
//!
//! The timeline engine behind a film and video production planner.
//!
//! A production is split into phases (Development, Pre-Production, Production,
//! Post-Production, ...). Each phase owns dated milestones, each milestone owns
//! a checklist of subtasks, and milestones refer to team members and to other
//! milestones by id.
//!
//! ## What it computes
//!
//! - **Progress**: per phase, per milestone and across the whole timeline
//!   ([`progress`]).
//! - **Calendar views**: milestones on a given day, the phase containing a day,
//!   week and month grids ([`schedule`]).
//! - **Ordering and checks**: stable date ordering and inclusive phase-range
//!   validation ([`schedule`]).
//! - **Dependency chains**: cycle-safe depth-first resolution of what a
//!   milestone depends on ([`deps`]).
//!
//! All of these are pure functions over borrowed data. Missing or dangling
//! references are treated as absent, never as errors.
//!
//! ## Storing a timeline
//!
//! [`store::Timeline`] owns a project's phases and team roster in memory and
//! is saved and loaded explicitly as JSON. The `reel` binary wraps it in a CLI.
//!
//! ```no_run
//! use std::path::Path;
//! use reel_timeline::{progress::calculate_phase_progress, store::Timeline};
//!
//! let timeline = Timeline::load(Path::new("timeline.json"))?;
//! for phase in &timeline.phases {
//!     println!("{}: {}%", phase.name, calculate_phase_progress(phase));
//! }
//! # Ok::<(), reel_timeline::error::TimelineError>(())
//! ```

pub mod cli;
pub mod cmd;
pub mod colors;
pub mod config;
pub mod deps;
pub mod error;
pub mod fields;
pub mod progress;
pub mod project;
pub mod schedule;
pub mod store;
pub mod timeline;

pub use deps::get_dependency_chain;
pub use error::TimelineError;
pub use progress::{calculate_milestone_progress, calculate_phase_progress};
pub use schedule::{get_milestones_for_date, get_phase_for_date, sort_milestones, validate_milestone_dates};
pub use store::Timeline;
pub use timeline::{CompletionState, Milestone, SubTask, TeamMember, TimelinePhase};
