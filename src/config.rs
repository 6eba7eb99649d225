//! Runtime settings resolved once at start-up.
//!
//! The data directory comes from, in order: the parent of an explicit `--db`
//! file, the `REEL_HOME` environment variable, or `$HOME/.reel`.

use std::path::{Path, PathBuf};

use crate::project::ProjectFile;

pub const HOME_ENV: &str = "REEL_HOME";
pub const DEFAULT_DIR: &str = ".reel";
pub const DEFAULT_FILE: &str = "timeline.json";
pub const DEFAULT_LOG_FILTER: &str = "reel_timeline=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub timeline_path: PathBuf,
}

impl Settings {
    pub fn resolve(db: Option<&Path>, project: Option<&str>) -> Self {
        Self::resolve_with(db, project, |key| std::env::var(key).ok())
    }

    /// Same as [`Settings::resolve`] with an injectable environment.
    pub fn resolve_with(
        db: Option<&Path>,
        project: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        if let Some(db) = db {
            let data_dir = db
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf();
            return Settings {
                data_dir,
                timeline_path: db.to_path_buf(),
            };
        }

        let data_dir = env(HOME_ENV).map(PathBuf::from).unwrap_or_else(|| {
            let home = env("HOME").unwrap_or_else(|| ".".to_string());
            PathBuf::from(home).join(DEFAULT_DIR)
        });
        let timeline_path = match project {
            Some(name) => ProjectFile::new(name, &data_dir).file_path,
            None => data_dir.join(DEFAULT_FILE),
        };
        Settings {
            data_dir,
            timeline_path,
        }
    }
}
