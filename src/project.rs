//! Per-project timeline files.
//!
//! Each production keeps its timeline in its own JSON file inside the data
//! directory, named `<project_name>_timeline.json`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TimelineError};
use crate::store::Timeline;

const FILE_SUFFIX: &str = "_timeline";

/// A project's name and the file holding its timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    pub name: String,
    pub display_name: String,
    pub file_path: PathBuf,
}

impl ProjectFile {
    pub fn new(display_name: &str, data_dir: &Path) -> Self {
        let name = sanitize_project_name(display_name);
        let file_path = data_dir.join(format!("{}{}.json", name, FILE_SUFFIX));
        ProjectFile {
            name,
            display_name: display_name.to_string(),
            file_path,
        }
    }

    /// Recognise an existing timeline file by its suffix.
    pub fn from_file(file_path: PathBuf) -> Option<Self> {
        if file_path.extension()? != "json" {
            return None;
        }
        let name = file_path.file_stem()?.to_str()?.strip_suffix(FILE_SUFFIX)?.to_string();
        let display_name = name.replace('_', " ");
        Some(ProjectFile {
            name,
            display_name,
            file_path,
        })
    }

    pub fn load(&self) -> Result<Timeline> {
        Timeline::load(&self.file_path)
    }
}

/// Lowercase, with every run of non-alphanumeric characters collapsed to a
/// single underscore.
pub fn sanitize_project_name(display_name: &str) -> String {
    display_name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// All project timeline files in the data directory, sorted by display name.
pub fn discover_projects(data_dir: &Path) -> Result<Vec<ProjectFile>> {
    if !data_dir.exists() {
        return Ok(Vec::new());
    }
    let io_err = |source: std::io::Error| TimelineError::Io {
        path: data_dir.to_path_buf(),
        source,
    };
    let mut projects = Vec::new();
    for entry in fs::read_dir(data_dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() {
            if let Some(project) = ProjectFile::from_file(path) {
                projects.push(project);
            }
        }
    }
    projects.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    Ok(projects)
}

/// Create an empty timeline file for a new project.
pub fn create_project(display_name: &str, data_dir: &Path) -> Result<ProjectFile> {
    let project = ProjectFile::new(display_name, data_dir);
    if project.name.is_empty() {
        return Err(TimelineError::InvalidProjectName(display_name.to_string()));
    }
    if !project.file_path.exists() {
        Timeline::default().save(&project.file_path)?;
    }
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_project_name() {
        assert_eq!(sanitize_project_name("Night Shift"), "night_shift");
        assert_eq!(sanitize_project_name("Pilot-Ep_01"), "pilot_ep_01");
        assert_eq!(sanitize_project_name("Brand!@#Spot"), "brand_spot");
        assert_eq!(sanitize_project_name("  Wide   Open  "), "wide_open");
        assert_eq!(sanitize_project_name(""), "");
    }

    #[test]
    fn test_from_file() {
        let p = ProjectFile::from_file(PathBuf::from("/d/night_shift_timeline.json")).unwrap();
        assert_eq!(p.name, "night_shift");
        assert_eq!(p.display_name, "night shift");
        assert!(ProjectFile::from_file(PathBuf::from("/d/timeline.json")).is_none());
        assert!(ProjectFile::from_file(PathBuf::from("/d/x_timeline.json.tmp")).is_none());
    }
}
