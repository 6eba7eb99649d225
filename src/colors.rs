//! Display colors per project type.
//!
//! A phase's accent colors come from a table keyed by project type.
//! A missing entry falls back to [`DEFAULT_COLORS`] rather than failing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::fields::ProjectType;

/// A named primary/secondary color pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub primary: String,
    pub secondary: String,
}

impl ColorPair {
    pub fn new(primary: &str, secondary: &str) -> Self {
        ColorPair {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
        }
    }
}

/// Used when a project type has no entry.
pub const DEFAULT_COLORS: (&str, &str) = ("blue", "gray");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorTable {
    entries: HashMap<ProjectType, ColorPair>,
}

impl ColorTable {
    /// Default palette used when a timeline carries no color table of its own:
    /// one pair per project type.
    pub fn builtin() -> Self {
        let entries = [
            (ProjectType::FeatureFilm, ColorPair::new("indigo", "purple")),
            (ProjectType::ShortFilm, ColorPair::new("teal", "cyan")),
            (ProjectType::TvSeries, ColorPair::new("red", "orange")),
            (ProjectType::Documentary, ColorPair::new("green", "emerald")),
            (ProjectType::Commercial, ColorPair::new("amber", "yellow")),
            (ProjectType::MusicVideo, ColorPair::new("pink", "rose")),
        ];
        ColorTable {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, project_type: ProjectType, colors: ColorPair) {
        self.entries.insert(project_type, colors);
    }

    pub fn lookup(&self, project_type: ProjectType) -> ColorPair {
        self.entries
            .get(&project_type)
            .cloned()
            .unwrap_or_else(|| ColorPair::new(DEFAULT_COLORS.0, DEFAULT_COLORS.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_type() {
        let table = ColorTable::builtin();
        assert_eq!(table.lookup(ProjectType::FeatureFilm).primary, "indigo");
        assert_eq!(table.lookup(ProjectType::MusicVideo).secondary, "rose");
        let fallback = ColorPair::new(DEFAULT_COLORS.0, DEFAULT_COLORS.1);
        for t in [
            ProjectType::FeatureFilm,
            ProjectType::ShortFilm,
            ProjectType::TvSeries,
            ProjectType::Documentary,
            ProjectType::Commercial,
            ProjectType::MusicVideo,
        ] {
            assert_ne!(table.lookup(t), fallback, "{:?}", t);
        }
    }

    #[test]
    fn test_missing_entry_falls_back() {
        let mut table = ColorTable::default();
        assert_eq!(table.lookup(ProjectType::Commercial), ColorPair::new("blue", "gray"));
        table.insert(ProjectType::Commercial, ColorPair::new("lime", "green"));
        assert_eq!(table.lookup(ProjectType::Commercial).primary, "lime");
    }

    #[test]
    fn test_table_from_json() {
        let table: ColorTable =
            serde_json::from_str(r#"{"Documentary": {"primary": "slate", "secondary": "zinc"}}"#).unwrap();
        assert_eq!(table.lookup(ProjectType::Documentary).primary, "slate");
        assert_eq!(table.lookup(ProjectType::TvSeries).primary, "blue");
    }
}
