//! User configuration (`~/.plano/config.toml`)
//!
//! Every field is optional; a missing file means defaults.
//!
//! ```toml
//! [schedule]
//! rotation = ["rest", "A", "B", "C", "A", "B", "rest"]
//! max_exercises = 6
//!
//! [[keywords.workout]]
//! keyword = "MOBILIDADE"
//! type = "exercises"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::schedule::MAX_TODAY_EXERCISES;
use crate::error::{PlanError, Result};
use crate::paths;
use crate::plan::{KeywordRule, PlanKind, PlanProfile, ScheduleOptions, WorkoutRotation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub rotation: WorkoutRotation,
    pub max_exercises: usize,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            rotation: WorkoutRotation::default(),
            max_exercises: MAX_TODAY_EXERCISES,
        }
    }
}

/// Extra keyword rules per plan kind, checked before the built-in ones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordOverrides {
    pub workout: Vec<KeywordRule>,
    pub nutrition: Vec<KeywordRule>,
    pub rehabilitation: Vec<KeywordRule>,
}

impl KeywordOverrides {
    pub fn for_kind(&self, kind: PlanKind) -> &[KeywordRule] {
        match kind {
            PlanKind::Workout => &self.workout,
            PlanKind::Nutrition => &self.nutrition,
            PlanKind::Rehabilitation => &self.rehabilitation,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanoConfig {
    pub schedule: ScheduleConfig,
    pub keywords: KeywordOverrides,
}

impl PlanoConfig {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| PlanError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(PlanError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = Self::from_toml_str(&content, path)?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load `~/.plano/config.toml`
    pub fn load_default() -> Result<Self> {
        Self::load(&paths::config_path())
    }

    pub fn schedule_options(&self) -> ScheduleOptions {
        ScheduleOptions {
            rotation: self.schedule.rotation,
            max_exercises: self.schedule.max_exercises,
        }
    }

    /// Built-in profile for `kind` with this config's extra keyword rules.
    pub fn profile(&self, kind: PlanKind) -> PlanProfile {
        PlanProfile::builtin(kind).with_extra_rules(self.keywords.for_kind(kind).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{tag_type, RotationSlot, SectionType, WorkoutLetter};

    #[test]
    fn test_empty_config_is_default() {
        let config = PlanoConfig::from_toml_str("", Path::new("config.toml")).unwrap();
        assert_eq!(config, PlanoConfig::default());
        assert_eq!(config.schedule_options(), ScheduleOptions::default());
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
            [schedule]
            rotation = ["A", "B", "rest", "C", "A", "B", "rest"]
            max_exercises = 5

            [[keywords.rehabilitation]]
            keyword = "Mobilidade"
            type = "exercises"
        "#;
        let config = PlanoConfig::from_toml_str(toml, Path::new("config.toml")).unwrap();
        let options = config.schedule_options();
        assert_eq!(options.max_exercises, 5);
        assert_eq!(
            options.rotation.slot(0),
            RotationSlot::Workout(WorkoutLetter::A)
        );
        assert_eq!(options.rotation.slot(2), RotationSlot::Rest);

        let profile = config.profile(PlanKind::Rehabilitation);
        assert_eq!(
            tag_type("Mobilidade de ombro", false, &profile.keywords),
            SectionType::Exercises
        );
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let err = PlanoConfig::from_toml_str(
            "[schedule]\nrotation = [\"Z\"]",
            Path::new("/tmp/plano.toml"),
        )
        .unwrap_err();
        assert!(matches!(err, PlanError::Config { .. }));
        assert!(err.to_string().contains("/tmp/plano.toml"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = PlanoConfig::load(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config, PlanoConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[schedule]\nmax_exercises = 3\n").unwrap();
        let config = PlanoConfig::load(&path).unwrap();
        assert_eq!(config.schedule.max_exercises, 3);
        assert_eq!(config.schedule.rotation, WorkoutRotation::default());
    }
}
