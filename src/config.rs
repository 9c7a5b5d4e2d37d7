use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::core::filter::FilterState;
use crate::error::ConfigError;

fn default_timezone() -> String {
    "UTC".into()
}

fn default_period_color() -> String {
    "#7FB3D5".into()
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CalendarConfig {
    /// IANA zone the calendar days are computed in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_period_color")]
    pub default_period_color: String,
    #[serde(default)]
    pub debug_logging: bool,
    /// Filters applied when none are given on the command line.
    #[serde(default)]
    pub filters: FilterState,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            default_period_color: default_period_color(),
            debug_logging: false,
            filters: FilterState::default(),
        }
    }
}

impl CalendarConfig {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("famcal").join("config.json"))
    }

    /// Read the config at `path`, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz, ConfigError> {
        parse_timezone(&self.timezone)
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.parse::<Tz>()
        .map_err(|_| ConfigError::InvalidTimezone(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::CompletionFilter;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("famcal-config-{}-{}", std::process::id(), name))
            .join("config.json")
    }

    #[test]
    fn default_path_is_under_the_config_dir() {
        match (dirs::config_dir(), CalendarConfig::default_path()) {
            (Some(dir), Ok(path)) => {
                assert!(path.starts_with(&dir));
                assert!(path.ends_with("famcal/config.json"));
                assert!(!path.starts_with("~"));
            }
            (None, result) => assert!(matches!(result, Err(ConfigError::NoConfigDir))),
            (Some(_), Err(e)) => panic!("config dir exists but default_path failed: {e}"),
        }
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = CalendarConfig::load(&scratch("missing")).unwrap();
        assert_eq!(config, CalendarConfig::default());
        assert_eq!(config.tz().unwrap(), Tz::UTC);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: CalendarConfig = serde_json::from_str(
            r#"{"timezone": "Europe/Dublin", "filters": {"completionFilters": ["INCOMPLETE"]}}"#,
        )
        .unwrap();
        assert_eq!(config.tz().unwrap(), chrono_tz::Europe::Dublin);
        assert_eq!(config.default_period_color, "#7FB3D5");
        assert_eq!(config.filters.completion_filters, vec![CompletionFilter::Incomplete]);
    }

    #[test]
    fn save_then_load() {
        let path = scratch("roundtrip");
        let mut config = CalendarConfig::default();
        config.debug_logging = true;
        config.filters.filtered_users = vec![3];
        config.save(&path).unwrap();
        assert_eq!(CalendarConfig::load(&path).unwrap(), config);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = scratch("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(CalendarConfig::load(&path), Err(ConfigError::Json(_))));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn unknown_timezone() {
        assert!(matches!(
            parse_timezone("Mars/Olympus_Mons"),
            Err(ConfigError::InvalidTimezone(name)) if name == "Mars/Olympus_Mons"
        ));
    }
}
