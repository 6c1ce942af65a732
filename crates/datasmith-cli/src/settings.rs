use std::path::{Path, PathBuf};

use datasmith_generate::{DEFAULT_ROW_COUNT, DEFAULT_ROW_COUNT_MODE, RowCountMode};
use serde::{Deserialize, Serialize};

use crate::CliResult;
use crate::output::replace_file;

/// Settings file looked up in the working directory when `--config` is absent.
pub const DEFAULT_SETTINGS_FILE: &str = "datasmith.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub delimiter: String,
    pub row_count: i64,
    pub row_count_mode: RowCountMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            row_count: DEFAULT_ROW_COUNT,
            row_count_mode: DEFAULT_ROW_COUNT_MODE,
            seed: None,
            log_level: "info".to_string(),
        }
    }
}

/// Load settings from `path`, or from the default file when it exists.
///
/// An explicit path must exist; a missing default file yields defaults.
pub fn load_settings(path: Option<&Path>) -> CliResult<Settings> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
    };

    if !explicit && !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let settings: Settings = toml::from_str(&content)?;
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &Settings) -> CliResult<()> {
    let encoded = toml::to_string_pretty(settings)?;
    replace_file(path, encoded.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: Settings =
            toml::from_str("delimiter = \"tab\"\nseed = 9\n").expect("parse settings");
        assert_eq!(settings.delimiter, "tab");
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.row_count, DEFAULT_ROW_COUNT);
        assert_eq!(settings.row_count_mode, RowCountMode::IncludesHeader);
    }

    #[test]
    fn row_count_mode_uses_snake_case() {
        let settings: Settings =
            toml::from_str("row_count_mode = \"data_rows\"").expect("parse settings");
        assert_eq!(settings.row_count_mode, RowCountMode::DataRows);
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let encoded = toml::to_string_pretty(&Settings::default()).expect("encode");
        let decoded: Settings = toml::from_str(&encoded).expect("decode");
        assert_eq!(decoded, Settings::default());
    }
}
