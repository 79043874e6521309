//! Application configuration for docboard.
//!
//! User config lives at `~/.docboard/docboard.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocboardError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docboard.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docboard";

// ---------------------------------------------------------------------------
// Config structs (matching docboard.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Source sheet settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Fetch settings.
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// `[source]` section — which published sheet to read.
///
/// Building the two URLs from the sheet id is a configuration concern;
/// the fetch crate only ever sees a fully-formed URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Published spreadsheet id (the `2PACX-…` token from the publish URL).
    #[serde(default)]
    pub sheet_id: String,

    /// Sheet (tab) name within the spreadsheet.
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            sheet_id: String::new(),
            sheet_name: default_sheet_name(),
        }
    }
}

fn default_sheet_name() -> String {
    "Лист1".into()
}

impl SourceConfig {
    /// CSV export URL for the published sheet.
    pub fn csv_url(&self) -> String {
        format!(
            "https://docs.google.com/spreadsheets/d/e/{}/pub?output=csv&sheet={}",
            self.sheet_id, self.sheet_name
        )
    }

    /// Editing URL for the sheet, shown as a hyperlink by the UI.
    pub fn edit_url(&self) -> String {
        format!("https://docs.google.com/spreadsheets/d/{}", self.sheet_id)
    }

    /// Ensure a sheet id is configured before attempting a fetch.
    pub fn validate(&self) -> Result<()> {
        if self.sheet_id.trim().is_empty() {
            return Err(DocboardError::config(
                "no sheet_id configured. Set [source] sheet_id in docboard.toml \
                 or pass --sheet-id",
            ));
        }
        Ok(())
    }
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Timeout for the single fetch attempt, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docboard/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocboardError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docboard/docboard.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocboardError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DocboardError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DocboardError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocboardError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocboardError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
