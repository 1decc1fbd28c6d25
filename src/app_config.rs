use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::language_utils::Language;

// Application configuration module
// This module handles the application configuration including loading,
// validating and saving configuration settings.

/// Placeholder replaced by the scene resource name in error messages
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the source CSV tables
    #[serde(default = "default_csv_dir")]
    pub csv_dir: PathBuf,

    /// Directory holding the converted JSON collections
    #[serde(default = "default_json_dir")]
    pub json_dir: PathBuf,

    /// Conversion config
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// Playback config
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the table to collection conversion
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConversionConfig {
    // @field: Separator between timestamps inside one cell
    #[serde(default = "default_timestamp_delimiter")]
    pub timestamp_delimiter: char,

    // @field: Separator between subtitle lines inside one cell
    #[serde(default = "default_line_delimiter")]
    pub line_delimiter: char,

    // @field: Pretty-print the persisted JSON
    #[serde(default)]
    pub pretty_output: bool,

    // @field: Prefix of per-scene collection files
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            timestamp_delimiter: default_timestamp_delimiter(),
            line_delimiter: default_line_delimiter(),
            pretty_output: false,
            file_prefix: default_file_prefix(),
        }
    }
}

/// Settings for runtime subtitle playback
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaybackConfig {
    // @field: Language used until changed at runtime
    #[serde(default)]
    pub default_language: Language,

    // @field: Whether the display surface starts visible
    #[serde(default = "default_true")]
    pub display_enabled: bool,

    // @field: Message shown when the scene file is missing
    #[serde(default = "default_missing_file_message")]
    pub missing_file_message: String,

    // @field: Message shown when the scene file cannot be loaded
    #[serde(default = "default_invalid_file_message")]
    pub invalid_file_message: String,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_language: Language::default(),
            display_enabled: true,
            missing_file_message: default_missing_file_message(),
            invalid_file_message: default_invalid_file_message(),
        }
    }
}

impl PlaybackConfig {
    /// Render the error message for a missing scene resource
    pub fn missing_file_message_for(&self, resource: &str) -> String {
        self.missing_file_message.replace(FILE_PLACEHOLDER, resource)
    }

    /// Render the error message for an unreadable scene resource
    pub fn invalid_file_message_for(&self, resource: &str) -> String {
        self.invalid_file_message.replace(FILE_PLACEHOLDER, resource)
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_csv_dir() -> PathBuf {
    PathBuf::from("VOResources/TextAssets/CSVFiles")
}

fn default_json_dir() -> PathBuf {
    PathBuf::from("VOResources/TextAssets/JSONFiles")
}

fn default_timestamp_delimiter() -> char {
    ','
}

// Subtitle text may contain commas, so lines use their own separator
fn default_line_delimiter() -> char {
    '^'
}

fn default_file_prefix() -> String {
    "voiceovers_".to_string()
}

fn default_true() -> bool {
    true
}

fn default_missing_file_message() -> String {
    "Missing scene json file: <{file}>. Check the file name and directory again.".to_string()
}

fn default_invalid_file_message() -> String {
    "Invalid scene json file: <{file}>. Reconvert the scene table and try again.".to_string()
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let conversion = &self.conversion;

        if conversion.timestamp_delimiter == conversion.line_delimiter {
            return Err(anyhow!(
                "Timestamp and line delimiters must differ (both are '{}')",
                conversion.timestamp_delimiter
            ));
        }

        for delimiter in [conversion.timestamp_delimiter, conversion.line_delimiter] {
            if delimiter == '"' || delimiter == '\n' || delimiter == '\r' {
                return Err(anyhow!("Delimiter {:?} is reserved by the table format", delimiter));
            }
        }

        if conversion.file_prefix.trim().is_empty() {
            return Err(anyhow!("Collection file prefix must not be empty"));
        }

        for template in [&self.playback.missing_file_message, &self.playback.invalid_file_message] {
            if !template.contains(FILE_PLACEHOLDER) {
                warn!("Error message template does not name the resource: {}", template);
            }
        }

        Ok(())
    }

    /// Load a configuration file, creating one with defaults if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_dir: default_csv_dir(),
            json_dir: default_json_dir(),
            conversion: ConversionConfig::default(),
            playback: PlaybackConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
