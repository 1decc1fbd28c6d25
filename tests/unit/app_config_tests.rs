/*!
 * Tests for application configuration
 */

use anyhow::Result;
use std::fs;
use vosync::app_config::{Config, LogLevel};
use vosync::Language;
use crate::common;

#[test]
fn test_default_config_withNoChanges_shouldValidate() {
    let config = Config::default();

    assert!(config.validate().is_ok());
    assert_eq!(config.conversion.timestamp_delimiter, ',');
    assert_eq!(config.conversion.line_delimiter, '^');
    assert_eq!(config.conversion.file_prefix, "voiceovers_");
    assert_eq!(config.playback.default_language, Language::En);
    assert!(config.playback.display_enabled);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_validate_withSameDelimiters_shouldFail() {
    let mut config = Config::default();
    config.conversion.line_delimiter = ',';

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withQuoteDelimiter_shouldFail() {
    let mut config = Config::default();
    config.conversion.line_delimiter = '"';

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withEmptyPrefix_shouldFail() {
    let mut config = Config::default();
    config.conversion.file_prefix = "  ".to_string();

    assert!(config.validate().is_err());
}

#[test]
fn test_missing_file_message_for_withResource_shouldNameIt() {
    let config = Config::default();

    assert_eq!(
        config.playback.missing_file_message_for("voiceovers_forest.json"),
        "Missing scene json file: <voiceovers_forest.json>. Check the file name and directory again."
    );
}

/// Test that a missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.conversion.file_prefix, "voiceovers_");
    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.json_dir, config.json_dir);
    Ok(())
}

/// Test that omitted sections fall back to defaults
#[test]
fn test_load_or_create_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "json_dir": "scenes", "playback": { "default_language": "jp" }, "log_level": "debug" }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.json_dir, std::path::PathBuf::from("scenes"));
    assert_eq!(config.playback.default_language, Language::Jp);
    assert!(config.playback.display_enabled);
    assert_eq!(config.conversion.line_delimiter, '^');
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_load_or_create_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    assert_eq!(fs::read_to_string(&path)?, "{ not json");
    Ok(())
}
