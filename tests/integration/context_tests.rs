/*!
 * Scene activation tests, including the degraded error display mode
 */

use anyhow::Result;
use std::path::Path;
use std::time::Duration;
use vosync::app_config::Config;
use vosync::errors::LoadError;
use vosync::{Language, PlaybackState, RecordConverter, VoiceoverContext};
use crate::common::{self, FakeAudio, RecordingSink};

const MISSING_FOREST: &str =
    "Missing scene json file: <voiceovers_forest.json>. Check the file name and directory again.";

fn test_config(json_dir: &Path) -> Config {
    Config {
        json_dir: json_dir.to_path_buf(),
        ..Config::default()
    }
}

fn convert_sample(dir: &Path) -> Result<()> {
    let input = common::create_sample_table(dir, "forest")?;
    RecordConverter::default().convert_file(input, dir)?;
    Ok(())
}

/// Test that a missing scene file degrades to a visible error message
#[test]
fn test_activate_withMissingSceneFile_shouldShowMissingFileMessage() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let sink = RecordingSink::new();
    let audio = FakeAudio::sample();

    let context = VoiceoverContext::activate(&test_config(temp_dir.path()), "forest", sink.clone(), audio.clone());

    assert!(context.is_degraded());
    assert!(matches!(context.load_error(), Some(LoadError::MissingResource { .. })));
    assert_eq!(context.state(), PlaybackState::ErrorDisplay);

    assert!(!context.request_playback("intro", true));
    assert_eq!(sink.last_text().as_deref(), Some(MISSING_FOREST));
    assert_eq!(context.state(), PlaybackState::ErrorDisplay);

    // Error display is permanent for the context
    assert!(!context.on_voiceover_signal("outro"));
    assert_eq!(sink.texts(), vec![MISSING_FOREST, MISSING_FOREST]);
    assert!(audio.plays().is_empty());
    assert!(context.lookup("intro").is_none());
    Ok(())
}

#[test]
fn test_activate_withCorruptSceneFile_shouldShowInvalidFileMessage() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "voiceovers_forest.json", "{\"voiceoverLines\": [")?;
    let sink = RecordingSink::new();

    let context = VoiceoverContext::activate(&test_config(temp_dir.path()), "forest", sink.clone(), FakeAudio::sample());

    assert!(!context.request_playback("intro", false));
    assert_eq!(
        sink.last_text().as_deref(),
        Some("Invalid scene json file: <voiceovers_forest.json>. Reconvert the scene table and try again.")
    );
    Ok(())
}

#[test]
fn test_activate_withCustomMessage_shouldUseTemplate() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = test_config(temp_dir.path());
    config.playback.missing_file_message = "No subtitles ({file})".to_string();
    let sink = RecordingSink::new();

    let context = VoiceoverContext::activate(&config, "Cave", sink.clone(), FakeAudio::sample());
    context.request_playback("intro", true);

    assert_eq!(sink.last_text().as_deref(), Some("No subtitles (voiceovers_cave.json)"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_activate_withConvertedScene_shouldPlayLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    convert_sample(temp_dir.path())?;
    let sink = RecordingSink::new();
    let audio = FakeAudio::sample();

    let context = VoiceoverContext::activate(&test_config(temp_dir.path()), "forest", sink.clone(), audio.clone());

    assert!(!context.is_degraded());
    assert_eq!(context.scene(), "forest");
    assert_eq!(context.lines().map(|lines| lines.len()), Some(2));
    assert_eq!(context.lookup("outro").map(|l| l.audio_file_name.as_str()), Some("outro_clip"));
    assert_eq!(sink.visibility(), vec![true]);

    assert!(context.request_playback("intro", true));
    assert_eq!(sink.last_text().as_deref(), Some("Hello"));

    context.scheduler().wait_until_idle().await;
    assert_eq!(sink.completed(), vec!["intro"]);
    Ok(())
}

/// Test that timeline signals always interrupt the current line
#[tokio::test(start_paused = true)]
async fn test_on_voiceover_signal_whilePlaying_shouldInterrupt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    convert_sample(temp_dir.path())?;
    let sink = RecordingSink::new();
    let audio = FakeAudio::sample();
    let context = VoiceoverContext::activate(&test_config(temp_dir.path()), "forest", sink.clone(), audio.clone());

    assert!(context.request_playback("intro", true));
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(!context.request_playback("outro", false));
    assert!(context.on_voiceover_signal("outro"));

    context.scheduler().wait_until_idle().await;
    assert_eq!(sink.texts(), vec!["Hello", "Goodbye, friend", ""]);
    assert_eq!(sink.completed(), vec!["outro"]);
    assert_eq!(audio.stop_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_activate_withConfiguredDefaults_shouldApplyThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    convert_sample(temp_dir.path())?;
    let mut config = test_config(temp_dir.path());
    config.playback.default_language = Language::Jp;
    config.playback.display_enabled = false;
    let sink = RecordingSink::new();

    let context = VoiceoverContext::activate(&config, "forest", sink.clone(), FakeAudio::sample());

    assert_eq!(context.active_language(), Language::Jp);
    assert_eq!(sink.visibility(), vec![false]);
    assert!(context.request_playback("outro", true));
    assert_eq!(sink.last_text().as_deref(), Some("さようなら"));

    assert!(context.toggle_display());
    context.set_active_language(Language::En);
    assert_eq!(context.active_language(), Language::En);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_drop_context_duringPlayback_shouldCancelSequence() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    convert_sample(temp_dir.path())?;
    let sink = RecordingSink::new();
    let context = VoiceoverContext::activate(&test_config(temp_dir.path()), "forest", sink.clone(), FakeAudio::sample());

    assert!(context.request_playback("intro", true));
    tokio::time::sleep(Duration::from_millis(500)).await;
    drop(context);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(sink.texts(), vec!["Hello"]);
    assert!(sink.completed().is_empty());
    Ok(())
}
