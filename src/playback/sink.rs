/*!
 * Collaborator interfaces of the playback scheduler.
 *
 * The scheduler never renders text or decodes audio itself; it drives a
 * `SubtitleSink` and an `AudioPlayer`. Both are called while the scheduler's
 * state lock is held and must not call back into the scheduler.
 */

use chrono::Local;
use log::info;
use parking_lot::Mutex;
use std::time::Instant;

use crate::errors::AudioError;

/// Display surface for subtitle text
pub trait SubtitleSink: Send + Sync {
    /// Replace the displayed text; an empty string clears it
    fn show_text(&self, text: &str);

    /// Show or hide the display surface
    fn set_visible(&self, visible: bool);

    /// Called once when a sequence finishes without being interrupted
    fn sequence_completed(&self, _key: &str) {}
}

/// Audio subsystem resolving clips by opaque reference
pub trait AudioPlayer: Send + Sync {
    /// Start playing a clip, returning its length in seconds
    fn play(&self, audio_file_name: &str) -> Result<f32, AudioError>;

    /// Stop the current clip, if any
    fn stop(&self);

    /// Whether a clip is currently playing
    fn is_playing(&self) -> bool;
}

/// Sink printing subtitle changes to stdout with elapsed time
pub struct ConsoleSink {
    started: Instant,
    visible: Mutex<bool>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            visible: Mutex::new(true),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl SubtitleSink for ConsoleSink {
    fn show_text(&self, text: &str) {
        if !*self.visible.lock() {
            return;
        }
        let elapsed = self.started.elapsed().as_secs_f32();
        if text.is_empty() {
            println!("[{:>7.3}s] (clear)", elapsed);
        } else {
            println!("[{:>7.3}s] {}", elapsed, text);
        }
    }

    fn set_visible(&self, visible: bool) {
        *self.visible.lock() = visible;
    }

    fn sequence_completed(&self, key: &str) {
        info!("Finished '{}' at {}", key, Local::now().format("%H:%M:%S%.3f"));
    }
}

/// Audio stand-in with a fixed clip length that produces no sound
pub struct SilentClip {
    clip_length: f32,
    started: Mutex<Option<Instant>>,
}

impl SilentClip {
    pub fn new(clip_length: f32) -> Self {
        Self {
            clip_length,
            started: Mutex::new(None),
        }
    }
}

impl AudioPlayer for SilentClip {
    fn play(&self, audio_file_name: &str) -> Result<f32, AudioError> {
        if !self.clip_length.is_finite() || self.clip_length < 0.0 {
            return Err(AudioError::PlaybackFailed(format!(
                "invalid clip length {} for {}",
                self.clip_length, audio_file_name
            )));
        }
        *self.started.lock() = Some(Instant::now());
        Ok(self.clip_length)
    }

    fn stop(&self) {
        *self.started.lock() = None;
    }

    fn is_playing(&self) -> bool {
        let started = *self.started.lock();
        started.is_some_and(|started| started.elapsed().as_secs_f32() < self.clip_length)
    }
}
