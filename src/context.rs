use log::{error, info};
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::LoadError;
use crate::language_utils::Language;
use crate::loader::{CollectionLoader, VoiceoverMap};
use crate::playback::{
    AudioPlayer, InterruptPolicy, LineSource, PlaybackScheduler, PlaybackState, SubtitleSink,
};
use crate::voiceover::VoiceoverLine;

// @module: Per-scene voiceover context

/// Owns the loaded lines and the scheduler of one active scene
///
/// Created when a scene becomes active and dropped when it ends; dropping it
/// cancels any sequence still in flight.
pub struct VoiceoverContext {
    // @field: Scene name as given on activation
    scene: String,

    // @field: Loaded lines, absent when loading failed
    lines: Option<Arc<VoiceoverMap>>,

    // @field: Load failure, if any
    load_error: Option<LoadError>,

    scheduler: PlaybackScheduler,
}

impl VoiceoverContext {
    /// Load the scene's collection and set up its scheduler
    ///
    /// A load failure does not fail activation: the context enters the error
    /// display state and every playback request shows a message naming the
    /// missing or broken resource.
    pub fn activate(
        config: &Config,
        scene: &str,
        sink: Arc<dyn SubtitleSink>,
        audio: Arc<dyn AudioPlayer>,
    ) -> Self {
        let loader = CollectionLoader::from_config(config);

        match loader.load_scene(scene) {
            Ok(map) => Self::with_lines(config, scene, map, sink, audio),
            Err(e) => {
                error!("Voiceovers unavailable for scene '{}': {}", scene, e);
                let message = match &e {
                    LoadError::MissingResource { resource } => {
                        config.playback.missing_file_message_for(resource)
                    }
                    other => config.playback.invalid_file_message_for(other.resource()),
                };
                let scheduler = Self::build_scheduler(
                    config,
                    LineSource::Unavailable { message },
                    sink,
                    audio,
                );
                Self {
                    scene: scene.to_string(),
                    lines: None,
                    load_error: Some(e),
                    scheduler,
                }
            }
        }
    }

    /// Set up a context around an already loaded map
    pub fn with_lines(
        config: &Config,
        scene: &str,
        map: VoiceoverMap,
        sink: Arc<dyn SubtitleSink>,
        audio: Arc<dyn AudioPlayer>,
    ) -> Self {
        let lines = Arc::new(map);
        info!("Voiceover context '{}' active with {} line(s)", scene, lines.len());
        let scheduler = Self::build_scheduler(config, LineSource::Loaded(Arc::clone(&lines)), sink, audio);

        Self {
            scene: scene.to_string(),
            lines: Some(lines),
            load_error: None,
            scheduler,
        }
    }

    fn build_scheduler(
        config: &Config,
        source: LineSource,
        sink: Arc<dyn SubtitleSink>,
        audio: Arc<dyn AudioPlayer>,
    ) -> PlaybackScheduler {
        let scheduler = PlaybackScheduler::new(source, sink, audio, config.playback.default_language);
        if config.playback.display_enabled {
            scheduler.enable_display();
        } else {
            scheduler.disable_display();
        }
        scheduler
    }

    /// Request playback of a line
    pub fn request_playback(&self, key: &str, interrupt: bool) -> bool {
        self.scheduler.request_playback(key, InterruptPolicy::from(interrupt))
    }

    /// Entry point for timeline signals; always interrupts the current line
    pub fn on_voiceover_signal(&self, key: &str) -> bool {
        self.scheduler.request_playback(key, InterruptPolicy::Interrupt)
    }

    pub fn set_active_language(&self, language: Language) {
        self.scheduler.set_active_language(language);
    }

    pub fn active_language(&self) -> Language {
        self.scheduler.active_language()
    }

    pub fn enable_display(&self) {
        self.scheduler.enable_display();
    }

    pub fn disable_display(&self) {
        self.scheduler.disable_display();
    }

    /// Flip display visibility, as bound to a controller button
    pub fn toggle_display(&self) -> bool {
        self.scheduler.toggle_display()
    }

    /// Read-only access to a loaded line
    pub fn lookup(&self, key: &str) -> Option<&VoiceoverLine> {
        self.lines.as_ref().and_then(|lines| lines.get(key))
    }

    /// Shared handle to the loaded lines for concurrent readers
    pub fn lines(&self) -> Option<Arc<VoiceoverMap>> {
        self.lines.clone()
    }

    pub fn scene(&self) -> &str {
        &self.scene
    }

    /// Whether the scene failed to load and playback is degraded to error display
    pub fn is_degraded(&self) -> bool {
        self.load_error.is_some()
    }

    pub fn load_error(&self) -> Option<&LoadError> {
        self.load_error.as_ref()
    }

    pub fn state(&self) -> PlaybackState {
        self.scheduler.state()
    }

    pub fn scheduler(&self) -> &PlaybackScheduler {
        &self.scheduler
    }
}
