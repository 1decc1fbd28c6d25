/*!
 * Playback scheduler.
 *
 * Drives one subtitle sequence at a time for a context. A request resolves
 * the line, starts its audio, shows segment 0 and spawns a task that sleeps
 * through each segment before showing the next one. Interrupting aborts that
 * task; a generation counter makes sure a task that already woke up cannot
 * show anything after it has been superseded.
 *
 * States:
 * - `Idle`: nothing displayed, requests accepted
 * - `ErrorDisplay`: the scene collection failed to load; permanent
 * - `Playing { segment_index }`: a segment is displayed and its timer pending
 */

use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::language_utils::Language;
use crate::loader::VoiceoverMap;
use crate::playback::segments::{derive_segments, Segment};
use crate::playback::sink::{AudioPlayer, SubtitleSink};

/// Observable scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    ErrorDisplay,
    Playing { segment_index: usize },
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// What a request does when a sequence is already playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptPolicy {
    /// Cancel the current sequence and start the new one
    Interrupt,
    /// Reject the new request and let the current sequence continue
    NoInterrupt,
}

impl From<bool> for InterruptPolicy {
    fn from(interrupt: bool) -> Self {
        if interrupt {
            Self::Interrupt
        } else {
            Self::NoInterrupt
        }
    }
}

/// Where the scheduler gets its lines from
#[derive(Debug, Clone)]
pub enum LineSource {
    /// The scene collection loaded successfully
    Loaded(Arc<VoiceoverMap>),
    /// The scene collection failed to load; `message` is shown on every request
    Unavailable { message: String },
}

struct SchedulerState {
    phase: PlaybackState,
    language: Language,
    display_enabled: bool,
    current_key: Option<String>,
    current_text: String,
    // Bumped on every start and cancel; a task only acts while it matches
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

struct Shared {
    state: Mutex<SchedulerState>,
    state_tx: watch::Sender<PlaybackState>,
    sink: Arc<dyn SubtitleSink>,
}

impl Shared {
    fn set_phase(&self, state: &mut SchedulerState, phase: PlaybackState) {
        state.phase = phase;
        self.state_tx.send_replace(phase);
    }

    fn show(&self, state: &mut SchedulerState, text: &str) {
        state.current_text = text.to_string();
        self.sink.show_text(text);
    }

    fn cancel(state: &mut SchedulerState) {
        state.generation = state.generation.wrapping_add(1);
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
    }
}

/// Schedules timed subtitle sequences for one context
pub struct PlaybackScheduler {
    shared: Arc<Shared>,
    source: LineSource,
    audio: Arc<dyn AudioPlayer>,
    // Runtime driving segment timers, captured at construction when available
    runtime: Option<Handle>,
}

impl PlaybackScheduler {
    /// Create a scheduler; an unavailable source starts in `ErrorDisplay`
    ///
    /// Segment timers run on the Tokio runtime current at construction. A
    /// scheduler built outside a runtime falls back to the runtime current at
    /// each request, or is given one with [`PlaybackScheduler::with_runtime`].
    pub fn new(
        source: LineSource,
        sink: Arc<dyn SubtitleSink>,
        audio: Arc<dyn AudioPlayer>,
        language: Language,
    ) -> Self {
        let phase = match source {
            LineSource::Loaded(_) => PlaybackState::Idle,
            LineSource::Unavailable { .. } => PlaybackState::ErrorDisplay,
        };
        let (state_tx, _) = watch::channel(phase);

        let state = SchedulerState {
            phase,
            language,
            display_enabled: true,
            current_key: None,
            current_text: String::new(),
            generation: 0,
            timer: None,
        };

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                state_tx,
                sink,
            }),
            source,
            audio,
            runtime: Handle::try_current().ok(),
        }
    }

    /// Run segment timers on the given runtime
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Request playback of the line stored under `key`
    ///
    /// Returns whether playback started. Without a runtime to drive the
    /// segment timers the request is refused.
    pub fn request_playback(&self, key: &str, policy: InterruptPolicy) -> bool {
        let map = match &self.source {
            LineSource::Loaded(map) => map,
            LineSource::Unavailable { message } => {
                let mut state = self.shared.state.lock();
                self.shared.show(&mut state, message);
                return false;
            }
        };

        let mut state = self.shared.state.lock();

        if state.phase.is_playing() {
            if policy == InterruptPolicy::NoInterrupt {
                debug!(
                    "Rejecting '{}' while '{}' is playing",
                    key,
                    state.current_key.as_deref().unwrap_or_default()
                );
                return false;
            }

            debug!("Interrupting '{}' for '{}'", state.current_key.as_deref().unwrap_or_default(), key);
            Shared::cancel(&mut state);
        }

        // A clip may outlive its subtitles
        if self.audio.is_playing() {
            self.audio.stop();
        }

        let Some(line) = map.get(key) else {
            debug!("No voiceover line for key '{}'", key);
            self.reset_to_idle(&mut state);
            return false;
        };

        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            warn!("Cannot play voiceover '{}': no Tokio runtime to drive its timers", key);
            self.reset_to_idle(&mut state);
            return false;
        };

        let clip_length = match self.audio.play(&line.audio_file_name) {
            Ok(clip_length) => clip_length,
            Err(e) => {
                warn!("Cannot play voiceover '{}': {}", key, e);
                self.reset_to_idle(&mut state);
                return false;
            }
        };

        let segments = derive_segments(line.lang_object(state.language), clip_length);
        debug!(
            "Playing '{}' ({}) with {} segment(s) over {:.3}s",
            key,
            state.language,
            segments.len(),
            clip_length
        );

        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;
        state.current_key = Some(line.key.clone());
        self.shared.set_phase(&mut state, PlaybackState::Playing { segment_index: 0 });
        self.shared.show(&mut state, &segments[0].text);

        let task = run_sequence(Arc::clone(&self.shared), generation, line.key.clone(), segments);
        state.timer = Some(runtime.spawn(task));

        true
    }

    /// Cancel any sequence in flight, stop its audio and clear the text
    pub fn stop(&self) {
        let mut state = self.shared.state.lock();
        if !state.phase.is_playing() {
            return;
        }
        Shared::cancel(&mut state);
        if self.audio.is_playing() {
            self.audio.stop();
        }
        self.reset_to_idle(&mut state);
    }

    /// Language used by subsequent requests; a sequence in flight is unaffected
    pub fn set_active_language(&self, language: Language) {
        let mut state = self.shared.state.lock();
        if state.language != language {
            info!("Subtitle language changed from {} to {}", state.language, language);
            state.language = language;
        }
    }

    pub fn active_language(&self) -> Language {
        self.shared.state.lock().language
    }

    /// Show the display surface; timing is unaffected
    pub fn enable_display(&self) {
        self.set_display_enabled(true);
    }

    /// Hide the display surface; timing is unaffected
    pub fn disable_display(&self) {
        self.set_display_enabled(false);
    }

    /// Flip display visibility, returning the new value
    pub fn toggle_display(&self) -> bool {
        let mut state = self.shared.state.lock();
        state.display_enabled = !state.display_enabled;
        self.shared.sink.set_visible(state.display_enabled);
        state.display_enabled
    }

    pub fn is_display_enabled(&self) -> bool {
        self.shared.state.lock().display_enabled
    }

    pub fn state(&self) -> PlaybackState {
        self.shared.state.lock().phase
    }

    /// Key of the line being played, if any
    pub fn current_key(&self) -> Option<String> {
        self.shared.state.lock().current_key.clone()
    }

    /// Text most recently sent to the sink
    pub fn current_text(&self) -> String {
        self.shared.state.lock().current_text.clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.shared.state_tx.subscribe()
    }

    /// Wait until no sequence is playing
    pub async fn wait_until_idle(&self) {
        let mut rx = self.subscribe();
        // The sender lives as long as `self`, so this cannot fail
        let _ = rx.wait_for(|state| !state.is_playing()).await;
    }

    fn set_display_enabled(&self, enabled: bool) {
        let mut state = self.shared.state.lock();
        state.display_enabled = enabled;
        self.shared.sink.set_visible(enabled);
    }

    fn reset_to_idle(&self, state: &mut SchedulerState) {
        state.current_key = None;
        if !state.current_text.is_empty() {
            self.shared.show(state, "");
        }
        self.shared.set_phase(state, PlaybackState::Idle);
    }
}

impl Drop for PlaybackScheduler {
    fn drop(&mut self) {
        Shared::cancel(&mut self.shared.state.lock());
    }
}

// Show each segment for its duration, then clear and return to idle
async fn run_sequence(shared: Arc<Shared>, generation: u64, key: String, segments: Vec<Segment>) {
    for (index, segment) in segments.iter().enumerate() {
        if index > 0 {
            let mut state = shared.state.lock();
            if state.generation != generation {
                return;
            }
            shared.set_phase(&mut state, PlaybackState::Playing { segment_index: index });
            shared.show(&mut state, &segment.text);
        }
        tokio::time::sleep(segment.duration()).await;
    }

    {
        let mut state = shared.state.lock();
        if state.generation != generation {
            return;
        }
        state.timer = None;
        state.current_key = None;
        shared.show(&mut state, "");
        shared.set_phase(&mut state, PlaybackState::Idle);
    }

    debug!("Finished voiceover '{}'", key);
    shared.sink.sequence_completed(&key);
}
