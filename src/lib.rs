/*!
 * # vosync - Voiceover subtitle synchronization
 *
 * A Rust library for multilingual subtitles timed against voiceover clips.
 *
 * ## Features
 *
 * - Convert voiceover tables (CSV) into per-scene JSON collections
 * - Per-language timestamps and text segments for every voiceover line
 * - Load a scene's collection once into a hashed, read-only lookup
 * - Schedule subtitle segments against clip playback with interruption
 * - Degrade to a visible error message when a scene's data is missing
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `conversion`: Table parsing and conversion to collections
 * - `voiceover`: The persisted data model
 * - `loader`: Collection loading and lookup
 * - `playback`: Segment derivation and the playback scheduler
 * - `context`: Per-scene ownership of lines and scheduler
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Subtitle language declarations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod context;
pub mod conversion;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod loader;
pub mod playback;
pub mod voiceover;

// Re-export main types for easier usage
pub use app_config::Config;
pub use context::VoiceoverContext;
pub use conversion::RecordConverter;
pub use errors::{AppError, AudioError, ConversionError, LoadError};
pub use language_utils::Language;
pub use loader::{CollectionLoader, VoiceoverMap};
pub use playback::{AudioPlayer, InterruptPolicy, PlaybackScheduler, PlaybackState, SubtitleSink};
pub use voiceover::{LangObject, VoiceoverCollection, VoiceoverId, VoiceoverLine};
