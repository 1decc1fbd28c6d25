/*!
 * Runtime subtitle playback.
 *
 * - `segments`: timestamps and clip length to timed display segments
 * - `scheduler`: the playback state machine driving a sink in time
 * - `sink`: collaborator traits for display and audio, plus console stand-ins
 */

pub use self::scheduler::{InterruptPolicy, LineSource, PlaybackScheduler, PlaybackState};
pub use self::segments::{derive_segments, segment_durations, Segment};
pub use self::sink::{AudioPlayer, ConsoleSink, SilentClip, SubtitleSink};

pub mod scheduler;
pub mod segments;
pub mod sink;
