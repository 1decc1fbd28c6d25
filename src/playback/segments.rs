use log::warn;
use std::time::Duration;

use crate::voiceover::LangObject;

// @module: Derivation of timed display segments

/// One contiguous span of display time showing a single piece of text
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    // @field: Text shown for the span
    pub text: String,

    // @field: Span length in seconds
    pub duration_secs: f32,
}

impl Segment {
    pub fn new(text: impl Into<String>, duration_secs: f32) -> Self {
        Self {
            text: text.into(),
            duration_secs,
        }
    }

    /// Span length as a `Duration`; non-finite or negative lengths become zero
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.duration_secs).unwrap_or_default()
    }
}

/// Durations of the display intervals delimited by `timestamps` within a clip
///
/// With no timestamps the whole clip is one interval. Otherwise there are
/// `timestamps.len() + 1` intervals: up to the first timestamp, between each
/// consecutive pair, and from the last timestamp to the clip end. Negative
/// intervals (a timestamp past the clip end) are clamped to zero.
pub fn segment_durations(timestamps: &[f32], clip_length: f32) -> Vec<f32> {
    let Some(&last) = timestamps.last() else {
        return vec![clip_length.max(0.0)];
    };

    let mut durations = Vec::with_capacity(timestamps.len() + 1);
    durations.push(timestamps[0]);
    durations.extend(timestamps.windows(2).map(|pair| pair[1] - pair[0]));
    durations.push(clip_length - last);

    for duration in durations.iter_mut() {
        if *duration < 0.0 {
            warn!(
                "Clamping negative subtitle duration {:.3}s to zero (clip length {:.3}s)",
                duration, clip_length
            );
            *duration = 0.0;
        }
    }

    durations
}

/// Pair each line of a language with its display duration
pub fn derive_segments(lang_object: &LangObject, clip_length: f32) -> Vec<Segment> {
    segment_durations(&lang_object.timestamps, clip_length)
        .into_iter()
        .enumerate()
        .map(|(index, duration)| {
            let text = lang_object.lines.get(index).cloned().unwrap_or_default();
            Segment::new(text, duration)
        })
        .collect()
}
