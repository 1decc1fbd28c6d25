/*!
 * Tests for segment timing
 */

use std::time::Duration;
use vosync::playback::{derive_segments, segment_durations, Segment};
use vosync::LangObject;

fn lang(timestamps: &[f32], lines: &[&str]) -> LangObject {
    LangObject::new(timestamps.to_vec(), lines.iter().map(|l| l.to_string()).collect())
}

#[test]
fn test_derive_segments_withIntroLine_shouldMatchWorkedExample() {
    let segments = derive_segments(&lang(&[1.0, 2.5], &["Hello", "There", "Friend"]), 4.0);

    assert_eq!(
        segments,
        vec![
            Segment::new("Hello", 1.0),
            Segment::new("There", 1.5),
            Segment::new("Friend", 1.5),
        ]
    );
}

#[test]
fn test_derive_segments_withNoTimestamps_shouldShowOneLineForWholeClip() {
    let segments = derive_segments(&lang(&[], &["Goodbye"]), 2.0);

    assert_eq!(segments, vec![Segment::new("Goodbye", 2.0)]);
}

/// Durations add up to the clip length whenever the timestamps fit the clip
#[test]
fn test_segment_durations_withTimestampsInsideClip_shouldSumToClipLength() {
    let cases: &[(&[f32], f32)] = &[
        (&[], 3.0),
        (&[0.5], 1.0),
        (&[0.25, 0.5, 0.75], 1.0),
        (&[1.0, 2.5], 4.0),
        (&[0.0, 2.0], 2.0),
    ];

    for (timestamps, clip_length) in cases {
        let durations = segment_durations(timestamps, *clip_length);
        let total: f32 = durations.iter().sum();

        assert_eq!(durations.len(), timestamps.len() + 1);
        assert!((total - clip_length).abs() < 1e-5, "{:?} over {}", timestamps, clip_length);
        assert!(durations.iter().all(|d| *d >= 0.0));
    }
}

#[test]
fn test_segment_durations_withTimestampPastClipEnd_shouldClampToZero() {
    let durations = segment_durations(&[1.0, 3.0], 2.0);

    assert_eq!(durations, vec![1.0, 2.0, 0.0]);
}

#[test]
fn test_segment_duration_withNegativeSeconds_shouldBeZero() {
    assert_eq!(Segment::new("x", -1.0).duration(), Duration::ZERO);
    assert_eq!(Segment::new("x", f32::NAN).duration(), Duration::ZERO);
    assert_eq!(Segment::new("x", 1.5).duration(), Duration::from_millis(1500));
}
