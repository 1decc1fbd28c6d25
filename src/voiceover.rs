/*!
 * Voiceover data model.
 *
 * A `VoiceoverCollection` is the unit written by the converter and read by the
 * loader. Field names and the order of `langObjects` are part of the persisted
 * format: reordering `Language` without reconverting breaks existing files.
 */

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::language_utils::Language;

/// One language's rendering of a voiceover line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LangObject {
    // @field: Offsets in seconds from clip start where the text changes
    pub timestamps: Vec<f32>,

    // @field: One text segment per display interval
    pub lines: Vec<String>,
}

impl LangObject {
    pub fn new(timestamps: Vec<f32>, lines: Vec<String>) -> Self {
        Self { timestamps, lines }
    }

    /// Number of display segments this object describes
    pub fn segment_count(&self) -> usize {
        self.timestamps.len() + 1
    }

    /// Check the segment invariants, returning a description of the first violation
    pub fn validate(&self) -> Result<(), String> {
        let expected_lines = self.segment_count();
        if self.lines.len() != expected_lines {
            return Err(format!(
                "expected {} line(s) for {} timestamp(s), found {}",
                expected_lines,
                self.timestamps.len(),
                self.lines.len()
            ));
        }

        let mut previous: Option<f32> = None;
        for &timestamp in &self.timestamps {
            if !timestamp.is_finite() || timestamp < 0.0 {
                return Err(format!("timestamp {} is not a non-negative number", timestamp));
            }
            if let Some(prev) = previous {
                if timestamp <= prev {
                    return Err(format!(
                        "timestamps must be strictly increasing ({} follows {})",
                        timestamp, prev
                    ));
                }
            }
            previous = Some(timestamp);
        }

        Ok(())
    }
}

/// Per-language data of a line, indexed by `Language::index`
pub type LangObjects = [LangObject; Language::COUNT];

/// One playable unit: a key, an audio reference and its subtitles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceoverLine {
    pub key: String,

    /// Opaque reference resolved by the audio collaborator
    #[serde(rename = "audiofilename")]
    pub audio_file_name: String,

    #[serde(rename = "langObjects")]
    pub lang_objects: LangObjects,
}

impl VoiceoverLine {
    pub fn new(key: String, audio_file_name: String, lang_objects: LangObjects) -> Self {
        Self {
            key,
            audio_file_name,
            lang_objects,
        }
    }

    /// Subtitle data for the given language
    pub fn lang_object(&self, language: Language) -> &LangObject {
        &self.lang_objects[language.index()]
    }

    /// Hashed identifier of this line's key
    pub fn id(&self) -> VoiceoverId {
        VoiceoverId::from_key(&self.key)
    }

    /// Validate every language, returning the first offending language and reason
    pub fn validate(&self) -> Result<(), (Language, String)> {
        for language in Language::ALL {
            self.lang_object(language)
                .validate()
                .map_err(|reason| (language, reason))?;
        }
        Ok(())
    }
}

/// Persisted wrapper around the ordered list of lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceoverCollection {
    #[serde(rename = "voiceoverLines")]
    pub voiceover_lines: Vec<VoiceoverLine>,
}

impl VoiceoverCollection {
    pub fn new(voiceover_lines: Vec<VoiceoverLine>) -> Self {
        Self { voiceover_lines }
    }

    pub fn len(&self) -> usize {
        self.voiceover_lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voiceover_lines.is_empty()
    }
}

/// Stable hashed identifier of a voiceover key
///
/// The first eight bytes of the key's SHA-256 digest. Stable across builds and
/// platforms since it depends only on the key's UTF-8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceoverId(u64);

impl VoiceoverId {
    pub fn from_key(key: &str) -> Self {
        let digest = Sha256::digest(key.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        Self(u64::from_be_bytes(bytes))
    }
}

impl From<&str> for VoiceoverId {
    fn from(key: &str) -> Self {
        Self::from_key(key)
    }
}

impl fmt::Display for VoiceoverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
