/*!
 * Loading of persisted voiceover collections.
 *
 * A scene's collection is read once when its context activates and turned
 * into a `VoiceoverMap`, a read-only lookup keyed by the hashed line key.
 * The map is `Send + Sync` and meant to be shared behind an `Arc`.
 */

use log::{debug, info};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::LoadError;
use crate::voiceover::{VoiceoverCollection, VoiceoverId, VoiceoverLine};

/// Read-only lookup of voiceover lines by hashed key
#[derive(Debug, Clone, Default)]
pub struct VoiceoverMap {
    lines: HashMap<VoiceoverId, VoiceoverLine>,
}

impl VoiceoverMap {
    /// Build a map from a collection, rejecting duplicates and invalid lines
    pub fn from_collection(collection: VoiceoverCollection, resource: &str) -> Result<Self, LoadError> {
        let mut lines: HashMap<VoiceoverId, VoiceoverLine> = HashMap::with_capacity(collection.len());

        for line in collection.voiceover_lines {
            line.validate().map_err(|(language, reason)| LoadError::InvalidLine {
                resource: resource.to_string(),
                key: line.key.clone(),
                language,
                reason,
            })?;

            let id = line.id();
            if let Some(existing) = lines.get(&id) {
                debug!("Voiceover id {} of '{}' already taken by '{}'", id, line.key, existing.key);
                return Err(if existing.key == line.key {
                    LoadError::DuplicateKey {
                        resource: resource.to_string(),
                        key: line.key,
                    }
                } else {
                    LoadError::HashCollision {
                        resource: resource.to_string(),
                        first: existing.key.clone(),
                        second: line.key,
                    }
                });
            }
            lines.insert(id, line);
        }

        Ok(Self { lines })
    }

    /// Deserialize a persisted collection and build its map
    pub fn from_json(data: &str, resource: &str) -> Result<Self, LoadError> {
        let collection: VoiceoverCollection =
            serde_json::from_str(data).map_err(|e| LoadError::Deserialization {
                resource: resource.to_string(),
                message: e.to_string(),
            })?;
        Self::from_collection(collection, resource)
    }

    /// Look up a line by key
    pub fn get(&self, key: &str) -> Option<&VoiceoverLine> {
        self.get_by_id(VoiceoverId::from_key(key))
            .filter(|line| line.key == key)
    }

    /// Look up a line by its precomputed id
    pub fn get_by_id(&self, id: VoiceoverId) -> Option<&VoiceoverLine> {
        self.lines.get(&id)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate over the loaded lines in no particular order
    pub fn lines(&self) -> impl Iterator<Item = &VoiceoverLine> {
        self.lines.values()
    }
}

/// Locates and loads per-scene collections
#[derive(Debug, Clone)]
pub struct CollectionLoader {
    // @field: Directory of persisted collections
    json_dir: PathBuf,

    // @field: Collection file prefix
    file_prefix: String,
}

impl CollectionLoader {
    pub fn new<P: AsRef<Path>>(json_dir: P, file_prefix: &str) -> Self {
        Self {
            json_dir: json_dir.as_ref().to_path_buf(),
            file_prefix: file_prefix.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.json_dir, &config.conversion.file_prefix)
    }

    /// File name of a scene's collection, e.g. `voiceovers_forest.json`
    pub fn scene_file_name(&self, scene: &str) -> String {
        format!("{}{}.json", self.file_prefix, scene.trim().to_lowercase())
    }

    /// Full path of a scene's collection
    pub fn scene_path(&self, scene: &str) -> PathBuf {
        self.json_dir.join(self.scene_file_name(scene))
    }

    /// Load the collection of a scene
    pub fn load_scene(&self, scene: &str) -> Result<VoiceoverMap, LoadError> {
        let resource = self.scene_file_name(scene);
        let path = self.scene_path(scene);

        let data = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::MissingResource {
                resource: resource.clone(),
            },
            _ => LoadError::Io {
                resource: resource.clone(),
                message: e.to_string(),
            },
        })?;
        debug!("Read {} byte(s) from {:?}", data.len(), path);

        let map = VoiceoverMap::from_json(&data, &resource)?;
        info!("Loaded {} voiceover line(s) for scene '{}'", map.len(), scene);
        Ok(map)
    }
}
