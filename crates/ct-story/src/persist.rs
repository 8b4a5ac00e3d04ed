//! Save snapshots and save stores.
//!
//! A [`Snapshot`] is the player's attributes and history plus the scene the
//! player was standing in, serialized as one JSON object. Field names match
//! the browser release's `ct_save` record, so those saves load here too
//! (unknown fields such as `helpedMia` are ignored).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StoryError, StoryResult};
use crate::player::PlayerState;
use crate::scene::SceneId;

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// File name used when no save path is given.
pub const DEFAULT_SAVE_FILE: &str = "ct_save.json";

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// A serializable copy of a session's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Layout version.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Attributes and history.
    #[serde(flatten)]
    pub state: PlayerState,
    /// Scene awaiting a choice when the save was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<SceneId>,
    /// When the save was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Capture `state` positioned at `scene`.
    pub fn new(state: PlayerState, scene: Option<SceneId>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            state,
            scene,
            saved_at: Some(Utc::now()),
        }
    }

    /// Serialize into an opaque blob.
    pub fn to_blob(&self) -> StoryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a blob written by [`Snapshot::to_blob`].
    pub fn from_blob(blob: &str) -> StoryResult<Self> {
        if blob.trim().is_empty() {
            return Err(StoryError::Persistence("save is empty".to_string()));
        }
        let snapshot: Self = serde_json::from_str(blob)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(StoryError::Persistence(format!(
                "save version {} is newer than supported version {SNAPSHOT_VERSION}",
                snapshot.version
            )));
        }
        Ok(snapshot)
    }
}

/// Durable home for a single save blob.
pub trait SaveStore {
    /// Store `blob`, replacing any previous save.
    fn write(&mut self, blob: &str) -> StoryResult<()>;

    /// Load the stored blob. Fails when there is no save.
    fn read(&self) -> StoryResult<String>;
}

/// Keeps the save in memory. Useful for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Option<String>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with `blob`.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
        }
    }

    /// The stored blob, if any.
    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl SaveStore for MemoryStore {
    fn write(&mut self, blob: &str) -> StoryResult<()> {
        self.blob = Some(blob.to_string());
        Ok(())
    }

    fn read(&self) -> StoryResult<String> {
        self.blob
            .clone()
            .ok_or_else(|| StoryError::Persistence("no save found".to_string()))
    }
}

/// Keeps the save in a single file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_FILE)
    }
}

impl FileStore {
    /// A store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a save file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

impl SaveStore for FileStore {
    fn write(&mut self, blob: &str) -> StoryResult<()> {
        // Write beside the target and rename so a crash never leaves half a save.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn read(&self) -> StoryResult<String> {
        if !self.exists() {
            return Err(StoryError::Persistence(format!(
                "no save found at {}",
                self.path.display()
            )));
        }
        Ok(fs::read_to_string(&self.path)?)
    }
}
