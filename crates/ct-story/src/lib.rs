//! Scene graph, player state, and ending resolution for Choosing Tomorrow.
//!
//! A small interactive-fiction core: a fixed table of scenes, each ending in
//! a player choice that nudges four attributes, and an ordered set of rules
//! that classifies the final state into one of five endings. Rendering, audio,
//! and save storage are collaborators reached through traits in [`collab`]
//! and [`persist`].

/// Presentation and audio collaborator traits.
pub mod collab;
/// Session configuration.
pub mod config;
/// Ending variants and the ending resolver.
pub mod ending;
/// Error types for the story engine.
pub mod error;
/// The scene graph and its validation.
pub mod graph;
/// Save snapshots and save stores.
pub mod persist;
/// Player attributes and choice history.
pub mod player;
/// Scene, choice, and transition records.
pub mod scene;
/// The built-in scene table.
pub mod script;
/// Session orchestration.
pub mod session;
/// End-of-game summaries and export.
pub mod summary;

pub use collab::{Audio, Cue, NullAudio, Presenter};
pub use config::{ResumePolicy, SessionConfig};
pub use ending::{Ending, PathTag, resolve};
pub use error::{StoryError, StoryResult};
pub use graph::SceneGraph;
pub use persist::{FileStore, MemoryStore, SaveStore, Snapshot};
pub use player::{Attribute, HistoryEntry, PlayerState, StateDelta};
pub use scene::{Choice, Mood, Scene, SceneId, Target, Vision};
pub use session::{Phase, ScheduledAdvance, SessionController, Step};
pub use summary::Summary;
