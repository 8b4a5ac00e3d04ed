//! Presentation and audio collaborator traits.
//!
//! The session calls into these at fixed points; it never reads anything
//! back. Implementations decide how (or whether) to show text, honor
//! durations, or make noise.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ending::Ending;
use crate::player::PlayerState;
use crate::scene::{Mood, Scene};

/// A sound cue. Fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cue {
    /// A choice was clicked.
    Click,
    /// A gentle resolution.
    Chime,
    /// Start the suspense loop.
    SuspenseStart,
    /// Stop the suspense loop.
    SuspenseStop,
    /// The sting that opens a vision.
    VisionHit,
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Click => write!(f, "click"),
            Self::Chime => write!(f, "chime"),
            Self::SuspenseStart => write!(f, "suspense-start"),
            Self::SuspenseStop => write!(f, "suspense-stop"),
            Self::VisionHit => write!(f, "vision-hit"),
        }
    }
}

/// Receives everything the player should see.
pub trait Presenter {
    /// Show a scene: speaker, narration, and choice labels.
    fn render(&mut self, scene: &Scene);

    /// Show a vision overlay for `duration_ms`.
    fn show_vision(&mut self, text: &str, duration_ms: u64);

    /// Refresh the attribute display.
    fn update_hud(&mut self, state: &PlayerState);

    /// Change the background mood.
    fn set_mood(&mut self, mood: Mood);

    /// Show the end screen.
    fn show_ending(&mut self, ending: Ending, state: &PlayerState);
}

/// Plays sound cues.
pub trait Audio {
    /// Play a cue. Must not block.
    fn play_cue(&mut self, cue: Cue);
}

/// Audio sink that ignores every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl Audio for NullAudio {
    fn play_cue(&mut self, _cue: Cue) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_names() {
        assert_eq!(Cue::SuspenseStart.to_string(), "suspense-start");
        assert_eq!(
            serde_json::to_string(&Cue::VisionHit).unwrap(),
            "\"vision-hit\""
        );
    }
}
