//! Ending variants and the ending resolver.
//!
//! [`resolve`] evaluates its rules strictly in order and the first match
//! wins. The order is narrative priority: isolation beats redemption beats
//! reflection beats burnout, and anything left over is balanced.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collab::Cue;
use crate::player::PlayerState;
use crate::scene::{Mood, Vision};

/// Tag carried by the choice made at the final scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathTag {
    /// Answered honestly.
    Honest,
    /// Fell back on shortcuts.
    CheatAgain,
    /// Stepped out to think.
    Reflect,
}

impl fmt::Display for PathTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Honest => write!(f, "honest"),
            Self::CheatAgain => write!(f, "cheatAgain"),
            Self::Reflect => write!(f, "reflect"),
        }
    }
}

/// One of the five terminal classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ending {
    /// Shortcuts taken, people pushed away.
    Isolation,
    /// Honesty and care rewarded.
    Redemption,
    /// A deliberate pause.
    Reflection,
    /// Too much stress, too little focus.
    Burnout,
    /// Mistakes made, lessons learned.
    Balanced,
}

impl Ending {
    /// Every ending, in rule order.
    pub const ALL: [Ending; 5] = [
        Ending::Isolation,
        Ending::Redemption,
        Ending::Reflection,
        Ending::Burnout,
        Ending::Balanced,
    ];

    /// Title shown on the end screen.
    pub fn title(self) -> &'static str {
        match self {
            Self::Isolation => "Isolation Ending",
            Self::Redemption => "Redemption Ending",
            Self::Reflection => "Reflection Ending",
            Self::Burnout => "Burnout Ending",
            Self::Balanced => "Balanced Ending",
        }
    }

    /// Closing description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Isolation => {
                "You took shortcuts, gained temporary wins, but found yourself more alone. \
                 The grades came, but the warmth didn't."
            }
            Self::Redemption => {
                "You chose honesty and care. Trust grew between you and others — \
                 and a new door opened."
            }
            Self::Reflection => {
                "You stepped away to think. Not a failure — a pause. Paths can be changed."
            }
            Self::Burnout => {
                "Too much stress, too little focus. It's a hard lesson: \
                 rest matters more than hustle alone."
            }
            Self::Balanced => {
                "You found a balance: you made mistakes but learned. \
                 Friends stayed, and you found small joy."
            }
        }
    }

    /// The condition [`resolve`] checks for this ending, in words.
    pub fn rule(self) -> &'static str {
        match self {
            Self::Isolation => "path cheatAgain, or kindness < 10",
            Self::Redemption => "path honest, kindness >= 15 and courage >= 18",
            Self::Reflection => "path reflect and courage < 10",
            Self::Burnout => "stress > 40 and focus < 30",
            Self::Balanced => "anything else",
        }
    }

    /// Mood of the end screen.
    pub fn mood(self) -> Mood {
        match self {
            Self::Isolation | Self::Burnout => Mood::Dark,
            Self::Redemption | Self::Balanced => Mood::Hopeful,
            Self::Reflection => Mood::Calm,
        }
    }

    /// Cue played on arrival. Burnout plays none; its closing vision
    /// carries the sound instead.
    pub fn cue(self) -> Option<Cue> {
        match self {
            Self::Isolation => Some(Cue::VisionHit),
            Self::Redemption | Self::Reflection | Self::Balanced => Some(Cue::Chime),
            Self::Burnout => None,
        }
    }

    /// Vision shown over the end screen, if any.
    pub fn closing_vision(self) -> Option<Vision> {
        match self {
            Self::Burnout => Some(Vision::new(
                "Your vision fades into a blur — you promise to slow down next time.",
                2600,
            )),
            _ => None,
        }
    }
}

impl fmt::Display for Ending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Classify the final state. Pure: same inputs, same ending.
pub fn resolve(path: PathTag, state: &PlayerState) -> Ending {
    if path == PathTag::CheatAgain || state.kindness < 10 {
        Ending::Isolation
    } else if path == PathTag::Honest && state.kindness >= 15 && state.courage >= 18 {
        Ending::Redemption
    } else if path == PathTag::Reflect && state.courage < 10 {
        Ending::Reflection
    } else if state.stress > 40 && state.focus < 30 {
        Ending::Burnout
    } else {
        Ending::Balanced
    }
}
