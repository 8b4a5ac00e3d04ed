//! Scene, choice, and transition records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ending::PathTag;
use crate::error::StoryError;
use crate::player::StateDelta;

/// Identifier of one scene in the story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SceneId {
    /// Waking up late on exam day.
    Wake,
    /// Running through the streets.
    Street,
    /// Quick stop for breakfast.
    Cafeteria,
    /// Meeting Mia in the hallway.
    #[serde(alias = "mia")]
    MiaMeet,
    /// The exam hall entrance.
    #[serde(alias = "examEntry")]
    ExamEntrance,
    /// During the exam.
    Exam,
    /// Outside after the exam.
    AfterExam,
    /// The study session a few days later.
    #[serde(alias = "study")]
    StudyGroup,
    /// The final test; its choices lead to an ending.
    #[serde(alias = "final")]
    FinalTest,
}

impl SceneId {
    /// Every scene, in story order.
    pub const ALL: [SceneId; 9] = [
        SceneId::Wake,
        SceneId::Street,
        SceneId::Cafeteria,
        SceneId::MiaMeet,
        SceneId::ExamEntrance,
        SceneId::Exam,
        SceneId::AfterExam,
        SceneId::StudyGroup,
        SceneId::FinalTest,
    ];

    /// The identifier as written in saves and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wake => "wake",
            Self::Street => "street",
            Self::Cafeteria => "cafeteria",
            Self::MiaMeet => "miaMeet",
            Self::ExamEntrance => "examEntrance",
            Self::Exam => "exam",
            Self::AfterExam => "afterExam",
            Self::StudyGroup => "studyGroup",
            Self::FinalTest => "finalTest",
        }
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneId {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StoryError::UnknownScene(s.to_string()))
    }
}

/// Background mood tag consumed by the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Quiet, everyday.
    Calm,
    /// Pressure building.
    Tense,
    /// Things looking up.
    Hopeful,
    /// Heavy or grim.
    Dark,
    /// A vision overlay is showing.
    Vision,
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calm => write!(f, "calm"),
            Self::Tense => write!(f, "tense"),
            Self::Hopeful => write!(f, "hopeful"),
            Self::Dark => write!(f, "dark"),
            Self::Vision => write!(f, "vision"),
        }
    }
}

/// Where a choice leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// Continue to another scene.
    Scene(SceneId),
    /// Leave the graph and resolve an ending with this path tag.
    Ending(PathTag),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scene(id) => write!(f, "{id}"),
            Self::Ending(path) => write!(f, "ending ({path})"),
        }
    }
}

/// A short interstitial shown after certain choices. Never touches state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vision {
    /// Overlay text.
    pub text: String,
    /// How long the overlay stays up.
    pub duration_ms: u64,
    /// Delay before the next scene is entered. The overlay keeps running
    /// past the advance when this is shorter than `duration_ms`.
    pub advance_after_ms: u64,
}

impl Vision {
    /// A vision whose scene advance happens immediately.
    pub fn new(text: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            text: text.into(),
            duration_ms,
            advance_after_ms: 0,
        }
    }

    /// Delay the scene advance.
    pub fn with_advance_after(mut self, ms: u64) -> Self {
        self.advance_after_ms = ms;
        self
    }
}

/// A single option presented at the end of a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// The text shown to the player.
    pub label: String,
    /// Attribute changes applied when chosen.
    pub delta: StateDelta,
    /// Transition target.
    pub target: Target,
    /// Optional interstitial shown before the transition.
    pub vision: Option<Vision>,
}

impl Choice {
    /// A choice leading to another scene.
    pub fn new(label: impl Into<String>, delta: StateDelta, next: SceneId) -> Self {
        Self {
            label: label.into(),
            delta,
            target: Target::Scene(next),
            vision: None,
        }
    }

    /// A choice that ends the story with the given path tag.
    pub fn ending(label: impl Into<String>, delta: StateDelta, path: PathTag) -> Self {
        Self {
            label: label.into(),
            delta,
            target: Target::Ending(path),
            vision: None,
        }
    }

    /// Attach a vision.
    pub fn with_vision(mut self, vision: Vision) -> Self {
        self.vision = Some(vision);
        self
    }
}

/// One narrative beat with fixed text and a fixed choice set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    /// Unique identifier.
    pub id: SceneId,
    /// Who is speaking.
    pub speaker: String,
    /// Background mood on entry.
    pub mood: Mood,
    /// Portrait key, if one is shown.
    pub portrait: Option<String>,
    /// Narration text.
    pub narration: String,
    /// Options, in presentation order.
    pub choices: Vec<Choice>,
}

impl Scene {
    /// Create a scene with no choices yet.
    pub fn new(
        id: SceneId,
        speaker: impl Into<String>,
        mood: Mood,
        narration: impl Into<String>,
    ) -> Self {
        Self {
            id,
            speaker: speaker.into(),
            mood,
            portrait: None,
            narration: narration.into(),
            choices: Vec::new(),
        }
    }

    /// Set the portrait.
    pub fn with_portrait(mut self, portrait: impl Into<String>) -> Self {
        self.portrait = Some(portrait.into());
        self
    }

    /// Add a choice.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Choice labels, in presentation order.
    pub fn labels(&self) -> Vec<&str> {
        self.choices.iter().map(|c| c.label.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_id_round_trips_through_str() {
        for id in SceneId::ALL {
            assert_eq!(id.as_str().parse::<SceneId>().unwrap(), id);
        }
        assert_eq!("MIAMEET".parse::<SceneId>().unwrap(), SceneId::MiaMeet);
    }

    #[test]
    fn unknown_scene_id() {
        let err = "library".parse::<SceneId>().unwrap_err();
        assert!(matches!(err, StoryError::UnknownScene(s) if s == "library"));
    }

    #[test]
    fn scene_id_serializes_camel_case() {
        let json = serde_json::to_string(&SceneId::ExamEntrance).unwrap();
        assert_eq!(json, "\"examEntrance\"");
    }

    #[test]
    fn scene_builder() {
        let scene = Scene::new(SceneId::Wake, "Narrator", Mood::Calm, "You wake up.")
            .with_portrait("liam_tired")
            .with_choice(Choice::new(
                "Get up",
                StateDelta::new().stress(1),
                SceneId::Street,
            ))
            .with_choice(
                Choice::new("Sleep in", StateDelta::new(), SceneId::Cafeteria)
                    .with_vision(Vision::new("A dream.", 1000).with_advance_after(900)),
            );

        assert_eq!(scene.labels(), vec!["Get up", "Sleep in"]);
        assert_eq!(scene.portrait.as_deref(), Some("liam_tired"));
        let vision = scene.choices[1].vision.as_ref().unwrap();
        assert_eq!(vision.duration_ms, 1000);
        assert_eq!(vision.advance_after_ms, 900);
    }

    #[test]
    fn ending_choice_target() {
        let choice = Choice::ending("Walk away", StateDelta::new(), PathTag::Reflect);
        assert_eq!(choice.target, Target::Ending(PathTag::Reflect));
        assert_eq!(choice.target.to_string(), "ending (reflect)");
    }
}
