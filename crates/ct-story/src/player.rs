//! Player state management.
//!
//! Attributes are plain signed integers and are never clamped: a long run of
//! stressful choices can push `stress` arbitrarily high, and `kindness` can go
//! negative. The ending rules only compare against fixed thresholds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scene::SceneId;

/// Starting stress.
pub const INITIAL_STRESS: i32 = 15;
/// Starting kindness.
pub const INITIAL_KINDNESS: i32 = 40;
/// Starting focus.
pub const INITIAL_FOCUS: i32 = 55;
/// Starting courage.
pub const INITIAL_COURAGE: i32 = 30;

/// One of the four tracked attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    /// How wound up the player is.
    Stress,
    /// Care shown toward others.
    Kindness,
    /// Ability to concentrate.
    Focus,
    /// Willingness to take the harder path.
    Courage,
}

impl Attribute {
    /// All attributes in HUD order.
    pub const ALL: [Attribute; 4] = [
        Attribute::Stress,
        Attribute::Kindness,
        Attribute::Focus,
        Attribute::Courage,
    ];

    /// Short label used on the HUD.
    pub fn hud_label(self) -> &'static str {
        match self {
            Self::Stress => "Stress",
            Self::Kindness => "Kind",
            Self::Focus => "Focus",
            Self::Courage => "Courage",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stress => write!(f, "stress"),
            Self::Kindness => write!(f, "kindness"),
            Self::Focus => write!(f, "focus"),
            Self::Courage => write!(f, "courage"),
        }
    }
}

/// Signed adjustments applied when a choice is made.
///
/// Each attribute appears at most once; setting the same attribute twice
/// replaces the earlier amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDelta {
    changes: Vec<(Attribute, i32)>,
}

impl StateDelta {
    /// An empty delta.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the adjustment for one attribute.
    pub fn with(mut self, attribute: Attribute, amount: i32) -> Self {
        if let Some(entry) = self.changes.iter_mut().find(|(a, _)| *a == attribute) {
            entry.1 = amount;
        } else {
            self.changes.push((attribute, amount));
        }
        self
    }

    /// Adjust stress.
    pub fn stress(self, amount: i32) -> Self {
        self.with(Attribute::Stress, amount)
    }

    /// Adjust kindness.
    pub fn kindness(self, amount: i32) -> Self {
        self.with(Attribute::Kindness, amount)
    }

    /// Adjust focus.
    pub fn focus(self, amount: i32) -> Self {
        self.with(Attribute::Focus, amount)
    }

    /// Adjust courage.
    pub fn courage(self, amount: i32) -> Self {
        self.with(Attribute::Courage, amount)
    }

    /// The adjustments, in the order they were declared.
    pub fn changes(&self) -> &[(Attribute, i32)] {
        &self.changes
    }

    /// Adjustment for one attribute (0 when untouched).
    pub fn get(&self, attribute: Attribute) -> i32 {
        self.changes
            .iter()
            .find(|(a, _)| *a == attribute)
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }

    /// Whether the delta changes nothing.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl fmt::Display for StateDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .changes
            .iter()
            .map(|(a, v)| format!("{} {v:+}", a.hud_label()))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// A choice the player made, recorded in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Scene the choice was made in.
    pub scene: SceneId,
    /// Label of the chosen option.
    pub choice: String,
}

/// The player's attributes and choice history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Current stress.
    pub stress: i32,
    /// Current kindness.
    pub kindness: i32,
    /// Current focus.
    pub focus: i32,
    /// Current courage.
    pub courage: i32,
    /// Choices made so far, oldest first.
    pub history: Vec<HistoryEntry>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerState {
    /// Fresh state with the starting attribute values and no history.
    pub fn new() -> Self {
        Self {
            stress: INITIAL_STRESS,
            kindness: INITIAL_KINDNESS,
            focus: INITIAL_FOCUS,
            courage: INITIAL_COURAGE,
            history: Vec::new(),
        }
    }

    /// Read one attribute.
    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Stress => self.stress,
            Attribute::Kindness => self.kindness,
            Attribute::Focus => self.focus,
            Attribute::Courage => self.courage,
        }
    }

    fn slot(&mut self, attribute: Attribute) -> &mut i32 {
        match attribute {
            Attribute::Stress => &mut self.stress,
            Attribute::Kindness => &mut self.kindness,
            Attribute::Focus => &mut self.focus,
            Attribute::Courage => &mut self.courage,
        }
    }

    /// Add every adjustment in `delta`. No bounds are applied.
    pub fn apply_delta(&mut self, delta: &StateDelta) {
        for &(attribute, amount) in delta.changes() {
            let slot = self.slot(attribute);
            *slot = slot.saturating_add(amount);
        }
    }

    /// Append a choice to the history.
    pub fn record_choice(&mut self, scene: SceneId, label: impl Into<String>) {
        self.history.push(HistoryEntry {
            scene,
            choice: label.into(),
        });
    }

    /// The most recent history entry.
    pub fn last_choice(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }

    /// HUD line, e.g. `Stress: 15  Kind: 40  Focus: 55  Courage: 30`.
    pub fn hud_line(&self) -> String {
        Attribute::ALL
            .iter()
            .map(|a| format!("{}: {}", a.hud_label(), self.get(*a)))
            .collect::<Vec<_>>()
            .join("  ")
    }
}
