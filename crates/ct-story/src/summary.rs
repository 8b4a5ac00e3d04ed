//! End-of-run summary and its export formats.

use serde::{Deserialize, Serialize};

use crate::ending::Ending;
use crate::player::{HistoryEntry, PlayerState};

/// Final attributes, the choices that led there, and the ending reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Final stress.
    pub stress: i32,
    /// Final kindness.
    pub kindness: i32,
    /// Final focus.
    pub focus: i32,
    /// Final courage.
    pub courage: i32,
    /// Every choice made, oldest first.
    pub history: Vec<HistoryEntry>,
    /// Ending reached, if the run finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ending: Option<Ending>,
}

impl Summary {
    /// Compile a summary of `state`.
    pub fn from_state(state: &PlayerState, ending: Option<Ending>) -> Self {
        Self {
            stress: state.stress,
            kindness: state.kindness,
            focus: state.focus,
            courage: state.courage,
            history: state.history.clone(),
            ending,
        }
    }

    /// Export as Markdown.
    pub fn export_markdown(&self) -> String {
        let mut out = String::from("# Choosing Tomorrow\n\n");
        match self.ending {
            Some(ending) => {
                out.push_str(&format!("## {}\n\n", ending.title()));
                out.push_str(&format!("{}\n\n", ending.description()));
            }
            None => out.push_str("*Run in progress*\n\n"),
        }

        out.push_str("## Attributes\n\n");
        out.push_str("| Stress | Kindness | Focus | Courage |\n");
        out.push_str("|---|---|---|---|\n");
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n\n",
            self.stress, self.kindness, self.focus, self.courage
        ));

        out.push_str("## Choices\n\n");
        if self.history.is_empty() {
            out.push_str("_No choices made._\n");
        }
        for (i, entry) in self.history.iter().enumerate() {
            out.push_str(&format!("{}. **{}**: {}\n", i + 1, entry.scene, entry.choice));
        }
        out
    }

    /// Export as plain text.
    pub fn export_text(&self) -> String {
        let mut out = String::new();
        match self.ending {
            Some(ending) => out.push_str(&format!("{}\n{}\n\n", ending.title(), ending.description())),
            None => out.push_str("Run in progress\n\n"),
        }
        out.push_str(&format!(
            "Stress: {}  Kind: {}  Focus: {}  Courage: {}\n\n",
            self.stress, self.kindness, self.focus, self.courage
        ));
        for entry in &self.history {
            out.push_str(&format!("[{}] {}\n", entry.scene, entry.choice));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneId;

    fn finished() -> Summary {
        let mut state = PlayerState::new();
        state.record_choice(SceneId::Wake, "Rush out without breakfast");
        state.record_choice(SceneId::Street, "Dash to Mia (don't delay)");
        Summary::from_state(&state, Some(Ending::Balanced))
    }

    #[test]
    fn from_state_copies_everything() {
        let s = finished();
        assert_eq!(s.stress, 15);
        assert_eq!(s.courage, 30);
        assert_eq!(s.history.len(), 2);
        assert_eq!(s.ending, Some(Ending::Balanced));
    }

    #[test]
    fn export_markdown_lists_choices() {
        let md = finished().export_markdown();
        assert!(md.contains("## Balanced Ending"));
        assert!(md.contains("| 15 | 40 | 55 | 30 |"));
        assert!(md.contains("1. **wake**: Rush out without breakfast"));
        assert!(md.contains("2. **street**: Dash to Mia (don't delay)"));
    }

    #[test]
    fn export_markdown_unfinished() {
        let md = Summary::from_state(&PlayerState::new(), None).export_markdown();
        assert!(md.contains("*Run in progress*"));
        assert!(md.contains("_No choices made._"));
    }

    #[test]
    fn export_text() {
        let text = finished().export_text();
        assert!(text.starts_with("Balanced Ending\n"));
        assert!(text.contains("Stress: 15  Kind: 40  Focus: 55  Courage: 30"));
        assert!(text.contains("[street] Dash to Mia (don't delay)"));
    }

    #[test]
    fn serde_roundtrip() {
        let s = finished();
        let json = serde_json::to_string(&s).unwrap();
        let back: Summary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
