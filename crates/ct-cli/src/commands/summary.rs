use std::fmt;
use std::path::Path;
use std::str::FromStr;

use ct_story::{FileStore, SaveStore, Snapshot, Summary};

/// Output format for summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Markdown,
    Text,
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!(
                "unsupported format: \"{s}\". Use: markdown, text, json"
            )),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

pub fn run(save: &Path, format: Format) -> Result<(), String> {
    let blob = FileStore::new(save).read().map_err(|e| e.to_string())?;
    let snapshot = Snapshot::from_blob(&blob).map_err(|e| e.to_string())?;
    let summary = Summary::from_state(&snapshot.state, None);

    print!("{}", render(&summary, format)?);
    Ok(())
}

/// Render a summary in the given format.
pub fn render(summary: &Summary, format: Format) -> Result<String, String> {
    match format {
        Format::Markdown => Ok(summary.export_markdown()),
        Format::Text => Ok(summary.export_text()),
        Format::Json => serde_json::to_string_pretty(summary)
            .map(|json| json + "\n")
            .map_err(|e| format!("JSON serialization error: {e}")),
    }
}
