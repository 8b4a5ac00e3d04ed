//! Configuration for a story session.

use std::fmt;
use std::str::FromStr;

/// Where a restored session picks up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResumePolicy {
    /// Resume at the scene recorded in the save.
    #[default]
    Recorded,
    /// Keep the restored attributes and history but replay from the entry
    /// scene, as the first release of the game did.
    Start,
}

impl fmt::Display for ResumePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recorded => write!(f, "recorded"),
            Self::Start => write!(f, "start"),
        }
    }
}

impl FromStr for ResumePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recorded" | "last" | "scene" => Ok(Self::Recorded),
            "start" | "wake" | "beginning" => Ok(Self::Start),
            other => Err(format!("unknown resume policy '{other}', use: recorded, start")),
        }
    }
}

/// Configuration for a story session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// How `restore` chooses the scene to resume at.
    pub resume_policy: ResumePolicy,
}

impl SessionConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resume policy.
    pub fn with_resume_policy(mut self, policy: ResumePolicy) -> Self {
        self.resume_policy = policy;
        self
    }
}
