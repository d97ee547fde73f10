//! Analysis status strings
//!
//! The orchestrator reports progress as free-form strings such as
//! `"starting"` or `"found_12_assets"`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Progress of an analysis task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnalysisStatus {
    Starting,
    Running,
    /// Asset discovery finished with this many assets.
    FoundAssets(usize),
    Completed,
    Error,
    /// Any status the dashboard does not recognise.
    Other(String),
}

impl AnalysisStatus {
    /// Parse a raw status string.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "starting" => Self::Starting,
            "running" => Self::Running,
            "completed" => Self::Completed,
            "error" => Self::Error,
            _ => raw
                .strip_prefix("found_")
                .and_then(|rest| rest.strip_suffix("_assets"))
                .and_then(|count| count.parse().ok())
                .map(Self::FoundAssets)
                .unwrap_or_else(|| Self::Other(raw.to_string())),
        }
    }

    /// Completed or failed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// The wire form of this status.
    pub fn as_wire(&self) -> String {
        match self {
            Self::Starting => "starting".to_string(),
            Self::Running => "running".to_string(),
            Self::FoundAssets(n) => format!("found_{n}_assets"),
            Self::Completed => "completed".to_string(),
            Self::Error => "error".to_string(),
            Self::Other(raw) => raw.clone(),
        }
    }
}

impl From<String> for AnalysisStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<AnalysisStatus> for String {
    fn from(status: AnalysisStatus) -> Self {
        status.as_wire()
    }
}

/// Human-readable progress line.
impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FoundAssets(n) => write!(f, "Analyzing {n} assets..."),
            Self::Completed => write!(f, "Analysis Complete!"),
            Self::Error => write!(f, "An error occurred."),
            other => {
                let raw = other.as_wire();
                let mut chars = raw.chars();
                match chars.next() {
                    Some(first) => write!(f, "{}{}...", first.to_uppercase(), chars.as_str()),
                    None => Ok(()),
                }
            }
        }
    }
}
