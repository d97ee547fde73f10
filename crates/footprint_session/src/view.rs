//! Dashboard view modes

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the current analysis is visualised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// One marker per server with route lines from the viewer.
    #[default]
    Markers,
    /// Asset density heat layer.
    Heatmap,
    /// Animated replay of the page load.
    Journey,
    /// Resolver latency comparison.
    DnsLatency,
}

impl ViewMode {
    /// Whether this view owns a playback timeline.
    pub fn has_playback(self) -> bool {
        self == ViewMode::Journey
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewMode::Markers => "markers",
            ViewMode::Heatmap => "heatmap",
            ViewMode::Journey => "journey",
            ViewMode::DnsLatency => "dns_latency",
        })
    }
}
