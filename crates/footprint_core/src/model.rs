//! Analysis document and asset records.
//!
//! These mirror the JSON shape written by the analysis orchestrator. Every
//! field is optional on the wire; accessors below apply the validation the
//! dashboard relies on (finite coordinates, finite timestamps).

use serde::{Deserialize, Serialize};

use crate::dns::DnsLatencyResult;
use crate::error::{CoreError, Result};
use crate::status::AnalysisStatus;

/// A geographic point in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        if !valid {
            return Err(CoreError::InvalidCoordinates { lat, lon });
        }
        Ok(Self { lat, lon })
    }
}

/// A discovered network resource.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Asset {
    /// Resource URL.
    pub url: Option<String>,
    /// Host name the resource was served from.
    pub domain: Option<String>,
    /// Asset kind ("Script", "Stylesheet", "Image/Media", ...).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Resolved network address.
    pub ip: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    /// Owning network.
    pub isp: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Load start, in milliseconds.
    pub load_start_time: Option<f64>,
    /// Load end, in milliseconds.
    pub load_end_time: Option<f64>,
    /// Load duration, in milliseconds. Used when no end time is present.
    pub load_duration: Option<f64>,
}

impl Asset {
    /// Geographic point, present only when both coordinates are valid.
    pub fn coords(&self) -> Option<GeoPoint> {
        GeoPoint::new(self.lat?, self.lon?).ok()
    }

    /// Load start time, if finite.
    pub fn start_time(&self) -> Option<f64> {
        self.load_start_time.filter(|t| t.is_finite())
    }

    /// Load end time: the explicit end, or start plus duration.
    ///
    /// Absent when the start time is absent, even if an end is recorded.
    pub fn end_time(&self) -> Option<f64> {
        let start = self.start_time()?;
        if let Some(end) = self.load_end_time.filter(|t| t.is_finite()) {
            return Some(end);
        }
        self.load_duration
            .filter(|d| d.is_finite())
            .map(|d| start + d)
    }

    /// Network address, host name or URL, whichever is first non-empty.
    pub fn correlation_key(&self) -> Option<&str> {
        [&self.ip, &self.domain, &self.url]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|value| !value.is_empty())
    }
}

/// Full snapshot of an analysis as published by the document store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDocument {
    pub status: Option<AnalysisStatus>,
    pub target_url: Option<String>,
    /// Discovered assets. Older documents store these under `locations`.
    #[serde(alias = "locations")]
    pub assets: Vec<Asset>,
    pub dns_latency_results: Vec<DnsLatencyResult>,
    pub status_supply_chain: Option<AnalysisStatus>,
    pub status_dns_latency: Option<AnalysisStatus>,
    pub error_message: Option<String>,
}

impl AnalysisDocument {
    /// Parse a snapshot from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the snapshot to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Whether every analysis task has reached a terminal status.
    pub fn is_finished(&self) -> bool {
        let terminal = |s: &Option<AnalysisStatus>| s.as_ref().is_some_and(|s| s.is_terminal());
        if terminal(&self.status) {
            return true;
        }
        terminal(&self.status_supply_chain) && terminal(&self.status_dns_latency)
    }

    /// Number of assets that carry usable coordinates.
    pub fn located_asset_count(&self) -> usize {
        self.assets.iter().filter(|a| a.coords().is_some()).count()
    }
}
