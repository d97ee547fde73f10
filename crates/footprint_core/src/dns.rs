//! DNS resolver latency results

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::GeoPoint;

/// Latency of a single public resolver answering for the target domain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DnsLatencyResult {
    pub resolver_name: String,
    pub latency_ms: f64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl DnsLatencyResult {
    pub fn coords(&self) -> Option<GeoPoint> {
        GeoPoint::new(self.lat?, self.lon?).ok()
    }
}

/// Resolvers ordered fastest first. Non-finite latencies sort last; ties keep input order.
pub fn rank_resolvers(results: &[DnsLatencyResult]) -> Vec<&DnsLatencyResult> {
    let mut ranked: Vec<&DnsLatencyResult> = results.iter().collect();
    ranked.sort_by(|a, b| {
        match (a.latency_ms.is_finite(), b.latency_ms.is_finite()) {
            (true, true) => a.latency_ms.total_cmp(&b.latency_ms),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
        }
    });
    ranked
}

pub fn fastest_resolver(results: &[DnsLatencyResult]) -> Option<&DnsLatencyResult> {
    rank_resolvers(results)
        .into_iter()
        .next()
        .filter(|r| r.latency_ms.is_finite())
}
