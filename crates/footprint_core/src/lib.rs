//! Footprint Core
//!
//! Data model shared by the footprint dashboard crates: the live analysis
//! document, discovered assets, resolver latency results, and the derived
//! server groupings used by the map views.
//!
//! # Features
//!
//! - **Snapshots**: `AnalysisDocument` is always a full replacement payload
//! - **Assets**: optional coordinates, load timing and network metadata
//! - **Locations**: assets grouped per server with viewport bounds
//! - **Providers**: ISP classification and display colours

pub mod dns;
pub mod error;
pub mod isp;
pub mod locations;
pub mod model;
pub mod status;

pub use dns::{fastest_resolver, rank_resolvers, DnsLatencyResult};
pub use error::{CoreError, Result};
pub use isp::IspProvider;
pub use locations::{group_by_server, GeoBounds, LocationSummary, ServerLocation};
pub use model::{AnalysisDocument, Asset, GeoPoint};
pub use status::AnalysisStatus;
