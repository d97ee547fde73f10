//! Server grouping
//!
//! Assets served from the same network address share a map marker. The
//! first asset seen for a server supplies the marker's details.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::isp::IspProvider;
use crate::model::{Asset, GeoPoint};

const UNKNOWN_SERVER: &str = "unknown";

/// A server and the assets it delivered.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerLocation {
    /// Network address, or host name when the address is missing.
    pub key: String,
    pub coords: Option<GeoPoint>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub isp: Option<String>,
    /// Indices into the asset slice this location was built from.
    pub asset_indices: SmallVec<[usize; 4]>,
}

impl ServerLocation {
    fn from_asset(key: String, asset: &Asset) -> Self {
        Self {
            key,
            coords: asset.coords(),
            city: asset.city.clone(),
            country: asset.country.clone(),
            isp: asset.isp.clone(),
            asset_indices: SmallVec::new(),
        }
    }

    pub fn asset_count(&self) -> usize {
        self.asset_indices.len()
    }

    pub fn provider(&self) -> IspProvider {
        IspProvider::classify(self.isp.as_deref())
    }

    /// "City, Country" with placeholders for missing parts.
    pub fn label(&self) -> String {
        format!(
            "{}, {}",
            self.city.as_deref().unwrap_or("Unknown"),
            self.country.as_deref().unwrap_or("Unknown")
        )
    }
}

/// Group assets by server, in order of first appearance.
pub fn group_by_server(assets: &[Asset]) -> Vec<ServerLocation> {
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    let mut locations: Vec<ServerLocation> = Vec::new();

    for (asset_index, asset) in assets.iter().enumerate() {
        let key = [&asset.ip, &asset.domain]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|value| !value.is_empty())
            .unwrap_or(UNKNOWN_SERVER);

        let slot = *index.entry(key).or_insert_with(|| {
            locations.push(ServerLocation::from_asset(key.to_string(), asset));
            locations.len() - 1
        });
        locations[slot].asset_indices.push(asset_index);
    }

    tracing::trace!(
        assets = assets.len(),
        servers = locations.len(),
        "grouped assets by server"
    );
    locations
}

/// Counts shown in the dashboard summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocationSummary {
    pub asset_count: usize,
    pub server_count: usize,
    /// Servers that can be placed on the map.
    pub located_server_count: usize,
}

impl LocationSummary {
    pub fn from_locations(locations: &[ServerLocation]) -> Self {
        Self {
            asset_count: locations.iter().map(ServerLocation::asset_count).sum(),
            server_count: locations.len(),
            located_server_count: locations.iter().filter(|l| l.coords.is_some()).count(),
        }
    }
}

/// Axis-aligned geographic bounding box used for viewport fitting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    pub min: GeoPoint,
    pub max: GeoPoint,
}

impl GeoBounds {
    pub fn from_point(point: GeoPoint) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    pub fn extend(&mut self, point: GeoPoint) {
        self.min.lat = self.min.lat.min(point.lat);
        self.min.lon = self.min.lon.min(point.lon);
        self.max.lat = self.max.lat.max(point.lat);
        self.max.lon = self.max.lon.max(point.lon);
    }

    pub fn from_points(points: impl IntoIterator<Item = GeoPoint>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut bounds = Self::from_point(points.next()?);
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Bounds of every located server plus the viewer's own position.
    pub fn for_locations(locations: &[ServerLocation], origin: Option<GeoPoint>) -> Option<Self> {
        Self::from_points(origin.into_iter().chain(locations.iter().filter_map(|l| l.coords)))
    }

    /// Midpoint of the box, used to centre the map.
    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: (self.min.lat + self.max.lat) / 2.0,
            lon: (self.min.lon + self.max.lon) / 2.0,
        }
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.min.lat..=self.max.lat).contains(&point.lat)
            && (self.min.lon..=self.max.lon).contains(&point.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(ip: Option<&str>, domain: Option<&str>, lat: f64, lon: f64) -> Asset {
        Asset {
            ip: ip.map(str::to_string),
            domain: domain.map(str::to_string),
            city: Some("Ashburn".into()),
            country: Some("United States".into()),
            isp: Some("Amazon.com".into()),
            lat: Some(lat),
            lon: Some(lon),
            ..Default::default()
        }
    }

    #[test]
    fn test_group_by_ip() {
        let assets = vec![
            asset(Some("10.0.0.1"), Some("a.com"), 39.0, -77.5),
            asset(Some("10.0.0.2"), Some("b.com"), 51.5, -0.1),
            asset(Some("10.0.0.1"), Some("c.com"), 39.0, -77.5),
        ];
        let locations = group_by_server(&assets);

        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].key, "10.0.0.1");
        assert_eq!(locations[0].asset_indices.as_slice(), &[0, 2]);
        assert_eq!(locations[1].asset_indices.as_slice(), &[1]);
        assert_eq!(locations[0].provider(), IspProvider::Amazon);
        assert_eq!(locations[0].label(), "Ashburn, United States");
    }

    #[test]
    fn test_group_falls_back_to_domain() {
        let assets = vec![
            asset(None, Some("a.com"), 1.0, 1.0),
            asset(Some(""), Some("a.com"), 1.0, 1.0),
            Asset::default(),
        ];
        let locations = group_by_server(&assets);
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].asset_count(), 2);
        assert_eq!(locations[1].key, UNKNOWN_SERVER);
        assert_eq!(locations[1].coords, None);

        let summary = LocationSummary::from_locations(&locations);
        assert_eq!(summary.asset_count, 3);
        assert_eq!(summary.server_count, 2);
        assert_eq!(summary.located_server_count, 1);
    }

    #[test]
    fn test_bounds_include_origin() {
        let assets = vec![
            asset(Some("1"), None, 39.0, -77.5),
            asset(Some("2"), None, 51.5, -0.1),
        ];
        let locations = group_by_server(&assets);
        let origin = GeoPoint { lat: 11.0, lon: 76.9 };
        let bounds = GeoBounds::for_locations(&locations, Some(origin)).unwrap();

        assert_eq!(bounds.min, GeoPoint { lat: 11.0, lon: -77.5 });
        assert_eq!(bounds.max, GeoPoint { lat: 51.5, lon: 76.9 });
        assert!(bounds.contains(origin));
        assert!(GeoBounds::for_locations(&[], None).is_none());
    }
}
