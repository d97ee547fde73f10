//! Snapshot summary output

use anyhow::Result;
use footprint_core::{group_by_server, rank_resolvers, AnalysisDocument, GeoBounds, LocationSummary};
use footprint_timeline::build_timeline;

use crate::config::FootprintConfig;

const ASSETS_PER_SERVER: usize = 5;

pub fn print(document: &AnalysisDocument, config: &FootprintConfig) -> Result<()> {
    let status = document
        .status
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "Unknown status".to_string());
    println!("{status}");
    if let Some(target) = &document.target_url {
        println!("Target: {target}");
    }
    if let Some(error) = &document.error_message {
        println!("Error: {error}");
    }
    println!("View: {}", config.view.default_mode);

    let locations = group_by_server(&document.assets);
    let summary = LocationSummary::from_locations(&locations);
    println!(
        "\n{} Assets from {} Servers ({} on map)",
        summary.asset_count, summary.server_count, summary.located_server_count
    );

    for location in &locations {
        let provider = location.provider();
        println!(
            "\n{}  [{} {}]",
            location.label(),
            provider.label(),
            provider.color()
        );
        if let Some(isp) = &location.isp {
            println!("  {isp}");
        }
        for &index in location.asset_indices.iter().take(ASSETS_PER_SERVER) {
            let asset = &document.assets[index];
            println!(
                "  {:<14} {}",
                asset.kind.as_deref().unwrap_or("Unknown"),
                asset.url.as_deref().unwrap_or("-")
            );
        }
        if location.asset_count() > ASSETS_PER_SERVER {
            println!("  ...and {} more", location.asset_count() - ASSETS_PER_SERVER);
        }
    }

    let origin = config.origin_point()?;
    if let Some(bounds) = GeoBounds::for_locations(&locations, Some(origin)) {
        let center = bounds.center();
        println!(
            "\nViewport: ({:.2}, {:.2}) to ({:.2}, {:.2}), centred on ({:.2}, {:.2})",
            bounds.min.lat, bounds.min.lon, bounds.max.lat, bounds.max.lon, center.lat, center.lon
        );
    }

    let timeline = build_timeline(&document.assets);
    println!(
        "Journey: {} events over {:.0}ms ({} assets without timing or location)",
        timeline.len(),
        timeline.duration_ms(),
        timeline.excluded_assets()
    );

    let resolvers = rank_resolvers(&document.dns_latency_results);
    if !resolvers.is_empty() {
        println!("\nDNS resolvers (fastest first):");
        for result in resolvers {
            println!("  {:<24} {:>8.1}ms", result.resolver_name, result.latency_ms);
        }
    }

    Ok(())
}
