//! Headless event map driver
//!
//! Loads events, prints what the map would render for a region, then taps the
//! biggest cluster and lets the auto-reveal fire.
//!
//! Usage:
//!   eventmap-app --events events.json --latitude 38.72 --longitude -9.14

use anyhow::{Context, Result};
use clap::Parser;
use eventmap::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Drive the event map without a screen")]
struct Args {
    /// JSON array of events to serve from memory
    #[arg(long, value_name = "FILE", conflicts_with = "url")]
    events: Option<PathBuf>,

    /// Fetch events from this URL instead
    #[arg(long)]
    url: Option<String>,

    /// Map configuration JSON
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, allow_hyphen_values = true)]
    latitude: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// Longitude span of the visible region, in degrees
    #[arg(long, default_value_t = 0.35)]
    longitude_delta: f64,

    /// Only show events in this category (repeatable)
    #[arg(long)]
    category: Vec<String>,

    /// Free-text search over title, description, address and organizer
    #[arg(long)]
    query: Option<String>,

    /// Platform to build directions links for
    #[arg(long, value_parser = parse_platform, default_value = "android")]
    platform: Platform,
}

fn parse_platform(value: &str) -> std::result::Result<Platform, String> {
    match value.to_lowercase().as_str() {
        "ios" => Ok(Platform::Ios),
        "android" => Ok(Platform::Android),
        "web" => Ok(Platform::Web),
        other => Err(format!("unknown platform {other}")),
    }
}

/// Surface that writes every action to the log
struct LoggingSurface;

impl MapSurface for LoggingSurface {
    fn animate_to_region(&mut self, command: &CameraCommand) {
        let region = command.region;
        log::info!(
            "camera -> ({:.5}, {:.5}) span {:.4}x{:.4} over {}ms (zoom {:.1})",
            region.latitude,
            region.longitude,
            region.latitude_delta,
            region.longitude_delta,
            command.duration.as_millis(),
            region.zoom()
        );
    }

    fn show_event(&mut self, event: &Event) {
        log::info!(
            "selected {} [{}] {} - {}",
            event.id,
            event.category,
            event.title,
            event.formatted_price()
        );
    }

    fn show_cluster_list(&mut self, listing: &ClusterListing) {
        log::info!("{}: {}", listing.title, listing.message);
        for entry in &listing.entries {
            log::info!("  - {} ({})", entry.label, entry.event_id);
        }
        if let Some(view_all) = &listing.view_all {
            log::info!("  - {}", view_all.label);
        }
    }

    fn show_alert(&mut self, alert: MapAlert) {
        log::warn!("{}: {}", alert.title(), alert.message());
    }

    fn show_hint(&mut self, hint: &str) {
        log::info!("hint: {}", hint);
    }
}

fn store_from_args(args: &Args) -> Result<Arc<dyn EventStore>> {
    if let Some(url) = &args.url {
        return Ok(Arc::new(HttpEventStore::new(url.clone())?));
    }
    let events = match &args.events {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading events from {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("parsing events from {}", path.display()))?
        }
        None => Vec::new(),
    };
    Ok(Arc::new(MemoryEventStore::new(events)))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut builder = EventMapBuilder::new(store_from_args(&args)?);
    if let Some(path) = &args.config {
        builder = builder.config(
            EventMapConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
        );
    }
    let mut map = builder.build()?;
    let mut surface = LoggingSurface;

    let source = map.load_events().await;
    log::info!("{} events loaded ({:?})", map.events().len(), source);

    let mut filter = EventFilter::new();
    for category in &args.category {
        filter.toggle_category(category);
    }
    if let Some(query) = &args.query {
        filter.query = query.clone();
    }
    map.set_filter(filter);

    let default_region = *map.region();
    let latitude = args.latitude.unwrap_or(default_region.latitude);
    let longitude = args.longitude.unwrap_or(default_region.longitude);
    let aspect = map.config().camera.aspect_ratio;
    map.on_region_change_complete(Region::new(
        latitude,
        longitude,
        args.longitude_delta / aspect,
        args.longitude_delta,
    ));

    let features = map.features();
    log::info!(
        "{} features at zoom {:.1}",
        features.len(),
        map.region().zoom()
    );
    for feature in &features {
        let at = feature.coordinates();
        match feature {
            ClusterFeature::Cluster { id, point_count, .. } => {
                log::info!("  cluster {} of {} at ({:.5}, {:.5})", id, point_count, at.lat, at.lng)
            }
            ClusterFeature::Point { item, .. } => {
                log::info!(
                    "  {} at ({:.5}, {:.5}) color {}",
                    item.data.title,
                    at.lat,
                    at.lng,
                    marker_color(&item.data.category)
                )
            }
        }
    }

    let biggest = features
        .iter()
        .filter_map(|f| f.cluster_id().map(|id| (id, f.point_count())))
        .max_by_key(|(_, count)| *count);

    match biggest {
        Some((id, _)) => {
            dispatch(&mut surface, &map.on_cluster_press(id));
            drain_deadlines(&mut map, &mut surface).await;
        }
        None => {
            let first = features.iter().find_map(|f| f.item().map(|i| i.id.clone()));
            if let Some(id) = first {
                dispatch(&mut surface, &map.on_marker_press(&id));
            }
        }
    }

    if map.selected().is_none() {
        if let Some(id) = map.filtered_events().first().map(|e| e.id.clone()) {
            dispatch(&mut surface, &map.select_event(&id));
        }
    }

    match map.directions_for_selected(args.platform) {
        Ok(links) => {
            for link in links {
                log::info!("directions via {}: {}", link.app.name(), link.url);
            }
        }
        Err(alert) => surface.show_alert(alert),
    }

    dispatch(&mut surface, &map.center_on_events());
    Ok(())
}
