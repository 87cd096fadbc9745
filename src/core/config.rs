//! Configuration for clustering, tap handling and camera behavior
//!
//! Every struct deserializes with missing fields falling back to the engine
//! defaults from [`crate::core::constants`], so a config file only needs to name
//! what it changes.

use crate::{
    core::{constants::*, geo::LatLng, region::Region},
    spatial::clustering::ClusteringConfig,
    EventMapError, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Timing and presentation of cluster taps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub double_tap_window_ms: u64,
    pub auto_reveal_delay_ms: u64,
    pub reveal_guard_ms: u64,
    /// Cluster taps at or past this zoom reveal members without zooming
    pub reveal_zoom: f64,
    pub list_limit: usize,
    pub title_limit: usize,
    /// Emit a "tap again" hint after the first tap on a cluster
    pub tap_again_hint: bool,
}

impl InteractionConfig {
    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }

    pub fn auto_reveal_delay(&self) -> Duration {
        Duration::from_millis(self.auto_reveal_delay_ms)
    }

    pub fn reveal_guard(&self) -> Duration {
        Duration::from_millis(self.reveal_guard_ms)
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            double_tap_window_ms: DOUBLE_TAP_WINDOW_MS,
            auto_reveal_delay_ms: AUTO_REVEAL_DELAY_MS,
            reveal_guard_ms: REVEAL_GUARD_MS,
            reveal_zoom: REVEAL_ZOOM,
            list_limit: CLUSTER_LIST_LIMIT,
            title_limit: LIST_TITLE_LIMIT,
            tap_again_hint: false,
        }
    }
}

/// Camera spans and animation lengths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub default_center: LatLng,
    pub latitude_delta: f64,
    /// Screen width over height; the default longitude span is derived from it
    pub aspect_ratio: f64,
    pub marker_delta_factor: f64,
    pub focus_delta: f64,
    pub fit_padding_factor: f64,
    pub min_fit_delta: f64,
    pub region_duration_ms: u64,
    pub cluster_duration_ms: u64,
}

impl CameraConfig {
    pub fn longitude_delta(&self) -> f64 {
        self.latitude_delta * self.aspect_ratio
    }

    /// Region shown before anything else is known
    pub fn default_region(&self) -> Region {
        Region::centered(
            self.default_center,
            self.latitude_delta,
            self.longitude_delta(),
        )
    }

    pub fn region_duration(&self) -> Duration {
        Duration::from_millis(self.region_duration_ms)
    }

    pub fn cluster_duration(&self) -> Duration {
        Duration::from_millis(self.cluster_duration_ms)
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            default_center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            latitude_delta: DEFAULT_LATITUDE_DELTA,
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            marker_delta_factor: MARKER_DELTA_FACTOR,
            focus_delta: FOCUS_DELTA,
            fit_padding_factor: FIT_PADDING_FACTOR,
            min_fit_delta: MIN_FIT_DELTA,
            region_duration_ms: REGION_ANIMATION_MS,
            cluster_duration_ms: CLUSTER_ANIMATION_MS,
        }
    }
}

/// Everything the map screen can be tuned with
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventMapConfig {
    pub clustering: ClusteringConfig,
    pub interaction: InteractionConfig,
    pub camera: CameraConfig,
}

impl EventMapConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("loaded map configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.clustering.validate()?;

        let camera = &self.camera;
        if !camera.default_center.is_valid() {
            return Err(EventMapError::InvalidCoordinates(format!(
                "default center {:?}",
                camera.default_center
            )));
        }
        let positive = [
            ("latitude_delta", camera.latitude_delta),
            ("aspect_ratio", camera.aspect_ratio),
            ("marker_delta_factor", camera.marker_delta_factor),
            ("focus_delta", camera.focus_delta),
            ("min_fit_delta", camera.min_fit_delta),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(EventMapError::Config(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if camera.fit_padding_factor < 0.0 {
            return Err(EventMapError::Config(
                "fit_padding_factor must not be negative".to_string(),
            ));
        }
        if self.interaction.list_limit == 0 {
            return Err(EventMapError::Config(
                "list_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
