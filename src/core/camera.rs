use crate::{
    core::{config::CameraConfig, geo::LatLng, geo::LatLngBounds, region::Region},
    data::event::Event,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Animate the map to `region` over `duration`. Fire and forget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraCommand {
    pub region: Region,
    pub duration: Duration,
}

impl CameraCommand {
    pub fn new(region: Region, duration: Duration) -> Self {
        Self { region, duration }
    }
}

/// How far a tap on a cluster of `count` points zooms in.
/// Small clusters get a bigger jump so they split on the first tap.
pub fn zoom_factor(count: usize) -> f64 {
    match count {
        0..=3 => 4.0,
        4..=10 => 3.0,
        _ => 2.0,
    }
}

/// Computes camera regions for every kind of map movement
#[derive(Debug, Clone, Default)]
pub struct CameraController {
    config: CameraConfig,
}

impl CameraController {
    pub fn new(config: CameraConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn default_region(&self) -> Region {
        self.config.default_region()
    }

    /// Tight region around a tapped marker
    pub fn to_event(&self, event: &Event) -> Option<CameraCommand> {
        let position = event.position()?;
        Some(self.to_point(position, self.config.marker_delta_factor))
    }

    fn to_point(&self, position: LatLng, factor: f64) -> CameraCommand {
        let region = Region::centered(
            position,
            self.config.latitude_delta * factor,
            self.config.longitude_delta() * factor,
        );
        CameraCommand::new(region, self.config.region_duration())
    }

    /// Close-up on an event opened from elsewhere in the app
    pub fn focus_event(&self, event: &Event) -> Option<CameraCommand> {
        let position = event.position()?;
        let delta = self.config.focus_delta;
        Some(CameraCommand::new(
            Region::centered(position, delta, delta),
            self.config.region_duration(),
        ))
    }

    /// Zoom into a tapped cluster, relative to the region on screen
    pub fn to_cluster(&self, center: LatLng, current: &Region, count: usize) -> CameraCommand {
        let region = current.recentered(center).zoomed_in(zoom_factor(count));
        CameraCommand::new(region, self.config.cluster_duration())
    }

    /// Region showing every located event, or `None` if there is none
    pub fn fit_events(&self, events: &[Event]) -> Option<CameraCommand> {
        let positions: Vec<LatLng> = events.iter().filter_map(Event::position).collect();
        let bounds = LatLngBounds::from_points(&positions)?;
        let span = bounds.span();
        let padding = 1.0 + self.config.fit_padding_factor;
        let region = Region::centered(
            bounds.center(),
            (span.lat * padding).max(self.config.min_fit_delta),
            (span.lng * padding).max(self.config.min_fit_delta),
        );
        Some(CameraCommand::new(region, self.config.region_duration()))
    }

    /// Default-sized region around the user
    pub fn to_user_location(&self, location: LatLng) -> CameraCommand {
        self.to_point(location, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_zoom_factor() {
        assert_eq!(zoom_factor(2), 4.0);
        assert_eq!(zoom_factor(3), 4.0);
        assert_eq!(zoom_factor(7), 3.0);
        assert_eq!(zoom_factor(10), 3.0);
        assert_eq!(zoom_factor(11), 2.0);
        assert_eq!(zoom_factor(20), 2.0);
    }

    #[test]
    fn test_fit_events() {
        let camera = CameraController::default();
        let events = vec![
            Event::new("a", "A").at(38.70, -9.45),
            Event::new("b", "B").at(38.76, -9.13),
            Event::new("c", "no position"),
        ];
        let command = camera.fit_events(&events).unwrap();
        assert!(approx(command.region.latitude, 38.73));
        assert!(approx(command.region.longitude, -9.29));
        assert!(approx(command.region.latitude_delta, 0.06 * 1.2));
        assert!(approx(command.region.longitude_delta, 0.32 * 1.2));
        assert!(command.region.latitude_delta >= 0.02);
        assert_eq!(command.duration, Duration::from_millis(1000));
    }

    #[test]
    fn test_fit_single_event_uses_min_delta() {
        let camera = CameraController::default();
        let command = camera
            .fit_events(&[Event::new("a", "A").at(41.1579, -8.6291)])
            .unwrap();
        assert_eq!(command.region.latitude_delta, 0.02);
        assert_eq!(command.region.longitude_delta, 0.02);
        assert!(camera.fit_events(&[]).is_none());
    }

    #[test]
    fn test_to_event_uses_half_default_delta() {
        let camera = CameraController::default();
        let command = camera.to_event(&Event::new("a", "A").at(38.7589, -9.1507)).unwrap();
        assert_eq!(command.region.center(), LatLng::new(38.7589, -9.1507));
        assert!(approx(command.region.latitude_delta, 0.0922 * 0.5));
        assert_eq!(command.duration, Duration::from_millis(1000));
        assert!(camera.to_event(&Event::new("b", "B")).is_none());
    }

    #[test]
    fn test_focus_event() {
        let camera = CameraController::default();
        let command = camera.focus_event(&Event::new("a", "A").at(38.7, -9.1)).unwrap();
        assert_eq!(command.region.latitude_delta, 0.01);
        assert_eq!(command.region.longitude_delta, 0.01);
    }

    #[test]
    fn test_to_cluster_divides_current_delta() {
        let camera = CameraController::default();
        let current = Region::new(38.7, -9.1, 0.4, 0.2);
        let command = camera.to_cluster(LatLng::new(38.72, -9.14), &current, 3);
        assert_eq!(command.region.center(), LatLng::new(38.72, -9.14));
        assert!(approx(command.region.latitude_delta, 0.1));
        assert!(approx(command.region.longitude_delta, 0.05));
        assert_eq!(command.duration, Duration::from_millis(500));
    }
}
