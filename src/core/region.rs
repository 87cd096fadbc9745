use crate::core::geo::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};

/// Visible area of the map: a center plus the latitude/longitude span around it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    pub fn new(latitude: f64, longitude: f64, latitude_delta: f64, longitude_delta: f64) -> Self {
        Self {
            latitude,
            longitude,
            latitude_delta,
            longitude_delta,
        }
    }

    /// Creates a region centered on a coordinate
    pub fn centered(center: LatLng, latitude_delta: f64, longitude_delta: f64) -> Self {
        Self::new(center.lat, center.lng, latitude_delta, longitude_delta)
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Continuous zoom implied by the longitude span: `log2(360 / longitude_delta)`
    pub fn zoom(&self) -> f64 {
        if self.longitude_delta <= 0.0 || !self.longitude_delta.is_finite() {
            return f64::INFINITY;
        }
        (360.0 / self.longitude_delta).log2()
    }

    /// Zoom rounded to the nearest whole level
    pub fn zoom_level(&self) -> f64 {
        self.zoom().round()
    }

    /// Visible bounding box: center plus/minus half the span on each axis
    pub fn bounds(&self) -> LatLngBounds {
        let half_lat = self.latitude_delta / 2.0;
        let half_lng = self.longitude_delta / 2.0;
        LatLngBounds::from_coords(
            self.latitude - half_lat,
            self.longitude - half_lng,
            self.latitude + half_lat,
            self.longitude + half_lng,
        )
    }

    /// Same center with both spans divided by `factor`
    pub fn zoomed_in(&self, factor: f64) -> Self {
        Self::new(
            self.latitude,
            self.longitude,
            self.latitude_delta / factor,
            self.longitude_delta / factor,
        )
    }

    /// Same spans around a new center
    pub fn recentered(&self, center: LatLng) -> Self {
        Self::centered(center, self.latitude_delta, self.longitude_delta)
    }

    pub fn contains(&self, point: &LatLng) -> bool {
        self.bounds().contains(point)
    }

    pub fn is_valid(&self) -> bool {
        self.center().is_valid()
            && self.latitude_delta.is_finite()
            && self.longitude_delta.is_finite()
            && self.latitude_delta > 0.0
            && self.longitude_delta > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_from_longitude_delta() {
        let region = Region::new(38.72, -9.14, 0.35, 360.0 / 1024.0);
        assert!((region.zoom() - 10.0).abs() < 1e-9);
        assert_eq!(region.zoom_level(), 10.0);

        let region = Region::new(0.0, 0.0, 1.0, 360.0 / 2f64.powf(9.6));
        assert_eq!(region.zoom_level(), 10.0);
    }

    #[test]
    fn test_degenerate_delta_is_max_zoom() {
        let region = Region::new(0.0, 0.0, 0.0, 0.0);
        assert!(region.zoom().is_infinite());
        assert!(!region.is_valid());
    }

    #[test]
    fn test_bounds_from_region() {
        let region = Region::new(38.73, -9.29, 0.06, 0.32);
        let bounds = region.bounds();
        assert!((bounds.south() - 38.70).abs() < 1e-9);
        assert!((bounds.north() - 38.76).abs() < 1e-9);
        assert!((bounds.west() + 9.45).abs() < 1e-9);
        assert!((bounds.east() + 9.13).abs() < 1e-9);
        assert!(region.contains(&LatLng::new(38.73, -9.29)));
    }

    #[test]
    fn test_zoomed_in() {
        let region = Region::new(38.72, -9.14, 0.4, 0.2);
        let zoomed = region.zoomed_in(4.0);
        assert_eq!(zoomed.center(), region.center());
        assert!((zoomed.latitude_delta - 0.1).abs() < 1e-12);
        assert!((zoomed.longitude_delta - 0.05).abs() < 1e-12);
        assert!((zoomed.zoom() - region.zoom() - 2.0).abs() < 1e-9);
    }
}
