//! Deep links that open turn-by-turn directions in an external maps app.

use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Web,
}

/// Supported maps apps, in order of preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MapsApp {
    GoogleMaps,
    Waze,
    AppleMaps,
}

impl MapsApp {
    pub const ALL: [MapsApp; 3] = [MapsApp::GoogleMaps, MapsApp::Waze, MapsApp::AppleMaps];

    pub fn name(&self) -> &'static str {
        match self {
            MapsApp::GoogleMaps => "Google Maps",
            MapsApp::Waze => "Waze",
            MapsApp::AppleMaps => "Apple Maps",
        }
    }

    /// Directions URL for this app on `platform`, if the app exists there
    pub fn url(&self, platform: Platform, destination: LatLng) -> Option<String> {
        let (lat, lng) = (destination.lat, destination.lng);
        let url = match (self, platform) {
            (MapsApp::GoogleMaps, Platform::Ios) => {
                format!("comgooglemaps://?daddr={},{}&directionsmode=driving", lat, lng)
            }
            (MapsApp::GoogleMaps, Platform::Android) => format!("google.navigation:q={},{}", lat, lng),
            (MapsApp::GoogleMaps, Platform::Web) => web_directions_url(destination),
            (MapsApp::Waze, Platform::Ios | Platform::Android) => {
                format!("waze://?ll={},{}&navigate=yes", lat, lng)
            }
            (MapsApp::Waze, Platform::Web) => {
                format!("https://waze.com/ul?ll={},{}&navigate=yes", lat, lng)
            }
            (MapsApp::AppleMaps, Platform::Ios) => {
                format!("http://maps.apple.com/?daddr={},{}&dirflg=d", lat, lng)
            }
            (MapsApp::AppleMaps, _) => return None,
        };
        Some(url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionsLink {
    pub app: MapsApp,
    pub url: String,
}

/// Every app link usable on `platform`, best first.
///
/// Whether an app is actually installed is for the host to check. On native
/// platforms the Google Maps web URL comes last, for when no app opens.
pub fn directions_links(platform: Platform, destination: LatLng) -> Vec<DirectionsLink> {
    let mut links: Vec<DirectionsLink> = MapsApp::ALL
        .iter()
        .filter_map(|app| {
            app.url(platform, destination)
                .map(|url| DirectionsLink { app: *app, url })
        })
        .collect();
    if platform != Platform::Web {
        links.push(DirectionsLink {
            app: MapsApp::GoogleMaps,
            url: web_directions_url(destination),
        });
    }
    links
}

/// Google Maps directions in the browser
pub fn web_directions_url(destination: LatLng) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}&travelmode=driving",
        destination.lat, destination.lng
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PORTO: LatLng = LatLng {
        lat: 41.1579,
        lng: -8.6291,
    };

    #[test]
    fn test_ios_links_in_priority_order() {
        let links = directions_links(Platform::Ios, PORTO);
        let apps: Vec<MapsApp> = links.iter().map(|l| l.app).collect();
        assert_eq!(
            apps,
            vec![
                MapsApp::GoogleMaps,
                MapsApp::Waze,
                MapsApp::AppleMaps,
                MapsApp::GoogleMaps
            ]
        );
        assert_eq!(
            links[0].url,
            "comgooglemaps://?daddr=41.1579,-8.6291&directionsmode=driving"
        );
        assert_eq!(links[2].url, "http://maps.apple.com/?daddr=41.1579,-8.6291&dirflg=d");
    }

    #[test]
    fn test_android_has_no_apple_maps() {
        let links = directions_links(Platform::Android, PORTO);
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].url, "google.navigation:q=41.1579,-8.6291");
        assert_eq!(links[1].url, "waze://?ll=41.1579,-8.6291&navigate=yes");
        assert_eq!(links[2].url, web_directions_url(PORTO));
    }

    #[test]
    fn test_web_fallback() {
        assert_eq!(
            web_directions_url(PORTO),
            "https://www.google.com/maps/dir/?api=1&destination=41.1579,-8.6291&travelmode=driving"
        );
        let links = directions_links(Platform::Web, PORTO);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url, web_directions_url(PORTO));

        for platform in [Platform::Ios, Platform::Android, Platform::Web] {
            let links = directions_links(platform, PORTO);
            assert!(links.iter().any(|l| l.url == web_directions_url(PORTO)));
        }
    }
}
