use crate::{
    core::{
        camera::CameraController, config::EventMapConfig, geo::LatLng, region::Region,
    },
    data::{
        event::Event,
        filter::EventFilter,
        loader::{EventLoader, EventSource, LoadOutcome},
    },
    directions::{directions_links, DirectionsLink, Platform},
    input::{ClusterTap, InteractionController, MapAction, MapAlert},
    location::{LocationProvider, PermissionStatus},
    spatial::clustering::{ClusterFeature, ClusterId, Clustering},
    Result,
};
use instant::Instant;
use std::sync::Arc;

/// The events map screen.
///
/// Owns the loaded events, the active filter, the clustering of the filtered
/// set and the tap state machine. A rendering surface feeds it viewport changes
/// and taps, then carries out the returned [`MapAction`]s.
pub struct EventMap {
    config: EventMapConfig,
    loader: EventLoader,
    location: Option<Arc<dyn LocationProvider>>,
    events: Vec<Event>,
    source: Option<EventSource>,
    filter: EventFilter,
    filtered: Vec<Event>,
    region: Region,
    /// Set once the surface reports a settled viewport
    region_settled: bool,
    clustering: Clustering<Event>,
    interaction: InteractionController,
    permission: PermissionStatus,
    user_location: Option<LatLng>,
}

impl EventMap {
    pub(crate) fn from_parts(
        config: EventMapConfig,
        loader: EventLoader,
        location: Option<Arc<dyn LocationProvider>>,
        region: Region,
        interaction: InteractionController,
    ) -> Result<Self> {
        let clustering = Clustering::new(config.clustering.clone())?;
        Ok(Self {
            config,
            loader,
            location,
            events: Vec::new(),
            source: None,
            filter: EventFilter::default(),
            filtered: Vec::new(),
            region,
            region_settled: false,
            clustering,
            interaction,
            permission: PermissionStatus::Undetermined,
            user_location: None,
        })
    }

    /// Loads events for the first time
    pub async fn load_events(&mut self) -> EventSource {
        let outcome = self.loader.load(&[]).await;
        self.apply_outcome(outcome)
    }

    /// Reloads events, keeping the current ones if the store fails
    pub async fn refresh_events(&mut self) -> EventSource {
        let outcome = self.loader.load(&self.events).await;
        self.apply_outcome(outcome)
    }

    fn apply_outcome(&mut self, outcome: LoadOutcome) -> EventSource {
        log::info!(
            "showing {} events from {:?}",
            outcome.events.len(),
            outcome.source
        );
        self.source = Some(outcome.source);
        self.set_events(outcome.events);
        outcome.source
    }

    /// Replaces the event set and reclusters
    pub fn set_events(&mut self, events: Vec<Event>) {
        self.events = events;
        self.apply_filter();
    }

    /// Asks for location permission and reads the device position.
    ///
    /// A refusal yields one informational alert. Position errors are logged and
    /// the map carries on without user centering.
    pub async fn init_location(&mut self) -> Vec<MapAction> {
        let Some(provider) = self.location.clone() else {
            return Vec::new();
        };

        self.permission = match provider.request_permission().await {
            Ok(status) => status,
            Err(e) => {
                log::error!("requesting location permission failed: {}", e);
                return Vec::new();
            }
        };

        if !self.permission.is_granted() {
            log::info!("location permission {:?}", self.permission);
            return vec![MapAction::ShowAlert(MapAlert::LocationPermission)];
        }

        match provider.current_position().await {
            Ok(position) => {
                log::debug!("user location {:?}", position);
                self.user_location = Some(position);
                if self.region_settled {
                    return Vec::new();
                }
                let command = self.interaction.camera().to_user_location(position);
                self.region = command.region;
                vec![MapAction::AnimateCamera(command)]
            }
            Err(e) => {
                log::error!("reading the device location failed: {}", e);
                Vec::new()
            }
        }
    }

    pub fn set_filter(&mut self, filter: EventFilter) {
        self.filter = filter;
        self.apply_filter();
    }

    fn apply_filter(&mut self) {
        self.filtered = self.filter.apply(&self.events);
        self.clustering
            .load(self.filtered.iter().filter_map(Event::to_spatial_item));
        log::debug!(
            "{} of {} events pass the filter",
            self.filtered.len(),
            self.events.len()
        );
    }

    /// Records the viewport the map settled on
    pub fn on_region_change_complete(&mut self, region: Region) {
        if !region.is_valid() {
            log::warn!("ignoring invalid region {:?}", region);
            return;
        }
        self.region = region;
        self.region_settled = true;
    }

    /// Clusters and single markers for the current viewport
    pub fn features(&mut self) -> Vec<ClusterFeature<Event>> {
        let bounds = self.region.bounds();
        self.clustering.get_clusters(&bounds, self.region.zoom())
    }

    pub fn on_marker_press(&mut self, event_id: &str) -> Vec<MapAction> {
        match self.filtered.iter().find(|event| event.id == event_id) {
            Some(event) => self.interaction.on_marker_press(event),
            None => {
                log::warn!("marker press for unknown event {}", event_id);
                Vec::new()
            }
        }
    }

    pub fn on_cluster_press(&mut self, id: ClusterId) -> Vec<MapAction> {
        let (Some(cluster), Some(leaves)) = (self.clustering.cluster(id), self.clustering.leaves(id))
        else {
            log::warn!("press on unknown cluster {}", id);
            return Vec::new();
        };
        let tap = ClusterTap {
            id,
            coordinates: cluster.coordinates(),
            members: leaves.into_iter().map(|leaf| leaf.data.clone()).collect(),
        };
        self.interaction.on_cluster_press(tap, &self.region)
    }

    /// Fires due timers
    pub fn tick(&mut self) -> Vec<MapAction> {
        self.interaction.tick()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.interaction.next_deadline()
    }

    pub fn center_on_user_location(&self) -> Vec<MapAction> {
        match self.user_location {
            Some(position) => vec![MapAction::AnimateCamera(
                self.interaction.camera().to_user_location(position),
            )],
            None if !self.permission.is_granted() => {
                vec![MapAction::ShowAlert(MapAlert::LocationUnavailable)]
            }
            None => Vec::new(),
        }
    }

    /// Fits every filtered event into view
    pub fn center_on_events(&self) -> Vec<MapAction> {
        self.interaction
            .camera()
            .fit_events(&self.filtered)
            .map(MapAction::AnimateCamera)
            .into_iter()
            .collect()
    }

    /// Selects an event opened from another screen and zooms close to it
    pub fn focus_event(&mut self, event: Event) -> Vec<MapAction> {
        let command = self.camera().focus_event(&event);
        let mut actions = self.interaction.select(event);
        actions.extend(command.map(MapAction::AnimateCamera));
        actions
    }

    /// Selects an event picked from a cluster listing
    pub fn select_event(&mut self, event_id: &str) -> Vec<MapAction> {
        match self.events.iter().find(|event| event.id == event_id) {
            Some(event) => self.interaction.select(event.clone()),
            None => {
                log::warn!("cannot select unknown event {}", event_id);
                Vec::new()
            }
        }
    }

    pub fn dismiss(&mut self) {
        self.interaction.dismiss();
    }

    pub fn selected(&self) -> Option<&Event> {
        self.interaction.selected()
    }

    /// Directions links to the selected event, best app first
    pub fn directions_for_selected(
        &self,
        platform: Platform,
    ) -> std::result::Result<Vec<DirectionsLink>, MapAlert> {
        let event = self.selected().ok_or(MapAlert::NoEventSelected)?;
        let destination = event.position().ok_or(MapAlert::NoDestination)?;
        Ok(directions_links(platform, destination))
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn filtered_events(&self) -> &[Event] {
        &self.filtered
    }

    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    pub fn event_source(&self) -> Option<EventSource> {
        self.source
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn user_location(&self) -> Option<LatLng> {
        self.user_location
    }

    pub fn permission(&self) -> PermissionStatus {
        self.permission
    }

    pub fn config(&self) -> &EventMapConfig {
        &self.config
    }

    pub fn camera(&self) -> &CameraController {
        self.interaction.camera()
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn clustering(&self) -> &Clustering<Event> {
        &self.clustering
    }
}
