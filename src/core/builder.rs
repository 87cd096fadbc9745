//! Fluent construction of [`EventMap`] instances

use crate::{
    core::{
        camera::CameraController,
        clock::{Clock, SystemClock},
        config::{CameraConfig, EventMapConfig, InteractionConfig},
        map::EventMap,
        region::Region,
    },
    data::{loader::EventLoader, store::EventStore},
    input::InteractionController,
    location::LocationProvider,
    spatial::clustering::ClusteringConfig,
    EventMapError, Result,
};
use std::sync::Arc;

/// Builder for creating and configuring EventMap instances
pub struct EventMapBuilder {
    store: Arc<dyn EventStore>,
    config: EventMapConfig,
    clock: Arc<dyn Clock>,
    location: Option<Arc<dyn LocationProvider>>,
    /// Starting viewport; defaults to the configured default region
    initial_region: Option<Region>,
}

impl EventMapBuilder {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            store,
            config: EventMapConfig::default(),
            clock: Arc::new(SystemClock),
            location: None,
            initial_region: None,
        }
    }

    pub fn config(mut self, config: EventMapConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clustering(mut self, clustering: ClusteringConfig) -> Self {
        self.config.clustering = clustering;
        self
    }

    pub fn interaction(mut self, interaction: InteractionConfig) -> Self {
        self.config.interaction = interaction;
        self
    }

    pub fn camera(mut self, camera: CameraConfig) -> Self {
        self.config.camera = camera;
        self
    }

    /// Time source for tap timers
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn location_provider(mut self, provider: Arc<dyn LocationProvider>) -> Self {
        self.location = Some(provider);
        self
    }

    pub fn initial_region(mut self, region: Region) -> Self {
        self.initial_region = Some(region);
        self
    }

    pub fn build(self) -> Result<EventMap> {
        self.config.validate()?;

        let camera = CameraController::new(self.config.camera.clone());
        let region = match self.initial_region {
            Some(region) if !region.is_valid() => {
                return Err(EventMapError::InvalidCoordinates(format!(
                    "initial region {:?}",
                    region
                )));
            }
            Some(region) => region,
            None => camera.default_region(),
        };

        let interaction =
            InteractionController::new(self.config.interaction.clone(), camera, self.clock);

        EventMap::from_parts(
            self.config,
            EventLoader::new(self.store),
            self.location,
            region,
            interaction,
        )
    }
}
