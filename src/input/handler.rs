use crate::{
    core::{
        camera::CameraController,
        clock::Clock,
        config::InteractionConfig,
        geo::LatLng,
        region::Region,
    },
    data::event::Event,
    input::events::{ClusterListing, MapAction},
    spatial::clustering::ClusterId,
};
use instant::Instant;
use std::sync::Arc;

/// A tap on a cluster marker, with its members already resolved
#[derive(Debug, Clone)]
pub struct ClusterTap {
    pub id: ClusterId,
    pub coordinates: LatLng,
    pub members: Vec<Event>,
}

/// First tap on a cluster that is waiting for a second one
#[derive(Debug, Clone)]
pub struct PendingTap {
    pub cluster_id: ClusterId,
    pub tapped_at: Instant,
    /// Members are revealed automatically at this point
    pub reveal_at: Instant,
    pub members: Vec<Event>,
}

#[derive(Debug, Clone, Default)]
pub enum TapState {
    #[default]
    Idle,
    AwaitingSecondTap(PendingTap),
}

/// Turns marker and cluster taps into camera moves, selections and member lists.
///
/// A first tap on a cluster zooms in and arms an auto-reveal deadline; a second
/// tap on the same cluster inside the double-tap window reveals the members at
/// once. Deadlines fire from [`InteractionController::tick`], so the host decides
/// when time is checked.
pub struct InteractionController {
    config: InteractionConfig,
    camera: CameraController,
    clock: Arc<dyn Clock>,
    state: TapState,
    selected: Option<Event>,
    last_reveal: Option<Instant>,
}

impl InteractionController {
    pub fn new(config: InteractionConfig, camera: CameraController, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            camera,
            clock,
            state: TapState::Idle,
            selected: None,
            last_reveal: None,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn state(&self) -> &TapState {
        &self.state
    }

    pub fn selected(&self) -> Option<&Event> {
        self.selected.as_ref()
    }

    pub fn is_pending(&self, id: ClusterId) -> bool {
        matches!(&self.state, TapState::AwaitingSecondTap(pending) if pending.cluster_id == id)
    }

    /// When [`tick`](Self::tick) next has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        match &self.state {
            TapState::AwaitingSecondTap(pending) => Some(pending.reveal_at),
            TapState::Idle => None,
        }
    }

    /// Selects the event and moves the camera close to it
    pub fn on_marker_press(&mut self, event: &Event) -> Vec<MapAction> {
        log::debug!("marker pressed: {}", event.id);
        let mut actions = self.select(event.clone());
        if let Some(command) = self.camera.to_event(event) {
            actions.push(MapAction::AnimateCamera(command));
        }
        actions
    }

    pub fn on_cluster_press(&mut self, tap: ClusterTap, region: &Region) -> Vec<MapAction> {
        match tap.members.as_slice() {
            [] => {
                log::warn!("cluster {} has no resolvable members", tap.id);
                return Vec::new();
            }
            [only] => return self.on_marker_press(only),
            _ => {}
        }

        let now = self.clock.now();
        let double_tap = match &self.state {
            TapState::AwaitingSecondTap(pending) => {
                pending.cluster_id == tap.id
                    && now.duration_since(pending.tapped_at) < self.config.double_tap_window()
            }
            TapState::Idle => false,
        };
        let zoom = region.zoom_level();

        if double_tap || zoom >= self.config.reveal_zoom {
            log::debug!(
                "revealing cluster {} (double tap: {}, zoom: {})",
                tap.id,
                double_tap,
                zoom
            );
            self.state = TapState::Idle;
            return self.reveal(&tap.members, now);
        }

        let count = tap.members.len();
        let command = self.camera.to_cluster(tap.coordinates, region, count);
        log::debug!("zooming into cluster {} of {} events", tap.id, count);
        self.state = TapState::AwaitingSecondTap(PendingTap {
            cluster_id: tap.id,
            tapped_at: now,
            reveal_at: now + self.config.auto_reveal_delay(),
            members: tap.members,
        });

        let mut actions = vec![MapAction::AnimateCamera(command)];
        if self.config.tap_again_hint {
            actions.push(MapAction::ShowHint("Tap again to see the events".to_string()));
        }
        actions
    }

    /// Fires the auto-reveal once its deadline has passed
    pub fn tick(&mut self) -> Vec<MapAction> {
        let now = self.clock.now();
        let due = matches!(&self.state, TapState::AwaitingSecondTap(pending) if now >= pending.reveal_at);
        if !due {
            return Vec::new();
        }

        match std::mem::take(&mut self.state) {
            TapState::AwaitingSecondTap(pending) => {
                log::debug!("auto-revealing cluster {}", pending.cluster_id);
                self.reveal(&pending.members, now)
            }
            TapState::Idle => Vec::new(),
        }
    }

    fn reveal(&mut self, members: &[Event], now: Instant) -> Vec<MapAction> {
        if let Some(last) = self.last_reveal {
            if now.duration_since(last) < self.config.reveal_guard() {
                log::debug!("suppressing reveal within the guard window");
                return Vec::new();
            }
        }
        self.last_reveal = Some(now);

        match members {
            [only] => self.select(only.clone()),
            _ => vec![MapAction::ShowClusterList(ClusterListing::new(
                members,
                self.config.list_limit,
                self.config.title_limit,
            ))],
        }
    }

    /// Makes `event` the selection
    pub fn select(&mut self, event: Event) -> Vec<MapAction> {
        self.selected = Some(event.clone());
        vec![MapAction::SelectEvent(event)]
    }

    /// Clears the selection and any pending cluster tap
    pub fn dismiss(&mut self) {
        self.selected = None;
        self.state = TapState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use std::time::Duration;

    fn controller(clock: &ManualClock) -> InteractionController {
        InteractionController::new(
            InteractionConfig::default(),
            CameraController::default(),
            Arc::new(clock.clone()),
        )
    }

    fn members(n: usize) -> Vec<Event> {
        (0..n)
            .map(|i| Event::new(format!("e{}", i), format!("Event {}", i)).at(38.72, -9.14))
            .collect()
    }

    fn tap(id: u64, n: usize) -> ClusterTap {
        ClusterTap {
            id: ClusterId(id),
            coordinates: LatLng::new(38.72, -9.14),
            members: members(n),
        }
    }

    /// Region at zoom 10
    fn region() -> Region {
        Region::new(38.72, -9.14, 0.3, 360.0 / 1024.0)
    }

    fn listings(actions: &[MapAction]) -> usize {
        actions.iter().filter(|a| a.listing().is_some()).count()
    }

    #[test]
    fn test_marker_press_selects_and_centers() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);
        let event = members(1).remove(0);

        let actions = controller.on_marker_press(&event);
        assert_eq!(actions[0], MapAction::SelectEvent(event.clone()));
        let command = actions[1].camera().unwrap();
        assert_eq!(command.duration, Duration::from_millis(1000));
        assert_eq!(controller.selected(), Some(&event));
        assert!(matches!(controller.state(), TapState::Idle));
    }

    #[test]
    fn test_single_member_cluster_acts_like_marker() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);

        let actions = controller.on_cluster_press(tap(1, 1), &region());
        assert!(actions[0].selected().is_some());
        assert!(actions[1].camera().is_some());
        assert!(controller.next_deadline().is_none());
    }

    #[test]
    fn test_first_tap_zooms_and_arms_deadline() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);

        let actions = controller.on_cluster_press(tap(1, 3), &region());
        assert_eq!(actions.len(), 1);
        let command = actions[0].camera().unwrap();
        assert!((command.region.longitude_delta - region().longitude_delta / 4.0).abs() < 1e-12);
        assert_eq!(command.duration, Duration::from_millis(500));

        assert!(controller.is_pending(ClusterId(1)));
        assert_eq!(
            controller.next_deadline(),
            Some(clock.now() + Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_double_tap_reveals_once() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);

        controller.on_cluster_press(tap(1, 3), &region());
        clock.advance_ms(200);
        let actions = controller.on_cluster_press(tap(1, 3), &region());
        assert_eq!(listings(&actions), 1);
        assert!(controller.next_deadline().is_none());

        clock.advance_ms(2000);
        assert!(controller.tick().is_empty());
    }

    #[test]
    fn test_second_tap_after_window_restarts_sequence() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);

        controller.on_cluster_press(tap(1, 3), &region());
        clock.advance_ms(600);
        let actions = controller.on_cluster_press(tap(1, 3), &region());
        assert_eq!(listings(&actions), 0);
        assert!(actions[0].camera().is_some());
        assert_eq!(
            controller.next_deadline(),
            Some(clock.now() + Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_auto_reveal_fires_exactly_once() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);

        controller.on_cluster_press(tap(1, 4), &region());
        clock.advance_ms(1499);
        assert!(controller.tick().is_empty());

        clock.advance_ms(1);
        let actions = controller.tick();
        assert_eq!(listings(&actions), 1);
        assert!(matches!(controller.state(), TapState::Idle));

        clock.advance_ms(5000);
        assert!(controller.tick().is_empty());
    }

    #[test]
    fn test_tapping_another_cluster_replaces_deadline() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);

        controller.on_cluster_press(tap(1, 3), &region());
        clock.advance_ms(1000);
        controller.on_cluster_press(tap(2, 3), &region());
        assert!(controller.is_pending(ClusterId(2)));

        clock.advance_ms(600);
        assert!(controller.tick().is_empty());
        clock.advance_ms(900);
        let actions = controller.tick();
        assert_eq!(listings(&actions), 1);
    }

    #[test]
    fn test_high_zoom_reveals_immediately() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);
        let close = Region::new(38.72, -9.14, 0.01, 360.0 / 2f64.powi(15));

        let actions = controller.on_cluster_press(tap(1, 7), &close);
        let listing = actions[0].listing().unwrap();
        assert_eq!(listing.entries.len(), 5);
        assert!(listing.view_all.is_some());
        assert!(controller.next_deadline().is_none());
    }

    #[test]
    fn test_duplicate_reveal_is_suppressed() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);
        let close = Region::new(38.72, -9.14, 0.01, 0.005);

        assert_eq!(listings(&controller.on_cluster_press(tap(1, 3), &close)), 1);
        clock.advance_ms(100);
        assert!(controller.on_cluster_press(tap(2, 3), &close).is_empty());
        clock.advance_ms(500);
        assert_eq!(listings(&controller.on_cluster_press(tap(2, 3), &close)), 1);
    }

    #[test]
    fn test_hint_is_opt_in() {
        let clock = ManualClock::new();
        let config = InteractionConfig {
            tap_again_hint: true,
            ..Default::default()
        };
        let mut controller =
            InteractionController::new(config, CameraController::default(), Arc::new(clock));
        let actions = controller.on_cluster_press(tap(1, 3), &region());
        assert!(matches!(actions.last(), Some(MapAction::ShowHint(_))));
    }

    #[test]
    fn test_dismiss_clears_state() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);
        controller.on_marker_press(&members(1)[0]);
        controller.on_cluster_press(tap(1, 3), &region());

        controller.dismiss();
        assert!(controller.selected().is_none());
        assert!(controller.next_deadline().is_none());
    }
}
