use crate::{
    core::camera::CameraCommand,
    data::event::Event,
    input::{ClusterListing, MapAction, MapAlert},
};

/// Whatever draws the map: moves the camera and shows popups
pub trait MapSurface {
    fn animate_to_region(&mut self, command: &CameraCommand);

    fn show_event(&mut self, event: &Event);

    fn show_cluster_list(&mut self, listing: &ClusterListing);

    fn show_alert(&mut self, alert: MapAlert);

    /// Hints are optional; surfaces without a toast can ignore them
    fn show_hint(&mut self, _hint: &str) {}
}

/// Carries out `actions` on `surface`, in order
pub fn dispatch<S: MapSurface + ?Sized>(surface: &mut S, actions: &[MapAction]) {
    for action in actions {
        match action {
            MapAction::AnimateCamera(command) => surface.animate_to_region(command),
            MapAction::SelectEvent(event) => surface.show_event(event),
            MapAction::ShowClusterList(listing) => surface.show_cluster_list(listing),
            MapAction::ShowAlert(alert) => surface.show_alert(*alert),
            MapAction::ShowHint(hint) => surface.show_hint(hint),
        }
    }
}
