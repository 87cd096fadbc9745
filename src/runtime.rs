//! Tokio glue for hosts that want the tap timers driven for them

use crate::{
    core::map::EventMap,
    ui::surface::{dispatch, MapSurface},
};

/// Sleeps until the map's next deadline, then fires it.
///
/// Returns the number of actions dispatched, or `None` when nothing was armed.
pub async fn fire_next_deadline<S: MapSurface + ?Sized>(
    map: &mut EventMap,
    surface: &mut S,
) -> Option<usize> {
    let deadline = map.next_deadline()?;
    tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
    let actions = map.tick();
    if map.next_deadline() == Some(deadline) {
        // The map clock is not following wall time
        log::warn!("deadline passed but did not fire");
        return None;
    }
    log::debug!("deadline fired with {} actions", actions.len());
    dispatch(surface, &actions);
    Some(actions.len())
}

/// Fires deadlines until none is armed
pub async fn drain_deadlines<S: MapSurface + ?Sized>(map: &mut EventMap, surface: &mut S) -> usize {
    let mut fired = 0;
    while let Some(count) = fire_next_deadline(map, surface).await {
        fired += count;
    }
    fired
}
