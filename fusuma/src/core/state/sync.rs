use crate::platform::WindowSystem;

use super::clients::manage;
use super::monitors::{monitor_at, monitors_changed};
use super::{Outcome, State};

/// Adopts the outputs and the already mapped windows found at startup.
/// Transient windows are managed last so their parents exist.
pub fn sync_all<W: WindowSystem>(state: &mut State, ws: &W) -> Outcome {
    let mut outcome = monitors_changed(state, &ws.monitor_frames());

    if let Some((x, y)) = ws.pointer_position() {
        state.pointer = (x, y);
        state.selected_monitor = monitor_at(state, x, y);
    }

    let (transients, windows): (Vec<_>, Vec<_>) = ws
        .existing_windows()
        .into_iter()
        .partition(|w| w.transient_for.is_some());
    tracing::info!(
        "Adopting {} existing windows ({} transient)",
        windows.len() + transients.len(),
        transients.len()
    );

    for attrs in windows.iter().chain(transients.iter()) {
        if let Some(managed) = manage(state, attrs) {
            outcome.merge(managed);
        }
    }
    outcome
}
