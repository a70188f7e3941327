use super::super::ClientId;
use super::layout::{arrange_monitor, restack, tiled_clients};
use super::{FocusChange, Outcome, State};

/// Focuses `target`, or the most recently focused visible client of the
/// selected monitor when `target` is absent or hidden. Focusing a client
/// on another monitor selects that monitor.
pub fn focus(state: &mut State, target: Option<ClientId>) -> FocusChange {
    let previous = state.selected_client();
    let m = state.selected_monitor;

    let target = target.filter(|&id| state.is_visible(id)).or_else(|| {
        state
            .monitors
            .get(m)?
            .stack
            .iter()
            .copied()
            .find(|&id| state.is_visible(id))
    });

    if let Some(id) = target {
        if let Some(client_monitor) = state.clients.get(&id).map(|c| c.monitor) {
            if client_monitor != state.selected_monitor {
                tracing::debug!(
                    "Selected monitor: {} -> {}",
                    state.selected_monitor,
                    client_monitor
                );
                state.selected_monitor = client_monitor;
            }
            if let Some(mon) = state.monitors.get_mut(client_monitor) {
                mon.attach_stack(id);
            }
        }
    }
    let selected_monitor = state.selected_monitor;
    if let Some(mon) = state.monitors.get_mut(selected_monitor) {
        mon.selected = target;
    }

    if previous != target {
        tracing::debug!("Focus: {:?} -> {:?}", previous, target);
    }
    FocusChange {
        previous,
        current: target,
    }
}

/// Moves focus through the visible clients in tiling order, wrapping at
/// both ends.
pub fn focus_stack(state: &mut State, delta: i32) -> Outcome {
    let m = state.selected_monitor;
    let Some(selected) = state.selected_client() else {
        return Outcome::default();
    };
    let Some(mon) = state.monitors.get(m) else {
        return Outcome::default();
    };

    let visible: Vec<ClientId> = mon
        .clients
        .iter()
        .copied()
        .filter(|&id| state.is_visible(id))
        .collect();
    let Some(pos) = visible.iter().position(|&id| id == selected) else {
        return Outcome::default();
    };
    let len = visible.len();
    let next = if delta > 0 {
        visible[(pos + 1) % len]
    } else {
        visible[(pos + len - 1) % len]
    };
    if next == selected {
        return Outcome::default();
    }

    let change = focus(state, Some(next));
    Outcome {
        focus: Some(change),
        restacks: restack(state, m).into_iter().collect(),
        bars_changed: true,
        ..Outcome::default()
    }
}

/// Moves the selected tiled client to the master position. When it is
/// already there, the next tiled client takes its place.
pub fn zoom(state: &mut State) -> Outcome {
    let m = state.selected_monitor;
    let Some(selected) = state.selected_client() else {
        return Outcome::default();
    };
    let floating = state.clients.get(&selected).is_some_and(|c| c.is_floating);
    if !state.layout_kind(m).arranges() || floating {
        return Outcome::default();
    }

    let tiled = tiled_clients(state, m);
    let target = if tiled.first().map(|c| c.id) == Some(selected) {
        match tiled.get(1) {
            Some(next) => next.id,
            None => return Outcome::default(),
        }
    } else {
        selected
    };

    tracing::info!("Zoom window {} on monitor {}", target, m);
    if let Some(mon) = state.monitors.get_mut(m) {
        mon.detach(target);
        mon.attach(target);
    }
    let change = focus(state, Some(target));
    let mut outcome = arrange_monitor(state, m);
    outcome.focus = Some(change);
    outcome
}

/// Index of the monitor `delta` steps away from the selected one.
pub fn monitor_in_direction(state: &State, delta: i32) -> usize {
    let n = state.monitors.len();
    if n == 0 {
        return 0;
    }
    let current = state.selected_monitor % n;
    if delta > 0 {
        (current + 1) % n
    } else {
        (current + n - 1) % n
    }
}

pub fn focus_mon(state: &mut State, delta: i32) -> Outcome {
    if state.monitors.len() <= 1 {
        return Outcome::default();
    }
    let target = monitor_in_direction(state, delta);
    if target == state.selected_monitor {
        return Outcome::default();
    }

    let previous = state.selected_client();
    tracing::info!("Focus monitor: {} -> {}", state.selected_monitor, target);
    state.selected_monitor = target;
    let mut change = focus(state, None);
    change.previous = previous;

    Outcome {
        focus: Some(change),
        bars_changed: true,
        ..Outcome::default()
    }
}

pub fn tag_mon(state: &mut State, delta: i32) -> Outcome {
    let Some(selected) = state.selected_client() else {
        return Outcome::default();
    };
    if state.monitors.len() <= 1 {
        return Outcome::default();
    }
    let target = monitor_in_direction(state, delta);
    send_to_monitor(state, selected, target)
}

/// Moves a client to another monitor, where it takes that monitor's
/// visible tags.
pub fn send_to_monitor(state: &mut State, id: ClientId, target: usize) -> Outcome {
    let Some(source) = state.clients.get(&id).map(|c| c.monitor) else {
        return Outcome::default();
    };
    if source == target {
        return Outcome::default();
    }
    let Some(target_tags) = state.monitors.get(target).map(|m| m.visible_tags) else {
        return Outcome::default();
    };

    tracing::info!("Send window {} to monitor: {} -> {}", id, source, target);
    let previous = state.selected_client();
    state.detach_client(id);
    if let Some(client) = state.clients.get_mut(&id) {
        client.monitor = target;
        client.tags = target_tags;
    }
    if let Some(mon) = state.monitors.get_mut(target) {
        mon.attach(id);
        mon.attach_stack(id);
    }

    let mut change = focus(state, None);
    change.previous = previous;
    let mut outcome = arrange_monitor(state, source);
    outcome.merge(arrange_monitor(state, target));
    outcome.focus = Some(change);
    outcome
}
