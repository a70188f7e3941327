use super::super::{Monitor, Rect};
use super::focus::focus;
use super::layout::arrange_all;
use super::{Outcome, State};

/// Rebuilds the monitor list from the outputs the window system reports.
/// Duplicate outputs (cloned screens) count once. Clients of removed
/// monitors move to the first monitor and keep their tags.
///
/// Returns true when anything changed.
pub fn update_geometry(state: &mut State, frames: &[Rect]) -> bool {
    let mut unique: Vec<Rect> = Vec::with_capacity(frames.len());
    for frame in frames {
        if !unique.contains(frame) {
            unique.push(*frame);
        }
    }
    if unique.is_empty() {
        tracing::warn!("Window system reported no outputs, keeping current monitors");
        return false;
    }

    let mut dirty = false;
    let bar_height = state.config.bar_height;

    for (i, frame) in unique.iter().enumerate() {
        match state.monitors.get_mut(i) {
            Some(mon) if mon.frame == *frame => {}
            Some(mon) => {
                tracing::info!(
                    "Monitor {} resized: ({}, {}) {}x{}",
                    i,
                    frame.x,
                    frame.y,
                    frame.width,
                    frame.height
                );
                mon.frame = *frame;
                mon.update_bar_position(bar_height);
                dirty = true;
            }
            None => {
                tracing::info!(
                    "Monitor {} added: ({}, {}) {}x{}",
                    i,
                    frame.x,
                    frame.y,
                    frame.width,
                    frame.height
                );
                state.monitors.push(Monitor::new(i, *frame, &state.config));
                dirty = true;
            }
        }
    }

    while state.monitors.len() > unique.len() {
        let Some(removed) = state.monitors.pop() else {
            break;
        };
        tracing::info!(
            "Monitor {} removed, moving {} clients to monitor 0",
            removed.index,
            removed.clients.len()
        );
        for id in removed.clients.iter().rev() {
            if let Some(client) = state.clients.get_mut(id) {
                client.monitor = 0;
            }
            if let Some(first) = state.monitors.first_mut() {
                first.attach(*id);
                first.attach_stack(*id);
            }
        }
        if state.selected_monitor >= state.monitors.len() {
            state.selected_monitor = 0;
        }
        dirty = true;
    }

    dirty
}

pub fn monitors_changed(state: &mut State, frames: &[Rect]) -> Outcome {
    if !update_geometry(state, frames) {
        return Outcome::default();
    }
    let change = focus(state, None);
    let mut outcome = arrange_all(state);
    outcome.focus = Some(change);
    outcome.bars_changed = true;
    outcome
}

/// Monitor with the largest overlap with `rect`, or the selected monitor
/// when nothing overlaps.
pub fn rect_to_monitor(state: &State, rect: &Rect) -> usize {
    let mut best = state.selected_monitor;
    let mut best_area = 0;
    for (i, mon) in state.monitors.iter().enumerate() {
        let area = mon.window_area.intersection_area(rect);
        if area > best_area {
            best_area = area;
            best = i;
        }
    }
    best
}

pub fn monitor_at(state: &State, x: i32, y: i32) -> usize {
    rect_to_monitor(state, &Rect::new(x, y, 1, 1))
}
