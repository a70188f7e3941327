use super::super::{ClientId, Rect};
use super::focus::{focus, send_to_monitor};
use super::layout::{arrange_monitor, resize_client, restack, set_floating};
use super::monitors::monitor_at;
use super::{Outcome, State};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Move,
    Resize,
}

impl std::fmt::Display for DragKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DragKind::Move => write!(f, "move"),
            DragKind::Resize => write!(f, "resize"),
        }
    }
}

/// A pointer drag in progress on one client.
#[derive(Debug, Clone, PartialEq)]
pub struct Drag {
    pub kind: DragKind,
    pub client: ClientId,
    pub pointer_origin: (i32, i32),
    pub frame_origin: Rect,
}

impl Drag {
    /// Where the pointer is warped when a resize starts: the client's
    /// bottom-right corner, inside the border.
    pub fn resize_anchor(&self, border_width: u32) -> (i32, i32) {
        (
            self.frame_origin.x + self.frame_origin.width as i32 + border_width as i32 - 1,
            self.frame_origin.y + self.frame_origin.height as i32 + border_width as i32 - 1,
        )
    }
}

/// Starts dragging the selected client from the current pointer position.
pub fn begin_drag(state: &mut State, kind: DragKind) -> Option<(Drag, Outcome)> {
    if state.drag.is_some() {
        return None;
    }
    let m = state.selected_monitor;
    let id = state.selected_client()?;
    let client = state.clients.get(&id)?;

    let mut drag = Drag {
        kind,
        client: id,
        pointer_origin: state.pointer,
        frame_origin: client.frame,
    };
    if kind == DragKind::Resize {
        drag.pointer_origin = drag.resize_anchor(client.border_width);
        state.pointer = drag.pointer_origin;
    }

    tracing::debug!("Begin {} of window {} at {:?}", kind, id, drag.pointer_origin);
    state.drag = Some(drag.clone());
    let outcome = Outcome {
        restacks: restack(state, m).into_iter().collect(),
        ..Outcome::default()
    };
    Some((drag, outcome))
}

/// Follows the pointer. A tiled client that is pulled further than the
/// snap distance becomes floating.
pub fn drag_motion(state: &mut State, x: i32, y: i32) -> Outcome {
    state.pointer = (x, y);
    let Some(drag) = state.drag.clone() else {
        return Outcome::default();
    };
    let Some(client) = state.clients.get(&drag.client) else {
        state.drag = None;
        return Outcome::default();
    };
    let Some(wa) = state.monitors.get(client.monitor).map(|m| m.window_area) else {
        return Outcome::default();
    };

    let id = client.id;
    let monitor = client.monitor;
    let frame = client.frame;
    let bw = client.border_width as i32;
    let is_floating = client.is_floating;
    let snap = state.config.snap as i32;
    let arranges = state.layout_kind(monitor).arranges();

    let (target, pulled_out) = match drag.kind {
        DragKind::Move => {
            let mut nx = drag.frame_origin.x + (x - drag.pointer_origin.0);
            let mut ny = drag.frame_origin.y + (y - drag.pointer_origin.1);
            let w = client.outer_width() as i32;
            let h = client.outer_height() as i32;
            if (wa.x - nx).abs() < snap {
                nx = wa.x;
            } else if (wa.right() - (nx + w)).abs() < snap {
                nx = wa.right() - w;
            }
            if (wa.y - ny).abs() < snap {
                ny = wa.y;
            } else if (wa.bottom() - (ny + h)).abs() < snap {
                ny = wa.bottom() - h;
            }
            let pulled = (nx - frame.x).abs() > snap || (ny - frame.y).abs() > snap;
            (Rect::new(nx, ny, frame.width, frame.height), pulled)
        }
        DragKind::Resize => {
            let nw = (x - drag.frame_origin.x - 2 * bw + 1).max(1);
            let nh = (y - drag.frame_origin.y - 2 * bw + 1).max(1);
            let within = nw <= wa.width as i32 && nh <= wa.height as i32;
            let pulled = within
                && ((nw - frame.width as i32).abs() > snap || (nh - frame.height as i32).abs() > snap);
            (
                Rect::new(frame.x, frame.y, nw as u32, nh as u32),
                pulled,
            )
        }
    };

    let mut outcome = Outcome::default();
    let mut floating = is_floating;
    if !is_floating && arranges && pulled_out {
        set_floating(state, id, true);
        floating = true;
        outcome = arrange_monitor(state, monitor);
    }
    if !arranges || floating {
        if let Some(mv) = resize_client(state, id, target, true) {
            outcome.moves.retain(|m| m.window_id != id);
            outcome.moves.push(mv);
        }
    }
    outcome
}

/// Finishes a drag. A client whose centre was dropped onto another
/// monitor moves there.
pub fn end_drag(state: &mut State) -> Option<(Drag, Outcome)> {
    let drag = state.drag.take()?;
    let Some(client) = state.clients.get(&drag.client) else {
        return Some((drag, Outcome::default()));
    };
    let (cx, cy) = client.center();
    let target = monitor_at(state, cx, cy);
    tracing::debug!("End {} of window {} on monitor {}", drag.kind, drag.client, target);

    if target == state.selected_monitor {
        return Some((drag, Outcome::default()));
    }
    let previous = state.selected_client();
    let mut outcome = send_to_monitor(state, drag.client, target);
    state.selected_monitor = target;
    let mut change = focus(state, None);
    change.previous = previous;
    outcome.focus = Some(change);
    outcome.bars_changed = true;
    Some((drag, outcome))
}
