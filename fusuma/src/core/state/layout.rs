use super::super::{ArrangeParams, ClientId, LayoutKind, Rect, TiledClient};
use super::{dedup_moves, Outcome, Restack, State, WindowMove};

/// Visible, non-floating clients of a monitor in tiling order.
pub fn tiled_clients(state: &State, monitor: usize) -> Vec<TiledClient> {
    let Some(mon) = state.monitors.get(monitor) else {
        return vec![];
    };
    mon.clients
        .iter()
        .filter_map(|id| state.clients.get(id))
        .filter(|c| mon.is_visible(c) && !c.is_floating)
        .map(|c| TiledClient {
            id: c.id,
            border_width: c.border_width,
        })
        .collect()
}

/// Fits a requested frame to the monitor (or the whole screen while the
/// user drags) and to the client's size hints.
pub fn apply_size_hints(state: &State, id: ClientId, frame: Rect, interact: bool) -> Rect {
    let Some(client) = state.clients.get(&id) else {
        return frame;
    };
    let Some(mon) = state.monitors.get(client.monitor) else {
        return frame;
    };

    let bw2 = 2 * client.border_width as i32;
    let mut x = frame.x;
    let mut y = frame.y;
    let mut w = frame.width.max(1) as i32;
    let mut h = frame.height.max(1) as i32;

    if interact {
        let screen = state.screen_rect();
        if x > screen.right() {
            x = screen.right() - (w + bw2);
        }
        if y > screen.bottom() {
            y = screen.bottom() - (h + bw2);
        }
        if x + w + bw2 < screen.x {
            x = screen.x;
        }
        if y + h + bw2 < screen.y {
            y = screen.y;
        }
    } else {
        let wa = mon.window_area;
        if x >= wa.right() {
            x = wa.right() - (w + bw2);
        }
        if y >= wa.bottom() {
            y = wa.bottom() - (h + bw2);
        }
        if x + w + bw2 <= wa.x {
            x = wa.x;
        }
        if y + h + bw2 <= wa.y {
            y = wa.y;
        }
    }

    let min = state.config.bar_height as i32;
    w = w.max(min);
    h = h.max(min);

    let honour_hints = state.config.resize_hints
        || client.is_floating
        || !state.layout_kind(client.monitor).arranges();
    let (w, h) = match client.size_hints {
        Some(hints) if honour_hints => hints.constrain(w as u32, h as u32),
        _ => (w as u32, h as u32),
    };

    Rect::new(x, y, w, h)
}

/// Applies a frame to a client. Returns the move when the frame changed.
pub fn resize_client(
    state: &mut State,
    id: ClientId,
    frame: Rect,
    interact: bool,
) -> Option<WindowMove> {
    let adjusted = apply_size_hints(state, id, frame, interact);
    let client = state.clients.get_mut(&id)?;
    if client.frame == adjusted {
        return None;
    }
    tracing::debug!(
        "Resize window {}: ({}, {}) {}x{} -> ({}, {}) {}x{}",
        id,
        client.frame.x,
        client.frame.y,
        client.frame.width,
        client.frame.height,
        adjusted.x,
        adjusted.y,
        adjusted.width,
        adjusted.height
    );
    client.frame = adjusted;
    Some(WindowMove {
        window_id: id,
        frame: adjusted,
    })
}

/// Restores visible clients to their frame and parks hidden ones left of
/// the screen. The stored frame of a hidden client is left untouched.
fn show_hide(state: &mut State, monitor: usize) -> Vec<WindowMove> {
    let Some(mon) = state.monitors.get(monitor) else {
        return vec![];
    };
    let visible_tags = mon.visible_tags;
    let ids = mon.stack.clone();
    let arranges = state.layout_kind(monitor).arranges();

    let mut moves = Vec::new();
    for id in ids {
        let Some(client) = state.clients.get(&id) else {
            continue;
        };
        let frame = client.frame;
        if client.is_visible_on(visible_tags) {
            if !arranges || client.is_floating {
                if let Some(m) = resize_client(state, id, frame, false) {
                    moves.push(m);
                    continue;
                }
            }
            moves.push(WindowMove {
                window_id: id,
                frame,
            });
        } else {
            let hidden_x = -2 * client.outer_width() as i32;
            tracing::trace!("Hiding window {} at x={}", id, hidden_x);
            moves.push(WindowMove {
                window_id: id,
                frame: Rect { x: hidden_x, ..frame },
            });
        }
    }
    moves
}

fn layout_pass(state: &mut State, monitor: usize) -> Vec<WindowMove> {
    let Some(mon) = state.monitors.get(monitor) else {
        return vec![];
    };
    let Some(layout) = state.config.layouts.get(mon.layout_index()).cloned() else {
        return vec![];
    };
    let params = ArrangeParams {
        area: mon.window_area,
        gap: mon.gap,
        nmaster: mon.nmaster,
        mfact: mon.mfact,
    };
    let visible_count = mon
        .clients
        .iter()
        .filter_map(|id| state.clients.get(id))
        .filter(|c| mon.is_visible(c))
        .count();

    let symbol = if layout.kind == LayoutKind::Monocle && visible_count > 0 {
        format!("[{}]", visible_count)
    } else {
        layout.symbol.clone()
    };

    let tiled = tiled_clients(state, monitor);
    let geometries = layout.kind.arrange(&params, &tiled);

    if let Some(mon) = state.monitors.get_mut(monitor) {
        mon.layout_symbol = symbol;
    }

    geometries
        .into_iter()
        .filter_map(|(id, rect)| resize_client(state, id, rect, false))
        .collect()
}

pub fn restack(state: &State, monitor: usize) -> Option<Restack> {
    let mon = state.monitors.get(monitor)?;
    let selected = mon.selected?;
    let kind = state.layout_kind(monitor);

    let raise = state
        .clients
        .get(&selected)
        .filter(|c| c.is_floating || !kind.arranges())
        .map(|c| c.id);
    let tiled = if kind.arranges() {
        mon.stack
            .iter()
            .filter_map(|id| state.clients.get(id))
            .filter(|c| !c.is_floating && mon.is_visible(c))
            .map(|c| c.id)
            .collect()
    } else {
        vec![]
    };

    Some(Restack {
        monitor,
        raise,
        tiled,
    })
}

pub fn arrange_monitor(state: &mut State, monitor: usize) -> Outcome {
    let mut moves = show_hide(state, monitor);
    moves.extend(layout_pass(state, monitor));

    Outcome {
        moves: dedup_moves(moves),
        restacks: restack(state, monitor).into_iter().collect(),
        focus: None,
        bars_changed: true,
    }
}

pub fn arrange_all(state: &mut State) -> Outcome {
    let mut outcome = Outcome::default();
    for monitor in 0..state.monitors.len() {
        outcome.merge(arrange_monitor(state, monitor));
    }
    outcome
}

pub fn set_layout(state: &mut State, index: Option<usize>) -> Outcome {
    let m = state.selected_monitor;
    let layout_count = state.config.layouts.len();
    let Some(mon) = state.monitors.get_mut(m) else {
        return Outcome::default();
    };

    let before = mon.layout_index();
    match index {
        Some(i) if i >= layout_count => return Outcome::default(),
        Some(i) => {
            if i != before {
                mon.selected_layout ^= 1;
            }
            mon.layouts[mon.selected_layout] = i;
        }
        None => mon.selected_layout ^= 1,
    }
    let after = mon.layout_index();
    mon.layout_symbol = state.config.layouts[after].symbol.clone();
    let has_selection = mon.selected.is_some();

    tracing::info!(
        "Set layout on monitor {}: {} -> {}",
        m,
        state.config.layouts[before].symbol,
        state.config.layouts[after].symbol
    );

    if has_selection {
        arrange_monitor(state, m)
    } else {
        Outcome {
            bars_changed: true,
            ..Outcome::default()
        }
    }
}

pub fn inc_nmaster(state: &mut State, delta: i32) -> Outcome {
    let m = state.selected_monitor;
    let Some(mon) = state.monitors.get_mut(m) else {
        return Outcome::default();
    };
    let nmaster = (mon.nmaster as i64 + delta as i64).max(0) as u32;
    tracing::info!("Set nmaster on monitor {}: {} -> {}", m, mon.nmaster, nmaster);
    mon.nmaster = nmaster;
    arrange_monitor(state, m)
}

/// `delta < 1.0` is relative; `delta >= 1.0` sets `delta - 1.0`.
pub fn set_mfact(state: &mut State, delta: f32) -> Outcome {
    let m = state.selected_monitor;
    if !state.layout_kind(m).arranges() {
        return Outcome::default();
    }
    let Some(mon) = state.monitors.get_mut(m) else {
        return Outcome::default();
    };
    let target = if delta < 1.0 {
        mon.mfact + delta
    } else {
        delta - 1.0
    };
    let mfact = target.clamp(0.05, 0.95);
    tracing::info!("Set mfact on monitor {}: {} -> {}", m, mon.mfact, mfact);
    mon.mfact = mfact;
    arrange_monitor(state, m)
}

/// A zero delta restores the configured gap. The gap never exceeds half
/// the shorter side of the window area.
pub fn set_gaps(state: &mut State, delta: i32) -> Outcome {
    let m = state.selected_monitor;
    let default_gap = state.config.gap_px;
    let Some(mon) = state.monitors.get_mut(m) else {
        return Outcome::default();
    };
    let max_gap = mon.window_area.width.min(mon.window_area.height) / 2;
    let gap = if delta == 0 {
        default_gap
    } else {
        (mon.gap as i64 + delta as i64).clamp(0, max_gap as i64) as u32
    };
    tracing::info!("Set gap on monitor {}: {} -> {}", m, mon.gap, gap);
    mon.gap = gap;
    arrange_monitor(state, m)
}

pub fn toggle_bar(state: &mut State) -> Outcome {
    let m = state.selected_monitor;
    let bar_height = state.config.bar_height;
    let Some(mon) = state.monitors.get_mut(m) else {
        return Outcome::default();
    };
    mon.show_bar = !mon.show_bar;
    mon.update_bar_position(bar_height);
    tracing::info!("Toggle bar on monitor {}: {}", m, mon.show_bar);
    arrange_monitor(state, m)
}

/// Floats or sinks a client. A floating client gets its last floating
/// frame back; a sinking one remembers it.
pub fn set_floating(state: &mut State, id: ClientId, floating: bool) -> Vec<WindowMove> {
    let Some(client) = state.clients.get_mut(&id) else {
        return vec![];
    };
    let floating = floating || client.is_fixed();
    if client.is_floating == floating {
        return vec![];
    }
    tracing::info!("Set floating for window {}: {}", id, floating);
    client.is_floating = floating;
    if floating {
        let frame = client.float_frame.take().unwrap_or(client.frame);
        resize_client(state, id, frame, false).into_iter().collect()
    } else {
        client.float_frame = Some(client.frame);
        vec![]
    }
}

pub fn toggle_floating(state: &mut State) -> Outcome {
    let m = state.selected_monitor;
    let Some(id) = state.selected_client() else {
        return Outcome::default();
    };
    let Some(floating) = state.clients.get(&id).map(|c| c.is_floating) else {
        return Outcome::default();
    };
    let mut moves = set_floating(state, id, !floating);
    let mut outcome = arrange_monitor(state, m);
    moves.append(&mut outcome.moves);
    outcome.moves = dedup_moves(moves);
    outcome
}
