use super::super::{Client, ClientId, SizeHints, TagMask, WindowAttributes};
use super::focus::focus;
use super::layout::arrange_monitor;
use super::{Outcome, State, WindowMove};

/// A client's request to change its own geometry. Absent fields were not
/// part of the request.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigureRequest {
    pub window_id: ClientId,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub border_width: Option<u32>,
    pub sibling: Option<u32>,
    pub stack_mode: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigureReply {
    /// Not a client: grant the request unchanged.
    Forward,
    /// Request recorded, nothing to send.
    Accepted,
    /// Layout-controlled client: tell it the geometry it already has.
    Notify,
    /// Floating client: the new frame, applied only while visible.
    Moved {
        window_move: Option<WindowMove>,
        notify: bool,
    },
}

/// Starts managing a newly mapped window. Returns `None` for windows that
/// are already managed or ask to be left alone.
pub fn manage(state: &mut State, attrs: &WindowAttributes) -> Option<Outcome> {
    if attrs.override_redirect || state.clients.contains_key(&attrs.id) {
        return None;
    }
    if state.monitors.is_empty() {
        tracing::warn!("No monitors, not managing window {}", attrs.id);
        return None;
    }

    let parent = attrs
        .transient_for
        .and_then(|t| state.clients.get(&t))
        .map(|p| (p.monitor, p.tags));

    let (monitor, tags, rule_floating) = match parent {
        Some((monitor, tags)) => (monitor, tags, false),
        None => {
            let outcome =
                state
                    .rules_engine
                    .classify(&attrs.class, &attrs.instance, &attrs.title);
            let monitor = outcome
                .monitor
                .filter(|&m| m < state.monitors.len())
                .unwrap_or(state.selected_monitor);
            let tags = outcome
                .tags
                .map(|t| TagMask::from_mask(t).intersection(state.config.tag_mask()))
                .filter(|t| !t.is_empty())
                .unwrap_or(state.monitors[monitor].visible_tags);
            (monitor, tags, outcome.is_floating)
        }
    };

    let mut client = Client::from_attributes(attrs, tags, monitor, state.config.border_px);
    let wa = state.monitors[monitor].window_area;
    let (ow, oh) = (client.outer_width() as i32, client.outer_height() as i32);
    if client.frame.x + ow > wa.right() {
        client.frame.x = wa.right() - ow;
    }
    if client.frame.y + oh > wa.bottom() {
        client.frame.y = wa.bottom() - oh;
    }
    client.frame.x = client.frame.x.max(wa.x);
    client.frame.y = client.frame.y.max(wa.y);
    client.is_floating = rule_floating || attrs.transient_for.is_some() || client.is_fixed();

    tracing::info!(
        "Manage window {} ({}, {}) \"{}\" on monitor {} tags {}{}",
        client.id,
        client.class,
        client.instance,
        client.title,
        monitor,
        client.tags,
        if client.is_floating { " floating" } else { "" }
    );

    let id = client.id;
    let previous = state.selected_client();
    state.clients.insert(id, client);
    let mon = &mut state.monitors[monitor];
    mon.attach(id);
    mon.attach_stack(id);
    mon.selected = Some(id);

    let mut outcome = arrange_monitor(state, monitor);
    let mut change = focus(state, None);
    if monitor == state.selected_monitor {
        change.previous = previous;
    }
    outcome.focus = Some(change);
    Some(outcome)
}

/// Stops managing a window that was unmapped or destroyed.
pub fn unmanage(state: &mut State, id: ClientId) -> Outcome {
    let Some(monitor) = state.clients.get(&id).map(|c| c.monitor) else {
        return Outcome::default();
    };
    tracing::info!("Unmanage window {}", id);

    let was_selected = state.selected_client() == Some(id);
    state.detach_client(id);
    state.clients.remove(&id);
    if state.drag.as_ref().is_some_and(|d| d.client == id) {
        state.drag = None;
    }

    let mut change = focus(state, None);
    if was_selected {
        // the window is gone, there is nothing to unfocus
        change.previous = None;
    }
    let mut outcome = arrange_monitor(state, monitor);
    outcome.focus = Some(change);
    outcome
}

/// Returns true when the bar shows the new title.
pub fn update_title(state: &mut State, id: ClientId, title: &str) -> bool {
    let Some(client) = state.clients.get_mut(&id) else {
        return false;
    };
    tracing::debug!("Window {} title: \"{}\" -> \"{}\"", id, client.title, title);
    client.title = title.to_string();
    let monitor = client.monitor;
    state
        .monitors
        .get(monitor)
        .is_some_and(|m| m.selected == Some(id))
}

pub fn update_size_hints(state: &mut State, id: ClientId, hints: Option<SizeHints>) {
    if let Some(client) = state.clients.get_mut(&id) {
        tracing::debug!("Window {} size hints: {:?}", id, hints);
        client.size_hints = hints;
    }
}

pub fn configure_request(state: &mut State, request: &ConfigureRequest) -> ConfigureReply {
    let Some(client) = state.clients.get(&request.window_id) else {
        return ConfigureReply::Forward;
    };
    let monitor = client.monitor;
    let is_floating = client.is_floating;

    if let Some(bw) = request.border_width {
        if let Some(client) = state.clients.get_mut(&request.window_id) {
            client.border_width = bw;
        }
        return ConfigureReply::Accepted;
    }

    if !is_floating && state.layout_kind(monitor).arranges() {
        return ConfigureReply::Notify;
    }

    let Some(mon_frame) = state.monitors.get(monitor).map(|m| m.frame) else {
        return ConfigureReply::Notify;
    };
    let visible = state.is_visible(request.window_id);
    let Some(client) = state.clients.get_mut(&request.window_id) else {
        return ConfigureReply::Forward;
    };

    let mut frame = client.frame;
    if let Some(x) = request.x {
        frame.x = mon_frame.x + x;
    }
    if let Some(y) = request.y {
        frame.y = mon_frame.y + y;
    }
    if let Some(w) = request.width {
        frame.width = w;
    }
    if let Some(h) = request.height {
        frame.height = h;
    }
    let bw2 = 2 * client.border_width;
    if frame.right() > mon_frame.right() && client.is_floating {
        frame.x = mon_frame.x + (mon_frame.width as i32 / 2 - (frame.width + bw2) as i32 / 2);
    }
    if frame.bottom() > mon_frame.bottom() && client.is_floating {
        frame.y = mon_frame.y + (mon_frame.height as i32 / 2 - (frame.height + bw2) as i32 / 2);
    }
    client.frame = frame;

    let position_only = (request.x.is_some() || request.y.is_some())
        && request.width.is_none()
        && request.height.is_none();
    tracing::debug!(
        "Configure window {}: ({}, {}) {}x{}",
        request.window_id,
        frame.x,
        frame.y,
        frame.width,
        frame.height
    );

    ConfigureReply::Moved {
        window_move: visible.then_some(WindowMove {
            window_id: request.window_id,
            frame,
        }),
        notify: position_only,
    }
}
