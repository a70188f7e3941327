use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::{
    Client, ClientId, Config, LayoutKind, Monitor, Rect, RulesEngine, SizeHints, WindowAttributes,
};
use crate::platform::WindowSystem;

mod clients;
mod drag;
mod focus;
mod layout;
mod monitors;
mod sync;
mod tags;

pub use clients::{ConfigureReply, ConfigureRequest};
pub use drag::{Drag, DragKind};

use clients::*;
use drag::*;
use focus::*;
use layout::*;
use monitors::*;
use sync::*;
use tags::*;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowMove {
    pub window_id: ClientId,
    pub frame: Rect,
}

/// Stacking order for one monitor: `raise` goes on top, `tiled` are
/// lowered below the bar in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Restack {
    pub monitor: usize,
    pub raise: Option<ClientId>,
    pub tiled: Vec<ClientId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FocusChange {
    pub previous: Option<ClientId>,
    pub current: Option<ClientId>,
}

/// What an operation changed and the window system has to reflect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub moves: Vec<WindowMove>,
    pub restacks: Vec<Restack>,
    pub focus: Option<FocusChange>,
    pub bars_changed: bool,
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
            && self.restacks.is_empty()
            && self.focus.is_none()
            && !self.bars_changed
    }

    /// Folds a later outcome into this one.
    pub fn merge(&mut self, other: Outcome) {
        self.moves.extend(other.moves);
        self.moves = dedup_moves(std::mem::take(&mut self.moves));
        for restack in other.restacks {
            self.restacks.retain(|r| r.monitor != restack.monitor);
            self.restacks.push(restack);
        }
        self.focus = match (self.focus, other.focus) {
            (Some(first), Some(last)) => Some(FocusChange {
                previous: first.previous,
                current: last.current,
            }),
            (first, last) => last.or(first),
        };
        self.bars_changed |= other.bars_changed;
    }
}

/// Keeps only the last move of each window.
fn dedup_moves(moves: Vec<WindowMove>) -> Vec<WindowMove> {
    let mut seen = HashSet::new();
    let mut kept: Vec<WindowMove> = moves
        .into_iter()
        .rev()
        .filter(|m| seen.insert(m.window_id))
        .collect();
    kept.reverse();
    kept
}

pub struct State {
    pub config: Rc<Config>,
    pub clients: HashMap<ClientId, Client>,
    pub monitors: Vec<Monitor>,
    pub selected_monitor: usize,
    pub rules_engine: RulesEngine,
    /// Raw status text, segment markers included.
    pub status_text: String,
    /// Marker of the status segment clicked last.
    pub status_segment: u8,
    /// Last known pointer position in root coordinates.
    pub pointer: (i32, i32),
    pub drag: Option<Drag>,
    pub running: bool,
}

impl State {
    pub fn new(config: Rc<Config>) -> Self {
        let rules_engine = RulesEngine::new(config.rules.clone(), config.match_policy);
        Self {
            config,
            clients: HashMap::new(),
            monitors: Vec::new(),
            selected_monitor: 0,
            rules_engine,
            status_text: format!("fusuma-{}", env!("CARGO_PKG_VERSION")),
            status_segment: 0,
            pointer: (0, 0),
            drag: None,
            running: true,
        }
    }

    pub fn selected_monitor(&self) -> Option<&Monitor> {
        self.monitors.get(self.selected_monitor)
    }

    pub fn selected_client(&self) -> Option<ClientId> {
        self.selected_monitor()?.selected
    }

    pub fn layout_kind(&self, monitor: usize) -> LayoutKind {
        self.monitors
            .get(monitor)
            .and_then(|m| self.config.layouts.get(m.layout_index()))
            .map(|l| l.kind)
            .unwrap_or(LayoutKind::Floating)
    }

    /// Whether a client's tags intersect the visible tags of its monitor.
    pub fn is_visible(&self, id: ClientId) -> bool {
        let Some(client) = self.clients.get(&id) else {
            return false;
        };
        self.monitors
            .get(client.monitor)
            .is_some_and(|m| m.is_visible(client))
    }

    /// Bounding box of all monitors.
    pub fn screen_rect(&self) -> Rect {
        let Some(first) = self.monitors.first() else {
            return Rect::default();
        };
        let (mut x0, mut y0) = (first.frame.x, first.frame.y);
        let (mut x1, mut y1) = (first.frame.right(), first.frame.bottom());
        for mon in &self.monitors[1..] {
            x0 = x0.min(mon.frame.x);
            y0 = y0.min(mon.frame.y);
            x1 = x1.max(mon.frame.right());
            y1 = y1.max(mon.frame.bottom());
        }
        Rect::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32)
    }

    /// Removes a client from its monitor's lists. A selected client hands
    /// the selection to the next visible client in focus order.
    pub(crate) fn detach_client(&mut self, id: ClientId) {
        let Some(monitor) = self.clients.get(&id).map(|c| c.monitor) else {
            return;
        };
        let Some(mon) = self.monitors.get_mut(monitor) else {
            return;
        };
        let was_selected = mon.selected == Some(id);
        mon.detach(id);
        mon.detach_stack(id);
        if was_selected {
            let next = mon.stack.iter().copied().find(|other| {
                self.clients
                    .get(other)
                    .is_some_and(|c| c.is_visible_on(mon.visible_tags))
            });
            mon.selected = next;
        }
    }

    /// Focus fallback followed by a full arrange of one monitor.
    pub(crate) fn refocus_and_arrange(&mut self, monitor: usize) -> Outcome {
        let change = focus(self, None);
        let mut outcome = arrange_monitor(self, monitor);
        outcome.focus = Some(change);
        outcome
    }

    // Startup - delegated to state/sync.rs

    pub fn sync_all<W: WindowSystem>(&mut self, ws: &W) -> Outcome {
        sync_all(self, ws)
    }

    // Monitor operations - delegated to state/monitors.rs

    pub fn monitors_changed(&mut self, frames: &[Rect]) -> Outcome {
        monitors_changed(self, frames)
    }

    pub fn monitor_at(&self, x: i32, y: i32) -> usize {
        monitor_at(self, x, y)
    }

    pub fn rect_to_monitor(&self, rect: &Rect) -> usize {
        rect_to_monitor(self, rect)
    }

    // Client lifecycle - delegated to state/clients.rs

    pub fn manage(&mut self, attrs: &WindowAttributes) -> Option<Outcome> {
        manage(self, attrs)
    }

    pub fn unmanage(&mut self, id: ClientId) -> Outcome {
        unmanage(self, id)
    }

    pub fn update_title(&mut self, id: ClientId, title: &str) -> bool {
        update_title(self, id, title)
    }

    pub fn update_size_hints(&mut self, id: ClientId, hints: Option<SizeHints>) {
        update_size_hints(self, id, hints)
    }

    pub fn configure_request(&mut self, request: &ConfigureRequest) -> ConfigureReply {
        configure_request(self, request)
    }

    // Tag operations - delegated to state/tags.rs

    pub fn view(&mut self, tags: u32) -> Outcome {
        view(self, tags)
    }

    pub fn toggle_view(&mut self, tags: u32) -> Outcome {
        toggle_view(self, tags)
    }

    pub fn tag(&mut self, tags: u32) -> Outcome {
        tag(self, tags)
    }

    pub fn toggle_tag(&mut self, tags: u32) -> Outcome {
        toggle_tag(self, tags)
    }

    // Focus operations - delegated to state/focus.rs

    pub fn focus(&mut self, target: Option<ClientId>) -> FocusChange {
        focus(self, target)
    }

    pub fn focus_stack(&mut self, delta: i32) -> Outcome {
        focus_stack(self, delta)
    }

    pub fn zoom(&mut self) -> Outcome {
        zoom(self)
    }

    pub fn focus_mon(&mut self, delta: i32) -> Outcome {
        focus_mon(self, delta)
    }

    pub fn tag_mon(&mut self, delta: i32) -> Outcome {
        tag_mon(self, delta)
    }

    pub fn send_to_monitor(&mut self, id: ClientId, monitor: usize) -> Outcome {
        send_to_monitor(self, id, monitor)
    }

    /// Selects the monitor under the pointer when it differs from the
    /// selected one.
    pub fn pointer_moved(&mut self, x: i32, y: i32) -> Outcome {
        self.pointer = (x, y);
        let target = self.monitor_at(x, y);
        if target == self.selected_monitor {
            return Outcome::default();
        }
        let previous = self.selected_client();
        tracing::debug!("Pointer entered monitor {}", target);
        self.selected_monitor = target;
        let mut change = focus(self, None);
        change.previous = previous;
        Outcome {
            focus: Some(change),
            bars_changed: true,
            ..Outcome::default()
        }
    }

    // Layout operations - delegated to state/layout.rs

    pub fn arrange(&mut self, monitor: usize) -> Outcome {
        arrange_monitor(self, monitor)
    }

    pub fn arrange_all(&mut self) -> Outcome {
        arrange_all(self)
    }

    pub fn restack(&self, monitor: usize) -> Option<Restack> {
        restack(self, monitor)
    }

    pub fn set_layout(&mut self, index: Option<usize>) -> Outcome {
        set_layout(self, index)
    }

    pub fn inc_nmaster(&mut self, delta: i32) -> Outcome {
        inc_nmaster(self, delta)
    }

    pub fn set_mfact(&mut self, delta: f32) -> Outcome {
        set_mfact(self, delta)
    }

    pub fn set_gaps(&mut self, delta: i32) -> Outcome {
        set_gaps(self, delta)
    }

    pub fn toggle_bar(&mut self) -> Outcome {
        toggle_bar(self)
    }

    pub fn toggle_floating(&mut self) -> Outcome {
        toggle_floating(self)
    }

    pub fn tiled_clients(&self, monitor: usize) -> Vec<ClientId> {
        tiled_clients(self, monitor).into_iter().map(|c| c.id).collect()
    }

    // Pointer drags - delegated to state/drag.rs

    pub fn begin_drag(&mut self, kind: DragKind) -> Option<(Drag, Outcome)> {
        begin_drag(self, kind)
    }

    pub fn drag_motion(&mut self, x: i32, y: i32) -> Outcome {
        drag_motion(self, x, y)
    }

    pub fn end_drag(&mut self) -> Option<(Drag, Outcome)> {
        end_drag(self)
    }
}
