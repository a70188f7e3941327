use crate::core::{
    ClientId, ConfigureRequest, DragKind, Rect, Restack, WindowAttributes, WindowMove,
};

/// Trait for querying windows and outputs from the window system.
/// This abstraction allows mocking in tests.
pub trait WindowSystem {
    /// Output rectangles, in the order the window system reports them.
    fn monitor_frames(&self) -> Vec<Rect>;
    /// Mapped (or iconic) top-level windows present before startup.
    fn existing_windows(&self) -> Vec<WindowAttributes>;
    fn pointer_position(&self) -> Option<(i32, i32)>;
}

/// Trait for manipulating windows (side effects).
/// This abstraction allows mocking in tests.
pub trait WindowManipulator {
    fn apply_window_moves(&self, moves: &[WindowMove]);
    /// Raises `raise` and stacks `tiled` below the monitor's bar.
    fn restack(&self, restack: &Restack);
    /// Moves input focus and border colors from `previous` to `current`.
    /// `None` as current gives focus back to the root window.
    fn set_focus(&self, previous: Option<ClientId>, current: Option<ClientId>);
    /// Takes a window over: border, event masks, button grabs, map.
    fn manage_window(&self, window_id: ClientId, frame: &Rect, border_width: u32);
    /// Gives a window back. A destroyed window needs no cleanup.
    fn release_window(&self, window_id: ClientId, destroyed: bool);
    fn send_configure(&self, window_id: ClientId, frame: &Rect, border_width: u32);
    fn forward_configure(&self, request: &ConfigureRequest);
    fn close_window(&self, window_id: ClientId);
    fn spawn(&self, argv: &[String]) -> Result<(), String>;
    fn signal_process(&self, process: &str, value: i32) -> Result<(), String>;
    fn begin_drag(&self, kind: DragKind, warp_to: Option<(i32, i32)>);
    fn end_drag(&self);
    /// Positions one bar window per monitor.
    fn update_bars(&self, bars: &[Rect]);
}
