use crate::core::{ClientId, ConfigureRequest, Modifiers, Rect, SizeHints, WindowAttributes};

/// Where a pointer button went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonSource {
    /// A monitor's bar; `x` is relative to the bar's left edge.
    Bar { monitor: usize, x: i32 },
    Client(ClientId),
    Root,
}

/// Window system input, already decoded by the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    MapRequest(WindowAttributes),
    /// The window was destroyed or withdrew itself.
    WindowGone {
        window_id: ClientId,
        destroyed: bool,
    },
    KeyPress {
        modifiers: Modifiers,
        keysym: u32,
    },
    ButtonPress {
        source: ButtonSource,
        modifiers: Modifiers,
        button: u8,
        root_x: i32,
        root_y: i32,
    },
    ButtonRelease {
        button: u8,
    },
    PointerMotion {
        root_x: i32,
        root_y: i32,
    },
    /// The pointer crossed into a window. `None` is the root window.
    EnterWindow {
        window_id: Option<ClientId>,
        root_x: i32,
        root_y: i32,
    },
    FocusIn {
        window_id: ClientId,
    },
    ConfigureRequest(ConfigureRequest),
    TitleChanged {
        window_id: ClientId,
        title: String,
    },
    SizeHintsChanged {
        window_id: ClientId,
        hints: Option<SizeHints>,
    },
    StatusText {
        text: String,
    },
    MonitorsChanged {
        frames: Vec<Rect>,
    },
}
