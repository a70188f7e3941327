mod atoms;
mod keyboard;
mod manipulator;
mod process;
mod properties;
mod translate;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use x11rb::connection::Connection;
use x11rb::cursor::Handle as CursorHandle;
use x11rb::protocol::xinerama::ConnectionExt as _;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use crate::core::{Config, Modifiers, Rect, WindowAttributes};
use crate::platform::WindowSystem;
use atoms::{Atoms, ICONIC_STATE};
use keyboard::{numlock_mask, KeyboardMap};
use properties::{parse_color, parse_size_hints, parse_wm_class, title_from_bytes};

fn root_event_mask() -> EventMask {
    EventMask::SUBSTRUCTURE_REDIRECT
        | EventMask::SUBSTRUCTURE_NOTIFY
        | EventMask::BUTTON_PRESS
        | EventMask::POINTER_MOTION
        | EventMask::ENTER_WINDOW
        | EventMask::LEAVE_WINDOW
        | EventMask::STRUCTURE_NOTIFY
        | EventMask::PROPERTY_CHANGE
}

struct Cursors {
    normal: Cursor,
    moving: Cursor,
    resizing: Cursor,
}

struct Colors {
    norm_border: u32,
    sel_border: u32,
    bar_background: u32,
}

/// The X server as seen by the window manager: queries, side effects
/// and translation of raw protocol events.
pub struct X11Backend {
    conn: Arc<RustConnection>,
    root: Window,
    screen_num: usize,
    atoms: Atoms,
    config: Rc<Config>,
    keyboard: RefCell<KeyboardMap>,
    numlock_mask: Cell<u16>,
    cursors: Cursors,
    colors: Colors,
    xinerama: bool,
    /// One bar window per monitor, by monitor index.
    bars: RefCell<Vec<Window>>,
    last_motion: Cell<Timestamp>,
}

impl X11Backend {
    /// Connects to `$DISPLAY` and becomes its window manager.
    pub fn connect(config: Rc<Config>) -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None).context("Failed to open the X display")?;
        let root = conn.setup().roots[screen_num].root;

        // only one client may select substructure redirect on the root
        conn.change_window_attributes(
            root,
            &ChangeWindowAttributesAux::new().event_mask(EventMask::SUBSTRUCTURE_REDIRECT),
        )?
        .check()
        .context("Another window manager is already running")?;

        let atoms = Atoms::new(&conn)?.reply()?;
        let cursor_handle = CursorHandle::new(
            &conn,
            screen_num,
            &x11rb::resource_manager::new_from_default(&conn)?,
        )?
        .reply()?;
        let cursors = Cursors {
            normal: cursor_handle.load_cursor(&conn, "left_ptr")?,
            moving: cursor_handle.load_cursor(&conn, "fleur")?,
            resizing: cursor_handle.load_cursor(&conn, "sizing")?,
        };

        conn.change_window_attributes(
            root,
            &ChangeWindowAttributesAux::new()
                .cursor(cursors.normal)
                .event_mask(root_event_mask()),
        )?
        .check()
        .context("Failed to select root window events")?;

        let xinerama = conn
            .xinerama_is_active()
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .is_some_and(|reply| reply.state != 0);
        tracing::info!("Connected to X screen {} (xinerama: {})", screen_num, xinerama);

        let keyboard = KeyboardMap::query(&conn)?;
        let numlock = numlock_mask(&conn, &keyboard)?;

        let colors = Colors {
            norm_border: color_pixel(&config.norm.border),
            sel_border: color_pixel(&config.sel.border),
            bar_background: color_pixel(&config.norm.bg),
        };

        let backend = Self {
            conn: Arc::new(conn),
            root,
            screen_num,
            atoms,
            config,
            keyboard: RefCell::new(keyboard),
            numlock_mask: Cell::new(numlock),
            cursors,
            colors,
            xinerama,
            bars: RefCell::new(Vec::new()),
            last_motion: Cell::new(0),
        };
        backend.grab_keys()?;
        backend.conn.flush()?;
        Ok(backend)
    }

    /// Shared handle for the event reader thread.
    pub fn connection(&self) -> Arc<RustConnection> {
        Arc::clone(&self.conn)
    }

    pub fn flush(&self) {
        if let Err(e) = self.conn.flush() {
            tracing::warn!("Failed to flush the X connection: {}", e);
        }
    }

    /// Lock and Num Lock combinations every grab is repeated with.
    fn ignored_modifiers(&self) -> [u16; 4] {
        let numlock = self.numlock_mask.get();
        let lock = u16::from(ModMask::LOCK);
        [0, lock, numlock, numlock | lock]
    }

    fn grab_keys(&self) -> Result<()> {
        self.conn.ungrab_key(Grab::ANY, self.root, ModMask::ANY)?;
        let keyboard = self.keyboard.borrow();
        for binding in &self.config.bindings.keys {
            for keycode in keyboard.keycodes(binding.keysym) {
                for ignored in self.ignored_modifiers() {
                    self.conn.grab_key(
                        true,
                        self.root,
                        ModMask::from(binding.modifiers.to_mask() | ignored),
                        keycode,
                        GrabMode::ASYNC,
                        GrabMode::ASYNC,
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Re-reads the keyboard mapping after a `MappingNotify`.
    fn refresh_keyboard(&self) -> Result<()> {
        let keyboard = KeyboardMap::query(self.conn.as_ref())?;
        self.numlock_mask
            .set(numlock_mask(self.conn.as_ref(), &keyboard)?);
        *self.keyboard.borrow_mut() = keyboard;
        self.grab_keys()
    }

    /// Focused windows only get the bound buttons, unfocused ones grab
    /// every button so a click can focus them.
    fn grab_buttons(&self, window: Window, focused: bool) -> Result<()> {
        self.conn
            .ungrab_button(ButtonIndex::ANY, window, ModMask::ANY)?;
        if !focused {
            self.conn.grab_button(
                false,
                window,
                EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE,
                GrabMode::SYNC,
                GrabMode::SYNC,
                x11rb::NONE,
                x11rb::NONE,
                ButtonIndex::ANY,
                ModMask::ANY,
            )?;
        }
        for binding in self.config.bindings.client_buttons() {
            for ignored in self.ignored_modifiers() {
                self.conn.grab_button(
                    false,
                    window,
                    EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE,
                    GrabMode::ASYNC,
                    GrabMode::SYNC,
                    x11rb::NONE,
                    x11rb::NONE,
                    ButtonIndex::from(binding.button),
                    ModMask::from(binding.modifiers.to_mask() | ignored),
                )?;
            }
        }
        Ok(())
    }

    fn modifiers(&self, state: KeyButMask) -> Modifiers {
        Modifiers::from_mask(u16::from(state), self.numlock_mask.get())
    }

    fn property(
        &self,
        window: Window,
        property: impl Into<Atom>,
        type_: impl Into<Atom>,
    ) -> Option<GetPropertyReply> {
        self.conn
            .get_property(false, window, property, type_, 0, 1024)
            .ok()?
            .reply()
            .ok()
            .filter(|reply| !reply.value.is_empty())
    }

    fn title(&self, window: Window) -> String {
        let value = self
            .property(window, self.atoms._NET_WM_NAME, self.atoms.UTF8_STRING)
            .or_else(|| self.property(window, AtomEnum::WM_NAME, AtomEnum::ANY))
            .map(|reply| reply.value)
            .unwrap_or_default();
        title_from_bytes(&value)
    }

    fn status_text(&self) -> String {
        self.property(self.root, AtomEnum::WM_NAME, AtomEnum::ANY)
            .map(|reply| {
                String::from_utf8_lossy(&reply.value)
                    .trim_end_matches('\0')
                    .to_string()
            })
            .unwrap_or_default()
    }

    fn size_hints(&self, window: Window) -> Option<crate::core::SizeHints> {
        let reply = self.property(window, AtomEnum::WM_NORMAL_HINTS, AtomEnum::WM_SIZE_HINTS)?;
        let values: Vec<u32> = reply.value32()?.collect();
        parse_size_hints(&values)
    }

    fn transient_for(&self, window: Window) -> Option<Window> {
        self.property(window, AtomEnum::WM_TRANSIENT_FOR, AtomEnum::WINDOW)?
            .value32()?
            .next()
            .filter(|parent| *parent != x11rb::NONE)
    }

    fn wm_state(&self, window: Window) -> Option<u32> {
        self.property(window, self.atoms.WM_STATE, self.atoms.WM_STATE)?
            .value32()?
            .next()
    }

    fn supports_protocol(&self, window: Window, protocol: Atom) -> bool {
        self.property(window, self.atoms.WM_PROTOCOLS, AtomEnum::ATOM)
            .and_then(|reply| reply.value32().map(|mut atoms| atoms.any(|a| a == protocol)))
            .unwrap_or(false)
    }

    /// Everything the core needs to know about a window, `None` if it is
    /// already gone.
    fn window_attributes(&self, window: Window) -> Option<WindowAttributes> {
        let attributes = self.conn.get_window_attributes(window).ok()?.reply().ok()?;
        let geometry = self.conn.get_geometry(window).ok()?.reply().ok()?;
        let (instance, class) = self
            .property(window, AtomEnum::WM_CLASS, AtomEnum::STRING)
            .map(|reply| parse_wm_class(&reply.value))
            .unwrap_or_default();
        Some(WindowAttributes {
            id: window,
            class,
            instance,
            title: self.title(window),
            frame: Rect::new(
                geometry.x as i32,
                geometry.y as i32,
                geometry.width as u32,
                geometry.height as u32,
            ),
            size_hints: self.size_hints(window),
            transient_for: self.transient_for(window),
            override_redirect: attributes.override_redirect,
        })
    }

    fn bar_monitor(&self, window: Window) -> Option<usize> {
        self.bars.borrow().iter().position(|bar| *bar == window)
    }

    /// Destroys the bars and hands the input focus back to the root.
    pub fn shutdown(&self) {
        for bar in self.bars.borrow_mut().drain(..) {
            let _ = self.conn.destroy_window(bar);
        }
        let _ = self.conn.ungrab_key(Grab::ANY, self.root, ModMask::ANY);
        let _ = self
            .conn
            .set_input_focus(InputFocus::POINTER_ROOT, self.root, x11rb::CURRENT_TIME);
        self.flush();
    }
}

fn color_pixel(color: &str) -> u32 {
    parse_color(color).unwrap_or_else(|| {
        tracing::warn!("Invalid color {:?}, using black", color);
        0
    })
}

impl WindowSystem for X11Backend {
    fn monitor_frames(&self) -> Vec<Rect> {
        if self.xinerama {
            let screens = self
                .conn
                .xinerama_query_screens()
                .ok()
                .and_then(|cookie| cookie.reply().ok());
            if let Some(reply) = screens {
                if !reply.screen_info.is_empty() {
                    return reply
                        .screen_info
                        .iter()
                        .map(|s| {
                            Rect::new(s.x_org as i32, s.y_org as i32, s.width as u32, s.height as u32)
                        })
                        .collect();
                }
            }
            tracing::warn!("Xinerama query failed, using the whole screen");
        }
        let screen = &self.conn.setup().roots[self.screen_num];
        vec![Rect::new(
            0,
            0,
            screen.width_in_pixels as u32,
            screen.height_in_pixels as u32,
        )]
    }

    fn existing_windows(&self) -> Vec<WindowAttributes> {
        let children = match self.conn.query_tree(self.root).map(|c| c.reply()) {
            Ok(Ok(tree)) => tree.children,
            _ => {
                tracing::warn!("Failed to query existing windows");
                return vec![];
            }
        };

        let mut windows: Vec<WindowAttributes> = children
            .into_iter()
            .filter(|w| self.bar_monitor(*w).is_none())
            .filter(|w| {
                let viewable = self
                    .conn
                    .get_window_attributes(*w)
                    .ok()
                    .and_then(|cookie| cookie.reply().ok())
                    .is_some_and(|a| a.map_state == MapState::VIEWABLE);
                viewable || self.wm_state(*w) == Some(ICONIC_STATE)
            })
            .filter_map(|w| self.window_attributes(w))
            .filter(|attrs| !attrs.override_redirect)
            .collect();
        // parents before their transients
        windows.sort_by_key(|attrs| attrs.transient_for.is_some());
        windows
    }

    fn pointer_position(&self) -> Option<(i32, i32)> {
        let reply = self.conn.query_pointer(self.root).ok()?.reply().ok()?;
        Some((reply.root_x as i32, reply.root_y as i32))
    }
}
