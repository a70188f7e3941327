use x11rb::protocol::xproto::*;
use x11rb::protocol::Event as XEvent;
use x11rb::wrapper::ConnectionExt as _;

use super::atoms::WITHDRAWN_STATE;
use super::X11Backend;
use crate::core::ConfigureRequest;
use crate::event::{ButtonSource, Event};

/// Pointer motion is processed at most this often (milliseconds).
const MOTION_INTERVAL: Timestamp = 1000 / 60;

const SYNTHETIC_FLAG: u8 = 0x80;

impl X11Backend {
    /// Turns a raw protocol event into a window manager event. Events the
    /// core has no interest in are handled here or dropped.
    pub fn translate(&self, event: XEvent) -> Option<Event> {
        match event {
            XEvent::MapRequest(e) => {
                let Some(attrs) = self.window_attributes(e.window) else {
                    tracing::trace!("Window {} vanished before it could be mapped", e.window);
                    return None;
                };
                Some(Event::MapRequest(attrs))
            }
            XEvent::UnmapNotify(e) => {
                if e.response_type & SYNTHETIC_FLAG != 0 {
                    // ICCCM 4.1.4: the client withdraws the window itself
                    self.set_wm_state(e.window, WITHDRAWN_STATE);
                    return None;
                }
                Some(Event::WindowGone {
                    window_id: e.window,
                    destroyed: false,
                })
            }
            XEvent::DestroyNotify(e) => Some(Event::WindowGone {
                window_id: e.window,
                destroyed: true,
            }),
            XEvent::KeyPress(e) => Some(Event::KeyPress {
                modifiers: self.modifiers(e.state),
                keysym: self.keyboard.borrow().keysym(e.detail),
            }),
            XEvent::ButtonPress(e) => {
                let source = if let Some(monitor) = self.bar_monitor(e.event) {
                    ButtonSource::Bar {
                        monitor,
                        x: e.event_x as i32,
                    }
                } else if e.event == self.root {
                    ButtonSource::Root
                } else {
                    // unfreeze the pointer grabbed on unfocused clients
                    if let Err(err) = self.conn.allow_events(Allow::REPLAY_POINTER, e.time) {
                        tracing::warn!("Failed to replay pointer event: {}", err);
                    }
                    ButtonSource::Client(e.event)
                };
                Some(Event::ButtonPress {
                    source,
                    modifiers: self.modifiers(e.state),
                    button: e.detail,
                    root_x: e.root_x as i32,
                    root_y: e.root_y as i32,
                })
            }
            XEvent::ButtonRelease(e) => Some(Event::ButtonRelease { button: e.detail }),
            XEvent::MotionNotify(e) => {
                if e.event != self.root
                    || e.time.wrapping_sub(self.last_motion.get()) < MOTION_INTERVAL
                {
                    return None;
                }
                self.last_motion.set(e.time);
                Some(Event::PointerMotion {
                    root_x: e.root_x as i32,
                    root_y: e.root_y as i32,
                })
            }
            XEvent::EnterNotify(e) => {
                let crossing_only =
                    e.mode != NotifyMode::NORMAL || e.detail == NotifyDetail::INFERIOR;
                if crossing_only && e.event != self.root {
                    return None;
                }
                Some(Event::EnterWindow {
                    window_id: (e.event != self.root).then_some(e.event),
                    root_x: e.root_x as i32,
                    root_y: e.root_y as i32,
                })
            }
            XEvent::FocusIn(e) => Some(Event::FocusIn { window_id: e.event }),
            XEvent::ConfigureRequest(e) => Some(Event::ConfigureRequest(configure_request(&e))),
            XEvent::ConfigureNotify(e) if e.window == self.root => Some(Event::MonitorsChanged {
                frames: crate::platform::WindowSystem::monitor_frames(self),
            }),
            XEvent::PropertyNotify(e) => self.property_changed(&e),
            XEvent::MappingNotify(e) => {
                if e.request == Mapping::KEYBOARD {
                    if let Err(err) = self.refresh_keyboard() {
                        tracing::warn!("Failed to refresh the keyboard mapping: {}", err);
                    }
                }
                None
            }
            XEvent::Error(e) => {
                // windows routinely vanish between request and reply
                tracing::debug!(
                    "X error {:?} (request {}, value {})",
                    e.error_kind,
                    e.major_opcode,
                    e.bad_value
                );
                None
            }
            _ => None,
        }
    }

    fn property_changed(&self, e: &PropertyNotifyEvent) -> Option<Event> {
        if e.window == self.root && e.atom == u32::from(AtomEnum::WM_NAME) {
            return Some(Event::StatusText {
                text: self.status_text(),
            });
        }
        if e.state == Property::DELETE {
            return None;
        }
        if e.atom == u32::from(AtomEnum::WM_NAME) || e.atom == self.atoms._NET_WM_NAME {
            Some(Event::TitleChanged {
                window_id: e.window,
                title: self.title(e.window),
            })
        } else if e.atom == u32::from(AtomEnum::WM_NORMAL_HINTS) {
            Some(Event::SizeHintsChanged {
                window_id: e.window,
                hints: self.size_hints(e.window),
            })
        } else {
            None
        }
    }

    pub(super) fn set_wm_state(&self, window: Window, state: u32) {
        let result = self.conn.change_property32(
            PropMode::REPLACE,
            window,
            self.atoms.WM_STATE,
            self.atoms.WM_STATE,
            &[state, x11rb::NONE],
        );
        if let Err(e) = result {
            tracing::warn!("Failed to set WM_STATE on {}: {}", window, e);
        }
    }
}

fn configure_request(e: &ConfigureRequestEvent) -> ConfigureRequest {
    let mask = u16::from(e.value_mask);
    let has = |flag: ConfigWindow| mask & u16::from(flag) != 0;
    ConfigureRequest {
        window_id: e.window,
        x: has(ConfigWindow::X).then_some(e.x as i32),
        y: has(ConfigWindow::Y).then_some(e.y as i32),
        width: has(ConfigWindow::WIDTH).then_some(e.width as u32),
        height: has(ConfigWindow::HEIGHT).then_some(e.height as u32),
        border_width: has(ConfigWindow::BORDER_WIDTH).then_some(e.border_width as u32),
        sibling: has(ConfigWindow::SIBLING).then_some(e.sibling),
        stack_mode: has(ConfigWindow::STACK_MODE).then_some(u32::from(e.stack_mode)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value_mask: ConfigWindow) -> ConfigureRequestEvent {
        ConfigureRequestEvent {
            response_type: CONFIGURE_REQUEST_EVENT,
            stack_mode: StackMode::ABOVE,
            sequence: 0,
            parent: 1,
            window: 42,
            sibling: 7,
            x: -5,
            y: 20,
            width: 640,
            height: 480,
            border_width: 3,
            value_mask,
        }
    }

    #[test]
    fn test_configure_request_only_keeps_masked_fields() {
        let parsed = configure_request(&request(ConfigWindow::X | ConfigWindow::WIDTH));
        assert_eq!(parsed.window_id, 42);
        assert_eq!(parsed.x, Some(-5));
        assert_eq!(parsed.y, None);
        assert_eq!(parsed.width, Some(640));
        assert_eq!(parsed.height, None);
        assert_eq!(parsed.border_width, None);
        assert_eq!(parsed.stack_mode, None);
    }

    #[test]
    fn test_configure_request_stacking() {
        let parsed = configure_request(&request(
            ConfigWindow::SIBLING | ConfigWindow::STACK_MODE | ConfigWindow::BORDER_WIDTH,
        ));
        assert_eq!(parsed.sibling, Some(7));
        assert_eq!(parsed.stack_mode, Some(u32::from(StackMode::ABOVE)));
        assert_eq!(parsed.border_width, Some(3));
        assert_eq!(parsed.x, None);
    }
}
