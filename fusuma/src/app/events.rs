use crate::core::bar::BarRegions;
use crate::core::{
    ClickTarget, ClientId, ConfigureReply, FocusChange, Modifiers, State, WindowAttributes,
};
use crate::effect::Effect;
use crate::event::{ButtonSource, Event};

use super::command::run_action;

/// Pure function: turns one window system event into effects.
/// Like `process_command`, only the state is mutated here.
pub fn process_event(state: &mut State, event: Event) -> Vec<Effect> {
    match event {
        Event::MapRequest(attrs) => map_request(state, &attrs),
        Event::WindowGone {
            window_id,
            destroyed,
        } => window_gone(state, window_id, destroyed),
        Event::KeyPress { modifiers, keysym } => {
            let Some(action) = state.config.bindings.match_key(modifiers, keysym).cloned() else {
                tracing::trace!("No key binding for {:#x}", keysym);
                return vec![];
            };
            tracing::debug!("Key {:#x} -> {}", keysym, action);
            run_action(state, &action)
        }
        Event::ButtonPress {
            source,
            modifiers,
            button,
            root_x,
            root_y,
        } => button_press(state, source, modifiers, button, (root_x, root_y)),
        Event::ButtonRelease { .. } => match state.end_drag() {
            Some((_, outcome)) => {
                let mut effects = vec![Effect::EndDrag];
                effects.extend(Effect::from_outcome(outcome));
                effects
            }
            None => vec![],
        },
        Event::PointerMotion { root_x, root_y } => {
            let outcome = if state.drag.is_some() {
                state.drag_motion(root_x, root_y)
            } else {
                state.pointer_moved(root_x, root_y)
            };
            Effect::from_outcome(outcome)
        }
        Event::EnterWindow {
            window_id,
            root_x,
            root_y,
        } => enter_window(state, window_id, (root_x, root_y)),
        Event::FocusIn { window_id } => {
            // some clients steal focus; give it back to the selection
            match state.selected_client() {
                Some(sel) if sel != window_id => vec![Effect::Focus(FocusChange {
                    previous: None,
                    current: Some(sel),
                })],
                _ => vec![],
            }
        }
        Event::ConfigureRequest(request) => match state.configure_request(&request) {
            ConfigureReply::Forward => vec![Effect::ForwardConfigure(request)],
            ConfigureReply::Accepted => vec![],
            ConfigureReply::Notify => vec![Effect::SendConfigure {
                window_id: request.window_id,
            }],
            ConfigureReply::Moved {
                window_move,
                notify,
            } => {
                let mut effects = Vec::new();
                if notify {
                    effects.push(Effect::SendConfigure {
                        window_id: request.window_id,
                    });
                }
                if let Some(window_move) = window_move {
                    effects.push(Effect::ApplyWindowMoves(vec![window_move]));
                }
                effects
            }
        },
        Event::TitleChanged { window_id, title } => {
            if state.update_title(window_id, &title) {
                vec![Effect::UpdateBars]
            } else {
                vec![]
            }
        }
        Event::SizeHintsChanged { window_id, hints } => {
            state.update_size_hints(window_id, hints);
            vec![]
        }
        Event::StatusText { text } => {
            state.status_text = if text.is_empty() {
                format!("fusuma-{}", env!("CARGO_PKG_VERSION"))
            } else {
                text
            };
            vec![Effect::UpdateBars]
        }
        Event::MonitorsChanged { frames } => {
            tracing::info!("Outputs changed: {} reported", frames.len());
            Effect::from_outcome(state.monitors_changed(&frames))
        }
    }
}

fn map_request(state: &mut State, attrs: &WindowAttributes) -> Vec<Effect> {
    let Some(outcome) = state.manage(attrs) else {
        tracing::trace!("Not managing window {}", attrs.id);
        return vec![];
    };
    let Some(client) = state.clients.get(&attrs.id) else {
        return Effect::from_outcome(outcome);
    };

    // map the window where the arrange put it
    let frame = outcome
        .moves
        .iter()
        .rev()
        .find(|m| m.window_id == attrs.id)
        .map(|m| m.frame)
        .unwrap_or(client.frame);
    let mut effects = vec![Effect::ManageWindow {
        window_id: client.id,
        frame,
        border_width: client.border_width,
    }];
    effects.extend(Effect::from_outcome(outcome));
    effects
}

fn window_gone(state: &mut State, window_id: ClientId, destroyed: bool) -> Vec<Effect> {
    if !state.clients.contains_key(&window_id) {
        return vec![];
    }
    let dragged = state.drag.as_ref().is_some_and(|d| d.client == window_id);
    let mut effects = vec![Effect::ReleaseWindow {
        window_id,
        destroyed,
    }];
    if dragged {
        effects.push(Effect::EndDrag);
    }
    effects.extend(Effect::from_outcome(state.unmanage(window_id)));
    effects
}

fn button_press(
    state: &mut State,
    source: ButtonSource,
    modifiers: Modifiers,
    button: u8,
    (root_x, root_y): (i32, i32),
) -> Vec<Effect> {
    state.pointer = (root_x, root_y);
    let mut effects = Vec::new();

    let (target, clicked_tag) = match source {
        ButtonSource::Bar { monitor, x } => {
            if monitor != state.selected_monitor && monitor < state.monitors.len() {
                let previous = state.selected_client();
                state.selected_monitor = monitor;
                let mut change = state.focus(None);
                change.previous = previous;
                effects.push(Effect::Focus(change));
                effects.push(Effect::UpdateBars);
            }
            let Some(mon) = state.monitors.get(monitor) else {
                return effects;
            };
            let bar = mon.bar_rect(state.config.bar_height);
            let regions = BarRegions::compute(
                &state.config,
                &mon.layout_symbol,
                &state.status_text,
                bar.width,
            );
            let hit = regions.hit(x, &state.status_text);
            if hit.target == ClickTarget::StatusText {
                state.status_segment = hit.segment;
            }
            (hit.target, hit.tag)
        }
        ButtonSource::Client(id) if state.clients.contains_key(&id) => {
            let change = state.focus(Some(id));
            effects.push(Effect::Focus(change));
            if let Some(restack) = state.restack(state.selected_monitor) {
                effects.push(Effect::Restack(restack));
            }
            effects.push(Effect::UpdateBars);
            (ClickTarget::ClientWindow, None)
        }
        ButtonSource::Client(_) | ButtonSource::Root => {
            effects.extend(Effect::from_outcome(state.pointer_moved(root_x, root_y)));
            (ClickTarget::RootWindow, None)
        }
    };

    if let Some(action) = state
        .config
        .bindings
        .match_button(target, modifiers, button, clicked_tag)
    {
        tracing::debug!("Button {} on {:?} -> {}", button, target, action);
        effects.extend(run_action(state, &action));
    }
    effects
}

/// Focus follows the pointer across client windows and monitors.
fn enter_window(
    state: &mut State,
    window_id: Option<ClientId>,
    (root_x, root_y): (i32, i32),
) -> Vec<Effect> {
    if state.drag.is_some() {
        return vec![];
    }
    state.pointer = (root_x, root_y);

    let client = window_id.filter(|id| state.clients.contains_key(id));
    let monitor = match client.and_then(|id| state.clients.get(&id)) {
        Some(c) => c.monitor,
        None => state.monitor_at(root_x, root_y),
    };
    let previous = state.selected_client();
    if monitor != state.selected_monitor {
        state.selected_monitor = monitor;
    } else if client.is_none() || client == previous {
        return vec![];
    }

    let mut change = state.focus(client);
    change.previous = previous;
    vec![Effect::Focus(change), Effect::UpdateBars]
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::core::keysym::{XK_J, XK_RETURN};
    use crate::core::{Config, ConfigureRequest, Rect, WindowMove};
    use crate::platform::mock::{create_test_window, MockWindowSystem};

    fn setup_state() -> State {
        let ws = MockWindowSystem::new()
            .with_monitors(vec![
                Rect::new(0, 0, 1920, 1080),
                Rect::new(1920, 0, 1280, 1024),
            ])
            .with_windows(vec![
                create_test_window(100, "St", "st", 0, 0, 800, 600),
                create_test_window(101, "St", "st", 100, 100, 800, 600),
            ])
            .with_pointer(10, 10);
        let mut state = State::new(Rc::new(Config::default()));
        state.sync_all(&ws);
        state
    }

    fn bar_click(state: &mut State, x: i32, modifiers: Modifiers, button: u8) -> Vec<Effect> {
        process_event(
            state,
            Event::ButtonPress {
                source: ButtonSource::Bar { monitor: 0, x },
                modifiers,
                button,
                root_x: x,
                root_y: 5,
            },
        )
    }

    #[test]
    fn test_map_request_manages_at_arranged_frame() {
        let mut state = setup_state();
        let effects = process_event(
            &mut state,
            Event::MapRequest(create_test_window(200, "St", "st", 0, 0, 300, 200)),
        );
        let Some(Effect::ManageWindow {
            window_id, frame, ..
        }) = effects.first()
        else {
            panic!("expected ManageWindow first, got {:?}", effects);
        };
        assert_eq!(*window_id, 200);
        assert_eq!(*frame, state.clients[&200].frame);
        // new clients become master
        assert_eq!(frame.x, 10);
        assert_eq!(state.selected_client(), Some(200));
    }

    #[test]
    fn test_map_request_for_managed_window_is_ignored() {
        let mut state = setup_state();
        let effects = process_event(
            &mut state,
            Event::MapRequest(create_test_window(100, "St", "st", 0, 0, 300, 200)),
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn test_window_gone_releases_and_refocuses() {
        let mut state = setup_state();
        let effects = process_event(
            &mut state,
            Event::WindowGone {
                window_id: 101,
                destroyed: true,
            },
        );
        assert_eq!(
            effects[0],
            Effect::ReleaseWindow {
                window_id: 101,
                destroyed: true
            }
        );
        assert_eq!(state.selected_client(), Some(100));
        assert!(process_event(
            &mut state,
            Event::WindowGone {
                window_id: 101,
                destroyed: true
            }
        )
        .is_empty());
    }

    #[test]
    fn test_key_press_runs_first_binding() {
        let mut state = setup_state();
        assert_eq!(state.selected_client(), Some(101));
        process_event(
            &mut state,
            Event::KeyPress {
                modifiers: Modifiers::ALT,
                keysym: XK_J,
            },
        );
        assert_eq!(state.selected_client(), Some(100));

        // unbound combination
        let effects = process_event(
            &mut state,
            Event::KeyPress {
                modifiers: Modifiers::NONE,
                keysym: XK_J,
            },
        );
        assert!(effects.is_empty());

        let effects = process_event(
            &mut state,
            Event::KeyPress {
                modifiers: Modifiers::ALT,
                keysym: XK_RETURN,
            },
        );
        assert_eq!(effects, vec![Effect::Spawn { argv: vec!["st".into()] }]);
    }

    #[test]
    fn test_tag_bar_click_views_clicked_tag() {
        let mut state = setup_state();
        let regions = BarRegions::compute(&state.config, "[]=", &state.status_text, 1920);
        let x = (0..200)
            .find(|&x| regions.hit(x, "").tag == Some(0b10))
            .unwrap();
        bar_click(&mut state, x, Modifiers::NONE, 1);
        assert_eq!(state.monitors[0].visible_tags.mask(), 0b10);

        // alt-click tags the selection with the clicked tag
        bar_click(&mut state, 0, Modifiers::NONE, 1);
        assert_eq!(state.selected_client(), Some(101));
        bar_click(&mut state, x, Modifiers::ALT, 1);
        assert_eq!(state.clients[&101].tags.mask(), 0b10);
    }

    #[test]
    fn test_status_click_signals_segment() {
        let mut state = setup_state();
        process_event(
            &mut state,
            Event::StatusText {
                text: "\u{1}vol\u{2}bat".to_string(),
            },
        );
        // the status text ends at the right edge of the bar
        let effects = bar_click(&mut state, 1915, Modifiers::NONE, 3);
        assert_eq!(state.status_segment, 2);
        assert_eq!(
            effects,
            vec![Effect::SignalStatusBar {
                value: (2 << 8) | 3
            }]
        );
    }

    #[test]
    fn test_empty_status_text_falls_back() {
        let mut state = setup_state();
        process_event(
            &mut state,
            Event::StatusText {
                text: String::new(),
            },
        );
        assert!(state.status_text.starts_with("fusuma-"));
    }

    #[test]
    fn test_client_click_focuses_and_drags() {
        let mut state = setup_state();
        let effects = process_event(
            &mut state,
            Event::ButtonPress {
                source: ButtonSource::Client(100),
                modifiers: Modifiers::ALT,
                button: 1,
                root_x: 1500,
                root_y: 800,
            },
        );
        assert_eq!(state.selected_client(), Some(100));
        assert!(effects.iter().any(|e| matches!(e, Effect::Restack(_))));
        assert!(matches!(
            effects.last(),
            Some(Effect::BeginDrag { warp_to: None, .. })
        ));
        assert!(state.drag.is_some());

        let effects = process_event(&mut state, Event::ButtonRelease { button: 1 });
        assert_eq!(effects[0], Effect::EndDrag);
        assert!(state.drag.is_none());
    }

    #[test]
    fn test_release_without_drag_is_ignored() {
        let mut state = setup_state();
        assert!(process_event(&mut state, Event::ButtonRelease { button: 1 }).is_empty());
    }

    #[test]
    fn test_pointer_motion_switches_monitor() {
        let mut state = setup_state();
        let effects = process_event(
            &mut state,
            Event::PointerMotion {
                root_x: 2000,
                root_y: 400,
            },
        );
        assert_eq!(state.selected_monitor, 1);
        assert!(effects.contains(&Effect::UpdateBars));
    }

    #[test]
    fn test_enter_window_focuses_client() {
        let mut state = setup_state();
        let effects = process_event(
            &mut state,
            Event::EnterWindow {
                window_id: Some(100),
                root_x: 1500,
                root_y: 800,
            },
        );
        assert_eq!(state.selected_client(), Some(100));
        assert_eq!(
            effects[0],
            Effect::Focus(FocusChange {
                previous: Some(101),
                current: Some(100)
            })
        );

        // entering the selection again changes nothing
        let effects = process_event(
            &mut state,
            Event::EnterWindow {
                window_id: Some(100),
                root_x: 1500,
                root_y: 800,
            },
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn test_enter_root_on_other_monitor() {
        let mut state = setup_state();
        process_event(
            &mut state,
            Event::EnterWindow {
                window_id: None,
                root_x: 2500,
                root_y: 500,
            },
        );
        assert_eq!(state.selected_monitor, 1);
        assert_eq!(state.selected_client(), None);
    }

    #[test]
    fn test_focus_in_reasserts_selection() {
        let mut state = setup_state();
        let effects = process_event(&mut state, Event::FocusIn { window_id: 999 });
        assert_eq!(
            effects,
            vec![Effect::Focus(FocusChange {
                previous: None,
                current: Some(101)
            })]
        );
        assert!(process_event(&mut state, Event::FocusIn { window_id: 101 }).is_empty());
    }

    #[test]
    fn test_configure_request_replies() {
        let mut state = setup_state();
        let unmanaged = ConfigureRequest {
            window_id: 999,
            width: Some(50),
            ..Default::default()
        };
        assert_eq!(
            process_event(&mut state, Event::ConfigureRequest(unmanaged)),
            vec![Effect::ForwardConfigure(unmanaged)]
        );

        let tiled = ConfigureRequest {
            window_id: 100,
            width: Some(50),
            ..Default::default()
        };
        assert_eq!(
            process_event(&mut state, Event::ConfigureRequest(tiled)),
            vec![Effect::SendConfigure { window_id: 100 }]
        );
    }

    #[test]
    fn test_floating_configure_request_moves() {
        let mut state = setup_state();
        state.set_layout(Some(1));
        let effects = process_event(
            &mut state,
            Event::ConfigureRequest(ConfigureRequest {
                window_id: 101,
                x: Some(40),
                y: Some(60),
                ..Default::default()
            }),
        );
        assert_eq!(
            effects,
            vec![
                Effect::SendConfigure { window_id: 101 },
                Effect::ApplyWindowMoves(vec![WindowMove {
                    window_id: 101,
                    frame: state.clients[&101].frame,
                }]),
            ]
        );
    }

    #[test]
    fn test_title_change_redraws_only_for_selection() {
        let mut state = setup_state();
        let effects = process_event(
            &mut state,
            Event::TitleChanged {
                window_id: 101,
                title: "vim".to_string(),
            },
        );
        assert_eq!(effects, vec![Effect::UpdateBars]);
        assert_eq!(state.clients[&101].title, "vim");

        let effects = process_event(
            &mut state,
            Event::TitleChanged {
                window_id: 100,
                title: "htop".to_string(),
            },
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn test_monitor_removed() {
        let mut state = setup_state();
        let effects = process_event(
            &mut state,
            Event::MonitorsChanged {
                frames: vec![Rect::new(0, 0, 1920, 1080)],
            },
        );
        assert_eq!(state.monitors.len(), 1);
        assert!(effects.contains(&Effect::UpdateBars));
    }
}
