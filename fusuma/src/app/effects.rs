use std::cell::RefCell;

use crate::core::{Rect, State};
use crate::effect::Effect;
use crate::platform::WindowManipulator;

/// Execute side effects. A failing effect does not stop the ones after
/// it; the first failure is returned once all of them ran.
pub fn execute_effects<M: WindowManipulator>(
    effects: Vec<Effect>,
    state: &RefCell<State>,
    manipulator: &M,
) -> Result<(), String> {
    let mut first_error = None;
    for effect in effects {
        match effect {
            Effect::ApplyWindowMoves(moves) => {
                manipulator.apply_window_moves(&moves);
            }
            Effect::Restack(restack) => {
                manipulator.restack(&restack);
            }
            Effect::Focus(change) => {
                manipulator.set_focus(change.previous, change.current);
            }
            Effect::ManageWindow {
                window_id,
                frame,
                border_width,
            } => {
                manipulator.manage_window(window_id, &frame, border_width);
            }
            Effect::ReleaseWindow {
                window_id,
                destroyed,
            } => {
                manipulator.release_window(window_id, destroyed);
            }
            Effect::CloseWindow { window_id } => {
                manipulator.close_window(window_id);
            }
            Effect::SendConfigure { window_id } => {
                // the client is told its current geometry
                let state = state.borrow();
                if let Some(client) = state.clients.get(&window_id) {
                    manipulator.send_configure(window_id, &client.frame, client.border_width);
                }
            }
            Effect::ForwardConfigure(request) => {
                manipulator.forward_configure(&request);
            }
            Effect::Spawn { argv } => {
                tracing::info!("Spawning {:?}", argv);
                if let Err(e) = manipulator.spawn(&argv) {
                    tracing::warn!("{}", e);
                    first_error.get_or_insert(e);
                }
            }
            Effect::SignalStatusBar { value } => {
                let process = state.borrow().config.status_process.clone();
                tracing::debug!("Signalling {} with {:#x}", process, value);
                if let Err(e) = manipulator.signal_process(&process, value) {
                    tracing::warn!("{}", e);
                    first_error.get_or_insert(e);
                }
            }
            Effect::BeginDrag { kind, warp_to } => {
                manipulator.begin_drag(kind, warp_to);
            }
            Effect::EndDrag => {
                manipulator.end_drag();
            }
            Effect::UpdateBars => {
                let state = state.borrow();
                let bar_height = state.config.bar_height;
                let bars: Vec<Rect> = state
                    .monitors
                    .iter()
                    .map(|m| m.bar_rect(bar_height))
                    .collect();
                manipulator.update_bars(&bars);
            }
            Effect::Quit => {
                tracing::info!("Leaving the event loop");
            }
        }
    }
    first_error.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::core::{Config, DragKind, FocusChange};
    use crate::platform::mock::{create_test_window, Call, MockWindowManipulator, MockWindowSystem};

    fn setup_state() -> RefCell<State> {
        let ws = MockWindowSystem::new()
            .with_monitors(vec![Rect::new(0, 0, 1920, 1080)])
            .with_windows(vec![create_test_window(100, "St", "st", 0, 0, 800, 600)]);
        let mut state = State::new(Rc::new(Config::default()));
        state.sync_all(&ws);
        RefCell::new(state)
    }

    #[test]
    fn test_send_configure_uses_current_frame() {
        let state = setup_state();
        let manipulator = MockWindowManipulator::new();
        execute_effects(
            vec![Effect::SendConfigure { window_id: 100 }],
            &state,
            &manipulator,
        )
        .unwrap();

        let frame = state.borrow().clients[&100].frame;
        assert_eq!(manipulator.calls(), vec![Call::SendConfigure(100, frame, 1)]);
    }

    #[test]
    fn test_send_configure_for_unknown_window_is_skipped() {
        let state = setup_state();
        let manipulator = MockWindowManipulator::new();
        execute_effects(
            vec![Effect::SendConfigure { window_id: 7 }],
            &state,
            &manipulator,
        )
        .unwrap();
        assert!(manipulator.calls().is_empty());
    }

    #[test]
    fn test_update_bars_places_one_bar_per_monitor() {
        let state = setup_state();
        let manipulator = MockWindowManipulator::new();
        execute_effects(vec![Effect::UpdateBars], &state, &manipulator).unwrap();
        assert_eq!(
            manipulator.calls(),
            vec![Call::UpdateBars(vec![Rect::new(0, 0, 1920, 26)])]
        );
    }

    #[test]
    fn test_signal_goes_to_status_process() {
        let state = setup_state();
        let manipulator = MockWindowManipulator::new();
        execute_effects(
            vec![Effect::SignalStatusBar { value: 0x201 }],
            &state,
            &manipulator,
        )
        .unwrap();
        assert_eq!(
            manipulator.calls(),
            vec![Call::SignalProcess("dwmblocks".to_string(), 0x201)]
        );
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let state = setup_state();
        let manipulator = MockWindowManipulator {
            fail_spawn: true,
            ..Default::default()
        };
        let result = execute_effects(
            vec![Effect::Spawn {
                argv: vec!["nonexistent".to_string()],
            }],
            &state,
            &manipulator,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_spawn_failure_does_not_skip_later_effects() {
        let state = setup_state();
        let manipulator = MockWindowManipulator {
            fail_spawn: true,
            ..Default::default()
        };
        let result = execute_effects(
            vec![
                Effect::Spawn {
                    argv: vec!["first".to_string()],
                },
                Effect::Spawn {
                    argv: vec!["second".to_string()],
                },
                Effect::CloseWindow { window_id: 100 },
            ],
            &state,
            &manipulator,
        );
        assert_eq!(result, Err("Failed to spawn first".to_string()));
        assert_eq!(
            manipulator.calls(),
            vec![
                Call::Spawn(vec!["first".to_string()]),
                Call::Spawn(vec!["second".to_string()]),
                Call::CloseWindow(100),
            ]
        );
    }

    #[test]
    fn test_effects_run_in_order() {
        let state = setup_state();
        let manipulator = MockWindowManipulator::new();
        execute_effects(
            vec![
                Effect::Focus(FocusChange {
                    previous: None,
                    current: Some(100),
                }),
                Effect::BeginDrag {
                    kind: DragKind::Resize,
                    warp_to: Some((10, 10)),
                },
                Effect::EndDrag,
                Effect::CloseWindow { window_id: 100 },
            ],
            &state,
            &manipulator,
        )
        .unwrap();
        assert_eq!(
            manipulator.calls(),
            vec![
                Call::SetFocus(None, Some(100)),
                Call::BeginDrag(DragKind::Resize, Some((10, 10))),
                Call::EndDrag,
                Call::CloseWindow(100),
            ]
        );
    }
}
