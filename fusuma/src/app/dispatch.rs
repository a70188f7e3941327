use std::cell::RefCell;

use crate::core::State;
use crate::event::Event;
use crate::platform::{WindowManipulator, WindowSystem};
use fusuma_ipc::{Command, Response};

use super::command::process_command;
use super::effects::execute_effects;
use super::events::process_event;
use super::sync_helper::startup_effects;

/// Unified command dispatcher for IPC commands.
/// Handles the common pattern: process command -> execute effects -> respond.
pub fn dispatch_command<M: WindowManipulator>(
    cmd: &Command,
    state: &RefCell<State>,
    manipulator: &M,
) -> Response {
    let result = process_command(&mut state.borrow_mut(), cmd);

    if let Err(e) = execute_effects(result.effects, state, manipulator) {
        tracing::warn!("Command {:?} failed: {}", cmd, e);
        return Response::Error { message: e };
    }

    result.response
}

/// Same as `dispatch_command` for window system events. Failures are
/// logged, there is nobody to answer.
pub fn dispatch_event<M: WindowManipulator>(
    event: Event,
    state: &RefCell<State>,
    manipulator: &M,
) {
    let effects = process_event(&mut state.borrow_mut(), event);
    if let Err(e) = execute_effects(effects, state, manipulator) {
        tracing::warn!("{}", e);
    }
}

pub fn dispatch_startup<W: WindowSystem, M: WindowManipulator>(
    state: &RefCell<State>,
    window_system: &W,
    manipulator: &M,
) {
    let effects = startup_effects(&mut state.borrow_mut(), window_system);
    if let Err(e) = execute_effects(effects, state, manipulator) {
        tracing::warn!("{}", e);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::core::keysym::XK_Q;
    use crate::core::{Config, Modifiers, Rect};
    use crate::platform::mock::{create_test_window, Call, MockWindowManipulator, MockWindowSystem};
    use fusuma_ipc::Action;

    fn setup_test_context() -> (RefCell<State>, MockWindowSystem, MockWindowManipulator) {
        let ws = MockWindowSystem::new()
            .with_monitors(vec![Rect::new(0, 0, 1920, 1080)])
            .with_windows(vec![
                create_test_window(100, "St", "st", 0, 0, 960, 1080),
                create_test_window(101, "Firefox", "Navigator", 960, 0, 960, 1080),
            ])
            .with_pointer(10, 10);
        let state = RefCell::new(State::new(Rc::new(Config::default())));
        let manipulator = MockWindowManipulator::new();
        dispatch_startup(&state, &ws, &manipulator);
        (state, ws, MockWindowManipulator::new())
    }

    #[test]
    fn test_dispatch_startup_takes_over_windows() {
        let ws = MockWindowSystem::new()
            .with_monitors(vec![Rect::new(0, 0, 1920, 1080)])
            .with_windows(vec![create_test_window(100, "St", "st", 0, 0, 960, 1080)]);
        let state = RefCell::new(State::new(Rc::new(Config::default())));
        let manipulator = MockWindowManipulator::new();
        dispatch_startup(&state, &ws, &manipulator);

        let calls = manipulator.calls();
        assert!(matches!(calls[0], Call::ManageWindow(100, _, 1)));
        assert!(calls.contains(&Call::SetFocus(None, Some(100))));
        assert!(matches!(calls.last(), Some(Call::UpdateBars(_))));
    }

    #[test]
    fn test_dispatch_command_get_state() {
        let (state, _ws, manipulator) = setup_test_context();
        let response = dispatch_command(&Command::GetState, &state, &manipulator);
        assert!(matches!(response, Response::State { .. }));
        assert!(manipulator.calls().is_empty());
    }

    #[test]
    fn test_dispatch_command_view() {
        let (state, _ws, manipulator) = setup_test_context();
        let response = dispatch_command(
            &Command::Run {
                action: Action::View { tags: 0b10 },
            },
            &state,
            &manipulator,
        );

        assert!(matches!(response, Response::Ok));
        assert_eq!(state.borrow().monitors[0].visible_tags.mask(), 0b10);
        let calls = manipulator.calls();
        assert!(matches!(calls[0], Call::ApplyWindowMoves(_)));
        assert!(calls.contains(&Call::SetFocus(Some(101), None)));
    }

    #[test]
    fn test_dispatch_command_spawn_failure() {
        let (state, _ws, _) = setup_test_context();
        let manipulator = MockWindowManipulator {
            fail_spawn: true,
            ..Default::default()
        };
        let response = dispatch_command(
            &Command::Run {
                action: Action::Spawn {
                    argv: vec!["nonexistent".to_string()],
                },
            },
            &state,
            &manipulator,
        );
        assert!(matches!(response, Response::Error { .. }));
    }

    #[test]
    fn test_dispatch_event_quit_binding() {
        let (state, _ws, manipulator) = setup_test_context();
        dispatch_event(
            Event::KeyPress {
                modifiers: Modifiers::ALT.with_shift(),
                keysym: XK_Q,
            },
            &state,
            &manipulator,
        );
        assert!(!state.borrow().running);
    }

    #[test]
    fn test_dispatch_event_unmap_releases() {
        let (state, _ws, manipulator) = setup_test_context();
        dispatch_event(
            Event::WindowGone {
                window_id: 101,
                destroyed: false,
            },
            &state,
            &manipulator,
        );
        let calls = manipulator.calls();
        assert_eq!(calls[0], Call::ReleaseWindow(101, false));
        assert!(calls.contains(&Call::SetFocus(None, Some(100))));
        assert!(!state.borrow().clients.contains_key(&101));
    }
}
