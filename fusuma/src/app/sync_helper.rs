use crate::core::State;
use crate::effect::Effect;
use crate::platform::WindowSystem;

/// Adopts the outputs and windows present at startup. Every adopted
/// window is taken over before the arrange is applied.
pub fn startup_effects<W: WindowSystem>(state: &mut State, window_system: &W) -> Vec<Effect> {
    let outcome = state.sync_all(window_system);

    let mut adopted: Vec<_> = state
        .clients
        .values()
        .map(|c| (c.id, c.frame, c.border_width))
        .collect();
    adopted.sort_by_key(|(id, _, _)| *id);

    let mut effects: Vec<Effect> = adopted
        .into_iter()
        .map(|(window_id, frame, border_width)| Effect::ManageWindow {
            window_id,
            frame,
            border_width,
        })
        .collect();
    effects.extend(Effect::from_outcome(outcome));
    // the bars exist even without any client
    if !effects.contains(&Effect::UpdateBars) {
        effects.push(Effect::UpdateBars);
    }
    effects
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::core::{Config, Rect};
    use crate::platform::mock::{create_test_window, MockWindowSystem};

    #[test]
    fn test_startup_manages_existing_windows_first() {
        let ws = MockWindowSystem::new()
            .with_monitors(vec![Rect::new(0, 0, 1920, 1080)])
            .with_windows(vec![
                create_test_window(101, "St", "st", 0, 0, 800, 600),
                create_test_window(100, "St", "st", 0, 0, 800, 600),
            ]);
        let mut state = State::new(Rc::new(Config::default()));
        let effects = startup_effects(&mut state, &ws);

        assert!(matches!(
            effects[0],
            Effect::ManageWindow { window_id: 100, .. }
        ));
        assert!(matches!(
            effects[1],
            Effect::ManageWindow { window_id: 101, .. }
        ));
        assert!(matches!(effects[2], Effect::ApplyWindowMoves(_)));
        assert_eq!(effects.last(), Some(&Effect::UpdateBars));
    }

    #[test]
    fn test_startup_without_windows_still_shows_bars() {
        let ws = MockWindowSystem::new().with_monitors(vec![Rect::new(0, 0, 1920, 1080)]);
        let mut state = State::new(Rc::new(Config::default()));
        let effects = startup_effects(&mut state, &ws);
        assert!(effects.contains(&Effect::UpdateBars));
        assert_eq!(state.monitors.len(), 1);
    }
}
