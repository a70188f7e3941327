use crate::core::{DragKind, State};
use crate::effect::{CommandResult, Effect};
use fusuma_ipc::{Action, Command, MonitorInfo, Response, StateInfo, WindowInfo};

/// Pure function: processes a command and returns a response with effects.
/// This function does not perform any side effects - it only mutates state and computes effects.
pub fn process_command(state: &mut State, cmd: &Command) -> CommandResult {
    match cmd {
        Command::Run { action } => {
            tracing::debug!("Running action over IPC: {}", action);
            CommandResult::ok_with_effects(run_action(state, action))
        }

        // Query commands - no effects
        Command::ListWindows => {
            let focused = state.selected_client();
            let mut windows: Vec<WindowInfo> = state
                .clients
                .values()
                .map(|c| WindowInfo {
                    id: c.id,
                    class: c.class.clone(),
                    instance: c.instance.clone(),
                    title: c.title.clone(),
                    tags: c.tags.mask(),
                    monitor: c.monitor,
                    x: c.frame.x,
                    y: c.frame.y,
                    width: c.frame.width,
                    height: c.frame.height,
                    is_floating: c.is_floating,
                    is_focused: focused == Some(c.id),
                })
                .collect();
            windows.sort_by_key(|w| (w.monitor, w.id));
            CommandResult::with_response(Response::Windows { windows })
        }
        Command::ListMonitors => {
            let monitors = state
                .monitors
                .iter()
                .map(|m| MonitorInfo {
                    index: m.index,
                    x: m.frame.x,
                    y: m.frame.y,
                    width: m.frame.width,
                    height: m.frame.height,
                    visible_tags: m.visible_tags.mask(),
                    layout: m.layout_symbol.clone(),
                    nmaster: m.nmaster,
                    mfact: m.mfact,
                    gap: m.gap,
                    is_selected: m.index == state.selected_monitor,
                })
                .collect();
            CommandResult::with_response(Response::Monitors { monitors })
        }
        Command::GetState => {
            let Some(mon) = state.selected_monitor() else {
                return CommandResult::error("No monitors");
            };
            CommandResult::with_response(Response::State {
                state: StateInfo {
                    visible_tags: mon.visible_tags.mask(),
                    focused_window_id: mon.selected,
                    selected_monitor: state.selected_monitor,
                    layout: mon.layout_symbol.clone(),
                    window_count: state.clients.len(),
                },
            })
        }
        Command::ListBindings => CommandResult::with_response(Response::Bindings {
            bindings: state.config.bindings.list(),
        }),
    }
}

/// Applies one bound action to the state and returns what the window
/// system has to do about it. Keys, buttons and IPC all end up here.
pub fn run_action(state: &mut State, action: &Action) -> Vec<Effect> {
    match action {
        Action::Spawn { argv } => {
            if argv.is_empty() {
                return vec![];
            }
            let monitor = state.selected_monitor;
            let argv = argv
                .iter()
                .map(|arg| state.config.expand_arg(arg, monitor))
                .collect();
            vec![Effect::Spawn { argv }]
        }
        Action::SignalStatusBar { button } => {
            let value = ((state.status_segment as i32) << 8) | button;
            vec![Effect::SignalStatusBar { value }]
        }
        Action::FocusStack { delta } => Effect::from_outcome(state.focus_stack(*delta)),
        Action::Zoom => Effect::from_outcome(state.zoom()),
        Action::KillClient => match state.selected_client() {
            Some(window_id) => vec![Effect::CloseWindow { window_id }],
            None => vec![],
        },
        Action::ToggleFloating => Effect::from_outcome(state.toggle_floating()),
        Action::MoveMouse => begin_drag(state, DragKind::Move),
        Action::ResizeMouse => begin_drag(state, DragKind::Resize),
        Action::View { tags } => Effect::from_outcome(state.view(*tags)),
        Action::ToggleView { tags } => Effect::from_outcome(state.toggle_view(*tags)),
        Action::Tag { tags } => Effect::from_outcome(state.tag(*tags)),
        Action::ToggleTag { tags } => Effect::from_outcome(state.toggle_tag(*tags)),
        Action::SetLayout { index } => Effect::from_outcome(state.set_layout(*index)),
        Action::IncNMaster { delta } => Effect::from_outcome(state.inc_nmaster(*delta)),
        Action::SetMFact { delta } => Effect::from_outcome(state.set_mfact(*delta)),
        Action::SetGaps { delta } => Effect::from_outcome(state.set_gaps(*delta)),
        Action::ToggleBar => Effect::from_outcome(state.toggle_bar()),
        Action::FocusMon { delta } => Effect::from_outcome(state.focus_mon(*delta)),
        Action::TagMon { delta } => Effect::from_outcome(state.tag_mon(*delta)),
        Action::Quit => {
            tracing::info!("Quit requested");
            state.running = false;
            vec![Effect::Quit]
        }
    }
}

fn begin_drag(state: &mut State, kind: DragKind) -> Vec<Effect> {
    let Some((drag, outcome)) = state.begin_drag(kind) else {
        return vec![];
    };
    let warp_to = match kind {
        DragKind::Resize => Some(drag.pointer_origin),
        DragKind::Move => None,
    };
    let mut effects = Effect::from_outcome(outcome);
    effects.push(Effect::BeginDrag { kind, warp_to });
    effects
}
