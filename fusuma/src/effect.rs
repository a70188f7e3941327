use crate::core::{
    ClientId, ConfigureRequest, DragKind, FocusChange, Outcome, Rect, Restack, WindowMove,
};

use fusuma_ipc::Response;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ApplyWindowMoves(Vec<WindowMove>),
    Restack(Restack),
    Focus(FocusChange),
    ManageWindow {
        window_id: ClientId,
        frame: Rect,
        border_width: u32,
    },
    ReleaseWindow {
        window_id: ClientId,
        destroyed: bool,
    },
    CloseWindow {
        window_id: ClientId,
    },
    SendConfigure {
        window_id: ClientId,
    },
    ForwardConfigure(ConfigureRequest),
    Spawn {
        argv: Vec<String>,
    },
    SignalStatusBar {
        value: i32,
    },
    BeginDrag {
        kind: DragKind,
        warp_to: Option<(i32, i32)>,
    },
    EndDrag,
    UpdateBars,
    Quit,
}

impl Effect {
    /// Effects that make the window system reflect an outcome: geometry
    /// first, then stacking, then focus.
    pub fn from_outcome(outcome: Outcome) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !outcome.moves.is_empty() {
            effects.push(Effect::ApplyWindowMoves(outcome.moves));
        }
        effects.extend(outcome.restacks.into_iter().map(Effect::Restack));
        if let Some(change) = outcome.focus {
            effects.push(Effect::Focus(change));
        }
        if outcome.bars_changed {
            effects.push(Effect::UpdateBars);
        }
        effects
    }
}

pub struct CommandResult {
    pub response: Response,
    pub effects: Vec<Effect>,
}

impl CommandResult {
    pub fn ok_with_effects(effects: Vec<Effect>) -> Self {
        Self {
            response: Response::Ok,
            effects,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            response: Response::Error {
                message: message.into(),
            },
            effects: vec![],
        }
    }

    pub fn with_response(response: Response) -> Self {
        Self {
            response,
            effects: vec![],
        }
    }
}
