use serde::{Deserialize, Serialize};

/// An operation bound to a key, a button or sent over IPC.
/// The bound argument lives inside the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    // Processes
    Spawn { argv: Vec<String> },
    SignalStatusBar { button: i32 },

    // Focus and stacking
    FocusStack { delta: i32 },
    Zoom,
    KillClient,
    ToggleFloating,
    MoveMouse,
    ResizeMouse,

    // Tags
    View { tags: u32 },
    ToggleView { tags: u32 },
    Tag { tags: u32 },
    ToggleTag { tags: u32 },

    // Layout
    SetLayout { index: Option<usize> },
    IncNMaster { delta: i32 },
    SetMFact { delta: f32 },
    SetGaps { delta: i32 },
    ToggleBar,

    // Monitors
    FocusMon { delta: i32 },
    TagMon { delta: i32 },

    Quit,
}

impl Action {
    /// Short dwm-style name, used when listing bindings.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Spawn { .. } => "spawn",
            Action::SignalStatusBar { .. } => "sigstatusbar",
            Action::FocusStack { .. } => "focusstack",
            Action::Zoom => "zoom",
            Action::KillClient => "killclient",
            Action::ToggleFloating => "togglefloating",
            Action::MoveMouse => "movemouse",
            Action::ResizeMouse => "resizemouse",
            Action::View { .. } => "view",
            Action::ToggleView { .. } => "toggleview",
            Action::Tag { .. } => "tag",
            Action::ToggleTag { .. } => "toggletag",
            Action::SetLayout { .. } => "setlayout",
            Action::IncNMaster { .. } => "incnmaster",
            Action::SetMFact { .. } => "setmfact",
            Action::SetGaps { .. } => "setgaps",
            Action::ToggleBar => "togglebar",
            Action::FocusMon { .. } => "focusmon",
            Action::TagMon { .. } => "tagmon",
            Action::Quit => "quit",
        }
    }

    /// Tag-mask argument of tag actions, if any.
    pub fn tag_mask(&self) -> Option<u32> {
        match self {
            Action::View { tags }
            | Action::ToggleView { tags }
            | Action::Tag { tags }
            | Action::ToggleTag { tags } => Some(*tags),
            _ => None,
        }
    }

    /// Returns a copy with the tag-mask argument replaced.
    /// Non-tag actions are returned unchanged.
    pub fn with_tag_mask(&self, mask: u32) -> Self {
        match self {
            Action::View { .. } => Action::View { tags: mask },
            Action::ToggleView { .. } => Action::ToggleView { tags: mask },
            Action::Tag { .. } => Action::Tag { tags: mask },
            Action::ToggleTag { .. } => Action::ToggleTag { tags: mask },
            other => other.clone(),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Spawn { argv } => write!(f, "spawn {}", argv.join(" ")),
            Action::SignalStatusBar { button } => write!(f, "sigstatusbar {}", button),
            Action::FocusStack { delta }
            | Action::IncNMaster { delta }
            | Action::SetGaps { delta }
            | Action::FocusMon { delta }
            | Action::TagMon { delta } => write!(f, "{} {:+}", self.name(), delta),
            Action::SetMFact { delta } => write!(f, "setmfact {:+.2}", delta),
            Action::View { tags }
            | Action::ToggleView { tags }
            | Action::Tag { tags }
            | Action::ToggleTag { tags } => write!(f, "{} {:#x}", self.name(), tags),
            Action::SetLayout { index: Some(i) } => write!(f, "setlayout {}", i),
            Action::SetLayout { index: None } => write!(f, "setlayout"),
            _ => write!(f, "{}", self.name()),
        }
    }
}
