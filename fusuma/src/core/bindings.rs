use fusuma_ipc::{Action, BindingInfo};

use super::keysym::keysym_name;

// Core protocol modifier bits
pub const SHIFT_MASK: u16 = 1 << 0;
pub const LOCK_MASK: u16 = 1 << 1;
pub const CONTROL_MASK: u16 = 1 << 2;
pub const MOD1_MASK: u16 = 1 << 3;
pub const MOD4_MASK: u16 = 1 << 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub logo: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        logo: false,
        alt: false,
        ctrl: false,
        shift: false,
    };

    pub const ALT: Modifiers = Modifiers {
        alt: true,
        ..Modifiers::NONE
    };

    pub fn with_shift(self) -> Self {
        Self {
            shift: true,
            ..self
        }
    }

    pub fn with_ctrl(self) -> Self {
        Self { ctrl: true, ..self }
    }

    /// Decodes an event state. Caps Lock and the given Num Lock bit are
    /// ignored, as are pointer button bits.
    pub fn from_mask(mask: u16, numlock_mask: u16) -> Self {
        let mask = mask & !(LOCK_MASK | numlock_mask);
        Self {
            logo: mask & MOD4_MASK != 0,
            alt: mask & MOD1_MASK != 0,
            ctrl: mask & CONTROL_MASK != 0,
            shift: mask & SHIFT_MASK != 0,
        }
    }

    pub fn to_mask(self) -> u16 {
        let mut mask = 0;
        if self.logo {
            mask |= MOD4_MASK;
        }
        if self.alt {
            mask |= MOD1_MASK;
        }
        if self.ctrl {
            mask |= CONTROL_MASK;
        }
        if self.shift {
            mask |= SHIFT_MASK;
        }
        mask
    }
}

/// Where a pointer button was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    TagBar,
    LayoutSymbol,
    StatusText,
    WindowTitle,
    ClientWindow,
    RootWindow,
}

impl ClickTarget {
    fn name(self) -> &'static str {
        match self {
            ClickTarget::TagBar => "tagbar",
            ClickTarget::LayoutSymbol => "layout",
            ClickTarget::StatusText => "status",
            ClickTarget::WindowTitle => "title",
            ClickTarget::ClientWindow => "client",
            ClickTarget::RootWindow => "root",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyBinding {
    pub modifiers: Modifiers,
    pub keysym: u32,
    pub action: Action,
}

impl KeyBinding {
    pub fn new(modifiers: Modifiers, keysym: u32, action: Action) -> Self {
        Self {
            modifiers,
            keysym,
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonBinding {
    pub target: ClickTarget,
    pub modifiers: Modifiers,
    pub button: u8,
    pub action: Action,
}

impl ButtonBinding {
    pub fn new(target: ClickTarget, modifiers: Modifiers, button: u8, action: Action) -> Self {
        Self {
            target,
            modifiers,
            button,
            action,
        }
    }
}

/// Ordered key and button tables. Lookups return the first match.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    pub keys: Vec<KeyBinding>,
    pub buttons: Vec<ButtonBinding>,
}

impl Bindings {
    pub fn match_key(&self, modifiers: Modifiers, keysym: u32) -> Option<&Action> {
        self.keys
            .iter()
            .find(|k| k.keysym == keysym && k.modifiers == modifiers)
            .map(|k| &k.action)
    }

    /// Looks up a button binding. On the tag bar, a tag action bound with
    /// a zero mask acts on the clicked tag instead.
    pub fn match_button(
        &self,
        target: ClickTarget,
        modifiers: Modifiers,
        button: u8,
        clicked_tag: Option<u32>,
    ) -> Option<Action> {
        let binding = self
            .buttons
            .iter()
            .find(|b| b.target == target && b.button == button && b.modifiers == modifiers)?;

        match (target, binding.action.tag_mask(), clicked_tag) {
            (ClickTarget::TagBar, Some(0), Some(tag)) => Some(binding.action.with_tag_mask(tag)),
            _ => Some(binding.action.clone()),
        }
    }

    /// Buttons that must be grabbed on client windows.
    pub fn client_buttons(&self) -> impl Iterator<Item = &ButtonBinding> {
        self.buttons
            .iter()
            .filter(|b| b.target == ClickTarget::ClientWindow)
    }

    pub fn list(&self) -> Vec<BindingInfo> {
        let keys = self.keys.iter().map(|k| BindingInfo {
            trigger: format_key(k.modifiers, k.keysym),
            action: k.action.to_string(),
        });
        let buttons = self.buttons.iter().map(|b| BindingInfo {
            trigger: format_button(b),
            action: b.action.to_string(),
        });
        keys.chain(buttons).collect()
    }
}

fn modifier_names(modifiers: Modifiers) -> Vec<&'static str> {
    let mut parts = Vec::new();
    if modifiers.logo {
        parts.push("super");
    }
    if modifiers.alt {
        parts.push("alt");
    }
    if modifiers.ctrl {
        parts.push("ctrl");
    }
    if modifiers.shift {
        parts.push("shift");
    }
    parts
}

pub fn format_key(modifiers: Modifiers, keysym: u32) -> String {
    let mut parts = modifier_names(modifiers);
    parts.push(keysym_name(keysym));
    parts.join("-")
}

pub fn format_button(binding: &ButtonBinding) -> String {
    let mut parts: Vec<&str> = modifier_names(binding.modifiers);
    let button = format!("button{}", binding.button);
    parts.push(&button);
    format!("{}:{}", binding.target.name(), parts.join("-"))
}
