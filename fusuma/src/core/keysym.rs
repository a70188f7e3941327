//! X keysym values used by the default bindings, and their display names.

pub const XK_SPACE: u32 = 0x0020;
pub const XK_COMMA: u32 = 0x002c;
pub const XK_MINUS: u32 = 0x002d;
pub const XK_PERIOD: u32 = 0x002e;
pub const XK_0: u32 = 0x0030;
pub const XK_1: u32 = 0x0031;
pub const XK_EQUAL: u32 = 0x003d;
pub const XK_B: u32 = 0x0062;
pub const XK_C: u32 = 0x0063;
pub const XK_D: u32 = 0x0064;
pub const XK_F: u32 = 0x0066;
pub const XK_H: u32 = 0x0068;
pub const XK_I: u32 = 0x0069;
pub const XK_J: u32 = 0x006a;
pub const XK_K: u32 = 0x006b;
pub const XK_L: u32 = 0x006c;
pub const XK_M: u32 = 0x006d;
pub const XK_P: u32 = 0x0070;
pub const XK_Q: u32 = 0x0071;
pub const XK_R: u32 = 0x0072;
pub const XK_T: u32 = 0x0074;
pub const XK_W: u32 = 0x0077;
pub const XK_TAB: u32 = 0xff09;
pub const XK_RETURN: u32 = 0xff0d;
pub const XK_NUM_LOCK: u32 = 0xff7f;

pub const XF86XK_MON_BRIGHTNESS_UP: u32 = 0x1008_ff02;
pub const XF86XK_MON_BRIGHTNESS_DOWN: u32 = 0x1008_ff03;
pub const XF86XK_AUDIO_LOWER_VOLUME: u32 = 0x1008_ff11;
pub const XF86XK_AUDIO_MUTE: u32 = 0x1008_ff12;
pub const XF86XK_AUDIO_RAISE_VOLUME: u32 = 0x1008_ff13;
pub const XF86XK_AUDIO_PLAY: u32 = 0x1008_ff14;
pub const XF86XK_AUDIO_STOP: u32 = 0x1008_ff15;
pub const XF86XK_AUDIO_PREV: u32 = 0x1008_ff16;
pub const XF86XK_AUDIO_NEXT: u32 = 0x1008_ff17;
pub const XF86XK_MAIL: u32 = 0x1008_ff19;
pub const XF86XK_CALCULATOR: u32 = 0x1008_ff1d;
pub const XF86XK_POWER_OFF: u32 = 0x1008_ff2a;
pub const XF86XK_SCREEN_SAVER: u32 = 0x1008_ff2d;
pub const XF86XK_WWW: u32 = 0x1008_ff2e;
pub const XF86XK_SLEEP: u32 = 0x1008_ff2f;
pub const XF86XK_AUDIO_PAUSE: u32 = 0x1008_ff31;
pub const XF86XK_AUDIO_MEDIA: u32 = 0x1008_ff32;
pub const XF86XK_MY_COMPUTER: u32 = 0x1008_ff33;
pub const XF86XK_AUDIO_REWIND: u32 = 0x1008_ff3e;
pub const XF86XK_LAUNCH1: u32 = 0x1008_ff41;
pub const XF86XK_DISPLAY: u32 = 0x1008_ff59;
pub const XF86XK_DOS: u32 = 0x1008_ff5a;
pub const XF86XK_TASK_PANE: u32 = 0x1008_ff7f;
pub const XF86XK_AUDIO_FORWARD: u32 = 0x1008_ff97;
pub const XF86XK_TOUCHPAD_TOGGLE: u32 = 0x1008_ffa9;
pub const XF86XK_TOUCHPAD_ON: u32 = 0x1008_ffb0;
pub const XF86XK_TOUCHPAD_OFF: u32 = 0x1008_ffb1;

const PRINTABLE: [&str; 95] = [
    "space", "exclam", "quotedbl", "numbersign", "dollar", "percent", "ampersand", "apostrophe",
    "parenleft", "parenright", "asterisk", "plus", "comma", "minus", "period", "slash", "0", "1",
    "2", "3", "4", "5", "6", "7", "8", "9", "colon", "semicolon", "less", "equal", "greater",
    "question", "at", "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O",
    "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z", "bracketleft", "backslash",
    "bracketright", "asciicircum", "underscore", "grave", "a", "b", "c", "d", "e", "f", "g", "h",
    "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z",
    "braceleft", "bar", "braceright", "asciitilde",
];

pub fn keysym_name(keysym: u32) -> &'static str {
    if (0x20..0x7f).contains(&keysym) {
        return PRINTABLE[(keysym - 0x20) as usize];
    }
    match keysym {
        XK_TAB => "Tab",
        XK_RETURN => "Return",
        0xff08 => "BackSpace",
        0xff1b => "Escape",
        0xff51 => "Left",
        0xff52 => "Up",
        0xff53 => "Right",
        0xff54 => "Down",
        0xffff => "Delete",
        XF86XK_MON_BRIGHTNESS_UP => "XF86MonBrightnessUp",
        XF86XK_MON_BRIGHTNESS_DOWN => "XF86MonBrightnessDown",
        XF86XK_AUDIO_LOWER_VOLUME => "XF86AudioLowerVolume",
        XF86XK_AUDIO_MUTE => "XF86AudioMute",
        XF86XK_AUDIO_RAISE_VOLUME => "XF86AudioRaiseVolume",
        XF86XK_AUDIO_PLAY => "XF86AudioPlay",
        XF86XK_AUDIO_STOP => "XF86AudioStop",
        XF86XK_AUDIO_PREV => "XF86AudioPrev",
        XF86XK_AUDIO_NEXT => "XF86AudioNext",
        XF86XK_MAIL => "XF86Mail",
        XF86XK_CALCULATOR => "XF86Calculator",
        XF86XK_POWER_OFF => "XF86PowerOff",
        XF86XK_SCREEN_SAVER => "XF86ScreenSaver",
        XF86XK_WWW => "XF86WWW",
        XF86XK_SLEEP => "XF86Sleep",
        XF86XK_AUDIO_PAUSE => "XF86AudioPause",
        XF86XK_AUDIO_MEDIA => "XF86AudioMedia",
        XF86XK_MY_COMPUTER => "XF86MyComputer",
        XF86XK_AUDIO_REWIND => "XF86AudioRewind",
        XF86XK_LAUNCH1 => "XF86Launch1",
        XF86XK_DISPLAY => "XF86Display",
        XF86XK_DOS => "XF86DOS",
        XF86XK_TASK_PANE => "XF86TaskPane",
        XF86XK_AUDIO_FORWARD => "XF86AudioForward",
        XF86XK_TOUCHPAD_TOGGLE => "XF86TouchpadToggle",
        XF86XK_TOUCHPAD_ON => "XF86TouchpadOn",
        XF86XK_TOUCHPAD_OFF => "XF86TouchpadOff",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_names() {
        assert_eq!(keysym_name(XK_SPACE), "space");
        assert_eq!(keysym_name(XK_COMMA), "comma");
        assert_eq!(keysym_name(XK_0), "0");
        assert_eq!(keysym_name(XK_1 + 8), "9");
        assert_eq!(keysym_name(XK_EQUAL), "equal");
        assert_eq!(keysym_name(XK_B), "b");
        assert_eq!(keysym_name(XK_T), "t");
        assert_eq!(keysym_name(0x7e), "asciitilde");
    }

    #[test]
    fn test_special_names() {
        assert_eq!(keysym_name(XK_RETURN), "Return");
        assert_eq!(keysym_name(XK_TAB), "Tab");
        assert_eq!(keysym_name(XF86XK_AUDIO_MUTE), "XF86AudioMute");
        assert_eq!(keysym_name(XF86XK_TOUCHPAD_OFF), "XF86TouchpadOff");
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(keysym_name(0x7f), "unknown");
        assert_eq!(keysym_name(0xdead_beef), "unknown");
    }
}
