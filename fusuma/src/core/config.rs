use anyhow::{bail, Result};
use fusuma_ipc::Action;

use super::bindings::{Bindings, ButtonBinding, ClickTarget, KeyBinding, Modifiers};
use super::keysym::*;
use super::{prefs, Layout, LayoutKind, MatchPolicy, Rule, TagMask, MAX_TAGS};

const MODKEY: Modifiers = Modifiers::ALT;

#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    pub fg: String,
    pub bg: String,
    pub border: String,
}

/// Compiled-in configuration. Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Config {
    pub border_px: u32,
    pub snap: u32,
    pub show_bar: bool,
    pub top_bar: bool,
    pub gap_px: u32,
    pub bar_height: u32,
    /// Width of one character cell in the bar, used for click regions.
    pub glyph_width: u32,
    pub dmenu_font: String,
    pub norm: ColorScheme,
    pub sel: ColorScheme,
    pub tags: Vec<String>,
    pub rules: Vec<Rule>,
    pub match_policy: MatchPolicy,
    pub mfact: f32,
    pub nmaster: u32,
    pub resize_hints: bool,
    /// The first entry is the startup layout.
    pub layouts: Vec<Layout>,
    pub bindings: Bindings,
    /// Process that receives status bar click signals.
    pub status_process: String,
}

fn sh(cmd: &str) -> Action {
    Action::Spawn {
        argv: vec!["/bin/sh".to_string(), "-c".to_string(), cmd.to_string()],
    }
}

fn spawn(argv: &[&str]) -> Action {
    Action::Spawn {
        argv: argv.iter().map(|s| s.to_string()).collect(),
    }
}

fn default_keys() -> Vec<KeyBinding> {
    let dmenu = spawn(&[
        "dmenu_run",
        "-m",
        "{mon}",
        "-fn",
        "{dmenufont}",
        "-nb",
        "{normbgcolor}",
        "-nf",
        "{normfgcolor}",
        "-sb",
        "{selbordercolor}",
        "-sf",
        "{selfgcolor}",
    ]);
    let term = spawn(&["st"]);
    let shift = MODKEY.with_shift();

    let mut keys = vec![
        KeyBinding::new(MODKEY, XK_P, dmenu),
        KeyBinding::new(MODKEY, XK_RETURN, term),
        KeyBinding::new(shift, XK_B, Action::ToggleBar),
        KeyBinding::new(MODKEY, XK_J, Action::FocusStack { delta: 1 }),
        KeyBinding::new(MODKEY, XK_K, Action::FocusStack { delta: -1 }),
        KeyBinding::new(MODKEY, XK_I, Action::IncNMaster { delta: 1 }),
        KeyBinding::new(MODKEY, XK_D, Action::IncNMaster { delta: -1 }),
        KeyBinding::new(MODKEY, XK_H, Action::SetMFact { delta: -0.05 }),
        KeyBinding::new(MODKEY, XK_L, Action::SetMFact { delta: 0.05 }),
        KeyBinding::new(shift, XK_RETURN, Action::Zoom),
        KeyBinding::new(MODKEY, XK_TAB, Action::View { tags: 0 }),
        KeyBinding::new(MODKEY, XK_W, Action::KillClient),
        KeyBinding::new(MODKEY, XK_T, Action::SetLayout { index: Some(0) }),
        KeyBinding::new(MODKEY, XK_F, Action::SetLayout { index: Some(1) }),
        KeyBinding::new(MODKEY, XK_M, Action::SetLayout { index: Some(2) }),
        KeyBinding::new(MODKEY, XK_SPACE, Action::SetLayout { index: None }),
        KeyBinding::new(shift, XK_SPACE, Action::ToggleFloating),
        KeyBinding::new(MODKEY, XK_0, Action::View { tags: !0 }),
        KeyBinding::new(shift, XK_0, Action::Tag { tags: !0 }),
        KeyBinding::new(MODKEY, XK_COMMA, Action::FocusMon { delta: -1 }),
        KeyBinding::new(MODKEY, XK_PERIOD, Action::FocusMon { delta: 1 }),
        KeyBinding::new(shift, XK_COMMA, Action::TagMon { delta: -1 }),
        KeyBinding::new(shift, XK_PERIOD, Action::TagMon { delta: 1 }),
        KeyBinding::new(MODKEY, XK_MINUS, Action::SetGaps { delta: -1 }),
        KeyBinding::new(MODKEY, XK_EQUAL, Action::SetGaps { delta: 1 }),
        KeyBinding::new(shift, XK_EQUAL, Action::SetGaps { delta: 0 }),
    ];

    for i in 0..9u32 {
        let key = XK_1 + i;
        let tags = 1 << i;
        keys.push(KeyBinding::new(MODKEY, key, Action::View { tags }));
        keys.push(KeyBinding::new(
            MODKEY.with_ctrl(),
            key,
            Action::ToggleView { tags },
        ));
        keys.push(KeyBinding::new(shift, key, Action::Tag { tags }));
        keys.push(KeyBinding::new(
            shift.with_ctrl(),
            key,
            Action::ToggleTag { tags },
        ));
    }

    keys.push(KeyBinding::new(shift, XK_Q, Action::Quit));

    // applications
    keys.extend([
        KeyBinding::new(MODKEY, XK_B, sh("chromium")),
        KeyBinding::new(
            MODKEY,
            XK_C,
            sh("chromium --new-window 'myworkspace.jpmchase.com' &"),
        ),
        KeyBinding::new(shift, XK_R, sh("reboot")),
        KeyBinding::new(MODKEY, XK_R, sh("st -e ranger ~")),
    ]);

    // media keys
    let none = Modifiers::NONE;
    keys.extend([
        KeyBinding::new(
            none,
            XF86XK_AUDIO_MUTE,
            sh("amixer set Master toggle && kill -44 $(pidof dwmblocks)"),
        ),
        KeyBinding::new(
            none,
            XF86XK_AUDIO_RAISE_VOLUME,
            sh("amixer set Master 5%+ && kill -44 $(pidof dwmblocks)"),
        ),
        KeyBinding::new(
            none,
            XF86XK_AUDIO_LOWER_VOLUME,
            sh("amixer set Master 5%- && kill -44 $(pidof dwmblocks)"),
        ),
        KeyBinding::new(none, XF86XK_AUDIO_PREV, sh("mpc prev")),
        KeyBinding::new(none, XF86XK_AUDIO_NEXT, sh("mpc next")),
        KeyBinding::new(none, XF86XK_AUDIO_PAUSE, sh("mpc pause")),
        KeyBinding::new(none, XF86XK_AUDIO_PLAY, sh("mpc play")),
        KeyBinding::new(none, XF86XK_AUDIO_STOP, sh("mpc stop")),
        KeyBinding::new(none, XF86XK_AUDIO_REWIND, sh("mpc seek -10")),
        KeyBinding::new(none, XF86XK_AUDIO_FORWARD, sh("mpc seek +10")),
        KeyBinding::new(none, XF86XK_AUDIO_MEDIA, sh("st -e ncmpcpp")),
        KeyBinding::new(none, XF86XK_POWER_OFF, sh("sysact")),
        KeyBinding::new(none, XF86XK_CALCULATOR, sh("st -e bc -l")),
        KeyBinding::new(none, XF86XK_DISPLAY, sh("changeDisplay")),
        KeyBinding::new(none, XF86XK_SLEEP, sh("sudo -A zzz")),
        KeyBinding::new(none, XF86XK_WWW, sh("$BROWSER")),
        KeyBinding::new(none, XF86XK_DOS, sh("st")),
        KeyBinding::new(
            none,
            XF86XK_SCREEN_SAVER,
            sh("slock & xset dpms force off; mpc pause; pauseallmpv"),
        ),
        KeyBinding::new(none, XF86XK_TASK_PANE, sh("st -e htop")),
        KeyBinding::new(
            none,
            XF86XK_MAIL,
            sh("st -e neomutt ; pkill -RTMIN+12 dwmblocks"),
        ),
        KeyBinding::new(none, XF86XK_MY_COMPUTER, sh("st -e lf /")),
        KeyBinding::new(none, XF86XK_LAUNCH1, sh("xset dpms force off")),
        KeyBinding::new(
            none,
            XF86XK_TOUCHPAD_TOGGLE,
            sh("(synclient | grep 'TouchpadOff.*1' && synclient TouchpadOff=0) || synclient TouchpadOff=1"),
        ),
        KeyBinding::new(none, XF86XK_TOUCHPAD_OFF, sh("synclient TouchpadOff=1")),
        KeyBinding::new(none, XF86XK_TOUCHPAD_ON, sh("synclient TouchpadOff=0")),
        KeyBinding::new(none, XF86XK_MON_BRIGHTNESS_UP, sh("xbacklight -inc 2")),
        KeyBinding::new(none, XF86XK_MON_BRIGHTNESS_DOWN, sh("xbacklight -dec 2")),
    ]);

    keys
}

fn default_buttons() -> Vec<ButtonBinding> {
    use ClickTarget::*;
    let none = Modifiers::NONE;

    vec![
        ButtonBinding::new(LayoutSymbol, none, 1, Action::SetLayout { index: None }),
        ButtonBinding::new(LayoutSymbol, none, 3, Action::SetLayout { index: Some(2) }),
        ButtonBinding::new(WindowTitle, none, 2, Action::Zoom),
        ButtonBinding::new(StatusText, none, 1, Action::SignalStatusBar { button: 1 }),
        ButtonBinding::new(StatusText, none, 2, Action::SignalStatusBar { button: 2 }),
        ButtonBinding::new(StatusText, none, 3, Action::SignalStatusBar { button: 3 }),
        ButtonBinding::new(ClientWindow, MODKEY, 1, Action::MoveMouse),
        ButtonBinding::new(ClientWindow, MODKEY, 2, Action::ToggleFloating),
        ButtonBinding::new(ClientWindow, MODKEY, 3, Action::ResizeMouse),
        ButtonBinding::new(TagBar, none, 1, Action::View { tags: 0 }),
        ButtonBinding::new(TagBar, none, 3, Action::ToggleView { tags: 0 }),
        ButtonBinding::new(TagBar, MODKEY, 1, Action::Tag { tags: 0 }),
        ButtonBinding::new(TagBar, MODKEY, 3, Action::ToggleTag { tags: 0 }),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            border_px: 1,
            snap: 32,
            show_bar: true,
            top_bar: true,
            gap_px: 10,
            bar_height: 26,
            glyph_width: 11,
            dmenu_font: "iosevka-term:size=18".to_string(),
            norm: ColorScheme {
                fg: "#bbbbbb".to_string(),
                bg: "#222222".to_string(),
                border: "#444444".to_string(),
            },
            sel: ColorScheme {
                fg: "#eeeeee".to_string(),
                bg: "#005577".to_string(),
                border: "#005577".to_string(),
            },
            tags: [
                "\u{f120} ",
                "\u{f268} ",
                "\u{f1cb} ",
                "\u{f2c6} ",
                "\u{f07c} ",
                "\u{f109} ",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            rules: vec![
                Rule::new(Some("Chromium"), Some("chromium"), Some("WorkSpace*")).tags(1 << 5),
                Rule::new(Some("Chromium"), None, None).tags(1 << 1),
                Rule::new(Some("Wfica"), Some("Wfica"), None).tags(1 << 5),
                Rule::new(Some("St"), None, Some("ranger")).tags(1 << 4),
            ],
            match_policy: MatchPolicy::Substring,
            mfact: 0.55,
            nmaster: 1,
            resize_hints: false,
            layouts: vec![
                Layout::new("[]=", LayoutKind::Tile),
                Layout::new("><>", LayoutKind::Floating),
                Layout::new("[M]", LayoutKind::Monocle),
            ],
            bindings: Bindings {
                keys: default_keys(),
                buttons: default_buttons(),
            },
            status_process: "dwmblocks".to_string(),
        }
    }
}

impl Config {
    /// Compiled-in defaults, then the user's preference file, then validation.
    pub fn load() -> Result<Self> {
        let mut config = Config::default();
        if let Some(path) = prefs::preferences_path() {
            if path.exists() {
                match prefs::load_preferences(&path) {
                    Ok(values) => {
                        let applied = prefs::apply_preferences(&mut config, &values);
                        tracing::info!(
                            "Applied {} preference(s) from {}",
                            applied,
                            path.display()
                        );
                    }
                    Err(e) => {
                        tracing::warn!("Ignoring preferences at {}: {:#}", path.display(), e)
                    }
                }
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tags.is_empty() {
            bail!("at least one tag is required");
        }
        if self.tags.len() > MAX_TAGS {
            bail!(
                "{} tags configured, at most {} are supported",
                self.tags.len(),
                MAX_TAGS
            );
        }
        if self.layouts.is_empty() {
            bail!("the layout table is empty");
        }
        if !(0.05..=0.95).contains(&self.mfact) {
            bail!("mfact {} is outside 0.05..0.95", self.mfact);
        }
        let actions = self
            .bindings
            .keys
            .iter()
            .map(|b| ("key", &b.action))
            .chain(self.bindings.buttons.iter().map(|b| ("button", &b.action)));
        for (kind, action) in actions {
            if let Action::SetLayout { index: Some(i) } = *action {
                if i >= self.layouts.len() {
                    bail!("{} binding refers to missing layout {}", kind, i);
                }
            }
        }
        Ok(())
    }

    /// All configured tags.
    pub fn tag_mask(&self) -> TagMask {
        TagMask::all(self.tags.len())
    }

    /// Expands `{mon}` and `{<preference>}` placeholders in a spawn argument.
    pub fn expand_arg(&self, arg: &str, monitor: usize) -> String {
        if !arg.contains('{') {
            return arg.to_string();
        }
        let mut out = arg.replace("{mon}", &monitor.to_string());
        out = out.replace("{dmenufont}", &self.dmenu_font);
        for (name, value) in [
            ("normbgcolor", &self.norm.bg),
            ("normbordercolor", &self.norm.border),
            ("normfgcolor", &self.norm.fg),
            ("selbgcolor", &self.sel.bg),
            ("selbordercolor", &self.sel.border),
            ("selfgcolor", &self.sel.fg),
        ] {
            out = out.replace(&format!("{{{}}}", name), value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tunables() {
        let config = Config::default();
        assert_eq!(config.border_px, 1);
        assert_eq!(config.snap, 32);
        assert_eq!(config.gap_px, 10);
        assert_eq!(config.mfact, 0.55);
        assert_eq!(config.nmaster, 1);
        assert!(!config.resize_hints);
        assert!(config.show_bar && config.top_bar);
        assert_eq!(config.tag_mask().mask(), 0b11_1111);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_default_layouts() {
        let config = Config::default();
        let symbols: Vec<&str> = config.layouts.iter().map(|l| l.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["[]=", "><>", "[M]"]);
        assert_eq!(config.layouts[1].kind, LayoutKind::Floating);
    }

    #[test]
    fn test_tag_keys() {
        let config = Config::default();
        let b = &config.bindings;
        assert_eq!(
            b.match_key(MODKEY, XK_1 + 2),
            Some(&Action::View { tags: 1 << 2 })
        );
        assert_eq!(
            b.match_key(MODKEY.with_ctrl().with_shift(), XK_1 + 8),
            Some(&Action::ToggleTag { tags: 1 << 8 })
        );
        assert_eq!(b.match_key(MODKEY, XK_TAB), Some(&Action::View { tags: 0 }));
    }

    #[test]
    fn test_media_keys_need_no_modifier() {
        let config = Config::default();
        match config
            .bindings
            .match_key(Modifiers::NONE, XF86XK_AUDIO_NEXT)
        {
            Some(Action::Spawn { argv }) => assert_eq!(argv[2], "mpc next"),
            other => panic!("unexpected binding: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_too_many_tags() {
        let config = Config {
            tags: (0..33).map(|i| i.to_string()).collect(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_layouts() {
        let config = Config {
            layouts: vec![],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_mfact_out_of_range() {
        let config = Config {
            mfact: 0.99,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_checks_button_layouts() {
        let mut config = Config {
            layouts: vec![Layout::new("[]=", LayoutKind::Tile)],
            bindings: Bindings {
                keys: vec![],
                buttons: vec![ButtonBinding::new(
                    ClickTarget::LayoutSymbol,
                    Modifiers::NONE,
                    3,
                    Action::SetLayout { index: Some(2) },
                )],
            },
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("button binding"));

        config.bindings.buttons[0].action = Action::SetLayout { index: Some(0) };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_expand_arg() {
        let config = Config::default();
        assert_eq!(config.expand_arg("{mon}", 1), "1");
        assert_eq!(config.expand_arg("{normbgcolor}", 0), "#222222");
        assert_eq!(config.expand_arg("{selbordercolor}", 0), "#005577");
        assert_eq!(config.expand_arg("-e", 0), "-e");
        assert_eq!(config.expand_arg("{unknown}", 0), "{unknown}");
    }
}
