use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use super::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefKind {
    String,
    Integer,
    Float,
}

#[derive(Debug, Clone, Copy)]
pub struct ResourcePref {
    pub name: &'static str,
    pub kind: PrefKind,
}

const fn pref(name: &'static str, kind: PrefKind) -> ResourcePref {
    ResourcePref { name, kind }
}

/// Settings that may be overridden at startup.
pub const RESOURCE_PREFS: &[ResourcePref] = &[
    pref("normbgcolor", PrefKind::String),
    pref("normbordercolor", PrefKind::String),
    pref("normfgcolor", PrefKind::String),
    pref("selbgcolor", PrefKind::String),
    pref("selbordercolor", PrefKind::String),
    pref("selfgcolor", PrefKind::String),
    pref("borderpx", PrefKind::Integer),
    pref("snap", PrefKind::Integer),
    pref("showbar", PrefKind::Integer),
    pref("topbar", PrefKind::Integer),
    pref("nmaster", PrefKind::Integer),
    pref("resizehints", PrefKind::Integer),
    pref("mfact", PrefKind::Float),
];

enum PrefValue<'a> {
    String(&'a str),
    Integer(i64),
    Float(f64),
}

pub fn preferences_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fusuma").join("preferences.json"))
}

pub fn load_preferences(path: &Path) -> Result<Map<String, Value>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_preferences(&contents)
}

pub fn parse_preferences(contents: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(contents).context("Invalid preferences JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("preferences must be a JSON object"),
    }
}

/// Applies every known, well-typed entry. Returns how many were applied.
pub fn apply_preferences(config: &mut Config, values: &Map<String, Value>) -> usize {
    let mut applied = 0;
    for (name, value) in values {
        let Some(pref) = RESOURCE_PREFS.iter().find(|p| p.name == name.as_str()) else {
            tracing::warn!("Unknown preference: {}", name);
            continue;
        };
        match set_preference(config, pref, value) {
            Ok(()) => {
                tracing::debug!("Preference {} = {}", name, value);
                applied += 1;
            }
            Err(e) => tracing::warn!("Skipping preference {}: {}", name, e),
        }
    }
    applied
}

fn typed<'a>(pref: &ResourcePref, value: &'a Value) -> Result<PrefValue<'a>, String> {
    let typed = match pref.kind {
        PrefKind::String => value.as_str().map(PrefValue::String),
        PrefKind::Integer => value.as_i64().map(PrefValue::Integer),
        PrefKind::Float => value.as_f64().map(PrefValue::Float),
    };
    typed.ok_or_else(|| format!("expected {:?}, got {}", pref.kind, value))
}

fn non_negative(v: i64) -> Result<u32, String> {
    u32::try_from(v).map_err(|_| format!("{} is out of range", v))
}

fn set_preference(config: &mut Config, pref: &ResourcePref, value: &Value) -> Result<(), String> {
    match (pref.name, typed(pref, value)?) {
        ("normbgcolor", PrefValue::String(s)) => config.norm.bg = s.to_string(),
        ("normbordercolor", PrefValue::String(s)) => config.norm.border = s.to_string(),
        ("normfgcolor", PrefValue::String(s)) => config.norm.fg = s.to_string(),
        ("selbgcolor", PrefValue::String(s)) => config.sel.bg = s.to_string(),
        ("selbordercolor", PrefValue::String(s)) => config.sel.border = s.to_string(),
        ("selfgcolor", PrefValue::String(s)) => config.sel.fg = s.to_string(),
        ("borderpx", PrefValue::Integer(v)) => config.border_px = non_negative(v)?,
        ("snap", PrefValue::Integer(v)) => config.snap = non_negative(v)?,
        ("showbar", PrefValue::Integer(v)) => config.show_bar = v != 0,
        ("topbar", PrefValue::Integer(v)) => config.top_bar = v != 0,
        ("nmaster", PrefValue::Integer(v)) => config.nmaster = non_negative(v)?,
        ("resizehints", PrefValue::Integer(v)) => config.resize_hints = v != 0,
        ("mfact", PrefValue::Float(v)) => {
            if !(0.05..=0.95).contains(&v) {
                return Err(format!("{} is outside 0.05..0.95", v));
            }
            config.mfact = v as f32;
        }
        (name, _) => return Err(format!("no setter for {}", name)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(json: &str) -> (Config, usize) {
        let mut config = Config::default();
        let values = parse_preferences(json).unwrap();
        let applied = apply_preferences(&mut config, &values);
        (config, applied)
    }

    #[test]
    fn test_every_pref_has_a_setter() {
        for pref in RESOURCE_PREFS {
            let value = match pref.kind {
                PrefKind::String => Value::from("#000000"),
                PrefKind::Integer => Value::from(1),
                PrefKind::Float => Value::from(0.5),
            };
            let mut config = Config::default();
            assert!(
                set_preference(&mut config, pref, &value).is_ok(),
                "no setter for {}",
                pref.name
            );
        }
    }

    #[test]
    fn test_apply_string_and_integer() {
        let (config, applied) =
            apply(r##"{"normbgcolor": "#1d2021", "borderpx": 3, "showbar": 0}"##);
        assert_eq!(applied, 3);
        assert_eq!(config.norm.bg, "#1d2021");
        assert_eq!(config.border_px, 3);
        assert!(!config.show_bar);
    }

    #[test]
    fn test_apply_float() {
        let (config, applied) = apply(r#"{"mfact": 0.6}"#);
        assert_eq!(applied, 1);
        assert!((config.mfact - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn test_integer_accepted_as_float() {
        let (config, applied) = apply(r#"{"mfact": 0}"#);
        // type matches but value is rejected by the range check
        assert_eq!(applied, 0);
        assert_eq!(config.mfact, 0.55);
    }

    #[test]
    fn test_type_mismatch_is_skipped() {
        let (config, applied) = apply(r#"{"borderpx": "wide", "snap": 1.5}"#);
        assert_eq!(applied, 0);
        assert_eq!(config.border_px, 1);
        assert_eq!(config.snap, 32);
    }

    #[test]
    fn test_unknown_name_is_skipped() {
        let (_, applied) = apply(r#"{"font": "monospace", "nmaster": 2}"#);
        assert_eq!(applied, 1);
    }

    #[test]
    fn test_negative_integer_is_rejected() {
        let (config, applied) = apply(r#"{"nmaster": -1}"#);
        assert_eq!(applied, 0);
        assert_eq!(config.nmaster, 1);
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(parse_preferences("[1, 2]").is_err());
        assert!(parse_preferences("{").is_err());
    }
}
