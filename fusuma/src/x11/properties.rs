use crate::core::SizeHints;

// WM_SIZE_HINTS.flags
const P_MIN_SIZE: u32 = 1 << 4;
const P_MAX_SIZE: u32 = 1 << 5;
const P_RESIZE_INC: u32 = 1 << 6;
const P_ASPECT: u32 = 1 << 7;
const P_BASE_SIZE: u32 = 1 << 8;

/// Splits `WM_CLASS` into (instance, class).
pub fn parse_wm_class(value: &[u8]) -> (String, String) {
    let mut parts = value.split(|b| *b == 0);
    let instance = parts.next().unwrap_or_default();
    let class = parts.next().unwrap_or_default();
    (
        String::from_utf8_lossy(instance).into_owned(),
        String::from_utf8_lossy(class).into_owned(),
    )
}

/// Decodes `WM_NORMAL_HINTS`. Old clients send the short pre-ICCCM
/// layout, missing fields read as zero.
pub fn parse_size_hints(values: &[u32]) -> Option<SizeHints> {
    let flags = *values.first()?;
    let field = |i: usize| values.get(i).map_or(0, |v| (*v as i32).max(0) as u32);

    let mut hints = SizeHints::default();
    if flags & P_BASE_SIZE != 0 {
        hints.base_width = field(15);
        hints.base_height = field(16);
    } else if flags & P_MIN_SIZE != 0 {
        hints.base_width = field(5);
        hints.base_height = field(6);
    }
    if flags & P_RESIZE_INC != 0 {
        hints.inc_width = field(9);
        hints.inc_height = field(10);
    }
    if flags & P_MAX_SIZE != 0 {
        hints.max_width = field(7);
        hints.max_height = field(8);
    }
    if flags & P_MIN_SIZE != 0 {
        hints.min_width = field(5);
        hints.min_height = field(6);
    } else if flags & P_BASE_SIZE != 0 {
        hints.min_width = hints.base_width;
        hints.min_height = hints.base_height;
    }
    if flags & P_ASPECT != 0 {
        hints.min_aspect = ratio(field(12), field(11));
        hints.max_aspect = ratio(field(13), field(14));
    }
    Some(hints)
}

fn ratio(numerator: u32, denominator: u32) -> f32 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f32 / denominator as f32
}

/// Window title, `broken` when the client sets an empty one.
pub fn title_from_bytes(value: &[u8]) -> String {
    let title = String::from_utf8_lossy(value);
    let title = title.trim_end_matches('\0');
    if title.is_empty() {
        "broken".to_string()
    } else {
        title.to_string()
    }
}

/// Hex `#rrggbb` to a TrueColor pixel.
pub fn parse_color(color: &str) -> Option<u32> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wm_class() {
        assert_eq!(
            parse_wm_class(b"Navigator\0firefox\0"),
            ("Navigator".to_string(), "firefox".to_string())
        );
        assert_eq!(
            parse_wm_class(b"st"),
            ("st".to_string(), String::new())
        );
        assert_eq!(parse_wm_class(b""), (String::new(), String::new()));
    }

    #[test]
    fn test_size_hints_fixed_window() {
        let mut values = [0u32; 18];
        values[0] = P_MIN_SIZE | P_MAX_SIZE;
        values[5] = 300;
        values[6] = 200;
        values[7] = 300;
        values[8] = 200;
        let hints = parse_size_hints(&values).unwrap();
        assert!(hints.is_fixed());
        // the minimum doubles as base size
        assert_eq!(hints.base_width, 300);
        assert_eq!(hints.inc_width, 0);
    }

    #[test]
    fn test_size_hints_terminal() {
        let mut values = [0u32; 18];
        values[0] = P_RESIZE_INC | P_BASE_SIZE;
        values[9] = 7;
        values[10] = 14;
        values[15] = 4;
        values[16] = 4;
        let hints = parse_size_hints(&values).unwrap();
        assert_eq!((hints.inc_width, hints.inc_height), (7, 14));
        assert_eq!((hints.min_width, hints.min_height), (4, 4));
        assert!(!hints.is_fixed());
    }

    #[test]
    fn test_size_hints_aspect_and_short_property() {
        let mut values = [0u32; 15];
        values[0] = P_ASPECT;
        values[11] = 4;
        values[12] = 3;
        values[13] = 16;
        values[14] = 9;
        let hints = parse_size_hints(&values).unwrap();
        assert!((hints.min_aspect - 0.75).abs() < f32::EPSILON);
        assert!((hints.max_aspect - 16.0 / 9.0).abs() < f32::EPSILON);
        assert_eq!(hints.base_width, 0);

        assert!(parse_size_hints(&[]).is_none());
    }

    #[test]
    fn test_title_fallback() {
        assert_eq!(title_from_bytes(b"vim"), "vim");
        assert_eq!(title_from_bytes(b""), "broken");
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#005577"), Some(0x005577));
        assert_eq!(parse_color("#fff"), None);
        assert_eq!(parse_color("005577"), None);
    }
}
