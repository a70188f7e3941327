//! Click regions of the bar. Text is measured in fixed-width cells of
//! `Config::glyph_width` plus one cell of padding per item.

use super::bindings::ClickTarget;
use super::Config;

pub fn text_width(text: &str, glyph_width: u32) -> i32 {
    ((text.chars().count() as u32 + 1) * glyph_width) as i32
}

/// Status text as shown: segment markers (bytes below 0x20) are dropped.
pub fn visible_status(raw: &str) -> String {
    raw.chars().filter(|&c| (c as u32) >= 0x20).collect()
}

/// Marker byte of the status segment under `click_x`, or 0 when the click
/// is left of the first marker.
pub fn status_segment_at(raw: &str, text_start: i32, click_x: i32, glyph_width: u32) -> u8 {
    let mut x = text_start;
    let mut segment = 0;
    for c in raw.chars() {
        if (c as u32) < 0x20 {
            if x >= click_x {
                break;
            }
            segment = c as u8;
        } else {
            x += glyph_width as i32;
        }
    }
    segment
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarHit {
    pub target: ClickTarget,
    /// Bit of the clicked tag, for `TagBar`.
    pub tag: Option<u32>,
    /// Marker of the clicked segment, for `StatusText`.
    pub segment: u8,
}

#[derive(Debug, Clone)]
pub struct BarRegions {
    /// Right edge of each tag cell.
    tag_ends: Vec<i32>,
    layout_end: i32,
    status_start: i32,
    glyph_width: u32,
}

impl BarRegions {
    pub fn compute(config: &Config, layout_symbol: &str, raw_status: &str, bar_width: u32) -> Self {
        let gw = config.glyph_width;
        let mut x = 0;
        let tag_ends = config
            .tags
            .iter()
            .map(|t| {
                x += text_width(t, gw);
                x
            })
            .collect();
        let layout_end = x + text_width(layout_symbol, gw);
        let status_start = bar_width as i32 - text_width(&visible_status(raw_status), gw);

        Self {
            tag_ends,
            layout_end,
            status_start,
            glyph_width: gw,
        }
    }

    /// `x` is relative to the bar's left edge.
    pub fn hit(&self, x: i32, raw_status: &str) -> BarHit {
        if let Some(i) = self.tag_ends.iter().position(|&end| x < end) {
            return BarHit {
                target: ClickTarget::TagBar,
                tag: Some(1 << i),
                segment: 0,
            };
        }
        if x < self.layout_end {
            return BarHit {
                target: ClickTarget::LayoutSymbol,
                tag: None,
                segment: 0,
            };
        }
        if x > self.status_start {
            // text is drawn after half a cell of padding
            let text_start = self.status_start + self.glyph_width as i32 / 2;
            return BarHit {
                target: ClickTarget::StatusText,
                tag: None,
                segment: status_segment_at(raw_status, text_start, x, self.glyph_width),
            };
        }
        BarHit {
            target: ClickTarget::WindowTitle,
            tag: None,
            segment: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            tags: ["1", "2", "3"].iter().map(|s| s.to_string()).collect(),
            glyph_width: 10,
            ..Config::default()
        }
    }

    #[test]
    fn test_text_width_includes_padding() {
        assert_eq!(text_width("1", 10), 20);
        assert_eq!(text_width("[]=", 10), 40);
        assert_eq!(text_width("", 10), 10);
    }

    #[test]
    fn test_visible_status_strips_markers() {
        assert_eq!(visible_status("\u{1} vol 40%\u{2} bat 90%"), " vol 40% bat 90%");
    }

    #[test]
    fn test_hit_tags() {
        let regions = BarRegions::compute(&config(), "[]=", "", 1000);
        assert_eq!(regions.hit(0, "").tag, Some(0b001));
        assert_eq!(regions.hit(19, "").tag, Some(0b001));
        assert_eq!(regions.hit(20, "").tag, Some(0b010));
        assert_eq!(regions.hit(59, "").tag, Some(0b100));
        assert_eq!(regions.hit(59, "").target, ClickTarget::TagBar);
    }

    #[test]
    fn test_hit_layout_symbol_and_title() {
        let regions = BarRegions::compute(&config(), "[]=", "", 1000);
        assert_eq!(regions.hit(60, "").target, ClickTarget::LayoutSymbol);
        assert_eq!(regions.hit(99, "").target, ClickTarget::LayoutSymbol);
        assert_eq!(regions.hit(100, "").target, ClickTarget::WindowTitle);
    }

    #[test]
    fn test_hit_status_segments() {
        // two segments of 4 visible chars each: width (8 + 1) * 10 = 90
        let status = "\u{1}vol \u{2}bat ";
        let regions = BarRegions::compute(&config(), "[]=", status, 1000);
        // status region starts at 910; text at 915
        assert_eq!(regions.hit(900, status).target, ClickTarget::WindowTitle);

        let first = regions.hit(920, status);
        assert_eq!(first.target, ClickTarget::StatusText);
        assert_eq!(first.segment, 1);

        let second = regions.hit(960, status);
        assert_eq!(second.segment, 2);
    }

    #[test]
    fn test_status_segment_before_first_marker() {
        assert_eq!(status_segment_at("abc\u{3}def", 0, 5, 10), 0);
        assert_eq!(status_segment_at("abc\u{3}def", 0, 35, 10), 3);
    }
}
