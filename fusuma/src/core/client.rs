use super::TagMask;

/// X window id of a managed top-level window.
pub type ClientId = u32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn center(&self) -> (i32, i32) {
        (
            self.x + self.width as i32 / 2,
            self.y + self.height as i32 / 2,
        )
    }

    /// Area of the overlap with `other`, 0 when disjoint.
    pub fn intersection_area(&self, other: &Rect) -> u64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0 || h <= 0 {
            return 0;
        }
        w as u64 * h as u64
    }
}

/// ICCCM `WM_NORMAL_HINTS`, already normalised: a missing base size falls
/// back to the minimum size and vice versa.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeHints {
    pub base_width: u32,
    pub base_height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub max_height: u32,
    pub inc_width: u32,
    pub inc_height: u32,
    pub min_aspect: f32,
    pub max_aspect: f32,
}

impl SizeHints {
    pub fn is_fixed(&self) -> bool {
        self.max_width > 0
            && self.max_height > 0
            && self.max_width == self.min_width
            && self.max_height == self.min_height
    }

    /// Adjusts a client size (without borders) to the hints.
    pub fn constrain(&self, width: u32, height: u32) -> (u32, u32) {
        let base_is_min =
            self.base_width == self.min_width && self.base_height == self.min_height;
        let mut w = width as i64;
        let mut h = height as i64;

        // ICCCM 4.1.2.3: the base size is not part of the aspect ratio
        // unless it doubles as the minimum size
        if !base_is_min {
            w -= self.base_width as i64;
            h -= self.base_height as i64;
        }
        if self.min_aspect > 0.0 && self.max_aspect > 0.0 && w > 0 && h > 0 {
            if self.max_aspect < w as f32 / h as f32 {
                w = (h as f32 * self.max_aspect + 0.5) as i64;
            } else if self.min_aspect < h as f32 / w as f32 {
                h = (w as f32 * self.min_aspect + 0.5) as i64;
            }
        }
        if base_is_min {
            w -= self.base_width as i64;
            h -= self.base_height as i64;
        }
        if self.inc_width > 0 {
            w -= w.rem_euclid(self.inc_width as i64);
        }
        if self.inc_height > 0 {
            h -= h.rem_euclid(self.inc_height as i64);
        }
        w = (w + self.base_width as i64).max(self.min_width as i64);
        h = (h + self.base_height as i64).max(self.min_height as i64);
        if self.max_width > 0 {
            w = w.min(self.max_width as i64);
        }
        if self.max_height > 0 {
            h = h.min(self.max_height as i64);
        }
        (w.max(1) as u32, h.max(1) as u32)
    }
}

/// What the window system reports about a window asking to be mapped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowAttributes {
    pub id: ClientId,
    pub class: String,
    pub instance: String,
    pub title: String,
    pub frame: Rect,
    pub size_hints: Option<SizeHints>,
    pub transient_for: Option<ClientId>,
    pub override_redirect: bool,
}

#[derive(Debug, Clone)]
pub struct Client {
    pub id: ClientId,
    pub class: String,
    pub instance: String,
    pub title: String,
    pub tags: TagMask,
    pub monitor: usize,
    pub frame: Rect,
    pub float_frame: Option<Rect>,
    pub border_width: u32,
    pub is_floating: bool,
    pub size_hints: Option<SizeHints>,
}

impl Client {
    pub fn from_attributes(
        attrs: &WindowAttributes,
        tags: TagMask,
        monitor: usize,
        border_width: u32,
    ) -> Self {
        Self {
            id: attrs.id,
            class: attrs.class.clone(),
            instance: attrs.instance.clone(),
            title: attrs.title.clone(),
            tags,
            monitor,
            frame: attrs.frame,
            float_frame: None,
            border_width,
            is_floating: false,
            size_hints: attrs.size_hints,
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.size_hints.is_some_and(|h| h.is_fixed())
    }

    pub fn outer_width(&self) -> u32 {
        self.frame.width + 2 * self.border_width
    }

    pub fn outer_height(&self) -> u32 {
        self.frame.height + 2 * self.border_width
    }

    pub fn center(&self) -> (i32, i32) {
        self.frame.center()
    }

    pub fn is_visible_on(&self, visible_tags: TagMask) -> bool {
        self.tags.intersects(visible_tags)
    }
}
