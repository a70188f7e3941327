use super::{Client, ClientId, Config, Rect, TagMask};

#[derive(Debug, Clone)]
pub struct Monitor {
    pub index: usize,
    /// Physical output region.
    pub frame: Rect,
    /// Region left for clients once the bar is accounted for.
    pub window_area: Rect,
    pub bar_y: i32,
    pub show_bar: bool,
    pub top_bar: bool,
    pub visible_tags: TagMask,
    pub previous_visible_tags: TagMask,
    /// Indices into `Config::layouts`; `selected_layout` picks the active slot.
    pub layouts: [usize; 2],
    pub selected_layout: usize,
    pub layout_symbol: String,
    pub nmaster: u32,
    pub mfact: f32,
    pub gap: u32,
    /// Tiling order, most recently attached first.
    pub clients: Vec<ClientId>,
    /// Focus history, most recently focused first.
    pub stack: Vec<ClientId>,
    pub selected: Option<ClientId>,
}

impl Monitor {
    pub fn new(index: usize, frame: Rect, config: &Config) -> Self {
        let second = if config.layouts.len() > 1 { 1 } else { 0 };
        let mut monitor = Self {
            index,
            frame,
            window_area: frame,
            bar_y: 0,
            show_bar: config.show_bar,
            top_bar: config.top_bar,
            visible_tags: TagMask::new(1),
            previous_visible_tags: TagMask::new(1),
            layouts: [0, second],
            selected_layout: 0,
            layout_symbol: config
                .layouts
                .first()
                .map(|l| l.symbol.clone())
                .unwrap_or_default(),
            nmaster: config.nmaster,
            mfact: config.mfact,
            gap: config.gap_px,
            clients: Vec::new(),
            stack: Vec::new(),
            selected: None,
        };
        monitor.update_bar_position(config.bar_height);
        monitor
    }

    /// Index into `Config::layouts` of the active layout.
    pub fn layout_index(&self) -> usize {
        self.layouts[self.selected_layout]
    }

    /// Recomputes the window area and bar position from the output frame.
    pub fn update_bar_position(&mut self, bar_height: u32) {
        self.window_area = self.frame;
        if self.show_bar {
            self.window_area.height = self.frame.height.saturating_sub(bar_height);
            if self.top_bar {
                self.bar_y = self.frame.y;
                self.window_area.y = self.frame.y + bar_height as i32;
            } else {
                self.bar_y = self.frame.y + self.window_area.height as i32;
            }
        } else {
            self.bar_y = -(bar_height as i32);
        }
    }

    pub fn bar_rect(&self, bar_height: u32) -> Rect {
        Rect::new(self.frame.x, self.bar_y, self.frame.width, bar_height)
    }

    pub fn is_visible(&self, client: &Client) -> bool {
        client.is_visible_on(self.visible_tags)
    }

    /// New clients go to the front of the tiling order.
    pub fn attach(&mut self, id: ClientId) {
        self.clients.retain(|&c| c != id);
        self.clients.insert(0, id);
    }

    pub fn attach_stack(&mut self, id: ClientId) {
        self.stack.retain(|&c| c != id);
        self.stack.insert(0, id);
    }

    pub fn detach(&mut self, id: ClientId) {
        self.clients.retain(|&c| c != id);
    }

    pub fn detach_stack(&mut self, id: ClientId) {
        self.stack.retain(|&c| c != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }
}
