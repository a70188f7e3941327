use x11rb::connection::Connection;
use x11rb::protocol::xproto::*;

use super::atoms::{NORMAL_STATE, WITHDRAWN_STATE};
use super::{process, X11Backend};
use crate::core::{ClientId, ConfigureRequest, DragKind, Rect, Restack, WindowMove};
use crate::platform::WindowManipulator;

fn frame_aux(frame: &Rect) -> ConfigureWindowAux {
    ConfigureWindowAux::new()
        .x(frame.x)
        .y(frame.y)
        .width(frame.width.max(1))
        .height(frame.height.max(1))
}

impl X11Backend {
    fn send_protocol(&self, window: Window, protocol: Atom) -> bool {
        if !self.supports_protocol(window, protocol) {
            return false;
        }
        let event = ClientMessageEvent {
            response_type: CLIENT_MESSAGE_EVENT,
            format: 32,
            sequence: 0,
            window,
            type_: self.atoms.WM_PROTOCOLS,
            data: ClientMessageData::from([protocol, x11rb::CURRENT_TIME, 0, 0, 0]),
        };
        match self
            .conn
            .send_event(false, window, EventMask::NO_EVENT, event)
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Failed to send protocol message to {}: {}", window, e);
                false
            }
        }
    }

    fn set_border(&self, window: Window, pixel: u32) {
        let aux = ChangeWindowAttributesAux::new().border_pixel(pixel);
        if let Err(e) = self.conn.change_window_attributes(window, &aux) {
            tracing::warn!("Failed to set border of {}: {}", window, e);
        }
    }

    fn take_over(
        &self,
        window_id: ClientId,
        frame: &Rect,
        border_width: u32,
    ) -> anyhow::Result<()> {
        self.conn
            .configure_window(window_id, &frame_aux(frame).border_width(border_width))?;
        self.conn.change_window_attributes(
            window_id,
            &ChangeWindowAttributesAux::new()
                .border_pixel(self.colors.norm_border)
                .event_mask(
                    EventMask::ENTER_WINDOW
                        | EventMask::FOCUS_CHANGE
                        | EventMask::PROPERTY_CHANGE
                        | EventMask::STRUCTURE_NOTIFY,
                ),
        )?;
        self.grab_buttons(window_id, false)?;
        self.set_wm_state(window_id, NORMAL_STATE);
        self.send_configure(window_id, frame, border_width);
        self.conn.map_window(window_id)?;
        Ok(())
    }

    fn give_back(&self, window_id: ClientId) -> anyhow::Result<()> {
        self.conn.change_window_attributes(
            window_id,
            &ChangeWindowAttributesAux::new().event_mask(EventMask::NO_EVENT),
        )?;
        self.conn
            .configure_window(window_id, &ConfigureWindowAux::new().border_width(0))?;
        self.conn
            .ungrab_button(ButtonIndex::ANY, window_id, ModMask::ANY)?;
        self.set_wm_state(window_id, WITHDRAWN_STATE);
        Ok(())
    }

    fn create_bar(&self, rect: &Rect) -> anyhow::Result<Window> {
        let bar = self.conn.generate_id()?;
        self.conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            bar,
            self.root,
            rect.x as i16,
            rect.y as i16,
            rect.width.max(1) as u16,
            rect.height.max(1) as u16,
            0,
            WindowClass::INPUT_OUTPUT,
            x11rb::COPY_FROM_PARENT,
            &CreateWindowAux::new()
                .override_redirect(1)
                .background_pixel(self.colors.bar_background)
                .event_mask(EventMask::BUTTON_PRESS | EventMask::EXPOSURE)
                .cursor(self.cursors.normal),
        )?;
        self.conn.map_window(bar)?;
        Ok(bar)
    }
}

impl WindowManipulator for X11Backend {
    fn apply_window_moves(&self, moves: &[WindowMove]) {
        for m in moves {
            if let Err(e) = self.conn.configure_window(m.window_id, &frame_aux(&m.frame)) {
                tracing::warn!("Failed to move window {}: {}", m.window_id, e);
            } else {
                tracing::debug!(
                    "Moved window {} to ({}, {}) {}x{}",
                    m.window_id,
                    m.frame.x,
                    m.frame.y,
                    m.frame.width,
                    m.frame.height
                );
            }
        }
    }

    fn restack(&self, restack: &Restack) {
        if let Some(raise) = restack.raise {
            let aux = ConfigureWindowAux::new().stack_mode(StackMode::ABOVE);
            if let Err(e) = self.conn.configure_window(raise, &aux) {
                tracing::warn!("Failed to raise window {}: {}", raise, e);
            }
        }
        let mut sibling = self.bars.borrow().get(restack.monitor).copied();
        for &window in &restack.tiled {
            let aux = ConfigureWindowAux::new()
                .sibling(sibling)
                .stack_mode(StackMode::BELOW);
            if let Err(e) = self.conn.configure_window(window, &aux) {
                tracing::warn!("Failed to restack window {}: {}", window, e);
            }
            sibling = Some(window);
        }
    }

    fn set_focus(&self, previous: Option<ClientId>, current: Option<ClientId>) {
        if let Some(previous) = previous.filter(|p| Some(*p) != current) {
            self.set_border(previous, self.colors.norm_border);
            if let Err(e) = self.grab_buttons(previous, false) {
                tracing::warn!("Failed to grab buttons on {}: {}", previous, e);
            }
        }
        let Some(window) = current else {
            if let Err(e) =
                self.conn
                    .set_input_focus(InputFocus::POINTER_ROOT, self.root, x11rb::CURRENT_TIME)
            {
                tracing::warn!("Failed to reset input focus: {}", e);
            }
            return;
        };
        self.set_border(window, self.colors.sel_border);
        if let Err(e) = self.grab_buttons(window, true) {
            tracing::warn!("Failed to grab buttons on {}: {}", window, e);
        }
        if let Err(e) =
            self.conn
                .set_input_focus(InputFocus::POINTER_ROOT, window, x11rb::CURRENT_TIME)
        {
            tracing::warn!("Failed to focus window {}: {}", window, e);
        }
        self.send_protocol(window, self.atoms.WM_TAKE_FOCUS);
    }

    fn manage_window(&self, window_id: ClientId, frame: &Rect, border_width: u32) {
        match self.take_over(window_id, frame, border_width) {
            Ok(()) => tracing::debug!("Mapped window {} at {:?}", window_id, frame),
            Err(e) => tracing::warn!("Failed to take over window {}: {}", window_id, e),
        }
    }

    fn release_window(&self, window_id: ClientId, destroyed: bool) {
        if destroyed {
            return;
        }
        if let Err(e) = self.conn.grab_server() {
            tracing::warn!("Failed to grab the server: {}", e);
        }
        if let Err(e) = self.give_back(window_id) {
            tracing::warn!("Failed to release window {}: {}", window_id, e);
        }
        if let Err(e) = self.conn.ungrab_server() {
            tracing::warn!("Failed to ungrab the server: {}", e);
        }
    }

    fn send_configure(&self, window_id: ClientId, frame: &Rect, border_width: u32) {
        let event = ConfigureNotifyEvent {
            response_type: CONFIGURE_NOTIFY_EVENT,
            sequence: 0,
            event: window_id,
            window: window_id,
            above_sibling: x11rb::NONE,
            x: frame.x as i16,
            y: frame.y as i16,
            width: frame.width as u16,
            height: frame.height as u16,
            border_width: border_width as u16,
            override_redirect: false,
        };
        if let Err(e) = self
            .conn
            .send_event(false, window_id, EventMask::STRUCTURE_NOTIFY, event)
        {
            tracing::warn!("Failed to send configure notify to {}: {}", window_id, e);
        }
    }

    fn forward_configure(&self, request: &ConfigureRequest) {
        let mut aux = ConfigureWindowAux::new();
        aux.x = request.x;
        aux.y = request.y;
        aux.width = request.width;
        aux.height = request.height;
        aux.border_width = request.border_width;
        aux.sibling = request.sibling;
        aux.stack_mode = request.stack_mode.map(|mode| StackMode::from(mode as u8));
        if let Err(e) = self.conn.configure_window(request.window_id, &aux) {
            tracing::warn!("Failed to configure window {}: {}", request.window_id, e);
        }
    }

    fn close_window(&self, window_id: ClientId) {
        if self.send_protocol(window_id, self.atoms.WM_DELETE_WINDOW) {
            tracing::info!("Asked window {} to close", window_id);
            return;
        }
        tracing::info!("Window {} does not support WM_DELETE_WINDOW, killing it", window_id);
        if let Err(e) = self.conn.kill_client(window_id) {
            tracing::warn!("Failed to kill client {}: {}", window_id, e);
        }
    }

    fn spawn(&self, argv: &[String]) -> Result<(), String> {
        process::spawn(argv).map_err(|e| format!("{:#}", e))
    }

    fn signal_process(&self, name: &str, value: i32) -> Result<(), String> {
        process::signal_process(name, value).map_err(|e| format!("{:#}", e))
    }

    fn begin_drag(&self, kind: DragKind, warp_to: Option<(i32, i32)>) {
        let cursor = match kind {
            DragKind::Move => self.cursors.moving,
            DragKind::Resize => self.cursors.resizing,
        };
        let grabbed = self
            .conn
            .grab_pointer(
                false,
                self.root,
                EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE | EventMask::POINTER_MOTION,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
                x11rb::NONE,
                cursor,
                x11rb::CURRENT_TIME,
            )
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .is_some_and(|reply| reply.status == GrabStatus::SUCCESS);
        if !grabbed {
            tracing::warn!("Failed to grab the pointer for {}", kind);
            return;
        }
        if let Some((x, y)) = warp_to {
            if let Err(e) = self
                .conn
                .warp_pointer(x11rb::NONE, self.root, 0, 0, 0, 0, x as i16, y as i16)
            {
                tracing::warn!("Failed to warp the pointer: {}", e);
            }
        }
    }

    fn end_drag(&self) {
        if let Err(e) = self.conn.ungrab_pointer(x11rb::CURRENT_TIME) {
            tracing::warn!("Failed to release the pointer: {}", e);
        }
    }

    fn update_bars(&self, bars: &[Rect]) {
        let mut windows = self.bars.borrow_mut();
        while windows.len() > bars.len() {
            if let Some(bar) = windows.pop() {
                let _ = self.conn.destroy_window(bar);
            }
        }
        for (monitor, rect) in bars.iter().enumerate() {
            if let Some(&bar) = windows.get(monitor) {
                let aux = frame_aux(rect).stack_mode(StackMode::ABOVE);
                if let Err(e) = self.conn.configure_window(bar, &aux) {
                    tracing::warn!("Failed to move bar {}: {}", monitor, e);
                }
                continue;
            }
            match self.create_bar(rect) {
                Ok(bar) => windows.push(bar),
                Err(e) => {
                    tracing::warn!("Failed to create bar for monitor {}: {}", monitor, e);
                    break;
                }
            }
        }
        drop(windows);
        self.flush();
    }
}
