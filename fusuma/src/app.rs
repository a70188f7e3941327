mod channels;
mod command;
mod dispatch;
mod effects;
mod events;
mod sync_helper;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc as std_mpsc;

use anyhow::{Context, Result};
use x11rb::connection::Connection;

use crate::core::{Config, State, WindowMove};
use crate::platform::WindowManipulator;
use crate::x11::X11Backend;
use channels::{create_channels, run_async, MainMessage};
use dispatch::{dispatch_command, dispatch_event, dispatch_startup};

pub struct App {}

impl App {
    pub fn run(config: Config) -> Result<()> {
        let config = Rc::new(config);
        let backend = X11Backend::connect(Rc::clone(&config))?;

        let (tokio_channels, main_channels) = create_channels();

        // Spawn tokio runtime in separate thread
        std::thread::Builder::new()
            .name("ipc".to_string())
            .spawn(move || {
                let rt = match tokio::runtime::Runtime::new() {
                    Ok(rt) => rt,
                    Err(e) => {
                        tracing::error!("Failed to start the tokio runtime: {}", e);
                        return;
                    }
                };
                rt.block_on(run_async(tokio_channels));
            })
            .context("Failed to spawn the IPC thread")?;

        // Spawn the X event reader
        let conn = backend.connection();
        let x_tx = main_channels.main_tx;
        std::thread::Builder::new()
            .name("x11-events".to_string())
            .spawn(move || loop {
                match conn.wait_for_event() {
                    Ok(event) => {
                        if x_tx.send(MainMessage::X(event)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = x_tx.send(MainMessage::ConnectionLost(e.to_string()));
                        break;
                    }
                }
            })
            .context("Failed to spawn the X event thread")?;

        let state = RefCell::new(State::new(config));
        dispatch_startup(&state, &backend, &backend);
        backend.flush();

        let result = Self::run_main_loop(&main_channels.main_rx, &state, &backend);

        // Hidden clients come back on screen before they are given back
        let clients: Vec<WindowMove> = state
            .borrow()
            .clients
            .values()
            .map(|c| WindowMove {
                window_id: c.id,
                frame: c.frame,
            })
            .collect();
        backend.apply_window_moves(&clients);
        for m in &clients {
            backend.release_window(m.window_id, false);
        }
        backend.shutdown();
        tracing::info!("fusuma stopped");
        result
    }

    fn run_main_loop(
        main_rx: &std_mpsc::Receiver<MainMessage>,
        state: &RefCell<State>,
        backend: &X11Backend,
    ) -> Result<()> {
        tracing::info!("Entering the event loop");
        while state.borrow().running {
            let Ok(message) = main_rx.recv() else {
                anyhow::bail!("All event sources closed");
            };
            match message {
                MainMessage::X(raw) => {
                    if let Some(event) = backend.translate(raw) {
                        tracing::trace!("Event: {:?}", event);
                        dispatch_event(event, state, backend);
                    }
                }
                MainMessage::Ipc((cmd, resp_tx)) => {
                    let response = dispatch_command(&cmd, state, backend);
                    if resp_tx.blocking_send(response).is_err() {
                        tracing::warn!("IPC client went away before the response");
                    }
                }
                MainMessage::ConnectionLost(e) => {
                    anyhow::bail!("Lost the X connection: {}", e);
                }
            }
            backend.flush();
        }
        Ok(())
    }
}
