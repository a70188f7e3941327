use std::sync::mpsc as std_mpsc;

use tokio::sync::mpsc;

use crate::ipc::IpcServer;
use fusuma_ipc::{Command, Response};

pub type IpcCommandWithResponse = (Command, mpsc::Sender<Response>);

/// Everything the main thread waits on arrives through one queue.
pub enum MainMessage {
    /// Raw event read from the X connection.
    X(x11rb::protocol::Event),
    Ipc(IpcCommandWithResponse),
    /// The X connection broke; the main loop cannot continue.
    ConnectionLost(String),
}

pub struct TokioChannels {
    pub main_tx: std_mpsc::Sender<MainMessage>,
    pub server_tx: mpsc::Sender<IpcCommandWithResponse>,
    pub server_rx: mpsc::Receiver<IpcCommandWithResponse>,
}

pub struct MainChannels {
    /// Handed to the X reader thread.
    pub main_tx: std_mpsc::Sender<MainMessage>,
    pub main_rx: std_mpsc::Receiver<MainMessage>,
}

pub fn create_channels() -> (TokioChannels, MainChannels) {
    // Channel: X reader and tokio -> main thread
    let (main_tx, main_rx) = std_mpsc::channel::<MainMessage>();

    // Channel for IPC server (tokio internal)
    let (server_tx, server_rx) = mpsc::channel::<IpcCommandWithResponse>(256);

    let tokio_channels = TokioChannels {
        main_tx: main_tx.clone(),
        server_tx,
        server_rx,
    };
    let main_channels = MainChannels { main_tx, main_rx };

    (tokio_channels, main_channels)
}

pub async fn run_async(channels: TokioChannels) {
    let TokioChannels {
        main_tx,
        server_tx,
        mut server_rx,
    } = channels;

    tracing::info!("Tokio runtime started");

    let ipc_server = IpcServer::new(server_tx);
    tokio::spawn(async move {
        if let Err(e) = ipc_server.run().await {
            tracing::error!("IPC server error: {}", e);
        }
    });

    while let Some((cmd, resp_tx)) = server_rx.recv().await {
        // Forward IPC commands to main thread
        if main_tx.send(MainMessage::Ipc((cmd, resp_tx))).is_err() {
            tracing::error!("Failed to forward IPC command to main thread");
            break;
        }
    }

    tracing::info!("Tokio runtime exiting");
}
