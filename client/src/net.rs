//! Websocket link to the game server.
//!
//! The socket lives on its own thread inside a single-threaded tokio
//! runtime; the frame loop only ever touches a pair of unbounded channels.
//! Inbound traffic surfaces as [`NetEvent`]s drained once per frame, so all
//! game state mutation stays on the main thread.

use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::{ClientMessage, ServerMessage};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Connection lifecycle and traffic, as seen by the frame loop.
#[derive(Debug, Clone, PartialEq)]
pub enum NetEvent {
    /// Socket is open; time to send `join_game`.
    Opened,
    Message(ServerMessage),
    /// Socket closed or failed. The link stays usable as a sink that drops
    /// everything; there is no automatic reconnect.
    Closed,
}

pub struct ServerLink {
    outbound: mpsc::UnboundedSender<ClientMessage>,
    events: mpsc::UnboundedReceiver<NetEvent>,
}

impl ServerLink {
    /// Starts connecting to `url` in the background. Failures surface later
    /// as a `Closed` event rather than an error here.
    pub fn connect(url: &str) -> Self {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let url = url.to_string();

        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("Failed to start network runtime: {}", e);
                    let _ = event_tx.send(NetEvent::Closed);
                    return;
                }
            };
            runtime.block_on(run_socket(url, out_rx, event_tx));
        });

        Self {
            outbound: out_tx,
            events: event_rx,
        }
    }

    /// Link wired to bare channel ends instead of a socket, for scripted
    /// sessions in tests.
    pub fn loopback() -> (
        Self,
        mpsc::UnboundedSender<NetEvent>,
        mpsc::UnboundedReceiver<ClientMessage>,
    ) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let link = Self {
            outbound: out_tx,
            events: event_rx,
        };
        (link, event_tx, out_rx)
    }

    /// Queues a command for the socket thread. Commands sent after the
    /// connection closed are dropped.
    pub fn send(&self, message: ClientMessage) {
        if self.outbound.send(message).is_err() {
            debug!("Dropped outbound command: link closed");
        }
    }

    /// Next pending event, if any. Non-blocking.
    pub fn poll_event(&mut self) -> Option<NetEvent> {
        self.events.try_recv().ok()
    }
}

async fn run_socket(
    url: String,
    mut outbound: mpsc::UnboundedReceiver<ClientMessage>,
    events: mpsc::UnboundedSender<NetEvent>,
) {
    let (socket, _) = match connect_async(url.as_str()).await {
        Ok(pair) => pair,
        Err(e) => {
            error!("Failed to connect to {}: {}", url, e);
            let _ = events.send(NetEvent::Closed);
            return;
        }
    };
    info!("Connected to {}", url);
    if events.send(NetEvent::Opened).is_err() {
        return;
    }

    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            command = outbound.recv() => {
                let command = match command {
                    Some(command) => command,
                    None => break,
                };
                let text = match serde_json::to_string(&command) {
                    Ok(text) => text,
                    Err(e) => {
                        error!("Failed to encode command: {}", e);
                        continue;
                    }
                };
                debug!("-> {}", text);
                if let Err(e) = sink.send(Message::Text(text)).await {
                    error!("Failed to send command: {}", e);
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ServerMessage>(&text) {
                            Ok(message) => {
                                if events.send(NetEvent::Message(message)).is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                // Unknown actions are expected from newer
                                // servers; anything else malformed is loud.
                                let detail = e.to_string();
                                if detail.starts_with("unknown variant") {
                                    debug!("Ignoring unknown action: {}", detail);
                                } else {
                                    warn!("Ignoring malformed server message: {}", detail);
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        let _ = sink.send(Message::Pong(payload)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        warn!("Server closed the connection");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("Socket error: {}", e);
                        break;
                    }
                }
            }
        }
    }
    let _ = events.send(NetEvent::Closed);
}
