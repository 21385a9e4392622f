//! Scripted in-memory connector.
//!
//! Each connect attempt consumes one [`Step`] (default: accept). Accepted
//! attempts hand the test a [`Peer`] that plays the server side.

use async_trait::async_trait;
use parking_lot::Mutex;
use slirc_tmi::{Endpoint, LineStream, TransportError};
use slirc_todo::network::Connector;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// What the next connect attempt does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Step {
    /// Open a stream.
    Accept,
    /// Open a stream that reports itself as not open.
    AcceptNotReady,
    /// Fail with connection refused.
    Refuse,
}

enum ServerEvent {
    Line(String),
    Close,
    Reset,
}

/// Connector driven by a script.
pub struct ScriptedConnector {
    script: Mutex<VecDeque<Step>>,
    attempts: Mutex<Vec<Instant>>,
    peers: mpsc::UnboundedSender<Peer>,
}

#[allow(dead_code)]
impl ScriptedConnector {
    /// Connector plus the queue its accepted peers arrive on.
    pub fn new(script: impl IntoIterator<Item = Step>) -> (Arc<Self>, PeerQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connector = Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            attempts: Mutex::new(Vec::new()),
            peers: tx,
        });
        (connector, PeerQueue(rx))
    }

    /// When each connect attempt happened.
    pub fn attempts(&self) -> Vec<Instant> {
        self.attempts.lock().clone()
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn LineStream>, TransportError> {
        self.attempts.lock().push(Instant::now());
        let step = self.script.lock().pop_front().unwrap_or(Step::Accept);

        if step == Step::Refuse {
            return Err(TransportError::Connect {
                endpoint: endpoint.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
            });
        }

        let (to_client, inbound) = mpsc::unbounded_channel();
        let (outbound, from_client) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));

        let stream = ScriptedStream {
            inbound,
            outbound,
            open: step == Step::Accept,
            closed: closed.clone(),
        };
        let _ = self.peers.send(Peer {
            to_client,
            from_client,
            closed,
        });
        Ok(Box::new(stream))
    }
}

struct ScriptedStream {
    inbound: mpsc::UnboundedReceiver<ServerEvent>,
    outbound: mpsc::UnboundedSender<String>,
    open: bool,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl LineStream for ScriptedStream {
    async fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        match self.inbound.recv().await {
            Some(ServerEvent::Line(line)) => Ok(Some(line)),
            Some(ServerEvent::Reset) => {
                self.open = false;
                Err(TransportError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                )))
            }
            Some(ServerEvent::Close) | None => {
                self.open = false;
                Ok(None)
            }
        }
    }

    async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        if !self.open {
            return Err(TransportError::Closed);
        }
        self.outbound
            .send(line.to_string())
            .map_err(|_| TransportError::Closed)
    }

    async fn close(&mut self) {
        self.open = false;
        self.closed.store(true, Ordering::SeqCst);
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// Receives peers as the manager connects.
pub struct PeerQueue(mpsc::UnboundedReceiver<Peer>);

impl PeerQueue {
    /// Wait for the next accepted connection.
    pub async fn next(&mut self) -> Peer {
        self.0.recv().await.expect("connector dropped")
    }

    /// A peer that is already waiting, if any.
    #[allow(dead_code)]
    pub fn try_next(&mut self) -> Option<Peer> {
        self.0.try_recv().ok()
    }
}

/// Server side of one scripted connection.
pub struct Peer {
    to_client: mpsc::UnboundedSender<ServerEvent>,
    from_client: mpsc::UnboundedReceiver<String>,
    closed: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl Peer {
    /// Deliver a line to the client.
    pub fn send(&self, line: &str) {
        let _ = self.to_client.send(ServerEvent::Line(line.to_string()));
    }

    /// Close the stream cleanly.
    pub fn close(&self) {
        let _ = self.to_client.send(ServerEvent::Close);
    }

    /// Fail the stream with a reset.
    pub fn reset(&self) {
        let _ = self.to_client.send(ServerEvent::Reset);
    }

    /// Next line the client wrote, or `None` once the client dropped the stream.
    pub async fn recv(&mut self) -> Option<String> {
        self.from_client.recv().await
    }

    /// Everything the client writes until it drops the stream.
    pub async fn drain(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = self.from_client.recv().await {
            lines.push(line);
        }
        lines
    }

    /// Read the three handshake lines and return the nickname used.
    pub async fn expect_handshake(&mut self, channel: &str) -> String {
        assert_eq!(
            self.recv().await.as_deref(),
            Some("CAP REQ :twitch.tv/tags twitch.tv/commands twitch.tv/membership")
        );
        let nick_line = self.recv().await.expect("NICK line");
        let nick = nick_line
            .strip_prefix("NICK ")
            .expect("NICK directive")
            .to_string();
        assert_eq!(self.recv().await, Some(format!("JOIN #{}", channel)));
        nick
    }

    /// Send a keep-alive and wait for the reply. Because the client handles
    /// lines in order, everything sent earlier has been processed on return.
    pub async fn barrier(&mut self) {
        self.send("PING :tmi.twitch.tv");
        assert_eq!(self.recv().await.as_deref(), Some("PONG :tmi.twitch.tv"));
    }

    /// Whether the client called `close` on this stream.
    pub fn closed_by_client(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
