//! Concrete line transport over TCP or WebSocket.

use std::collections::VecDeque;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::codec::Framed;
use tracing::{debug, warn};

use super::endpoint::Endpoint;
use super::error::TransportError;
use super::LineStream;
use crate::codec::{LineCodec, MAX_LINE_LEN};
use crate::error::ProtocolError;

enum Kind {
    Tcp(Framed<TcpStream, LineCodec>),
    WebSocket(Box<WebSocketStream<MaybeTlsStream<TcpStream>>>),
}

/// A connected TMI line transport.
///
/// WebSocket frames may batch several CRLF-separated lines; they are split
/// and handed out one at a time.
pub struct Transport {
    kind: Kind,
    pending: VecDeque<String>,
    open: bool,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            Kind::Tcp(_) => "Tcp",
            Kind::WebSocket(_) => "WebSocket",
        };
        f.debug_struct("Transport")
            .field("kind", &kind)
            .field("pending", &self.pending.len())
            .field("open", &self.open)
            .finish()
    }
}

impl Transport {
    /// Dial `endpoint` and return an open transport.
    pub async fn connect(endpoint: &Endpoint) -> Result<Self, TransportError> {
        match endpoint {
            Endpoint::Tcp { host, port } => {
                let stream = TcpStream::connect((host.as_str(), *port))
                    .await
                    .map_err(|source| TransportError::Connect {
                        endpoint: endpoint.to_string(),
                        source,
                    })?;
                Ok(Self::tcp(stream))
            }
            Endpoint::WebSocket(url) => {
                let (stream, response) = tokio_tungstenite::connect_async(url.as_str()).await?;
                debug!(status = %response.status(), url = %url, "websocket upgraded");
                Ok(Self::websocket(stream))
            }
        }
    }

    /// Wrap an established TCP stream.
    pub fn tcp(stream: TcpStream) -> Self {
        if let Err(e) = stream.set_nodelay(true) {
            debug!(error = %e, "failed to set TCP_NODELAY");
        }
        Self::with_kind(Kind::Tcp(Framed::new(stream, LineCodec::new())))
    }

    /// Wrap an established WebSocket stream.
    pub fn websocket(stream: WebSocketStream<MaybeTlsStream<TcpStream>>) -> Self {
        Self::with_kind(Kind::WebSocket(Box::new(stream)))
    }

    fn with_kind(kind: Kind) -> Self {
        Self {
            kind,
            pending: VecDeque::new(),
            open: true,
        }
    }

    /// Whether this transport uses WebSocket framing.
    pub fn is_websocket(&self) -> bool {
        matches!(self.kind, Kind::WebSocket(_))
    }

    async fn next_line(&mut self) -> Result<Option<String>, TransportError> {
        if let Some(line) = self.pending.pop_front() {
            return Ok(Some(line));
        }

        match &mut self.kind {
            Kind::Tcp(framed) => match framed.next().await {
                Some(Ok(line)) => Ok(Some(line)),
                Some(Err(e)) => Err(e.into()),
                None => Ok(None),
            },
            Kind::WebSocket(stream) => {
                if read_websocket_frame(stream, &mut self.pending).await? {
                    Ok(self.pending.pop_front())
                } else {
                    Ok(None)
                }
            }
        }
    }
}

/// Read frames until one yields at least one line. Returns `false` on close.
async fn read_websocket_frame<S>(
    stream: &mut WebSocketStream<S>,
    out: &mut VecDeque<String>,
) -> Result<bool, TransportError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        match stream.next().await {
            Some(Ok(WsMessage::Text(text))) => {
                split_frame(&text, out);
                if !out.is_empty() {
                    return Ok(true);
                }
            }
            Some(Ok(WsMessage::Close(_))) | None => return Ok(false),
            Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => continue,
            Some(Ok(WsMessage::Binary(_))) => {
                warn!("Ignoring binary WebSocket frame (TMI is text-only)");
                continue;
            }
            Some(Ok(WsMessage::Frame(_))) => continue,
            Some(Err(e)) => return Err(e.into()),
        }
    }
}

/// Split one text frame into its non-empty lines.
///
/// Malformed lines are dropped without affecting the rest of the frame.
/// Returns how many were dropped.
pub(crate) fn split_frame(text: &str, out: &mut VecDeque<String>) -> usize {
    let mut dropped = 0;
    for line in text.split('\n') {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        match check_frame_line(line) {
            Ok(()) => out.push_back(line.to_string()),
            Err(e) => {
                debug!(error = %e, "dropping malformed line");
                dropped += 1;
            }
        }
    }
    dropped
}

fn check_frame_line(line: &str) -> Result<(), ProtocolError> {
    if line.len() > MAX_LINE_LEN {
        return Err(ProtocolError::LineTooLong {
            actual: line.len(),
            limit: MAX_LINE_LEN,
        });
    }
    LineCodec::validate_line(line)
}

#[async_trait::async_trait]
impl LineStream for Transport {
    async fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        if !self.open && self.pending.is_empty() {
            return Ok(None);
        }
        match self.next_line().await {
            Ok(Some(line)) => Ok(Some(line)),
            Ok(None) => {
                self.open = false;
                Ok(None)
            }
            Err(e) => {
                self.open = false;
                Err(e)
            }
        }
    }

    async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        if !self.open {
            return Err(TransportError::Closed);
        }
        let line = line.trim_end_matches(['\r', '\n']);
        let result = match &mut self.kind {
            Kind::Tcp(framed) => framed.send(line).await.map_err(TransportError::from),
            Kind::WebSocket(stream) => stream
                .send(WsMessage::Text(line.to_string()))
                .await
                .map_err(TransportError::from),
        };
        if result.is_err() {
            self.open = false;
        }
        result
    }

    async fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.pending.clear();
        let result = match &mut self.kind {
            Kind::Tcp(framed) => SinkExt::<&str>::close(framed)
                .await
                .map_err(TransportError::from),
            Kind::WebSocket(stream) => WebSocketStream::close(&mut **stream, None)
                .await
                .map_err(TransportError::from),
        };
        if let Err(e) = result {
            debug!(error = %e, "error while closing transport");
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
