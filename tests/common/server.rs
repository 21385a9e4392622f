//! Fake TMI server on loopback TCP.
//!
//! Accepts any number of connections and hands each to the test as a
//! [`ServerConn`].

use slirc_tmi::Endpoint;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// A listening fake server.
pub struct TestTmiServer {
    addr: SocketAddr,
    conns: mpsc::UnboundedReceiver<ServerConn>,
    task: JoinHandle<()>,
}

#[allow(dead_code)]
impl TestTmiServer {
    /// Bind to an ephemeral port and start accepting.
    pub async fn spawn() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (tx, rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let (read, write) = stream.into_split();
                let conn = ServerConn {
                    lines: BufReader::new(read).lines(),
                    write,
                };
                if tx.send(conn).is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            addr,
            conns: rx,
            task,
        })
    }

    /// Endpoint a client should dial.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::tcp(self.addr.ip().to_string(), self.addr.port())
    }

    /// Wait up to five seconds for the next connection.
    pub async fn accept(&mut self) -> anyhow::Result<ServerConn> {
        timeout(Duration::from_secs(5), self.conns.recv())
            .await?
            .ok_or_else(|| anyhow::anyhow!("listener stopped"))
    }
}

impl Drop for TestTmiServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Server side of one accepted connection.
pub struct ServerConn {
    lines: Lines<BufReader<OwnedReadHalf>>,
    write: OwnedWriteHalf,
}

#[allow(dead_code)]
impl ServerConn {
    /// Send a raw line; CRLF is appended.
    pub async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        self.write.write_all(line.as_bytes()).await?;
        self.write.write_all(b"\r\n").await?;
        self.write.flush().await?;
        Ok(())
    }

    /// Send raw bytes exactly as given.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.write.write_all(bytes).await?;
        self.write.flush().await?;
        Ok(())
    }

    /// Receive one line (terminator stripped), waiting up to five seconds.
    /// `None` means the client closed the connection.
    pub async fn recv(&mut self) -> anyhow::Result<Option<String>> {
        let line = timeout(Duration::from_secs(5), self.lines.next_line()).await??;
        Ok(line.map(|l| l.trim_end_matches('\r').to_string()))
    }

    /// Receive the three handshake lines and return them.
    pub async fn recv_handshake(&mut self) -> anyhow::Result<Vec<String>> {
        let mut lines = Vec::with_capacity(3);
        for _ in 0..3 {
            let line = self
                .recv()
                .await?
                .ok_or_else(|| anyhow::anyhow!("closed during handshake"))?;
            lines.push(line);
        }
        Ok(lines)
    }
}
