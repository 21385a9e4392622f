//! Connection manager.
//!
//! One task owns the transport, the in-flight connect and the reconnection
//! timer, and handles one event at a time:
//!
//! ```text
//! Disconnected -> Connecting -> Joined -> Disconnected
//!                     ^                                    |
//!                     +------- reconnect timer fires ------+
//! ```
//!
//! Any transport failure funnels into the close path, which schedules exactly
//! one reconnection. Stop and reconfigure cancel the timer and close the
//! transport before anything else happens.

use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use slirc_tmi::{Directive, Endpoint, Handshake, LineRef, LineStream, TransportError};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, trace, warn};

use super::connector::{Connector, TmiConnector};
use super::reconnect::{RECONNECT_DELAY, ReconnectTimer};
use crate::error::LinkError;
use crate::pipeline::{AuthContext, CommandSink, DEFAULT_COMMAND_PREFIX, LineOutcome, Pipeline};
use crate::telemetry::spans;

/// Lifecycle of the chat link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport. A reconnection may be pending.
    Disconnected,
    /// A connect attempt is in flight.
    Connecting,
    /// Handshake sent; chat lines are flowing through the pipeline.
    Joined,
    /// The transport is being closed. Closing completes within one event,
    /// so the manager never publishes this state.
    Closing,
}

/// Everything one session needs: where to connect and who may command.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    channel: String,
    auth: AuthContext,
    command_prefix: String,
    endpoint: Endpoint,
    reconnect_delay: Duration,
}

impl SessionConfig {
    /// Session for `channel` with the channel as owner and default settings.
    pub fn new(channel: &str) -> Self {
        let channel = channel.trim().trim_start_matches('#').to_string();
        Self {
            auth: AuthContext::for_channel(&channel),
            channel,
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            endpoint: Endpoint::default(),
            reconnect_delay: RECONNECT_DELAY,
        }
    }

    /// Replace the owner, keeping the moderator list.
    pub fn with_owner(mut self, owner: &str) -> Self {
        self.auth = AuthContext::new(owner, self.auth.moderators());
        self
    }

    /// Replace the moderator list, keeping the owner.
    pub fn with_moderators<I, S>(mut self, moderators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.auth = AuthContext::new(self.auth.owner(), moderators);
        self
    }

    pub fn with_auth(mut self, auth: AuthContext) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_command_prefix(mut self, prefix: &str) -> Self {
        self.command_prefix = prefix.to_string();
        self
    }

    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn command_prefix(&self) -> &str {
        &self.command_prefix
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn reconnect_delay(&self) -> Duration {
        self.reconnect_delay
    }

    fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.auth.clone(), self.command_prefix.clone())
    }
}

enum Control {
    Reconfigure(SessionConfig),
    ReplaceSink(Box<dyn CommandSink + Send>),
    Stop(oneshot::Sender<()>),
}

/// Handle to a running chat link.
///
/// Dropping the handle without calling [`stop`](Self::stop) also tears the
/// link down, without waiting for it.
pub struct ConnectionManager {
    control: mpsc::UnboundedSender<Control>,
    state: watch::Receiver<ConnectionState>,
    task: JoinHandle<()>,
}

impl ConnectionManager {
    /// Connect to TMI and start feeding `sink`.
    pub fn start<S>(config: SessionConfig, sink: S) -> Self
    where
        S: CommandSink + Send + 'static,
    {
        Self::start_with(config, Arc::new(TmiConnector), Box::new(sink))
    }

    /// Start with a caller-supplied connector.
    pub fn start_with(
        config: SessionConfig,
        connector: Arc<dyn Connector>,
        sink: Box<dyn CommandSink + Send>,
    ) -> Self {
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let span = spans::session(&config.channel, &config.endpoint.to_string());

        let session = Session {
            pipeline: config.pipeline(),
            timer: ReconnectTimer::new(config.reconnect_delay),
            config,
            connector,
            sink,
            control: control_rx,
            state: state_tx,
            transport: None,
            connecting: None,
            attempt: 0,
        };
        let task = tokio::spawn(session.run().instrument(span));

        Self {
            control: control_tx,
            state: state_rx,
            task,
        }
    }

    /// Current state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Receiver that observes every state change.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Tear down the current connection and reconnect with `config`.
    ///
    /// Lines already read under the old configuration are not replayed.
    pub fn reconfigure(&self, config: SessionConfig) -> Result<(), LinkError> {
        self.control
            .send(Control::Reconfigure(config))
            .map_err(|_| LinkError::ManagerGone)
    }

    /// Route subsequent commands to `sink`.
    pub fn replace_sink(&self, sink: Box<dyn CommandSink + Send>) -> Result<(), LinkError> {
        self.control
            .send(Control::ReplaceSink(sink))
            .map_err(|_| LinkError::ManagerGone)
    }

    /// Cancel any pending reconnection, close the transport and wait for the
    /// task to exit.
    pub async fn stop(self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.control.send(Control::Stop(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
        if let Err(e) = self.task.await {
            warn!(error = %e, "connection manager task failed");
        }
    }
}

type ConnectFuture = BoxFuture<'static, Result<Box<dyn LineStream>, TransportError>>;

enum Event {
    Control(Option<Control>),
    Connected(Result<Box<dyn LineStream>, TransportError>),
    Line(Result<Option<String>, TransportError>),
    Timer,
}

struct Session {
    config: SessionConfig,
    pipeline: Pipeline,
    connector: Arc<dyn Connector>,
    sink: Box<dyn CommandSink + Send>,
    control: mpsc::UnboundedReceiver<Control>,
    state: watch::Sender<ConnectionState>,
    transport: Option<Box<dyn LineStream>>,
    connecting: Option<ConnectFuture>,
    timer: ReconnectTimer,
    attempt: u64,
}

impl Session {
    async fn run(mut self) {
        info!("chat link starting");
        self.activate().await;

        loop {
            let event = tokio::select! {
                biased;
                control = self.control.recv() => Event::Control(control),
                result = wait_connect(&mut self.connecting) => Event::Connected(result),
                line = read_next(&mut self.transport) => Event::Line(line),
                () = self.timer.fired() => Event::Timer,
            };

            match event {
                Event::Control(None) => {
                    self.teardown().await;
                    break;
                }
                Event::Control(Some(Control::Stop(ack))) => {
                    self.teardown().await;
                    let _ = ack.send(());
                    break;
                }
                Event::Control(Some(Control::Reconfigure(config))) => {
                    self.reconfigure(config).await;
                }
                Event::Control(Some(Control::ReplaceSink(sink))) => {
                    self.sink = sink;
                    debug!("command sink replaced");
                }
                Event::Connected(result) => self.on_connected(result).await,
                Event::Line(Ok(Some(line))) => self.on_line(&line).await,
                Event::Line(Ok(None)) => {
                    info!("server closed the connection");
                    self.on_close().await;
                }
                Event::Line(Err(e)) => {
                    let err = LinkError::from(e);
                    warn!(error = %err, code = err.error_code(), "transport failed");
                    self.on_close().await;
                }
                Event::Timer => self.activate().await,
            }
        }

        info!("chat link stopped");
    }

    /// Disconnected -> Connecting.
    async fn activate(&mut self) {
        self.close_transport().await;
        self.timer.cancel();
        self.attempt += 1;

        let connector = Arc::clone(&self.connector);
        let endpoint = self.config.endpoint.clone();
        info!(attempt = self.attempt, endpoint = %endpoint, "connecting");

        let connect = async move { connector.connect(&endpoint).await };
        self.connecting = Some(connect.instrument(spans::attempt(self.attempt)).boxed());
        self.set_state(ConnectionState::Connecting);
    }

    /// Connecting -> Joined, or into the close path.
    async fn on_connected(&mut self, result: Result<Box<dyn LineStream>, TransportError>) {
        match result {
            Ok(transport) => {
                self.transport = Some(transport);
                match self.handshake().await {
                    Ok(nick) => {
                        self.set_state(ConnectionState::Joined);
                        info!(nick = %nick, "joined #{}", self.config.channel);
                    }
                    Err(err) => {
                        warn!(error = %err, code = err.error_code(), "handshake aborted");
                        self.on_close().await;
                    }
                }
            }
            Err(e) => {
                let err = LinkError::Connect(e);
                warn!(error = %err, code = err.error_code(), "connect failed");
                self.on_close().await;
            }
        }
    }

    /// Send CAP REQ, NICK and JOIN in order. Returns the nick used.
    async fn handshake(&mut self) -> Result<String, LinkError> {
        let transport = self.transport.as_mut().ok_or(LinkError::NotReady)?;
        if !transport.is_open() {
            return Err(LinkError::NotReady);
        }

        let handshake = Handshake::anonymous(&self.config.channel);
        for directive in handshake.directives() {
            trace!(line = %directive, "send");
            transport
                .write_line(&directive.to_string())
                .await
                .map_err(|source| LinkError::Handshake {
                    directive: directive.name(),
                    source,
                })?;
        }

        Ok(handshake.nick().to_string())
    }

    async fn on_line(&mut self, raw: &str) {
        trace!(line = %raw, "recv");

        if is_keepalive(raw) {
            if let Err(err) = self.reply_keepalive().await {
                warn!(error = %err, code = err.error_code(), "keep-alive reply failed");
                self.on_close().await;
            }
            return;
        }

        match self.pipeline.handle(raw, self.sink.as_mut()) {
            LineOutcome::Dispatched(command) => {
                info!(command = command.name(), author = %command.author(), "command dispatched");
            }
            LineOutcome::Denied(command) => {
                debug!(command = command.name(), author = %command.author(), "command denied");
            }
            LineOutcome::NoCommand | LineOutcome::NotChat => {}
        }
    }

    async fn reply_keepalive(&mut self) -> Result<(), LinkError> {
        let transport = self.transport.as_mut().ok_or(LinkError::NotReady)?;
        let reply = Directive::keepalive_reply();
        trace!(line = %reply, "send");
        transport
            .write_line(&reply.to_string())
            .await
            .map_err(LinkError::Keepalive)
    }

    /// Any state -> Disconnected, with exactly one reconnection pending.
    async fn on_close(&mut self) {
        self.connecting = None;
        self.close_transport().await;
        self.set_state(ConnectionState::Disconnected);

        let replaced = self.timer.schedule();
        info!(
            delay_secs = self.timer.delay().as_secs(),
            replaced, "reconnect scheduled"
        );
    }

    /// Any state -> Disconnected, with nothing pending.
    async fn teardown(&mut self) {
        if self.timer.cancel() {
            debug!("pending reconnect cancelled");
        }
        self.connecting = None;
        self.close_transport().await;
        self.set_state(ConnectionState::Disconnected);
    }

    async fn reconfigure(&mut self, config: SessionConfig) {
        self.teardown().await;
        info!(
            channel = %config.channel,
            endpoint = %config.endpoint,
            prefix = %config.command_prefix,
            "reconfigured"
        );

        self.pipeline = config.pipeline();
        self.timer.set_delay(config.reconnect_delay);
        self.config = config;
        self.activate().await;
    }

    async fn close_transport(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.close().await;
        }
    }

    fn set_state(&self, next: ConnectionState) {
        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            debug!(from = ?*current, to = ?next, "state change");
            *current = next;
            true
        });
    }
}

/// Whether `raw` is a server keep-alive probe. Matches the command token,
/// so chat text mentioning PING is not a probe (see DESIGN.md, keep-alive
/// detection).
fn is_keepalive(raw: &str) -> bool {
    LineRef::parse(raw).is_ok_and(|line| line.is_command("PING"))
}

async fn wait_connect(
    slot: &mut Option<ConnectFuture>,
) -> Result<Box<dyn LineStream>, TransportError> {
    match slot.as_mut() {
        Some(connect) => {
            let result = connect.await;
            *slot = None;
            result
        }
        None => std::future::pending().await,
    }
}

async fn read_next(
    transport: &mut Option<Box<dyn LineStream>>,
) -> Result<Option<String>, TransportError> {
    match transport.as_mut() {
        Some(transport) => transport.read_line().await,
        None => std::future::pending().await,
    }
}
