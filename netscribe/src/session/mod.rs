//! Terminal sessions: lifecycle, command execution and configuration.
//!
//! A [`Session`] owns exactly one device endpoint for its lifetime. Every
//! operation takes `&mut self`, so commands on one session are strictly
//! sequential; run independent sessions in separate tasks for parallelism.
//!
//! ```text
//!                connect()                      connector ok
//! ┌──────────────┐─────────►┌────────────┐──────────────────►┌───────────┐
//! │ Disconnected │          │ Connecting │                   │ Connected │
//! └──────────────┘◄─────────┴────────────┘                   └─────┬─────┘
//!        ▲        auth failure / tries exhausted                  │
//!        └─────────────────────────────────────────────────────────┘
//!                        disconnect() / dead channel
//! ```

mod builder;
mod command;
mod config;
pub(crate) mod response;

pub use builder::SessionBuilder;
pub use command::CommandOptions;
pub use config::ConfigOptions;
pub use response::{ConfigResponse, Outcome, Response, ResponseGroup};

use std::time::Duration;

use log::{debug, error, info, warn};
use serde::Deserialize;

use crate::error::{Result, SessionError};
use crate::transport::{
    ConfigMode, ConnectOptions, ConnectTarget, Connection, Connector, Credentials, TransportKind,
};

/// Control characters written to unwind a half-finished terminal state.
const ESCAPE_SEQUENCE: [u8; 2] = [0x1b, 0x03];

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Retry and timing knobs for a session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Pause between connection attempts after a transient failure.
    pub connect_retry_delay: Duration,

    /// Default read timeout for a single command.
    pub command_timeout: Duration,

    /// Rounds of ESC / Ctrl-C written by `check_session`.
    pub escape_rounds: u32,

    /// Command that persists the running configuration.
    pub save_command: String,

    /// Commands wrapping a configuration batch.
    #[serde(skip)]
    pub config_mode: ConfigMode,

    /// Output fragments that mark a command as rejected by the device.
    pub failed_when_contains: Vec<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            connect_retry_delay: Duration::from_secs(5),
            command_timeout: Duration::from_secs(10),
            escape_rounds: 3,
            save_command: "write memory".to_string(),
            config_mode: ConfigMode::default(),
            failed_when_contains: vec![],
        }
    }
}

/// An interactive CLI session to one device.
pub struct Session<C: Connector> {
    connector: C,
    target: ConnectTarget,
    credentials: Credentials,
    options: ConnectOptions,
    settings: SessionSettings,
    connection: Option<C::Connection>,
    state: SessionState,
    command_log: Vec<Response>,
    config_log: Vec<ConfigResponse>,
}

impl<C: Connector> Session<C> {
    /// Create a disconnected session.
    pub fn new(
        connector: C,
        target: ConnectTarget,
        credentials: Credentials,
        options: ConnectOptions,
        settings: SessionSettings,
    ) -> Self {
        Self {
            connector,
            target,
            credentials,
            options,
            settings,
            connection: None,
            state: SessionState::Disconnected,
            command_log: Vec::new(),
            config_log: Vec::new(),
        }
    }

    pub fn host(&self) -> &str {
        &self.target.host
    }

    pub fn port(&self) -> u16 {
        self.target.port
    }

    pub fn transport(&self) -> TransportKind {
        self.target.kind
    }

    pub fn device_type(&self) -> &str {
        &self.target.device_type
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether a connection handle is currently held.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SessionSettings {
        &mut self.settings
    }

    /// Every command response, oldest first.
    pub fn command_log(&self) -> &[Response] {
        &self.command_log
    }

    /// Every configuration batch response, oldest first.
    pub fn config_log(&self) -> &[ConfigResponse] {
        &self.config_log
    }

    /// Connect the session.
    ///
    /// Returns `true` right away if a live connection already exists.
    /// Authentication failures stop immediately; other failures are retried
    /// after [`SessionSettings::connect_retry_delay`] up to `max_tries`.
    /// `credentials` replaces the stored credentials once it succeeds.
    pub async fn connect(&mut self, max_tries: u32, credentials: Option<Credentials>) -> Result<bool> {
        if self.connection.is_some() {
            if self.check_session(true, false).await? {
                return Ok(true);
            }
            self.drop_connection().await;
        }

        validate_max_tries(max_tries)?;
        self.open(max_tries, credentials).await
    }

    /// Run the connector up to `max_tries` times.
    async fn open(&mut self, max_tries: u32, credentials: Option<Credentials>) -> Result<bool> {
        self.state = SessionState::Connecting;

        for attempt in 1..=max_tries {
            let creds = credentials.as_ref().unwrap_or(&self.credentials);
            match self
                .connector
                .connect(&self.target, creds, &self.options)
                .await
            {
                Ok(connection) => {
                    info!(
                        "connected to {} over {} (attempt {attempt}/{max_tries})",
                        self.target.socket_addr(),
                        self.target.kind
                    );
                    if let Some(creds) = credentials {
                        self.credentials = creds;
                    }
                    self.connection = Some(connection);
                    self.state = SessionState::Connected;
                    return Ok(true);
                }
                Err(e) if !e.is_transient() => {
                    error!("connection to {} aborted: {e}", self.target.socket_addr());
                    self.connection = None;
                    self.state = SessionState::Disconnected;
                    return Ok(false);
                }
                Err(e) => {
                    warn!(
                        "connection attempt {attempt}/{max_tries} to {} failed: {e}",
                        self.target.socket_addr()
                    );
                    if attempt < max_tries {
                        tokio::time::sleep(self.settings.connect_retry_delay).await;
                    }
                }
            }
        }

        self.state = SessionState::Disconnected;
        Ok(false)
    }

    /// Check whether the session is usable.
    ///
    /// `escape_attempt` writes ESC and Ctrl-C to back out of any partial
    /// context first. `reconnect` replaces a dead connection with one new
    /// connection attempt.
    pub async fn check_session(&mut self, escape_attempt: bool, reconnect: bool) -> Result<bool> {
        let rounds = self.settings.escape_rounds;
        let alive = match self.connection.as_mut() {
            Some(connection) => {
                if escape_attempt {
                    'escape: for _ in 0..rounds {
                        for byte in ESCAPE_SEQUENCE {
                            if let Err(e) = connection.write_raw(&[byte]).await {
                                debug!("escape write failed: {e}");
                                break 'escape;
                            }
                        }
                    }
                }
                connection.is_alive().await
            }
            None => false,
        };

        if alive {
            return Ok(true);
        }

        if reconnect {
            debug!("session to {} is not alive, reconnecting", self.target.host);
            self.drop_connection().await;
            return self.open(1, None).await;
        }

        Ok(false)
    }

    /// Close the connection if one is held.
    pub async fn disconnect(&mut self) -> Result<()> {
        self.state = SessionState::Disconnected;
        if let Some(connection) = self.connection.take() {
            connection.disconnect().await?;
            info!("disconnected from {}", self.target.socket_addr());
        }
        Ok(())
    }

    /// Discard a connection that is known to be unusable.
    async fn drop_connection(&mut self) {
        self.state = SessionState::Disconnected;
        if let Some(connection) = self.connection.take() {
            if let Err(e) = connection.disconnect().await {
                debug!("closing stale connection failed: {e}");
            }
        }
    }

    /// Connect once if no connection exists; fail hard otherwise.
    async fn ensure_connected(&mut self) -> Result<()> {
        if self.connection.is_none() && !self.connect(1, None).await? {
            return Err(self.unavailable());
        }
        Ok(())
    }

    fn connection_mut(&mut self) -> Result<&mut C::Connection> {
        let host = self.target.host.clone();
        self.connection
            .as_mut()
            .ok_or_else(|| SessionError::Unavailable { host }.into())
    }

    fn unavailable(&self) -> crate::Error {
        SessionError::Unavailable {
            host: self.target.host.clone(),
        }
        .into()
    }

    /// First failure pattern contained in `output`, if any.
    fn detect_failure(&self, output: &str) -> Option<&str> {
        self.settings
            .failed_when_contains
            .iter()
            .find(|pattern| output.contains(pattern.as_str()))
            .map(String::as_str)
    }
}

/// Reject retry budgets below one.
pub(crate) fn validate_max_tries(max_tries: u32) -> Result<()> {
    if max_tries < 1 {
        return Err(SessionError::InvalidMaxTries(max_tries).into());
    }
    Ok(())
}

impl<C: Connector> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("target", &self.target)
            .field("credentials", &self.credentials)
            .field("state", &self.state)
            .field("commands", &self.command_log.len())
            .finish()
    }
}
