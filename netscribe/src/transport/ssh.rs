//! SSH transport implementation using russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, trace, warn};
use regex::Regex;
use russh::client::{self, Handle, Msg};
use russh::keys::{PrivateKeyWithHashAlg, PublicKey, load_secret_key};
use russh::{Channel, ChannelMsg};

use super::config::{ConnectOptions, ConnectTarget, Credentials, HostKeyVerification, TransportKind};
use super::{Connection, Connector};
use crate::channel::PatternBuffer;
use crate::error::TransportError;

/// Connector opening interactive PTY shells over SSH.
#[derive(Debug, Clone, Default)]
pub struct SshConnector;

impl SshConnector {
    pub fn new() -> Self {
        Self
    }
}

impl Connector for SshConnector {
    type Connection = SshConnection;

    async fn connect(
        &self,
        target: &ConnectTarget,
        credentials: &Credentials,
        options: &ConnectOptions,
    ) -> Result<SshConnection, TransportError> {
        if target.kind != TransportKind::Ssh {
            return Err(TransportError::Unsupported(target.kind));
        }

        let prompt = Regex::new(&options.prompt_pattern).map_err(|e| {
            TransportError::ConnectionFailed {
                host: target.host.clone(),
                port: target.port,
                message: format!("invalid prompt pattern: {e}"),
            }
        })?;

        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: Some(options.timeout),
            ..Default::default()
        });

        let host_key_error: Arc<Mutex<Option<TransportError>>> = Arc::new(Mutex::new(None));

        let handler = SshHandler {
            host: target.host.clone(),
            port: target.port,
            host_key_verification: options.host_key_verification.clone(),
            known_hosts_path: options.known_hosts_path.clone(),
            host_key_error: host_key_error.clone(),
        };

        debug!("opening ssh session to {}", target.socket_addr());
        let mut handle = tokio::time::timeout(
            options.timeout,
            client::connect(ssh_config, (target.host.as_str(), target.port), handler),
        )
        .await
        .map_err(|_| TransportError::Timeout(options.timeout))?
        .map_err(|e| {
            // Prefer the detailed host-key error over russh's generic UnknownKey.
            host_key_error
                .lock()
                .ok()
                .and_then(|mut slot| slot.take())
                .unwrap_or(TransportError::Ssh(e))
        })?;

        authenticate(&mut handle, credentials, options).await?;

        let channel = open_shell(&handle, options).await?;

        let mut connection = SshConnection {
            handle,
            channel,
            buffer: PatternBuffer::new(options.search_depth),
            prompt,
            closed: false,
        };

        // Swallow the banner and wait for the first prompt.
        tokio::time::timeout(options.timeout, connection.read_until(None))
            .await
            .map_err(|_| TransportError::Timeout(options.timeout))??;

        Ok(connection)
    }
}

/// Authenticate with the server.
async fn authenticate(
    handle: &mut Handle<SshHandler>,
    credentials: &Credentials,
    options: &ConnectOptions,
) -> Result<(), TransportError> {
    let user = credentials.username.as_str();
    let success = match &options.private_key {
        Some(path) => {
            let key = load_secret_key(path, None)
                .map_err(|e| TransportError::Key(e.to_string()))?;

            let hash_alg = handle.best_supported_rsa_hash().await?.flatten();

            handle
                .authenticate_publickey(user, PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg))
                .await?
                .success()
        }
        None => handle
            .authenticate_password(user, credentials.password())
            .await?
            .success(),
    };

    if !success {
        return Err(TransportError::AuthenticationFailed {
            user: user.to_string(),
        });
    }

    Ok(())
}

/// Open a PTY channel and request a shell on it.
async fn open_shell(
    handle: &Handle<SshHandler>,
    options: &ConnectOptions,
) -> Result<Channel<Msg>, TransportError> {
    let channel = handle.channel_open_session().await?;

    channel
        .request_pty(
            true,
            "xterm",
            options.terminal_width,
            options.terminal_height,
            0,
            0,
            &[],
        )
        .await?;

    channel.request_shell(true).await?;

    Ok(channel)
}

/// An interactive SSH shell framed by the device prompt.
pub struct SshConnection {
    handle: Handle<SshHandler>,
    channel: Channel<Msg>,
    buffer: PatternBuffer,
    prompt: Regex,
    closed: bool,
}

impl SshConnection {
    /// Read until `expect` (or the prompt) shows up in the buffer tail.
    async fn read_until(&mut self, expect: Option<&Regex>) -> Result<String, TransportError> {
        loop {
            let pattern = expect.unwrap_or(&self.prompt);
            if self.buffer.tail_contains(pattern) {
                return Ok(self.buffer.take());
            }

            match self.channel.wait().await {
                Some(ChannelMsg::Data { data }) => self.buffer.extend(&data),
                Some(ChannelMsg::ExtendedData { data, .. }) => self.buffer.extend(&data),
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    self.closed = true;
                    return Err(TransportError::Disconnected);
                }
                Some(other) => trace!("ignoring channel message {other:?}"),
            }
        }
    }

    /// Strip the command echo and the trailing prompt line.
    fn normalize_output(raw: &str, command: &str) -> String {
        let output = raw
            .trim_start_matches(['\r', '\n'])
            .strip_prefix(command)
            .unwrap_or(raw)
            .trim_start_matches(['\r', '\n']);

        match output.rfind('\n') {
            Some(pos) => output[..pos].to_string(),
            None => String::new(),
        }
    }
}

impl Connection for SshConnection {
    async fn send(
        &mut self,
        command: &str,
        expect: Option<&Regex>,
        timeout: Duration,
    ) -> Result<String, TransportError> {
        self.buffer.clear();
        let line = format!("{command}\n");
        self.channel.data(line.as_bytes()).await?;

        let raw = tokio::time::timeout(timeout, self.read_until(expect))
            .await
            .map_err(|_| TransportError::Timeout(timeout))??;

        Ok(Self::normalize_output(&raw, command))
    }

    async fn write_raw(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.channel.data(bytes).await?;
        Ok(())
    }

    async fn is_alive(&mut self) -> bool {
        !self.closed && !self.handle.is_closed()
    }

    async fn disconnect(self) -> Result<(), TransportError> {
        self.handle
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await?;
        Ok(())
    }
}

/// SSH client handler for russh.
struct SshHandler {
    host: String,
    port: u16,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    /// Detailed host-key error surfaced by connect().
    host_key_error: Arc<Mutex<Option<TransportError>>>,
}

impl SshHandler {
    /// Returns `Ok(true)` if matched, `Ok(false)` if the host is unknown.
    fn check_known_hosts(&self, pubkey: &PublicKey) -> Result<bool, TransportError> {
        let result = match self.known_hosts_path {
            Some(ref path) => {
                russh::keys::check_known_hosts_path(&self.host, self.port, pubkey, path)
            }
            None => russh::keys::check_known_hosts(&self.host, self.port, pubkey),
        };

        match result {
            Ok(matched) => Ok(matched),
            Err(russh::keys::Error::KeyChanged { line }) => Err(TransportError::Key(format!(
                "host key for {}:{} changed (known_hosts line {line})",
                self.host, self.port
            ))),
            Err(e) => Err(TransportError::Key(e.to_string())),
        }
    }

    fn learn_host_key(&self, pubkey: &PublicKey) -> Result<(), TransportError> {
        let result = match self.known_hosts_path {
            Some(ref path) => {
                russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, pubkey, path)
            }
            None => russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, pubkey),
        };

        result.map_err(|e| TransportError::Key(e.to_string()))
    }

    fn reject(&self, error: TransportError) -> bool {
        if let Ok(mut slot) = self.host_key_error.lock() {
            *slot = Some(error);
        }
        false
    }
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        let accepted = match self.host_key_verification {
            HostKeyVerification::Disabled => true,
            HostKeyVerification::AcceptNew => match self.check_known_hosts(server_public_key) {
                Ok(true) => true,
                Ok(false) => {
                    if let Err(e) = self.learn_host_key(server_public_key) {
                        warn!("Failed to save host key: {}", e);
                    }
                    true
                }
                Err(e) => self.reject(e),
            },
            HostKeyVerification::Strict => match self.check_known_hosts(server_public_key) {
                Ok(true) => true,
                Ok(false) => self.reject(TransportError::Key(format!(
                    "host {}:{} is not in known_hosts",
                    self.host, self.port
                ))),
                Err(e) => self.reject(e),
            },
        };
        Ok(accepted)
    }
}
