//! Transport layer: the seam between sessions and the byte-level channel.
//!
//! A [`Connector`] opens [`Connection`]s. Every transport call returns an
//! explicit `Result<_, TransportError>`, which the session layer classifies
//! into transient and fatal failures. The crate ships an SSH implementation
//! on top of russh; Telnet and serial are served by caller-supplied
//! connectors.

pub mod config;
mod ssh;

use std::future::Future;
use std::time::Duration;

use regex::Regex;

pub use config::{ConnectOptions, ConnectTarget, Credentials, HostKeyVerification, TransportKind};
pub use ssh::{SshConnection, SshConnector};

use crate::error::TransportError;

/// Commands that wrap a configuration batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigMode {
    /// Command that enters configuration mode.
    pub enter: String,

    /// Command that leaves configuration mode.
    pub exit: String,
}

impl Default for ConfigMode {
    fn default() -> Self {
        Self {
            enter: "configure terminal".to_string(),
            exit: "end".to_string(),
        }
    }
}

/// Opens connections to devices.
pub trait Connector: Send + Sync {
    /// Connection type produced by this connector.
    type Connection: Connection;

    /// Connect and authenticate.
    ///
    /// Must return [`TransportError::AuthenticationFailed`] when the device
    /// rejects the credentials so the caller can stop retrying.
    fn connect(
        &self,
        target: &ConnectTarget,
        credentials: &Credentials,
        options: &ConnectOptions,
    ) -> impl Future<Output = Result<Self::Connection, TransportError>> + Send;
}

/// An open, authenticated terminal channel.
pub trait Connection: Send {
    /// Send a command and collect output until `expect` (or the prompt).
    fn send(
        &mut self,
        command: &str,
        expect: Option<&Regex>,
        timeout: Duration,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;

    /// Write raw bytes without waiting for any output.
    fn write_raw(&mut self, bytes: &[u8])
    -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Check whether the channel is still usable.
    fn is_alive(&mut self) -> impl Future<Output = bool> + Send;

    /// Close the channel.
    fn disconnect(self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Send a batch of configuration lines inside configuration mode.
    ///
    /// The default enters the mode, sends each line and optionally exits,
    /// returning the concatenated output.
    fn send_config_set(
        &mut self,
        lines: &[String],
        mode: &ConfigMode,
        exit_config_mode: bool,
        timeout: Duration,
    ) -> impl Future<Output = Result<String, TransportError>> + Send {
        async move {
            let mut output = self.send(&mode.enter, None, timeout).await?;
            for line in lines {
                output.push('\n');
                output.push_str(&self.send(line, None, timeout).await?);
            }
            if exit_config_mode {
                output.push('\n');
                output.push_str(&self.send(&mode.exit, None, timeout).await?);
            }
            Ok(output)
        }
    }
}
