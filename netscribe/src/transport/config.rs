//! Connection target, credentials and SSH configuration.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Channel kind used to reach the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Ssh,
    Telnet,
    Serial,
}

impl TransportKind {
    /// Conventional port for the transport (serial has none).
    pub fn default_port(self) -> u16 {
        match self {
            TransportKind::Ssh => 22,
            TransportKind::Telnet => 23,
            TransportKind::Serial => 0,
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportKind::Ssh => "ssh",
            TransportKind::Telnet => "telnet",
            TransportKind::Serial => "serial",
        };
        f.write_str(name)
    }
}

/// Login credentials for a session.
///
/// The password and enable secret never show up in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
    /// Enable secret, for connectors that escalate privilege after login.
    pub secret: Option<SecretString>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            secret: None,
        }
    }

    /// Set the enable secret.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(SecretString::from(secret.into()));
        self
    }

    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Where and how a connector should reach the device.
#[derive(Debug, Clone)]
pub struct ConnectTarget {
    /// Hostname, IP address, or serial device path.
    pub host: String,

    pub port: u16,

    pub kind: TransportKind,

    /// Vendor device type handed to the connector (e.g. "cisco_ios").
    pub device_type: String,
}

impl ConnectTarget {
    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Host key verification mode, analogous to OpenSSH's `StrictHostKeyChecking`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostKeyVerification {
    /// Reject unknown and changed keys.
    Strict,

    /// Accept and auto-learn unknown keys, but reject changed keys.
    #[default]
    AcceptNew,

    /// Accept all keys without checking. For lab use only.
    Disabled,
}

/// Transport options passed through on every connect.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Connection and authentication timeout.
    pub timeout: Duration,

    /// Regex matching the device prompt, used to frame command output.
    pub prompt_pattern: String,

    /// Terminal width for PTY.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,

    /// Host key verification mode.
    pub host_key_verification: HostKeyVerification,

    /// Path to known_hosts file.
    pub known_hosts_path: Option<PathBuf>,

    /// Private key used instead of the password when set.
    pub private_key: Option<PathBuf>,

    /// Bytes searched from the end of the buffer for the prompt.
    pub search_depth: usize,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            prompt_pattern: r"(?m)^[\w.\-@()/: ]{1,63}[>#]\s?$".to_string(),
            terminal_width: 511,
            terminal_height: 24,
            host_key_verification: HostKeyVerification::AcceptNew,
            known_hosts_path: None,
            private_key: None,
            search_depth: 1000,
        }
    }
}
