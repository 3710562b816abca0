//! Builder for creating sessions.

use std::path::PathBuf;
use std::time::Duration;

use super::{Session, SessionSettings};
use crate::error::{Result, SessionError};
use crate::platform::VendorProfile;
use crate::transport::{
    ConnectOptions, ConnectTarget, Connector, Credentials, HostKeyVerification, SshConnector,
    TransportKind,
};

/// Builder for constructing sessions.
///
/// # Example
///
/// ```rust,no_run
/// use netscribe::SessionBuilder;
///
/// # async fn example() -> Result<(), netscribe::Error> {
/// let mut session = SessionBuilder::new("192.168.1.1")
///     .username("admin")
///     .password("secret")
///     .device_type("cisco_ios")
///     .build()?;
///
/// session.connect(3, None).await?;
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder {
    host: String,
    port: Option<u16>,
    transport: TransportKind,
    username: Option<String>,
    password: String,
    secret: Option<String>,
    device_type: Option<String>,
    options: ConnectOptions,
    settings: SessionSettings,
}

impl SessionBuilder {
    /// Create a new session builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            transport: TransportKind::Ssh,
            username: None,
            password: String::new(),
            secret: None,
            device_type: None,
            options: ConnectOptions::default(),
            settings: SessionSettings::default(),
        }
    }

    /// Set the port (default: the transport's conventional port).
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set the enable secret.
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Set private key authentication.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.options.private_key = Some(key_path.into());
        self
    }

    /// Set the device type handed to the connector (e.g. "cisco_ios").
    pub fn device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    /// Take device type, prompt, failure patterns and save command from a
    /// vendor profile.
    pub fn vendor(mut self, profile: &VendorProfile) -> Self {
        self.device_type = Some(profile.device_type.clone());
        self.options.prompt_pattern = profile.prompt_pattern.clone();
        self.settings.failed_when_contains = profile.failed_when_contains.clone();
        self.settings.save_command = profile.commands.save.clone();
        self.settings.config_mode = profile.config_mode.clone();
        self
    }

    /// Set the connection timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set the default per-command read timeout.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.settings.command_timeout = timeout;
        self
    }

    /// Override the prompt regex.
    pub fn prompt_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.options.prompt_pattern = pattern.into();
        self
    }

    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.options.host_key_verification = mode;
        self
    }

    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.known_hosts_path = Some(path.into());
        self
    }

    /// Set terminal dimensions.
    pub fn terminal_size(mut self, width: u32, height: u32) -> Self {
        self.options.terminal_width = width;
        self.options.terminal_height = height;
        self
    }

    /// Replace the retry and timing settings wholesale.
    pub fn settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build an SSH session. Does not connect.
    pub fn build(self) -> Result<Session<SshConnector>> {
        self.build_with(SshConnector::new())
    }

    /// Build a session on a custom connector. Does not connect.
    pub fn build_with<C: Connector>(self, connector: C) -> Result<Session<C>> {
        let username = self.username.ok_or_else(|| SessionError::InvalidConfig {
            message: "Username is required".to_string(),
        })?;

        let device_type = self.device_type.ok_or_else(|| SessionError::InvalidConfig {
            message: "Device type must be specified".to_string(),
        })?;

        let mut credentials = Credentials::new(username, self.password);
        if let Some(secret) = self.secret {
            credentials = credentials.with_secret(secret);
        }

        let target = ConnectTarget {
            host: self.host,
            port: self.port.unwrap_or_else(|| self.transport.default_port()),
            kind: self.transport,
            device_type,
        };

        Ok(Session::new(
            connector,
            target,
            credentials,
            self.options,
            self.settings,
        ))
    }
}
