//! Single command execution with retry and failure classification.

use std::time::{Duration, SystemTime};

use log::{debug, error, warn};
use regex::Regex;

use super::response::Response;
use super::{Session, validate_max_tries};
use crate::error::{FailureKind, Result, SessionError};
use crate::transport::{Connection, Connector};

/// Per-call options for [`Session::command`].
#[derive(Debug, Clone)]
pub struct CommandOptions {
    /// Read until this regex instead of the prompt.
    pub expect: Option<String>,

    /// Write the command without waiting for output.
    pub blind: bool,

    /// Attempt budget, at least 1.
    pub max_tries: u32,

    /// Read timeout; falls back to the session's command timeout.
    pub timeout: Option<Duration>,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            expect: None,
            blind: false,
            max_tries: 3,
            timeout: None,
        }
    }
}

impl CommandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(mut self, pattern: impl Into<String>) -> Self {
        self.expect = Some(pattern.into());
        self
    }

    pub fn blind(mut self) -> Self {
        self.blind = true;
        self
    }

    pub fn max_tries(mut self, max_tries: u32) -> Self {
        self.max_tries = max_tries;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl<C: Connector> Session<C> {
    /// Send a command with default options.
    pub async fn send_command(&mut self, command: &str) -> Result<Response> {
        self.command(command, &CommandOptions::default()).await
    }

    /// Send multiple commands sequentially.
    pub async fn send_commands(&mut self, commands: &[&str]) -> Result<Vec<Response>> {
        let mut responses = Vec::with_capacity(commands.len());
        for command in commands {
            responses.push(self.send_command(command).await?);
        }
        Ok(responses)
    }

    /// Send a command, retrying transient transport failures.
    ///
    /// Timeouts and dropped channels are retried up to `max_tries`, with the
    /// session revalidated (and reconnected if needed) between attempts.
    /// They end up inside the returned [`Response`]; only an unusable
    /// session is returned as an error.
    pub async fn command(&mut self, command: &str, options: &CommandOptions) -> Result<Response> {
        validate_max_tries(options.max_tries)?;
        self.ensure_connected().await?;

        let expect = options
            .expect
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| SessionError::InvalidConfig {
                message: format!("invalid expect pattern: {e}"),
            })?;
        let timeout = options.timeout.unwrap_or(self.settings.command_timeout);
        let sent_at = SystemTime::now();

        if options.blind {
            let line = format!("{command}\n");
            let response = match self.connection_mut()?.write_raw(line.as_bytes()).await {
                Ok(()) => Response::sent(command, sent_at),
                Err(e) => Response::failed(command, None, e.kind(), e.to_string(), sent_at, 1),
            };
            debug!("[{}] blind: {command}", self.target.host);
            self.command_log.push(response.clone());
            return Ok(response);
        }

        let max_tries = options.max_tries;
        let mut attempts = 0;
        let response = loop {
            attempts += 1;
            let result = self
                .connection_mut()?
                .send(command, expect.as_ref(), timeout)
                .await;

            match result {
                Ok(output) => {
                    break match self.detect_failure(&output) {
                        Some(pattern) => {
                            let detail = format!("output contains '{pattern}'");
                            warn!("[{}] '{command}' rejected: {detail}", self.target.host);
                            Response::failed(
                                command,
                                options.expect.clone(),
                                FailureKind::DeviceRejected,
                                detail,
                                sent_at,
                                attempts,
                            )
                        }
                        None => Response::success(
                            command,
                            options.expect.clone(),
                            output,
                            sent_at,
                            attempts,
                        ),
                    };
                }
                Err(e) if e.is_transient() && attempts < max_tries => {
                    warn!(
                        "[{}] attempt {attempts}/{max_tries} of '{command}' failed: {e}",
                        self.target.host
                    );
                    if !self.check_session(true, true).await? {
                        error!("[{}] session could not be revalidated", self.target.host);
                        return Err(self.unavailable());
                    }
                }
                Err(e) => {
                    warn!(
                        "[{}] '{command}' failed after {attempts} attempt(s): {e}",
                        self.target.host
                    );
                    break Response::failed(
                        command,
                        options.expect.clone(),
                        e.kind(),
                        e.to_string(),
                        sent_at,
                        attempts,
                    );
                }
            }
        };

        self.command_log.push(response.clone());
        Ok(response)
    }
}
