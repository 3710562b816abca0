//! Configuration batches with the same retry semantics as commands.

use std::time::SystemTime;

use log::{error, info, warn};

use super::command::CommandOptions;
use super::response::{ConfigResponse, Outcome};
use super::{Session, validate_max_tries};
use crate::error::Result;
use crate::transport::{Connection, Connector};

/// Options for [`Session::send_config`].
#[derive(Debug, Clone)]
pub struct ConfigOptions {
    pub max_tries: u32,

    /// Leave configuration mode after the batch.
    pub exit_config_mode: bool,

    /// Persist the configuration afterwards.
    pub save: bool,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            max_tries: 3,
            exit_config_mode: true,
            save: true,
        }
    }
}

impl<C: Connector> Session<C> {
    /// Apply an ordered batch of configuration lines.
    ///
    /// Transient failures are retried like [`Session::command`]. Once the
    /// loop ends, successful or not, the save command runs if requested.
    pub async fn send_config<S: AsRef<str>>(
        &mut self,
        lines: &[S],
        options: &ConfigOptions,
    ) -> Result<ConfigResponse> {
        validate_max_tries(options.max_tries)?;
        self.ensure_connected().await?;

        let lines: Vec<String> = lines.iter().map(|l| l.as_ref().to_string()).collect();
        let mode = self.settings.config_mode.clone();
        let timeout = self.settings.command_timeout;
        let sent_at = SystemTime::now();
        let max_tries = options.max_tries;

        let mut attempts = 0;
        let (result, outcome) = loop {
            attempts += 1;
            let sent = self
                .connection_mut()?
                .send_config_set(&lines, &mode, options.exit_config_mode, timeout)
                .await;

            match sent {
                Ok(output) => break (output, Outcome::Success),
                Err(e) if e.is_transient() && attempts < max_tries => {
                    warn!(
                        "[{}] config attempt {attempts}/{max_tries} failed: {e}",
                        self.target.host
                    );
                    if !self.check_session(true, true).await? {
                        error!("[{}] session could not be revalidated", self.target.host);
                        return Err(self.unavailable());
                    }
                }
                Err(e) => {
                    warn!(
                        "[{}] config batch failed after {attempts} attempt(s): {e}",
                        self.target.host
                    );
                    let detail = e.to_string();
                    break (
                        detail.clone(),
                        Outcome::Failed {
                            kind: e.kind(),
                            detail,
                        },
                    );
                }
            }
        };
        let received_at = SystemTime::now();

        let save = if options.save {
            let command = self.settings.save_command.clone();
            Some(self.command(&command, &CommandOptions::default()).await?)
        } else {
            None
        };

        info!(
            "[{}] sent {} config line(s) in {attempts} attempt(s), outcome {:?}",
            self.target.host,
            lines.len(),
            outcome
        );

        let response = ConfigResponse {
            lines,
            result,
            outcome,
            sent_at,
            received_at,
            attempts,
            save,
        };
        self.config_log.push(response.clone());
        Ok(response)
    }
}
