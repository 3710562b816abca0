//! Submit-then-poll workflow for tests that run on the device in the
//! background, such as TDR cable diagnostics.

use std::time::Duration;

use indexmap::IndexMap;
use log::{debug, info, warn};
use regex::Regex;
use serde::Deserialize;
use tokio::time::Instant;

use crate::error::Result;
use crate::model::InterfaceStatus;
use crate::session::{CommandOptions, Response, Session};
use crate::transport::Connector;

/// Polling bounds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    /// Pause before each polling round.
    pub interval: Duration,

    /// Polling rounds before giving up.
    pub max_attempts: u32,

    /// Overall time limit for the polling phase.
    pub deadline: Option<Duration>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 10,
            deadline: None,
        }
    }
}

/// What a polling run produced.
#[derive(Debug, Clone, Default)]
pub struct PollOutcome {
    /// Every response, start commands first, in issue order.
    pub responses: Vec<Response>,

    /// Final output per interface that finished.
    pub completed: IndexMap<String, String>,

    /// Interfaces that failed to start or never finished.
    pub incomplete: Vec<String>,
}

/// Copper interfaces worth testing.
///
/// An interface qualifies when its media is known and does not match
/// `optical_media`. With `only_bad`, its speed must also be known and below
/// 1000 Mbps.
pub fn select_tdr_targets(
    statuses: &[InterfaceStatus],
    optical_media: &Regex,
    only_bad: bool,
) -> Vec<String> {
    statuses
        .iter()
        .filter(|status| {
            status
                .media
                .as_deref()
                .is_some_and(|media| !optical_media.is_match(media))
        })
        .filter(|status| !only_bad || status.speed_mbps.is_some_and(|speed| speed < 1000))
        .map(|status| status.interface.clone())
        .collect()
}

/// Issues a start command per interface, then polls a show command until
/// the output stops matching an in-progress marker.
#[derive(Debug, Clone)]
pub struct PollingCollector {
    start_command: String,
    show_command: String,
    in_progress: Regex,
    settings: PollSettings,
}

impl PollingCollector {
    /// `start_command` and `show_command` are prefixes; the interface name
    /// is appended to each.
    pub fn new(
        start_command: impl Into<String>,
        show_command: impl Into<String>,
        in_progress: Regex,
        settings: PollSettings,
    ) -> Self {
        Self {
            start_command: start_command.into(),
            show_command: show_command.into(),
            in_progress,
            settings,
        }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Run the workflow for `targets` on `session`.
    pub async fn run<C: Connector>(
        &self,
        session: &mut Session<C>,
        targets: &[String],
    ) -> Result<PollOutcome> {
        let mut outcome = PollOutcome::default();
        let options = CommandOptions::default();

        let mut pending = Vec::new();
        for interface in targets {
            let command = format!("{} {interface}", self.start_command);
            let response = session.command(&command, &options).await?;
            if response.is_success() {
                pending.push(interface.clone());
            } else {
                warn!("[{}] could not start test on {interface}", session.host());
                outcome.incomplete.push(interface.clone());
            }
            outcome.responses.push(response);
        }

        let started = Instant::now();
        let mut round = 0;
        while !pending.is_empty() && round < self.settings.max_attempts {
            if let Some(deadline) = self.settings.deadline {
                if started.elapsed() + self.settings.interval > deadline {
                    debug!("[{}] polling deadline reached", session.host());
                    break;
                }
            }

            round += 1;
            tokio::time::sleep(self.settings.interval).await;

            let mut still_running = Vec::new();
            for interface in pending {
                let command = format!("{} {interface}", self.show_command);
                let response = session.command(&command, &options).await?;
                if response.is_success() && !self.in_progress.is_match(&response.result) {
                    outcome
                        .completed
                        .insert(interface, response.result.clone());
                } else {
                    still_running.push(interface);
                }
                outcome.responses.push(response);
            }
            pending = still_running;
            debug!(
                "[{}] poll round {round}: {} pending",
                session.host(),
                pending.len()
            );
        }

        if !pending.is_empty() {
            warn!(
                "[{}] {} test(s) incomplete after {round} round(s): {}",
                session.host(),
                pending.len(),
                pending.join(", ")
            );
        }
        outcome.incomplete.extend(pending);

        info!(
            "[{}] {} test(s) completed, {} incomplete",
            session.host(),
            outcome.completed.len(),
            outcome.incomplete.len()
        );
        Ok(outcome)
    }
}
