//! Response types for command execution results.

use std::fmt;
use std::time::{Duration, SystemTime};

use serde::Serialize;

use crate::error::FailureKind;

/// How a command ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The device answered with text.
    Success,

    /// Every attempt failed; `detail` describes the last failure.
    Failed { kind: FailureKind, detail: String },

    /// Written blind; nothing is known about the result.
    Sent,
}

/// Response from a single command execution.
///
/// Built once when the command finishes and never modified afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// Pattern the output was read up to, if not the prompt.
    pub expect: Option<String>,

    /// Output text on success, failure description otherwise.
    pub result: String,

    pub outcome: Outcome,

    pub sent_at: SystemTime,

    pub received_at: SystemTime,

    /// Number of transport calls actually made.
    pub attempts: u32,
}

impl Response {
    /// Create a successful response.
    pub fn success(
        command: impl Into<String>,
        expect: Option<String>,
        result: impl Into<String>,
        sent_at: SystemTime,
        attempts: u32,
    ) -> Self {
        Self {
            command: command.into(),
            expect,
            result: result.into(),
            outcome: Outcome::Success,
            sent_at,
            received_at: SystemTime::now(),
            attempts,
        }
    }

    /// Create a failed response.
    pub fn failed(
        command: impl Into<String>,
        expect: Option<String>,
        kind: FailureKind,
        detail: impl Into<String>,
        sent_at: SystemTime,
        attempts: u32,
    ) -> Self {
        let detail = detail.into();
        Self {
            command: command.into(),
            expect,
            result: detail.clone(),
            outcome: Outcome::Failed { kind, detail },
            sent_at,
            received_at: SystemTime::now(),
            attempts,
        }
    }

    /// Create a response for a blind write.
    pub fn sent(command: impl Into<String>, sent_at: SystemTime) -> Self {
        Self {
            command: command.into(),
            expect: None,
            result: "Blind: True".to_string(),
            outcome: Outcome::Sent,
            sent_at,
            received_at: SystemTime::now(),
            attempts: 1,
        }
    }

    /// Check if the response indicates success.
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    /// Time between sending and receiving.
    pub fn latency(&self) -> Duration {
        self.received_at
            .duration_since(self.sent_at)
            .unwrap_or_default()
    }

    /// Get the result lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.result.lines()
    }

    /// Check if the result contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.result.contains(pattern)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.result)
    }
}

impl AsRef<str> for Response {
    fn as_ref(&self) -> &str {
        &self.result
    }
}

/// Response from a configuration batch.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    /// The submitted configuration lines.
    pub lines: Vec<String>,

    pub result: String,

    pub outcome: Outcome,

    pub sent_at: SystemTime,

    pub received_at: SystemTime,

    pub attempts: u32,

    /// Response of the persist command, when one was issued.
    pub save: Option<Response>,
}

impl ConfigResponse {
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    pub fn latency(&self) -> Duration {
        self.received_at
            .duration_since(self.sent_at)
            .unwrap_or_default()
    }
}

/// Raw responses of one logical operation together with parsed records.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseGroup<R> {
    pub responses: Vec<Response>,

    /// Parsed records; `None` when parsing was skipped.
    pub records: Option<R>,

    pub description: Option<String>,
}

impl<R> ResponseGroup<R> {
    pub fn new(responses: Vec<Response>, records: Option<R>) -> Self {
        Self {
            responses,
            records,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether every underlying command succeeded.
    pub fn is_success(&self) -> bool {
        self.responses.iter().all(Response::is_success)
    }
}
