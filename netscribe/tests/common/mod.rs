//! Scripted connector and helpers shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use netscribe::error::TransportError;
use netscribe::{
    ConnectOptions, ConnectTarget, Connection, Connector, Credentials, Session, SessionSettings,
    TransportKind,
};
use regex::Regex;

/// Failure injected into a scripted call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Timeout,
    Disconnected,
    Auth,
}

impl Fault {
    fn into_error(self) -> TransportError {
        match self {
            Fault::Timeout => TransportError::Timeout(Duration::from_secs(1)),
            Fault::Disconnected => TransportError::Disconnected,
            Fault::Auth => TransportError::AuthenticationFailed {
                user: "admin".to_string(),
            },
        }
    }
}

/// Everything the scripted device does and everything it observed.
#[derive(Debug, Default)]
pub struct Script {
    /// Faults returned by successive connect calls before they succeed.
    pub connect_faults: VecDeque<Fault>,
    /// Faults returned by successive sends before they succeed.
    pub send_faults: VecDeque<Fault>,
    /// Outputs per command; the last output repeats.
    pub outputs: HashMap<String, VecDeque<String>>,
    /// Liveness reported by connections.
    pub alive: bool,

    pub connect_calls: u32,
    pub sent: Vec<String>,
    pub raw_writes: Vec<Vec<u8>>,
    pub usernames: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ScriptedConnector {
    pub script: Arc<Mutex<Script>>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        let script = Script {
            alive: true,
            ..Script::default()
        };
        Self {
            script: Arc::new(Mutex::new(script)),
        }
    }

    pub fn fail_connect(self, faults: &[Fault]) -> Self {
        self.script.lock().unwrap().connect_faults.extend(faults);
        self
    }

    pub fn fail_send(self, faults: &[Fault]) -> Self {
        self.script.lock().unwrap().send_faults.extend(faults);
        self
    }

    pub fn output(self, command: &str, outputs: &[&str]) -> Self {
        self.script.lock().unwrap().outputs.insert(
            command.to_string(),
            outputs.iter().map(|o| o.to_string()).collect(),
        );
        self
    }

    pub fn set_alive(&self, alive: bool) {
        self.script.lock().unwrap().alive = alive;
    }

    pub fn connect_calls(&self) -> u32 {
        self.script.lock().unwrap().connect_calls
    }

    pub fn sent(&self) -> Vec<String> {
        self.script.lock().unwrap().sent.clone()
    }

    pub fn raw_writes(&self) -> Vec<Vec<u8>> {
        self.script.lock().unwrap().raw_writes.clone()
    }

    pub fn usernames(&self) -> Vec<String> {
        self.script.lock().unwrap().usernames.clone()
    }
}

impl Connector for ScriptedConnector {
    type Connection = ScriptedConnection;

    async fn connect(
        &self,
        _target: &ConnectTarget,
        credentials: &Credentials,
        _options: &ConnectOptions,
    ) -> Result<ScriptedConnection, TransportError> {
        let mut script = self.script.lock().unwrap();
        script.connect_calls += 1;
        script.usernames.push(credentials.username.clone());
        match script.connect_faults.pop_front() {
            Some(fault) => Err(fault.into_error()),
            None => Ok(ScriptedConnection {
                script: Arc::clone(&self.script),
            }),
        }
    }
}

#[derive(Debug)]
pub struct ScriptedConnection {
    script: Arc<Mutex<Script>>,
}

impl Connection for ScriptedConnection {
    async fn send(
        &mut self,
        command: &str,
        _expect: Option<&Regex>,
        _timeout: Duration,
    ) -> Result<String, TransportError> {
        let mut script = self.script.lock().unwrap();
        script.sent.push(command.to_string());
        if let Some(fault) = script.send_faults.pop_front() {
            return Err(fault.into_error());
        }
        let output = match script.outputs.get_mut(command) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_default(),
            Some(queue) => queue.front().cloned().unwrap_or_default(),
            None => String::new(),
        };
        Ok(output)
    }

    async fn write_raw(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.script.lock().unwrap().raw_writes.push(bytes.to_vec());
        Ok(())
    }

    async fn is_alive(&mut self) -> bool {
        self.script.lock().unwrap().alive
    }

    async fn disconnect(self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Settings with no retry delay.
pub fn fast_settings() -> SessionSettings {
    SessionSettings {
        connect_retry_delay: Duration::ZERO,
        ..SessionSettings::default()
    }
}

pub fn session(connector: ScriptedConnector) -> Session<ScriptedConnector> {
    init_logging();
    let target = ConnectTarget {
        host: "10.0.0.1".to_string(),
        port: 22,
        kind: TransportKind::Ssh,
        device_type: "cisco_ios".to_string(),
    };
    Session::new(
        connector,
        target,
        Credentials::new("admin", "admin"),
        ConnectOptions::default(),
        fast_settings(),
    )
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
