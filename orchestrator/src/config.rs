//! Timing and process settings for the supervisor, monitor and reconnection controller

use std::path::PathBuf;
use std::time::Duration;

/// Registry key of the bridge worker
pub const WORKER_NAME: &str = "bridge-daemon";

/// How to launch the worker binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Extra variables layered over the production defaults
    pub env: Vec<(String, String)>,
}

impl WorkerCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

impl Default for WorkerCommand {
    fn default() -> Self {
        Self::new("./bridge-daemon")
    }
}

/// Stderr substrings treated as readiness signals (matched case-insensitively)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessPatterns {
    /// Worker is alive but waiting for the peer's store bridge
    pub waiting_for_dependency: Vec<String>,
    /// Worker port is already bound by another instance
    pub address_in_use: Vec<String>,
}

impl Default for ReadinessPatterns {
    fn default() -> Self {
        Self {
            waiting_for_dependency: vec!["waiting for store bridge".to_string(), "waiting for bridge".to_string()],
            address_in_use: vec!["eaddrinuse".to_string(), "address already in use".to_string()],
        }
    }
}

/// Startup retry and readiness settings for the process supervisor
#[derive(Debug, Clone)]
pub struct SupervisorSettings {
    pub name: String,
    pub command: WorkerCommand,
    /// Port exported to the worker as `BRIDGE_PORT`
    pub port: u16,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub startup_timeout: Duration,
    /// Delay before the first readiness probe of a fresh process
    pub warmup_delay: Duration,
    pub probe_interval: Duration,
    /// Time between SIGTERM and a forced kill
    pub kill_grace: Duration,
    /// Bound on draining stderr after an early exit
    pub exit_drain: Duration,
    pub patterns: ReadinessPatterns,
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self {
            name: WORKER_NAME.to_string(),
            command: WorkerCommand::default(),
            port: shared::config::DEFAULT_BRIDGE_PORT,
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
            startup_timeout: Duration::from_secs(15),
            warmup_delay: Duration::from_secs(1),
            probe_interval: Duration::from_millis(500),
            kill_grace: Duration::from_secs(3),
            exit_drain: Duration::from_millis(250),
            patterns: ReadinessPatterns::default(),
        }
    }
}

/// Sampling loop settings
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Delay before the first sample so a fresh worker can finish warming up
    pub settle_delay: Duration,
    pub period: Duration,
    /// Consecutive degraded passes that trigger reconnection
    pub failure_threshold: u32,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(5),
            period: Duration::from_secs(10),
            failure_threshold: 5,
        }
    }
}

/// Reconnection controller settle delays
#[derive(Debug, Clone)]
pub struct ReconnectSettings {
    pub initial_settle: Duration,
    pub final_settle: Duration,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        Self {
            initial_settle: Duration::from_secs(2),
            final_settle: Duration::from_secs(3),
        }
    }
}
