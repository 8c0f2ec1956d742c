//! Canned statuses, outcomes and errors used across test suites

use std::time::Duration;

use bridge_orchestrator::{MonitorSettings, OrchestratorError, Readiness, ReconnectSettings, StartupOutcome};
use shared::ServiceStatus;

pub struct TestFixtures;

impl TestFixtures {
    pub const WORKER_NAME: &'static str = "bridge-daemon";

    pub fn healthy() -> ServiceStatus {
        ServiceStatus::new(true, true, true)
    }

    pub fn worker_down() -> ServiceStatus {
        ServiceStatus::new(false, true, false)
    }

    pub fn peer_down() -> ServiceStatus {
        ServiceStatus::new(true, false, true)
    }

    pub fn probe_ready(attempts: u32) -> StartupOutcome {
        StartupOutcome {
            attempts,
            readiness: Readiness::Probe,
        }
    }

    pub fn exhausted() -> OrchestratorError {
        OrchestratorError::StartupExhausted {
            name: Self::WORKER_NAME.to_string(),
            attempts: 3,
            last_failure: "Worker 'bridge-daemon' exited before becoming ready (code Some(1))".to_string(),
        }
    }

    /// Monitor settings on a millisecond scale
    pub fn fast_monitor() -> MonitorSettings {
        MonitorSettings {
            settle_delay: Duration::from_millis(10),
            period: Duration::from_millis(10),
            failure_threshold: 5,
        }
    }

    pub fn fast_reconnect() -> ReconnectSettings {
        ReconnectSettings {
            initial_settle: Duration::from_millis(5),
            final_settle: Duration::from_millis(5),
        }
    }
}
