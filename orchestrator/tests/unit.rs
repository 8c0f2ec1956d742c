//! Unit tests for the pure pieces of the orchestrator's public API

use std::time::Duration;

use bridge_orchestrator::core::{MonitorState, RetryState};
use bridge_orchestrator::reconnect::classify_outcome;
use bridge_orchestrator::{MonitorSettings, OrchestratorError, ReconnectOutcome, SupervisorSettings};
use shared::ServiceStatus;

mod common;
use common::TestFixtures;

#[test]
fn test_only_exhaustion_is_fatal() {
    assert!(TestFixtures::exhausted().is_fatal());

    let exit = OrchestratorError::ProcessExit {
        name: TestFixtures::WORKER_NAME.to_string(),
        code: Some(1),
    };
    assert!(!exit.is_fatal());
    assert!(!OrchestratorError::config("peer_origin").is_fatal());
    assert!(!OrchestratorError::spawn(TestFixtures::WORKER_NAME, "not found").is_fatal());
}

#[test]
fn test_error_messages_name_the_worker() {
    let timeout = OrchestratorError::StartupTimeout {
        name: TestFixtures::WORKER_NAME.to_string(),
        timeout: Duration::from_secs(15),
    };
    assert!(timeout.to_string().contains("'bridge-daemon'"));
    assert!(timeout.to_string().contains("no readiness signal"));
}

#[test]
fn test_default_settings() {
    let supervisor = SupervisorSettings::default();
    assert_eq!(supervisor.max_attempts, 3);
    assert_eq!(supervisor.retry_delay, Duration::from_secs(2));
    assert_eq!(supervisor.startup_timeout, Duration::from_secs(15));
    assert_eq!(supervisor.port, 3001);

    let monitor = MonitorSettings::default();
    assert_eq!(monitor.settle_delay, Duration::from_secs(5));
    assert_eq!(monitor.period, Duration::from_secs(10));
    assert_eq!(monitor.failure_threshold, 5);
}

#[test]
fn test_retry_state_attempt_sequence() {
    let mut retry = RetryState::new(3, Duration::from_secs(2));
    assert_eq!(retry.next_attempt(), Some(1));
    assert_eq!(retry.delay_before_current(), None);
    assert_eq!(retry.next_attempt(), Some(2));
    assert_eq!(retry.delay_before_current(), Some(Duration::from_secs(2)));
    assert_eq!(retry.next_attempt(), Some(3));
    assert_eq!(retry.next_attempt(), None);
    assert_eq!(retry.attempt(), 3);
}

#[test]
fn test_monitor_state_peer_outage_triggers_after_threshold() {
    let mut state = MonitorState::new(5);
    let reports: Vec<_> = (0..10).map(|_| state.observe(Some(TestFixtures::peer_down()))).collect();

    let triggers: Vec<usize> = reports
        .iter()
        .enumerate()
        .filter(|(_, r)| r.trigger_reconnect)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(triggers, vec![4, 9]);
    assert!(reports[0].changed);
    assert!(!reports[1].changed);
}

#[test]
fn test_monitor_state_stale_data_alone_is_healthy() {
    let mut state = MonitorState::new(5);
    for _ in 0..10 {
        let report = state.observe(Some(ServiceStatus::new(true, true, false)));
        assert_eq!(report.failure_streak, 0);
        assert!(!report.trigger_reconnect);
    }
}

#[test]
fn test_outcome_classification() {
    assert_eq!(
        classify_outcome(TestFixtures::worker_down(), TestFixtures::healthy()),
        ReconnectOutcome::FullyRecovered
    );
    assert_eq!(
        classify_outcome(ServiceStatus::all_down(), TestFixtures::worker_down()),
        ReconnectOutcome::PartiallyRecovered
    );
    assert_eq!(
        classify_outcome(TestFixtures::peer_down(), TestFixtures::peer_down()),
        ReconnectOutcome::Unrecovered
    );
}
