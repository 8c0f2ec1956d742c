//! Reconnection controller
//!
//! Runs when the monitor sees sustained degradation. Re-checks after a settle
//! delay, restarts the worker through the supervisor when it is down, and can
//! only advise the operator about the peer, which it does not manage. Never
//! fails: supervisor and sampling errors are logged and folded into the outcome.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::time::sleep;

use shared::{logging, process_info, process_warn, Component, ServiceStatus};

use crate::config::ReconnectSettings;
use crate::traits::{HealthSampler, ProcessSupervisor, ReconnectOutcome, Reconnector};

pub struct ReconnectionController<P, S>
where
    P: ProcessSupervisor + 'static,
    S: HealthSampler + 'static,
{
    supervisor: Arc<P>,
    sampler: Arc<S>,
    settings: ReconnectSettings,
}

impl<P, S> ReconnectionController<P, S>
where
    P: ProcessSupervisor + 'static,
    S: HealthSampler + 'static,
{
    pub fn new(supervisor: Arc<P>, sampler: Arc<S>, settings: ReconnectSettings) -> Self {
        Self {
            supervisor,
            sampler,
            settings,
        }
    }

    /// Sample, treating a failed pass as everything down
    async fn sample_or_down(&self) -> ServiceStatus {
        match self.sampler.sample().await {
            Ok(status) => status,
            Err(e) => {
                logging::log_error(Component::Reconnect, "Health sample", &e);
                ServiceStatus::all_down()
            }
        }
    }
}

/// Compare the status before recovery with the final re-check
pub fn classify_outcome(before: ServiceStatus, after: ServiceStatus) -> ReconnectOutcome {
    if after.is_healthy() {
        ReconnectOutcome::FullyRecovered
    } else if (after.worker && !before.worker) || (after.peer && !before.peer) {
        ReconnectOutcome::PartiallyRecovered
    } else {
        ReconnectOutcome::Unrecovered
    }
}

#[async_trait]
impl<P, S> Reconnector for ReconnectionController<P, S>
where
    P: ProcessSupervisor + 'static,
    S: HealthSampler + 'static,
{
    async fn reconnect(&self) -> ReconnectOutcome {
        logging::log_progress(Component::Reconnect, "Reconnecting", "re-checking services");
        sleep(self.settings.initial_settle).await;

        let before = self.sample_or_down().await;
        if before.is_healthy() {
            logging::log_success(Component::Reconnect, "Services recovered without intervention");
            return ReconnectOutcome::FullyRecovered;
        }

        if !before.worker {
            logging::log_progress(Component::Reconnect, "Restarting", "bridge worker");
            match self.supervisor.ensure_running().await {
                Ok(outcome) => process_info!(
                    Component::Reconnect,
                    "✅ Worker restarted ({:?}, {} attempt(s))",
                    outcome.readiness,
                    outcome.attempts
                ),
                Err(e) => logging::log_error(Component::Reconnect, "Worker restart", &e),
            }
        }

        if !before.peer {
            process_warn!(
                Component::Reconnect,
                "⚠️ Peer application is unreachable and is not managed here; start or reload it to restore the connection"
            );
        }

        sleep(self.settings.final_settle).await;
        let after = self.sample_or_down().await;
        let outcome = classify_outcome(before, after);

        match outcome {
            ReconnectOutcome::FullyRecovered => logging::log_success(Component::Reconnect, "Fully recovered"),
            ReconnectOutcome::PartiallyRecovered => {
                process_warn!(Component::Reconnect, "⚠️ Partially recovered: {}", after)
            }
            ReconnectOutcome::Unrecovered => process_warn!(Component::Reconnect, "❌ Still degraded: {}", after),
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrchestratorError;
    use crate::traits::{MockHealthSampler, MockProcessSupervisor, Readiness, StartupOutcome};
    use mockall::Sequence;
    use std::time::Duration;

    fn settings() -> ReconnectSettings {
        ReconnectSettings {
            initial_settle: Duration::from_millis(5),
            final_settle: Duration::from_millis(5),
        }
    }

    fn sampler_sequence(statuses: Vec<ServiceStatus>) -> MockHealthSampler {
        let mut sampler = MockHealthSampler::new();
        let mut seq = Sequence::new();
        for status in statuses {
            sampler
                .expect_sample()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move || Ok(status));
        }
        sampler
    }

    fn controller(supervisor: MockProcessSupervisor, sampler: MockHealthSampler) -> ReconnectionController<MockProcessSupervisor, MockHealthSampler> {
        ReconnectionController::new(Arc::new(supervisor), Arc::new(sampler), settings())
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_degradation_needs_no_action() {
        let mut supervisor = MockProcessSupervisor::new();
        supervisor.expect_ensure_running().times(0);
        let sampler = sampler_sequence(vec![ServiceStatus::new(true, true, false)]);

        let outcome = controller(supervisor, sampler).reconnect().await;
        assert_eq!(outcome, ReconnectOutcome::FullyRecovered);
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_down_restarts_worker() {
        let mut supervisor = MockProcessSupervisor::new();
        supervisor.expect_ensure_running().times(1).returning(|| {
            Ok(StartupOutcome {
                attempts: 1,
                readiness: Readiness::Probe,
            })
        });
        let sampler = sampler_sequence(vec![
            ServiceStatus::new(false, true, false),
            ServiceStatus::new(true, true, true),
        ]);

        let outcome = controller(supervisor, sampler).reconnect().await;
        assert_eq!(outcome, ReconnectOutcome::FullyRecovered);
    }

    #[tokio::test(start_paused = true)]
    async fn test_supervisor_failure_is_not_propagated() {
        let mut supervisor = MockProcessSupervisor::new();
        supervisor.expect_ensure_running().times(1).returning(|| {
            Err(OrchestratorError::StartupExhausted {
                name: "bridge-daemon".to_string(),
                attempts: 3,
                last_failure: "exited".to_string(),
            })
        });
        let sampler = sampler_sequence(vec![
            ServiceStatus::new(false, false, false),
            ServiceStatus::new(false, true, false),
        ]);

        let outcome = controller(supervisor, sampler).reconnect().await;
        assert_eq!(outcome, ReconnectOutcome::PartiallyRecovered);
    }

    #[tokio::test(start_paused = true)]
    async fn test_peer_down_only_gives_guidance() {
        let mut supervisor = MockProcessSupervisor::new();
        supervisor.expect_ensure_running().times(0);
        let sampler = sampler_sequence(vec![
            ServiceStatus::new(true, false, true),
            ServiceStatus::new(true, false, true),
        ]);

        let outcome = controller(supervisor, sampler).reconnect().await;
        assert_eq!(outcome, ReconnectOutcome::Unrecovered);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sampling_errors_count_as_down() {
        let mut supervisor = MockProcessSupervisor::new();
        supervisor
            .expect_ensure_running()
            .times(1)
            .returning(|| Ok(StartupOutcome::adopted()));
        let mut sampler = MockHealthSampler::new();
        sampler.expect_sample().times(2).returning(|| {
            Err(OrchestratorError::Configuration {
                field: "sampler".to_string(),
            })
        });

        let outcome = controller(supervisor, sampler).reconnect().await;
        assert_eq!(outcome, ReconnectOutcome::Unrecovered);
    }

    #[test]
    fn test_classify_outcome() {
        let down = ServiceStatus::new(false, false, false);
        let worker_only = ServiceStatus::new(true, false, false);
        let up = ServiceStatus::new(true, true, false);

        assert_eq!(classify_outcome(down, up), ReconnectOutcome::FullyRecovered);
        assert_eq!(classify_outcome(down, worker_only), ReconnectOutcome::PartiallyRecovered);
        assert_eq!(classify_outcome(worker_only, worker_only), ReconnectOutcome::Unrecovered);
        assert_eq!(classify_outcome(down, down), ReconnectOutcome::Unrecovered);
    }
}
