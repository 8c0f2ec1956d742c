//! Main orchestrator implementation
//!
//! Starts (or adopts) the worker, then runs the health monitor with its
//! reconnection controller until a shutdown signal arrives, and finally stops
//! every process it owns.

use std::sync::Arc;
use tokio::sync::mpsc;

use shared::{logging, Component, ServiceStatus};

use crate::config::{MonitorSettings, ReconnectSettings};
use crate::error::OrchestratorResult;
use crate::monitor::HealthMonitor;
use crate::reconnect::ReconnectionController;
use crate::traits::{HealthSampler, ProcessSupervisor, StartupOutcome};

/// Top-level coordinator of the supervisor, monitor and reconnection controller
pub struct Orchestrator<P, S>
where
    P: ProcessSupervisor + 'static,
    S: HealthSampler + 'static,
{
    /// Injected services
    supervisor: Arc<P>,
    sampler: Arc<S>,

    monitor_settings: MonitorSettings,
    reconnect_settings: ReconnectSettings,

    /// Shutdown signal
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl<P, S> Orchestrator<P, S>
where
    P: ProcessSupervisor + 'static,
    S: HealthSampler + 'static,
{
    /// Create new orchestrator with injected dependencies
    pub fn new(supervisor: P, sampler: S) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        Self {
            supervisor: Arc::new(supervisor),
            sampler: Arc::new(sampler),
            monitor_settings: MonitorSettings::default(),
            reconnect_settings: ReconnectSettings::default(),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Configure the sampling loop (fluent API)
    pub fn with_monitor_settings(mut self, settings: MonitorSettings) -> Self {
        self.monitor_settings = settings;
        self
    }

    /// Configure reconnection settle delays (fluent API)
    pub fn with_reconnect_settings(mut self, settings: ReconnectSettings) -> Self {
        self.reconnect_settings = settings;
        self
    }

    /// Sender that stops `run` when a message arrives
    pub fn get_shutdown_sender(&self) -> mpsc::Sender<()> {
        self.shutdown_tx.clone()
    }

    pub fn supervisor(&self) -> &Arc<P> {
        &self.supervisor
    }

    /// Startup phase; `StartupExhausted` propagates so the caller can abort
    pub async fn start(&self) -> OrchestratorResult<StartupOutcome> {
        logging::log_startup(Component::Orchestrator, "bridge worker startup");
        let outcome = self.supervisor.ensure_running().await?;
        logging::log_progress(
            Component::Orchestrator,
            "Worker ready",
            &format!("{:?} after {} attempt(s)", outcome.readiness, outcome.attempts),
        );
        Ok(outcome)
    }

    /// Take a single sample without starting anything
    pub async fn check_once(&self) -> OrchestratorResult<ServiceStatus> {
        self.sampler.sample().await
    }

    /// Monitor until shutdown, then stop every owned process
    pub async fn run(&mut self) -> OrchestratorResult<()> {
        let controller = Arc::new(ReconnectionController::new(
            self.supervisor.clone(),
            self.sampler.clone(),
            self.reconnect_settings.clone(),
        ));
        let mut monitor = HealthMonitor::new(self.sampler.clone(), controller, self.monitor_settings.clone());

        tokio::select! {
            _ = monitor.run() => {}
            _ = self.shutdown_rx.recv() => {
                logging::log_shutdown(Component::Orchestrator, "shutdown requested");
            }
        }

        self.supervisor.kill_all().await;
        logging::log_success(Component::Orchestrator, "All owned processes stopped");
        Ok(())
    }
}
