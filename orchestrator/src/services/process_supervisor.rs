//! Real process supervisor implementation
//!
//! Adopts an already-healthy worker or spawns a new one, racing the health
//! probe against stderr readiness lines, the startup deadline and early exit.
//! Attempts are strictly sequential and bounded by `max_attempts`.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use shared::{logging, process_debug, process_info, process_warn, BridgeClient, Component};

use crate::config::SupervisorSettings;
use crate::core::RetryState;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::services::process_output_handler::{configure_child_stdio, spawn_output_forwarders, ReadinessSignal};
use crate::services::process_registry::{ManagedProcess, ProcessRegistry};
use crate::traits::{ProcessSupervisor, Readiness, StartupOutcome};

/// Supervisor for the bridge worker process
pub struct RealProcessSupervisor {
    client: Arc<BridgeClient>,
    registry: Arc<ProcessRegistry>,
    settings: SupervisorSettings,
}

impl RealProcessSupervisor {
    pub fn new(client: Arc<BridgeClient>, registry: Arc<ProcessRegistry>, settings: SupervisorSettings) -> Self {
        Self {
            client,
            registry,
            settings,
        }
    }

    pub fn registry(&self) -> &Arc<ProcessRegistry> {
        &self.registry
    }

    /// Build the worker command with a production-flavoured environment
    fn build_command(&self) -> Command {
        let worker = &self.settings.command;
        let mut cmd = Command::new(&worker.program);
        cmd.args(&worker.args)
            .env("NODE_ENV", "production")
            .env("BRIDGE_PORT", self.settings.port.to_string())
            .kill_on_drop(true);
        for (key, value) in &worker.env {
            cmd.env(key, value);
        }
        configure_child_stdio(&mut cmd);
        cmd
    }

    /// Spawn one worker and wait for the first readiness signal
    async fn launch_attempt(&self, attempt: u32) -> OrchestratorResult<(ManagedProcess, Readiness)> {
        let name = &self.settings.name;
        let mut child = self
            .build_command()
            .spawn()
            .map_err(|e| OrchestratorError::spawn(name, e))?;

        process_debug!(
            Component::Supervisor,
            "🏭 Spawned {} (PID: {:?}) attempt {}",
            name,
            child.id(),
            attempt
        );

        let mut signals = spawn_output_forwarders(&mut child, name, &self.settings.patterns);
        match self.await_readiness(&mut child, &mut signals).await {
            Ok(readiness) => Ok((ManagedProcess::new(name.clone(), child), readiness)),
            Err(e) => {
                // Already-exited children make kill fail; that is fine
                let _ = child.kill().await;
                Err(e)
            }
        }
    }

    /// First signal wins: health probe, stderr line, early exit or deadline
    async fn await_readiness(
        &self,
        child: &mut Child,
        signals: &mut mpsc::UnboundedReceiver<ReadinessSignal>,
    ) -> OrchestratorResult<Readiness> {
        let name = &self.settings.name;
        let probe = self.poll_health();
        tokio::pin!(probe);
        let deadline = sleep(self.settings.startup_timeout);
        tokio::pin!(deadline);
        let mut signals_open = true;

        loop {
            tokio::select! {
                _ = &mut probe => return Ok(Readiness::Probe),
                signal = signals.recv(), if signals_open => match signal {
                    Some(signal) => return Ok(signal.into()),
                    None => signals_open = false,
                },
                status = child.wait() => {
                    let status = status?;
                    // A readiness line printed just before exiting still counts
                    if let Ok(Some(signal)) = timeout(self.settings.exit_drain, signals.recv()).await {
                        return Ok(signal.into());
                    }
                    return Err(OrchestratorError::ProcessExit {
                        name: name.clone(),
                        code: status.code(),
                    });
                },
                _ = &mut deadline => {
                    return Err(OrchestratorError::StartupTimeout {
                        name: name.clone(),
                        timeout: self.settings.startup_timeout,
                    });
                },
            }
        }
    }

    /// Probe `/health` after the warm-up delay until it succeeds
    async fn poll_health(&self) {
        sleep(self.settings.warmup_delay).await;
        loop {
            match self.client.health().await {
                Ok(()) => return,
                Err(e) => process_debug!(Component::Supervisor, "Readiness probe failed: {}", e),
            }
            sleep(self.settings.probe_interval).await;
        }
    }

    fn log_readiness(&self, outcome: &StartupOutcome) {
        let name = &self.settings.name;
        match outcome.readiness {
            Readiness::Probe => logging::log_success(
                Component::Supervisor,
                &format!("{} ready after {} attempt(s)", name, outcome.attempts),
            ),
            Readiness::DegradedWiring => process_warn!(
                Component::Supervisor,
                "⚠️ {} is up but waiting for the peer's store bridge (attempt {})",
                name,
                outcome.attempts
            ),
            Readiness::AlreadyRunningElsewhere => process_warn!(
                Component::Supervisor,
                "⚠️ Port {} already in use; assuming {} is running elsewhere",
                self.settings.port,
                name
            ),
            Readiness::Adopted => logging::log_success(
                Component::Supervisor,
                &format!("Adopted running {} at {}", name, self.client.config().worker_origin()),
            ),
        }
    }
}

#[async_trait]
impl ProcessSupervisor for RealProcessSupervisor {
    async fn ensure_running(&self) -> OrchestratorResult<StartupOutcome> {
        let name = self.settings.name.clone();
        logging::log_progress(
            Component::Supervisor,
            "Probing",
            self.client.config().worker_origin().as_str(),
        );

        if self.client.health().await.is_ok() {
            let outcome = StartupOutcome::adopted();
            self.log_readiness(&outcome);
            return Ok(outcome);
        }

        // A registered worker that fails the probe is hung; free its port first
        self.kill(&name).await;

        let mut retry = RetryState::new(self.settings.max_attempts, self.settings.retry_delay);
        let mut last_failure = None;

        while let Some(attempt) = retry.next_attempt() {
            if let Some(delay) = retry.delay_before_current() {
                sleep(delay).await;
                self.kill(&name).await;
            }

            logging::log_progress(
                Component::Supervisor,
                "Spawning",
                &format!("{} (attempt {}/{})", name, attempt, retry.max_attempts()),
            );

            match self.launch_attempt(attempt).await {
                Ok((process, readiness)) => {
                    if let Some(stale) = self.registry.register(process).await {
                        stale.terminate(self.settings.kill_grace).await;
                    }
                    let outcome = StartupOutcome {
                        attempts: attempt,
                        readiness,
                    };
                    self.log_readiness(&outcome);
                    return Ok(outcome);
                }
                Err(e) => {
                    process_warn!(
                        Component::Supervisor,
                        "⚠️ Attempt {}/{} failed: {}",
                        attempt,
                        retry.max_attempts(),
                        e
                    );
                    last_failure = Some(e.to_string());
                }
            }
        }

        Err(OrchestratorError::StartupExhausted {
            name,
            attempts: retry.attempt(),
            last_failure: last_failure.unwrap_or_default(),
        })
    }

    async fn kill(&self, name: &str) {
        if let Some(process) = self.registry.remove(name).await {
            process_info!(Component::Supervisor, "🛑 Stopping {} (PID {:?})", name, process.pid());
            process.terminate(self.settings.kill_grace).await;
        }
    }

    async fn kill_all(&self) {
        for process in self.registry.drain().await {
            process_info!(
                Component::Supervisor,
                "🛑 Stopping {} (PID {:?})",
                process.name(),
                process.pid()
            );
            process.terminate(self.settings.kill_grace).await;
        }
        process_debug!(Component::Supervisor, "🛑 All processes stopped");
    }
}
