//! Health monitor sampling loop
//!
//! `WARMING_UP -> SAMPLING <-> RECONNECTING -> SAMPLING`. Each tick runs inline
//! and missed ticks are skipped, so a slow pass or a reconnection never
//! overlaps with the next tick.

use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval, sleep, MissedTickBehavior};

use shared::{logging, process_info, process_warn, Component, ServiceStatus};

use crate::config::MonitorSettings;
use crate::core::{MonitorState, TickReport};
use crate::traits::{HealthSampler, Reconnector};

pub struct HealthMonitor<S, R>
where
    S: HealthSampler + 'static,
    R: Reconnector + 'static,
{
    sampler: Arc<S>,
    reconnector: Arc<R>,
    settings: MonitorSettings,
    state: MonitorState,
    status_tx: watch::Sender<Option<ServiceStatus>>,
}

impl<S, R> HealthMonitor<S, R>
where
    S: HealthSampler + 'static,
    R: Reconnector + 'static,
{
    pub fn new(sampler: Arc<S>, reconnector: Arc<R>, settings: MonitorSettings) -> Self {
        let (status_tx, _) = watch::channel(None);
        Self {
            sampler,
            reconnector,
            state: MonitorState::new(settings.failure_threshold),
            settings,
            status_tx,
        }
    }

    /// Receiver for snapshot reads of the latest sampled status
    pub fn subscribe(&self) -> watch::Receiver<Option<ServiceStatus>> {
        self.status_tx.subscribe()
    }

    pub fn failure_streak(&self) -> u32 {
        self.state.failure_streak()
    }

    pub fn previous_status(&self) -> Option<ServiceStatus> {
        self.state.previous()
    }

    /// Run one sampling pass, reconnecting if the failure threshold is reached
    pub async fn tick(&mut self) -> TickReport {
        let sample = match self.sampler.sample().await {
            Ok(status) => Some(status),
            Err(e) => {
                process_warn!(Component::Monitor, "⚠️ Sampling failed: {}", e);
                None
            }
        };

        let report = self.state.observe(sample);
        process_info!(Component::Monitor, "{}", report.readout());
        self.status_tx.send_replace(Some(report.status));

        if report.trigger_reconnect {
            logging::log_progress(
                Component::Monitor,
                "Reconnecting",
                &format!("{} consecutive degraded samples", self.settings.failure_threshold),
            );
            let outcome = self.reconnector.reconnect().await;
            process_info!(Component::Monitor, "Reconnection finished: {:?}", outcome);
        }

        report
    }

    /// Warm up, then sample on a fixed period forever
    pub async fn run(&mut self) {
        process_info!(
            Component::Monitor,
            "⏳ Warming up for {:?} before sampling",
            self.settings.settle_delay
        );
        sleep(self.settings.settle_delay).await;

        let mut ticker = interval(self.settings.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }
}
