//! Combined worker + peer health sampling over HTTP

use async_trait::async_trait;
use std::sync::Arc;

use shared::{process_debug, BridgeClient, Component, ServiceStatus};

use crate::error::OrchestratorResult;
use crate::traits::HealthSampler;

/// Samples the bridge worker and, independently, the peer application
pub struct BridgeHealthSampler {
    client: Arc<BridgeClient>,
}

impl BridgeHealthSampler {
    pub fn new(client: Arc<BridgeClient>) -> Self {
        Self { client }
    }

    /// Best-effort freshness of the aggregate state; any failure means stale
    async fn data_fresh(&self) -> bool {
        match self.client.bridge_state().await {
            Ok(state) => state.is_fresh(),
            Err(e) => {
                process_debug!(Component::Monitor, "Bridge state unavailable: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl HealthSampler for BridgeHealthSampler {
    async fn sample(&self) -> OrchestratorResult<ServiceStatus> {
        let (worker, data_fresh) = match self.client.health().await {
            Ok(()) => (true, self.data_fresh().await),
            Err(e) => {
                process_debug!(Component::Monitor, "Worker health probe failed: {}", e);
                (false, false)
            }
        };

        let peer = self.client.probe_peer().await;
        Ok(ServiceStatus::new(worker, peer, data_fresh))
    }
}
