//! Builder for orchestrators wired to mockall doubles
use bridge_orchestrator::traits::{MockHealthSampler, MockProcessSupervisor};
use bridge_orchestrator::Orchestrator;

use super::fixtures::TestFixtures;

pub type TestOrchestrator = Orchestrator<MockProcessSupervisor, MockHealthSampler>;

/// Builds a test orchestrator; mocks start with no expectations
pub struct OrchestratorBuilder {
    supervisor: MockProcessSupervisor,
    sampler: MockHealthSampler,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            supervisor: MockProcessSupervisor::new(),
            sampler: MockHealthSampler::new(),
        }
    }

    /// Configure the supervisor mock with a setup function
    pub fn with_supervisor<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockProcessSupervisor),
    {
        setup(&mut self.supervisor);
        self
    }

    /// Configure the sampler mock with a setup function
    pub fn with_sampler<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockHealthSampler),
    {
        setup(&mut self.sampler);
        self
    }

    pub fn build(self) -> TestOrchestrator {
        Orchestrator::new(self.supervisor, self.sampler)
            .with_monitor_settings(TestFixtures::fast_monitor())
            .with_reconnect_settings(TestFixtures::fast_reconnect())
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
