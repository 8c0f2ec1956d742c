//! Trait definitions with mockall annotations for testing
//!
//! The supervisor, sampler and reconnection controller are wired together
//! through these traits so each can be exercised against mocks of the others.

use shared::ServiceStatus;

use crate::error::OrchestratorResult;

/// Which signal declared the worker ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// A healthy worker was already running; nothing was spawned
    Adopted,
    /// The spawned worker answered its health probe
    Probe,
    /// The worker is alive but waiting on the peer's store bridge
    DegradedWiring,
    /// The worker port is bound by another instance
    AlreadyRunningElsewhere,
}

/// Result of a successful `ensure_running`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupOutcome {
    /// Spawn attempts used; zero when an existing worker was adopted
    pub attempts: u32,
    pub readiness: Readiness,
}

impl StartupOutcome {
    pub fn adopted() -> Self {
        Self {
            attempts: 0,
            readiness: Readiness::Adopted,
        }
    }
}

/// Final verdict of one reconnection pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectOutcome {
    FullyRecovered,
    PartiallyRecovered,
    Unrecovered,
}

/// Ownership of the worker process: start, adopt and terminate
#[mockall::automock]
#[async_trait::async_trait]
pub trait ProcessSupervisor: Send + Sync {
    /// Guarantee the worker is running and ready
    ///
    /// # Returns
    /// The attempt count and readiness signal, or `StartupExhausted` once every
    /// attempt has failed
    async fn ensure_running(&self) -> OrchestratorResult<StartupOutcome>;

    /// Terminate and unregister a process; unknown or dead entries are not an error
    async fn kill(&self, name: &str);

    /// Terminate every registered process
    async fn kill_all(&self);
}

/// Source of combined worker + peer health snapshots
#[mockall::automock]
#[async_trait::async_trait]
pub trait HealthSampler: Send + Sync {
    /// Take one sample; an error means the pass itself could not complete
    async fn sample(&self) -> OrchestratorResult<ServiceStatus>;
}

/// Recovery action triggered by sustained degradation
#[mockall::automock]
#[async_trait::async_trait]
pub trait Reconnector: Send + Sync {
    /// Attempt recovery; never fails, the outcome describes what improved
    async fn reconnect(&self) -> ReconnectOutcome;
}
