//! Bridge orchestrator library
//!
//! Starts the bridge worker (or adopts a running one), watches it together
//! with the unmanaged peer application, and attempts targeted recovery when
//! either stays degraded.

pub mod config;
pub mod core;
pub mod error;
pub mod monitor;
pub mod orchestrator;
pub mod reconnect;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use config::{MonitorSettings, ReconnectSettings, SupervisorSettings, WorkerCommand};
pub use error::{OrchestratorError, OrchestratorResult};
pub use monitor::HealthMonitor;
pub use orchestrator::Orchestrator;
pub use reconnect::ReconnectionController;
pub use traits::{HealthSampler, ProcessSupervisor, ReconnectOutcome, Readiness, Reconnector, StartupOutcome};
