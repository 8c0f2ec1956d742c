//! Service implementations
//!
//! Real implementations of the component traits; these handle actual process
//! and network I/O.

pub mod health_sampler;
pub mod process_output_handler;
pub mod process_registry;
pub mod process_supervisor;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use health_sampler::BridgeHealthSampler;
pub use process_registry::{ManagedProcess, ProcessRegistry, ProcessSnapshot};
pub use process_supervisor::RealProcessSupervisor;
