//! Common test utilities shared by the orchestrator test suites

pub mod fixtures;
pub mod helpers;

pub use fixtures::TestFixtures;
pub use helpers::{OrchestratorBuilder, TestOrchestrator};
