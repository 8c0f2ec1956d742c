//! Orchestrator-specific error types

use shared::BridgeError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Worker '{name}' did not become ready after {attempts} attempts: {last_failure}")]
    StartupExhausted {
        name: String,
        attempts: u32,
        last_failure: String,
    },

    #[error("Worker '{name}' exited before becoming ready (code {code:?})")]
    ProcessExit { name: String, code: Option<i32> },

    #[error("Worker '{name}' gave no readiness signal within {timeout:?}")]
    StartupTimeout { name: String, timeout: Duration },

    #[error("Failed to spawn worker '{name}': {message}")]
    SpawnFailed { name: String, message: String },

    #[error("Configuration error: {field}")]
    Configuration { field: String },

    #[error("Bridge request failed: {0}")]
    Bridge(#[from] BridgeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OrchestratorError {
    pub fn config(field: impl Into<String>) -> Self {
        OrchestratorError::Configuration { field: field.into() }
    }

    pub fn spawn(name: &str, err: impl std::fmt::Display) -> Self {
        OrchestratorError::SpawnFailed {
            name: name.to_string(),
            message: err.to_string(),
        }
    }

    /// The only error that is allowed to terminate the orchestrator
    pub fn is_fatal(&self) -> bool {
        matches!(self, OrchestratorError::StartupExhausted { .. })
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
