//! Shared error types for the bridge orchestrator

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("HTTP {status} from {url}")]
    HttpStatus {
        url: String,
        status: u16,
        body: Option<String>,
    },

    #[error("Failed to build HTTP client: {message}")]
    ClientBuild { message: String },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl BridgeError {
    /// Map a reqwest failure onto the transport/timeout split
    pub fn from_reqwest(url: &str, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BridgeError::Timeout {
                url: url.to_string(),
                timeout,
            }
        } else {
            BridgeError::Transport {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            BridgeError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;
