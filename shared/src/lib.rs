//! Shared building blocks for the bridge orchestrator
//!
//! Holds the pieces any consumer of the bridge's HTTP surface needs: endpoint
//! configuration, the bridge HTTP client, status types and logging helpers.

pub mod client;
pub mod config;
pub mod errors;
pub mod logging;
pub mod types;

pub use client::{BridgeClient, BRIDGE_STATE_PATH, HEALTH_PATH};
pub use config::ServiceEndpointConfig;
pub use errors::*;
pub use types::*;
