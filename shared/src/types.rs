//! Core shared types and identifiers

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Maximum age of the bridge's last update for its data to count as current
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(30);

/// Component tag attached to every log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    /// Top-level orchestrator lifecycle
    Orchestrator,
    /// Worker spawning, readiness and termination
    Supervisor,
    /// Periodic health sampling
    Monitor,
    /// Recovery attempts after sustained failure
    Reconnect,
    /// Bridge HTTP client
    Bridge,
    /// Output forwarded from the worker process
    Worker,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Orchestrator => write!(f, "orchestrator"),
            Component::Supervisor => write!(f, "supervisor"),
            Component::Monitor => write!(f, "monitor"),
            Component::Reconnect => write!(f, "reconnect"),
            Component::Bridge => write!(f, "bridge"),
            Component::Worker => write!(f, "worker"),
        }
    }
}

/// Snapshot produced by one sampling pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    /// Worker answered its health probe
    pub worker: bool,
    /// Peer application is reachable
    pub peer: bool,
    /// Worker's aggregate state was updated within the freshness window
    #[serde(rename = "dataFresh")]
    pub data_fresh: bool,
}

impl ServiceStatus {
    pub fn new(worker: bool, peer: bool, data_fresh: bool) -> Self {
        Self { worker, peer, data_fresh }
    }

    /// Status recorded when a sampling pass could not complete
    pub fn all_down() -> Self {
        Self::default()
    }

    /// Both required services are up
    pub fn is_healthy(&self) -> bool {
        self.worker && self.peer
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = |up: bool| if up { "✅" } else { "❌" };
        write!(
            f,
            "worker {} | peer {} | data {}",
            mark(self.worker),
            mark(self.peer),
            if self.data_fresh { "fresh" } else { "stale" }
        )
    }
}

/// Normalised response body of a bridge request
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedBody {
    /// Response carried no body
    Empty,
    /// Body parsed as JSON
    Json(serde_json::Value),
    /// Body that is not valid JSON, returned verbatim
    Text(String),
}

impl ParsedBody {
    /// Classify a raw response body
    pub fn from_text(body: String) -> Self {
        if body.trim().is_empty() {
            return ParsedBody::Empty;
        }
        match serde_json::from_str(&body) {
            Ok(value) => ParsedBody::Json(value),
            Err(_) => ParsedBody::Text(body),
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ParsedBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Aggregate state served by `/api/bridge/state`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeState {
    #[serde(default)]
    pub summary: Option<BridgeSummary>,
    #[serde(default)]
    pub graphs: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeSummary {
    /// Epoch milliseconds of the last store update pushed to the bridge
    #[serde(rename = "lastUpdate", default)]
    pub last_update: Option<i64>,
}

impl BridgeState {
    /// Extract the state from a parsed body; non-JSON bodies yield an empty state
    pub fn from_body(body: &ParsedBody) -> Self {
        body.as_json()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }

    pub fn last_update(&self) -> Option<i64> {
        self.summary.as_ref().and_then(|s| s.last_update)
    }

    /// Freshness relative to an explicit clock reading in epoch milliseconds
    ///
    /// A timestamp whose age does not fit in an `i64` is stale.
    pub fn is_fresh_at(&self, now_ms: i64) -> bool {
        self.last_update()
            .and_then(|last_update| now_ms.checked_sub(last_update))
            .is_some_and(|age| age < FRESHNESS_WINDOW.as_millis() as i64)
    }

    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now().timestamp_millis())
    }
}
