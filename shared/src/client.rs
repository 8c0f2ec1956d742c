//! Bridge HTTP client
//!
//! Performs single requests against the worker's control surface and
//! normalises the result into a [`ParsedBody`]. There are no retries here;
//! retry policy belongs to the supervisor and the monitor.

use reqwest::Method;
use std::sync::atomic::{AtomicBool, Ordering};
use url::Url;

use crate::config::ServiceEndpointConfig;
use crate::errors::{BridgeError, BridgeResult};
use crate::types::{BridgeState, Component, ParsedBody};

pub const HEALTH_PATH: &str = "/health";
pub const BRIDGE_STATE_PATH: &str = "/api/bridge/state";

/// HTTP client for the bridge worker and the peer reachability probe
#[derive(Debug)]
pub struct BridgeClient {
    config: ServiceEndpointConfig,
    http: reqwest::Client,
    fallback_warned: AtomicBool,
}

impl BridgeClient {
    pub fn new(config: ServiceEndpointConfig) -> BridgeResult<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls())
            .build()
            .map_err(|e| BridgeError::ClientBuild { message: e.to_string() })?;

        Ok(Self {
            config,
            http,
            fallback_warned: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &ServiceEndpointConfig {
        &self.config
    }

    /// Resolve a path against the worker origin, degrading to the local default
    pub fn resolve(&self, path: &str) -> Url {
        if let Ok(url) = self.config.worker_origin().join(path) {
            return url;
        }

        if !self.fallback_warned.swap(true, Ordering::Relaxed) {
            crate::process_warn!(
                Component::Bridge,
                "⚠️ Cannot resolve '{}' against {}, using {}",
                path,
                self.config.worker_origin(),
                self.config.fallback_origin()
            );
        }

        let fallback = self.config.fallback_origin();
        fallback.join(path).unwrap_or_else(|_| fallback.clone())
    }

    /// Issue one request and normalise the response body
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&serde_json::Value>,
    ) -> BridgeResult<ParsedBody> {
        let url = self.resolve(path);
        let timeout = self.config.request_timeout();
        let url_str = url.to_string();

        let mut request = self.http.request(method.clone(), url).timeout(timeout);
        if let Some(payload) = payload {
            let body = serde_json::to_vec(payload).map_err(|e| BridgeError::Decode {
                url: url_str.clone(),
                message: e.to_string(),
            })?;
            // A Vec body gets its Content-Length from reqwest
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json; charset=utf-8")
                .body(body);
        }

        crate::process_debug!(Component::Bridge, "➡️ {} {}", method, url_str);

        let response = request
            .send()
            .await
            .map_err(|e| BridgeError::from_reqwest(&url_str, timeout, e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BridgeError::from_reqwest(&url_str, timeout, e))?;

        if status.as_u16() >= 400 {
            return Err(BridgeError::HttpStatus {
                url: url_str,
                status: status.as_u16(),
                body: (!text.is_empty()).then_some(text),
            });
        }

        Ok(ParsedBody::from_text(text))
    }

    /// Bare readiness probe; any 2xx counts, the body is ignored
    pub async fn health(&self) -> BridgeResult<()> {
        self.request(Method::GET, HEALTH_PATH, None).await.map(|_| ())
    }

    /// Fetch the aggregate bridge state used for freshness checks
    pub async fn bridge_state(&self) -> BridgeResult<BridgeState> {
        let body = self.request(Method::GET, BRIDGE_STATE_PATH, None).await?;
        Ok(BridgeState::from_body(&body))
    }

    /// Reachability probe against the peer's own origin, bypassing the worker
    ///
    /// Any response, whatever its status, means the peer is reachable.
    pub async fn probe_peer(&self) -> bool {
        let url = self.config.peer_origin().clone();
        match self
            .http
            .get(url.clone())
            .timeout(self.config.peer_timeout())
            .send()
            .await
        {
            Ok(response) => {
                crate::process_debug!(Component::Bridge, "Peer {} answered {}", url, response.status());
                true
            }
            Err(e) => {
                crate::process_debug!(Component::Bridge, "Peer {} unreachable: {}", url, e);
                false
            }
        }
    }
}
