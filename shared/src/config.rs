//! Endpoint configuration for the bridge worker and the peer application
//!
//! Built once at startup. Origins that do not parse as absolute `http`/`https`
//! URLs are replaced with `http://localhost:<port>` so the rest of the system
//! never sees an unusable origin.

use std::time::Duration;
use url::Url;

use crate::types::Component;

pub const DEFAULT_BRIDGE_PORT: u16 = 3001;
pub const DEFAULT_PEER_PORT: u16 = 4000;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_PEER_TIMEOUT: Duration = Duration::from_secs(2);

/// Immutable connection settings shared by every component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpointConfig {
    worker_origin: Url,
    fallback_origin: Url,
    peer_origin: Url,
    request_timeout: Duration,
    peer_timeout: Duration,
    verify_tls: bool,
}

impl ServiceEndpointConfig {
    pub fn builder() -> ServiceEndpointConfigBuilder {
        ServiceEndpointConfigBuilder::default()
    }

    /// Known-good local origin for a port
    pub fn local_origin(port: u16) -> Url {
        Url::parse(&format!("http://localhost:{port}/")).expect("localhost origin is a valid URL")
    }

    pub fn worker_origin(&self) -> &Url {
        &self.worker_origin
    }

    /// Origin used when a path cannot be resolved against the worker origin
    pub fn fallback_origin(&self) -> &Url {
        &self.fallback_origin
    }

    pub fn peer_origin(&self) -> &Url {
        &self.peer_origin
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn peer_timeout(&self) -> Duration {
        self.peer_timeout
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    pub fn uses_tls(&self) -> bool {
        self.worker_origin.scheme() == "https"
    }
}

impl Default for ServiceEndpointConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder collecting defaults and explicit overrides
#[derive(Debug, Clone)]
pub struct ServiceEndpointConfigBuilder {
    bridge_port: u16,
    peer_port: u16,
    worker_origin: Option<String>,
    peer_origin: Option<String>,
    request_timeout: Duration,
    peer_timeout: Duration,
    tls_verify: Option<bool>,
    insecure: bool,
}

impl Default for ServiceEndpointConfigBuilder {
    fn default() -> Self {
        Self {
            bridge_port: DEFAULT_BRIDGE_PORT,
            peer_port: DEFAULT_PEER_PORT,
            worker_origin: None,
            peer_origin: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            peer_timeout: DEFAULT_PEER_TIMEOUT,
            tls_verify: None,
            insecure: false,
        }
    }
}

impl ServiceEndpointConfigBuilder {
    pub fn bridge_port(mut self, port: u16) -> Self {
        self.bridge_port = port;
        self
    }

    pub fn peer_port(mut self, port: u16) -> Self {
        self.peer_port = port;
        self
    }

    /// Override the worker origin (scheme, host and port)
    pub fn worker_origin(mut self, origin: impl Into<String>) -> Self {
        self.worker_origin = Some(origin.into());
        self
    }

    pub fn peer_origin(mut self, origin: impl Into<String>) -> Self {
        self.peer_origin = Some(origin.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn peer_timeout(mut self, timeout: Duration) -> Self {
        self.peer_timeout = timeout;
        self
    }

    /// Explicit certificate verification override
    pub fn tls_verify(mut self, verify: Option<bool>) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Opt into skipping certificate verification for self-signed local setups
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn build(self) -> ServiceEndpointConfig {
        let fallback_origin = ServiceEndpointConfig::local_origin(self.bridge_port);
        let worker_origin = resolve_origin("bridge", self.worker_origin.as_deref(), &fallback_origin);
        let peer_default = ServiceEndpointConfig::local_origin(self.peer_port);
        let peer_origin = resolve_origin("peer", self.peer_origin.as_deref(), &peer_default);

        let verify_tls = !(self.insecure || self.tls_verify == Some(false));
        if !verify_tls {
            crate::process_warn!(
                Component::Bridge,
                "⚠️ TLS certificate verification disabled (insecure mode)"
            );
        }

        ServiceEndpointConfig {
            worker_origin,
            fallback_origin,
            peer_origin,
            request_timeout: self.request_timeout,
            peer_timeout: self.peer_timeout,
            verify_tls,
        }
    }
}

/// Parse an origin override, substituting the default when it is unusable
fn resolve_origin(label: &str, candidate: Option<&str>, default: &Url) -> Url {
    let Some(raw) = candidate else {
        return default.clone();
    };

    match parse_origin(raw) {
        Some(url) => url,
        None => {
            crate::process_warn!(
                Component::Bridge,
                "⚠️ Invalid {} origin '{}', using {}",
                label,
                raw,
                default
            );
            default.clone()
        }
    }
}

/// Accept only absolute http(s) URLs that can serve as a base for paths
pub fn parse_origin(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim()).ok()?;
    let usable = matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base() && url.host().is_some();
    usable.then_some(url)
}
