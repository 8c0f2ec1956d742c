//! Main entry point for the bridge orchestrator binary
//!
//! Wires the real services together, runs the startup phase and then monitors
//! until SIGINT/SIGTERM. Exits non-zero only when startup is exhausted or a
//! top-level failure occurs.

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

use bridge_orchestrator::{
    services::{BridgeHealthSampler, ProcessRegistry, RealProcessSupervisor},
    Orchestrator, ProcessSupervisor, SupervisorSettings, WorkerCommand,
};
use shared::{logging, process_error, BridgeClient, Component, ServiceEndpointConfig};

/// Starts the bridge worker and keeps it connected to the peer application
#[derive(Parser, Debug)]
#[command(name = "bridge-orchestrator")]
#[command(about = "Starts the bridge worker, monitors it with the peer application and recovers from failures")]
pub struct Args {
    /// Port the bridge worker listens on
    #[arg(long, env = "BRIDGE_PORT", default_value_t = shared::config::DEFAULT_BRIDGE_PORT)]
    pub bridge_port: u16,

    /// Port the peer application listens on
    #[arg(long, env = "PEER_PORT", default_value_t = shared::config::DEFAULT_PEER_PORT)]
    pub peer_port: u16,

    /// Path to the bridge worker executable
    #[arg(long, env = "BRIDGE_WORKER_PATH", default_value = "./bridge-daemon")]
    pub worker_path: String,

    /// Extra argument passed to the worker (repeatable)
    #[arg(long = "worker-arg")]
    pub worker_args: Vec<String>,

    /// Maximum startup attempts before giving up
    #[arg(long, env = "BRIDGE_MAX_ATTEMPTS", default_value = "3")]
    pub max_attempts: u32,

    /// Delay between startup attempts in milliseconds
    #[arg(long, env = "BRIDGE_RETRY_DELAY_MS", default_value = "2000")]
    pub retry_delay_ms: u64,

    /// Hard per-attempt startup timeout in milliseconds
    #[arg(long, env = "BRIDGE_STARTUP_TIMEOUT_MS", default_value = "15000")]
    pub startup_timeout_ms: u64,

    /// Override TLS certificate verification (true/false)
    #[arg(long, env = "BRIDGE_TLS_VERIFY")]
    pub tls_verify: Option<bool>,

    /// Accept self-signed certificates for local development
    #[arg(long, env = "BRIDGE_INSECURE", default_value_t = false)]
    pub insecure: bool,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "BRIDGE_REQUEST_TIMEOUT_MS", default_value = "5000")]
    pub request_timeout_ms: u64,

    /// Custom bridge origin, e.g. https://localhost:3001
    #[arg(long, env = "BRIDGE_ORIGIN")]
    pub bridge_origin: Option<String>,

    /// Custom peer origin
    #[arg(long, env = "PEER_ORIGIN")]
    pub peer_origin: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "BRIDGE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Sample once, print the status and exit (0 when worker and peer are up)
    #[arg(long)]
    pub check: bool,
}

impl Args {
    fn endpoint_config(&self) -> ServiceEndpointConfig {
        let mut builder = ServiceEndpointConfig::builder()
            .bridge_port(self.bridge_port)
            .peer_port(self.peer_port)
            .request_timeout(Duration::from_millis(self.request_timeout_ms))
            .tls_verify(self.tls_verify)
            .insecure(self.insecure);
        if let Some(origin) = &self.bridge_origin {
            builder = builder.worker_origin(origin.clone());
        }
        if let Some(origin) = &self.peer_origin {
            builder = builder.peer_origin(origin.clone());
        }
        builder.build()
    }

    fn supervisor_settings(&self) -> SupervisorSettings {
        SupervisorSettings {
            command: WorkerCommand::new(&self.worker_path).with_args(self.worker_args.iter().cloned()),
            port: self.bridge_port,
            max_attempts: self.max_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            startup_timeout: Duration::from_millis(self.startup_timeout_ms),
            ..SupervisorSettings::default()
        }
    }
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal as unix_signal, SignalKind};
        match unix_signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                logging::log_error(Component::Orchestrator, "SIGTERM handler", &err);
                let _ = signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = signal::ctrl_c().await;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // .env values feed the same variables the flags read
    let _ = dotenv::dotenv();
    let args = Args::parse();

    logging::init_tracing(Some(&args.log_level));

    let client = Arc::new(BridgeClient::new(args.endpoint_config())?);
    let registry = Arc::new(ProcessRegistry::new());
    let supervisor = RealProcessSupervisor::new(client.clone(), registry, args.supervisor_settings());
    let sampler = BridgeHealthSampler::new(client);

    let mut orchestrator = Orchestrator::new(supervisor, sampler);

    if args.check {
        let status = orchestrator.check_once().await?;
        println!("{status}");
        println!("{}", serde_json::to_string(&status)?);
        std::process::exit(if status.is_healthy() { 0 } else { 1 });
    }

    if let Err(e) = orchestrator.start().await {
        logging::log_error(Component::Orchestrator, "Worker startup", &e);
        if e.is_fatal() {
            process_error!(Component::Orchestrator, "💀 Giving up; start the bridge worker manually and retry");
        }
        orchestrator.supervisor().kill_all().await;
        std::process::exit(1);
    }

    let shutdown_sender = orchestrator.get_shutdown_sender();
    tokio::spawn(async move {
        shutdown_signal().await;
        logging::log_shutdown(Component::Orchestrator, "Received termination signal");
        let _ = shutdown_sender.send(()).await;
    });

    orchestrator.run().await?;

    logging::log_success(Component::Orchestrator, "Orchestrator stopped gracefully");
    Ok(())
}
