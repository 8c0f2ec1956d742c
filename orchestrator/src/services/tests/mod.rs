//! Service-specific tests
//!
//! Supervisor tests spawn real `sh` scripts as stand-in workers and point the
//! readiness probe at a wiremock server.


// Common test utilities for services
pub mod common {
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::path;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::{SupervisorSettings, WorkerCommand};
    use crate::services::{ManagedProcess, ProcessRegistry, RealProcessSupervisor};
    use shared::{BridgeClient, ServiceEndpointConfig};

    pub const TEST_WORKER: &str = "test-bridge";

    /// Health endpoint that always answers with `status`
    pub async fn health_server(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(path("/health"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        server
    }

    /// Settings with every delay shrunk for tests
    pub fn fast_settings(command: WorkerCommand, max_attempts: u32) -> SupervisorSettings {
        SupervisorSettings {
            name: TEST_WORKER.to_string(),
            command,
            max_attempts,
            retry_delay: Duration::from_millis(10),
            startup_timeout: Duration::from_secs(3),
            warmup_delay: Duration::from_millis(50),
            probe_interval: Duration::from_millis(50),
            kill_grace: Duration::from_millis(500),
            exit_drain: Duration::from_millis(300),
            ..SupervisorSettings::default()
        }
    }

    pub fn sh(script: impl Into<String>) -> WorkerCommand {
        WorkerCommand::new("sh").with_args(["-c".to_string(), script.into()])
    }

    /// Script fragment that appends a line to `counter` on every spawn
    pub fn count_spawn(counter: &Path) -> String {
        format!("echo spawn >> '{}'", counter.display())
    }

    pub fn spawn_count(counter: &Path) -> usize {
        std::fs::read_to_string(counter)
            .map(|s| s.lines().count())
            .unwrap_or(0)
    }

    /// Register a live `sleep 30` under the worker name and return its PID
    pub async fn register_sleeper(registry: &ProcessRegistry) -> u32 {
        let child = tokio::process::Command::new("sh")
            .arg("-c")
            .arg("sleep 30")
            .kill_on_drop(true)
            .spawn()
            .expect("sh is available");
        let process = ManagedProcess::new(TEST_WORKER, child);
        let pid = process.pid().expect("running child has a pid");
        assert!(registry.register(process).await.is_none());
        pid
    }

    /// Whether a process with `pid` still exists (terminated children are reaped)
    #[cfg(unix)]
    pub fn pid_alive(pid: u32) -> bool {
        use nix::sys::signal::kill;
        use nix::unistd::Pid;
        kill(Pid::from_raw(pid as i32), None).is_ok()
    }

    pub fn supervisor(server: &MockServer, settings: SupervisorSettings) -> RealProcessSupervisor {
        supervisor_with_registry(server, settings, Arc::new(ProcessRegistry::new()))
    }

    pub fn supervisor_with_registry(
        server: &MockServer,
        settings: SupervisorSettings,
        registry: Arc<ProcessRegistry>,
    ) -> RealProcessSupervisor {
        let config = ServiceEndpointConfig::builder()
            .worker_origin(server.uri())
            .request_timeout(Duration::from_millis(500))
            .build();
        let client = Arc::new(BridgeClient::new(config).expect("client builds"));
        RealProcessSupervisor::new(client, registry, settings)
    }
}
