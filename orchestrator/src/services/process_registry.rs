//! Registry of supervised OS processes
//!
//! Owned by the supervisor and injected at construction. Holds at most one
//! entry per name; registering over an existing name hands back the stale
//! entry so the caller can terminate it.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::process::Child;
use tokio::sync::Mutex;

use shared::{process_debug, Component};

/// One supervised process
#[derive(Debug)]
pub struct ManagedProcess {
    name: String,
    child: Child,
    pid: Option<u32>,
    spawned_at: DateTime<Utc>,
    started: Instant,
}

/// Handle-free view of a registry entry for status reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSnapshot {
    pub name: String,
    pub pid: Option<u32>,
    pub spawned_at: DateTime<Utc>,
    pub uptime: Duration,
    pub running: bool,
}

impl ManagedProcess {
    pub fn new(name: impl Into<String>, child: Child) -> Self {
        let pid = child.id();
        Self {
            name: name.into(),
            child,
            pid,
            spawned_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Check if the process is still running
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    fn snapshot(&mut self) -> ProcessSnapshot {
        ProcessSnapshot {
            name: self.name.clone(),
            pid: self.pid,
            spawned_at: self.spawned_at,
            uptime: self.started.elapsed(),
            running: self.is_running(),
        }
    }

    /// Stop the process: SIGTERM, then a forced kill once `grace` elapses
    ///
    /// A process that has already exited is not an error.
    pub async fn terminate(mut self, grace: Duration) {
        if !self.is_running() {
            process_debug!(Component::Supervisor, "{} (PID {:?}) already exited", self.name, self.pid);
            return;
        }

        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            if let Some(pid) = self.pid {
                if kill(Pid::from_raw(pid as i32), Signal::SIGTERM).is_ok()
                    && tokio::time::timeout(grace, self.child.wait()).await.is_ok()
                {
                    process_debug!(Component::Supervisor, "🛑 {} (PID {}) stopped on SIGTERM", self.name, pid);
                    return;
                }
            }
        }
        #[cfg(not(unix))]
        let _ = grace;

        let _ = self.child.kill().await;
        process_debug!(Component::Supervisor, "🛑 {} (PID {:?}) killed", self.name, self.pid);
    }
}

/// Name-keyed map of managed processes
#[derive(Debug, Default)]
pub struct ProcessRegistry {
    entries: Mutex<HashMap<String, ManagedProcess>>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a process, returning any stale entry it replaced
    pub async fn register(&self, process: ManagedProcess) -> Option<ManagedProcess> {
        let mut entries = self.entries.lock().await;
        entries.insert(process.name.clone(), process)
    }

    pub async fn remove(&self, name: &str) -> Option<ManagedProcess> {
        self.entries.lock().await.remove(name)
    }

    pub async fn drain(&self) -> Vec<ManagedProcess> {
        self.entries.lock().await.drain().map(|(_, process)| process).collect()
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.entries.lock().await.contains_key(name)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Point-in-time view of every entry, sorted by name
    pub async fn snapshot(&self) -> Vec<ProcessSnapshot> {
        let mut entries = self.entries.lock().await;
        let mut snapshots: Vec<_> = entries.values_mut().map(ManagedProcess::snapshot).collect();
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        snapshots
    }
}
