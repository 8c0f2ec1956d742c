//! Forwarding of worker stdout/stderr into the orchestrator's logs
//!
//! Every line is logged under the `worker` component. Stderr lines are also
//! matched against the readiness patterns and reported on a channel; the
//! channel closes when the worker's stderr reaches EOF.

use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

use shared::{process_info, process_warn, Component};

use crate::config::ReadinessPatterns;
use crate::traits::Readiness;

/// Readiness observation taken from a worker stderr line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessSignal {
    WaitingForDependency,
    AddressInUse,
}

impl From<ReadinessSignal> for Readiness {
    fn from(signal: ReadinessSignal) -> Self {
        match signal {
            ReadinessSignal::WaitingForDependency => Readiness::DegradedWiring,
            ReadinessSignal::AddressInUse => Readiness::AlreadyRunningElsewhere,
        }
    }
}

/// Pipe the worker's output so it can be forwarded and scanned
pub fn configure_child_stdio(cmd: &mut Command) {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).stdin(Stdio::null());
}

/// Match one stderr line against the readiness patterns
pub fn classify_line(line: &str, patterns: &ReadinessPatterns) -> Option<ReadinessSignal> {
    let line = line.to_lowercase();
    let matches_any = |candidates: &[String]| candidates.iter().any(|p| line.contains(&p.to_lowercase()));

    if matches_any(&patterns.address_in_use) {
        Some(ReadinessSignal::AddressInUse)
    } else if matches_any(&patterns.waiting_for_dependency) {
        Some(ReadinessSignal::WaitingForDependency)
    } else {
        None
    }
}

/// Spawn tasks that forward the child's output for its whole lifetime
pub fn spawn_output_forwarders(
    child: &mut Child,
    process_name: &str,
    patterns: &ReadinessPatterns,
) -> mpsc::UnboundedReceiver<ReadinessSignal> {
    let (tx, rx) = mpsc::unbounded_channel();

    if let Some(stdout) = child.stdout.take() {
        let name = process_name.to_string();
        tokio::spawn(forward_lines(stdout, move |line| {
            process_info!(Component::Worker, "[{}] {}", name, line);
        }));
    }

    if let Some(stderr) = child.stderr.take() {
        let name = process_name.to_string();
        let patterns = patterns.clone();
        tokio::spawn(forward_lines(stderr, move |line| {
            process_warn!(Component::Worker, "[{}] {}", name, line);
            if let Some(signal) = classify_line(line, &patterns) {
                // Receiver is gone once startup has finished
                let _ = tx.send(signal);
            }
        }));
    }

    rx
}

async fn forward_lines<R, F>(stream: R, mut on_line: F)
where
    R: AsyncRead + Unpin,
    F: FnMut(&str),
{
    let mut lines = BufReader::new(stream).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        on_line(&line);
    }
}
