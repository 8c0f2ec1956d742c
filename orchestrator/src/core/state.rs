//! Sampling-loop state: previous status and the failure streak
//!
//! Pure bookkeeping with no I/O so the transition rules can be tested directly.

use shared::ServiceStatus;

/// What one observed sample did to the monitor state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub status: ServiceStatus,
    /// Status differs from the previous sample in at least one field
    pub changed: bool,
    /// The sampling pass itself failed and was recorded as all-down
    pub sample_failed: bool,
    /// Streak after this tick, already reset if reconnection was triggered
    pub failure_streak: u32,
    pub trigger_reconnect: bool,
}

impl TickReport {
    /// Single-line live status printed on every tick
    pub fn readout(&self) -> String {
        let marker = if self.changed { "🔄" } else { "📊" };
        let mut line = format!("{} {}", marker, self.status);
        if self.sample_failed {
            line.push_str(" | sampling failed");
        }
        if self.failure_streak > 0 {
            line.push_str(&format!(" | degraded x{}", self.failure_streak));
        }
        line
    }
}

/// Previous status plus the consecutive-degraded counter
#[derive(Debug, Clone)]
pub struct MonitorState {
    previous: Option<ServiceStatus>,
    failure_streak: u32,
    threshold: u32,
}

impl MonitorState {
    pub fn new(threshold: u32) -> Self {
        Self {
            previous: None,
            failure_streak: 0,
            threshold: threshold.max(1),
        }
    }

    pub fn previous(&self) -> Option<ServiceStatus> {
        self.previous
    }

    pub fn failure_streak(&self) -> u32 {
        self.failure_streak
    }

    /// Record one sampling pass; `None` means the pass raised
    pub fn observe(&mut self, sample: Option<ServiceStatus>) -> TickReport {
        let sample_failed = sample.is_none();
        let status = sample.unwrap_or_else(ServiceStatus::all_down);
        let changed = self.previous != Some(status);

        // A healthy sample always wins over any increment
        if status.is_healthy() {
            self.failure_streak = 0;
        } else {
            self.failure_streak += 1;
        }

        let trigger_reconnect = self.failure_streak >= self.threshold;
        if trigger_reconnect {
            self.failure_streak = 0;
        }

        self.previous = Some(status);

        TickReport {
            status,
            changed,
            sample_failed,
            failure_streak: self.failure_streak,
            trigger_reconnect,
        }
    }
}
