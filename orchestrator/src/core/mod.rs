//! Core bookkeeping modules
//!
//! Pure state with no I/O dependencies; deterministic and directly testable.

pub mod retry;
pub mod state;

pub use retry::RetryState;
pub use state::{MonitorState, TickReport};
