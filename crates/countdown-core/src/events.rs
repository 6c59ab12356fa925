use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every state change of the countdown produces an Event.
/// The controller turns events into display updates, chimes and toasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CountdownStarted {
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// Start was pressed with a zero duration; nothing changed.
    StartRejected {
        message: String,
        at: DateTime<Utc>,
    },
    CountdownPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    CountdownResumed {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    Ticked {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    CountdownExpired {
        initial_secs: u32,
        at: DateTime<Utc>,
    },
    CountdownReset {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    PresetSelected {
        secs: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        initial_secs: u32,
        remaining_secs: u32,
        display: String,
        at: DateTime<Utc>,
    },
}
