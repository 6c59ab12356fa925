//! Countdown engine implementation.
//!
//! The engine is a pure state machine over whole seconds. It owns no timer:
//! the caller drives it with `tick()` once per second while it is running
//! (see [`super::Ticker`]) and performs any side effects named by the
//! returned [`Event`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle/Paused/Expired --start--> Running --tick(0)--> Expired
//! Running <--pause/resume--> Paused
//! any --reset/preset--> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CountdownEngine::new();
//! engine.start(90);
//! // Once per second:
//! engine.tick(); // Returns Some(Event::CountdownExpired) on the tick after zero
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::duration::{format_mmss, parse_preset_secs};
use crate::events::Event;

pub const ZERO_DURATION_MESSAGE: &str = "Please enter a time greater than 0.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    /// Counted down to zero. Ticking has stopped.
    Expired,
}

/// Core countdown engine.
///
/// Invariant: `remaining_secs <= initial_secs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownEngine {
    phase: Phase,
    /// Duration last configured by Start or a preset.
    initial_secs: u32,
    remaining_secs: u32,
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownEngine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            initial_secs: 0,
            remaining_secs: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn initial_secs(&self) -> u32 {
        self.initial_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Whether a ticker should currently be scheduled.
    pub fn is_ticking(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn display(&self) -> String {
        format_mmss(self.remaining_secs)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            initial_secs: self.initial_secs,
            remaining_secs: self.remaining_secs,
            display: self.display(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start counting down from `duration_secs`.
    ///
    /// Ignored while already running. A zero duration leaves the phase
    /// untouched and reports [`Event::StartRejected`].
    pub fn start(&mut self, duration_secs: u32) -> Option<Event> {
        match self.phase {
            Phase::Running => None,
            _ if duration_secs == 0 => Some(Event::StartRejected {
                message: ZERO_DURATION_MESSAGE.to_string(),
                at: Utc::now(),
            }),
            _ => {
                self.initial_secs = duration_secs;
                self.remaining_secs = duration_secs;
                self.phase = Phase::Running;
                tracing::debug!(duration_secs, "countdown started");
                Some(Event::CountdownStarted {
                    duration_secs,
                    at: Utc::now(),
                })
            }
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.phase {
            Phase::Running => {
                self.phase = Phase::Paused;
                tracing::debug!(remaining_secs = self.remaining_secs, "countdown paused");
                Some(Event::CountdownPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    pub fn resume(&mut self) -> Option<Event> {
        match self.phase {
            Phase::Paused => {
                self.phase = Phase::Running;
                tracing::debug!(remaining_secs = self.remaining_secs, "countdown resumed");
                Some(Event::CountdownResumed {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// The Pause/Resume button: pauses when running, resumes when paused.
    pub fn toggle_pause(&mut self) -> Option<Event> {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            Phase::Idle | Phase::Expired => None,
        }
    }

    /// Call once per second. Returns `Some(Event::CountdownExpired)` on the
    /// tick that finds the countdown already at zero; has no effect unless
    /// running.
    pub fn tick(&mut self) -> Option<Event> {
        if self.phase != Phase::Running {
            return None;
        }
        if self.remaining_secs == 0 {
            self.phase = Phase::Expired;
            tracing::info!(initial_secs = self.initial_secs, "countdown expired");
            return Some(Event::CountdownExpired {
                initial_secs: self.initial_secs,
                at: Utc::now(),
            });
        }
        self.remaining_secs -= 1;
        Some(Event::Ticked {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Back to Idle with the last configured duration (0 if none).
    pub fn reset(&mut self) -> Event {
        self.phase = Phase::Idle;
        self.remaining_secs = self.initial_secs;
        tracing::debug!(remaining_secs = self.remaining_secs, "countdown reset");
        Event::CountdownReset {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Load a preset duration. Cancels any countdown; Start is required
    /// to begin.
    pub fn select_preset(&mut self, secs: u32) -> Event {
        self.phase = Phase::Idle;
        self.initial_secs = secs;
        self.remaining_secs = secs;
        tracing::debug!(secs, "preset selected");
        Event::PresetSelected {
            secs,
            at: Utc::now(),
        }
    }

    /// Preset from its text value. Unparseable values are ignored.
    pub fn select_preset_text(&mut self, text: &str) -> Option<Event> {
        match parse_preset_secs(text) {
            Some(secs) => Some(self.select_preset(secs)),
            None => {
                tracing::debug!(value = text, "ignoring unparseable preset");
                None
            }
        }
    }
}
