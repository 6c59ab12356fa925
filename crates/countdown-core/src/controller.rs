//! Countdown controller: the thin adapter between the engine and the outside.
//!
//! The engine decides *what* happens; the controller performs the effects:
//! it keeps the ticker in step with the phase, rewrites the display and the
//! duration inputs, flips control enablement, raises the expiry toast and
//! plays the chime. Rendering and audio sit behind the [`View`] and
//! [`Chime`] traits so front ends (and tests) can plug in.

use serde::Serialize;
use tokio::time::Instant;

use crate::error::ChimeError;
use crate::events::Event;
use crate::notify::{Notifications, Toast, ToastId, EXPIRED_BODY, EXPIRED_TITLE};
use crate::storage::{find_preset, Config, Preset};
use crate::timer::{format_mmss, CountdownEngine, DurationInput, Phase, Ticker};

pub const STATUS_READY: &str = "Ready.";
pub const STATUS_RUNNING: &str = "Timer running...";
pub const STATUS_PAUSED: &str = "Timer paused.";
pub const STATUS_RESUMED: &str = "Here we go again!";
pub const STATUS_EXPIRED: &str = "Time's up!";
pub const STATUS_PRESET: &str = "Time set. Press Start!";

/// Renders controller state. Called after every accepted command or tick.
pub trait View {
    fn render(&mut self, frame: &Frame);

    fn show_notification(&mut self, toast: &Toast);

    fn dismiss_notification(&mut self, toast: &Toast);
}

/// Audible expiry cue.
pub trait Chime {
    fn play(&mut self) -> Result<(), ChimeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PauseLabel {
    Pause,
    Resume,
}

impl PauseLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PauseLabel::Pause => "Pause",
            PauseLabel::Resume => "Resume",
        }
    }
}

/// Enabled/disabled state of the buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub start: bool,
    pub pause: bool,
    pub pause_label: PauseLabel,
    pub reset: bool,
}

impl Controls {
    fn idle(reset: bool) -> Self {
        Self {
            start: true,
            pause: false,
            pause_label: PauseLabel::Pause,
            reset,
        }
    }

    fn running() -> Self {
        Self {
            start: false,
            pause: true,
            pause_label: PauseLabel::Pause,
            reset: true,
        }
    }

    fn paused() -> Self {
        Self {
            start: true,
            pause: true,
            pause_label: PauseLabel::Resume,
            reset: true,
        }
    }
}

/// Everything a view needs to draw one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub phase: Phase,
    pub display: String,
    pub inputs: DurationInput,
    pub status: String,
    pub controls: Controls,
}

/// User input to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetMinutes(String),
    SetSeconds(String),
    Start,
    /// The Pause/Resume button.
    Pause,
    Reset,
    /// A preset label from config, or a raw number of seconds.
    Preset(String),
    /// Dismiss a toast by id, or the most recent one.
    Dismiss(Option<ToastId>),
    /// Re-render and report a snapshot.
    Status,
    Quit,
}

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub presets: Vec<Preset>,
    pub notifications: bool,
    pub chime: bool,
    pub initial_input: DurationInput,
    pub toast_timeout: std::time::Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            presets: config.presets.clone(),
            notifications: config.notifications.enabled,
            chime: config.notifications.chime,
            initial_input: DurationInput::new(
                config.defaults.minutes.to_string(),
                config.defaults.seconds.to_string(),
            ),
            toast_timeout: config.toast_timeout(),
        }
    }
}

pub struct Controller<V, C> {
    engine: CountdownEngine,
    ticker: Ticker,
    notifications: Notifications,
    frame: Frame,
    settings: ControllerSettings,
    view: V,
    chime: C,
}

impl<V: View, C: Chime> Controller<V, C> {
    pub fn new(view: V, chime: C, settings: ControllerSettings) -> Self {
        let frame = Frame {
            phase: Phase::Idle,
            display: format_mmss(0),
            inputs: settings.initial_input.clone(),
            status: STATUS_READY.to_string(),
            controls: Controls::idle(false),
        };
        Self {
            engine: CountdownEngine::new(),
            ticker: Ticker::default(),
            notifications: Notifications::new(settings.toast_timeout),
            frame,
            settings,
            view,
            chime,
        }
    }

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn ticker_mut(&mut self) -> &mut Ticker {
        &mut self.ticker
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Draw the current frame without changing anything.
    pub fn render(&mut self) {
        self.view.render(&self.frame);
    }

    /// Apply one user command. Returns the resulting event, if any.
    pub fn handle(&mut self, command: Command, now: Instant) -> Option<Event> {
        let event = match command {
            Command::SetMinutes(text) => {
                self.frame.inputs.minutes = text;
                self.render();
                return None;
            }
            Command::SetSeconds(text) => {
                self.frame.inputs.seconds = text;
                self.render();
                return None;
            }
            Command::Start => self.engine.start(self.frame.inputs.total_secs()),
            Command::Pause => self.engine.toggle_pause(),
            Command::Reset => Some(self.engine.reset()),
            Command::Preset(value) => match find_preset(&self.settings.presets, &value) {
                Some(preset) => Some(self.engine.select_preset(preset.seconds)),
                None => self.engine.select_preset_text(&value),
            },
            Command::Dismiss(Some(id)) => {
                self.dismiss_toast(id);
                return None;
            }
            Command::Dismiss(None) => {
                if let Some(toast) = self.notifications.dismiss_latest() {
                    self.view.dismiss_notification(&toast);
                }
                return None;
            }
            Command::Status => {
                self.render();
                return Some(self.engine.snapshot());
            }
            Command::Quit => return None,
        };

        if let Some(ref event) = event {
            self.apply(event, now);
        }
        event
    }

    /// Advance the countdown by one tick.
    pub fn on_tick(&mut self, now: Instant) -> Option<Event> {
        let event = self.engine.tick()?;
        self.apply(&event, now);
        Some(event)
    }

    /// Auto-dismiss toasts whose deadline has passed.
    pub fn expire_toasts(&mut self, now: Instant) {
        for toast in self.notifications.expire(now) {
            self.view.dismiss_notification(&toast);
        }
    }

    pub fn dismiss_toast(&mut self, id: ToastId) -> bool {
        match self.notifications.dismiss(id) {
            Some(toast) => {
                self.view.dismiss_notification(&toast);
                true
            }
            None => false,
        }
    }

    pub fn dismiss_all_toasts(&mut self) {
        while let Some(toast) = self.notifications.dismiss_latest() {
            self.view.dismiss_notification(&toast);
        }
    }

    pub fn next_toast_deadline(&self) -> Option<Instant> {
        self.notifications.next_deadline()
    }

    fn apply(&mut self, event: &Event, now: Instant) {
        match event {
            Event::CountdownStarted { .. } => {
                self.ticker.start();
                self.set_time(self.engine.remaining_secs());
                self.frame.controls = Controls::running();
                self.frame.status = STATUS_RUNNING.to_string();
            }
            Event::StartRejected { message, .. } => {
                // A paused countdown keeps showing its remaining time.
                if matches!(self.engine.phase(), Phase::Idle | Phase::Expired) {
                    self.frame.display = format_mmss(0);
                }
                self.frame.status = message.clone();
            }
            Event::CountdownPaused { .. } => {
                self.ticker.stop();
                self.frame.controls = Controls::paused();
                self.frame.status = STATUS_PAUSED.to_string();
            }
            Event::CountdownResumed { .. } => {
                self.ticker.start();
                self.set_time(self.engine.remaining_secs());
                self.frame.controls = Controls::running();
                self.frame.status = STATUS_RESUMED.to_string();
            }
            Event::Ticked { remaining_secs, .. } => {
                self.set_time(*remaining_secs);
            }
            Event::CountdownExpired { .. } => {
                self.ticker.stop();
                self.set_time(0);
                self.frame.controls = Controls::idle(true);
                self.frame.status = STATUS_EXPIRED.to_string();
                self.frame.phase = self.engine.phase();
                self.view.render(&self.frame);
                self.announce_expiry(now);
                return;
            }
            Event::CountdownReset { remaining_secs, .. } => {
                self.ticker.stop();
                self.set_time(*remaining_secs);
                self.frame.controls = Controls::idle(false);
                self.frame.status = STATUS_READY.to_string();
            }
            Event::PresetSelected { secs, .. } => {
                self.ticker.stop();
                self.set_time(*secs);
                self.frame.controls = Controls::idle(true);
                self.frame.status = STATUS_PRESET.to_string();
            }
            Event::StateSnapshot { .. } => {}
        }
        self.frame.phase = self.engine.phase();
        self.view.render(&self.frame);
    }

    fn set_time(&mut self, secs: u32) {
        self.frame.display = format_mmss(secs);
        self.frame.inputs = DurationInput::from_secs(secs);
    }

    fn announce_expiry(&mut self, now: Instant) {
        if self.settings.notifications {
            let toast = self.notifications.show(now, EXPIRED_TITLE, EXPIRED_BODY);
            self.view.show_notification(&toast);
        }
        if self.settings.chime {
            if let Err(e) = self.chime.play() {
                tracing::warn!("chime could not be played: {e}");
            }
        }
    }
}
