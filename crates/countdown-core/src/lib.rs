//! # Countdown Core Library
//!
//! This library provides the core logic for the Countdown timer. Front ends
//! (the `countdown-cli` binary) are thin layers over it.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: a whole-second state machine the caller drives
//!   with `tick()`
//! - **Ticker**: the single cancellable one-second tick source
//! - **Controller**: applies engine events to a [`View`] and a [`Chime`]
//! - **Session**: the `tokio::select!` loop tying commands, ticks and toast
//!   deadlines together
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: Core countdown state machine
//! - [`Controller`]: Side-effect adapter
//! - [`Session`]: Event loop
//! - [`Config`]: Application configuration management

pub mod controller;
pub mod error;
pub mod events;
pub mod notify;
pub mod session;
pub mod storage;
pub mod timer;

pub use controller::{Chime, Command, Controller, ControllerSettings, Controls, Frame, PauseLabel, View};
pub use error::{ChimeError, ConfigError, CoreError};
pub use events::Event;
pub use notify::{Notifications, Toast, ToastId};
pub use session::Session;
pub use storage::{Config, Preset};
pub use timer::{format_mmss, CountdownEngine, DurationInput, Phase, Ticker};
