//! Terminal front end: line-based rendering and the terminal bell.

use std::io::{IsTerminal, Write};

use countdown_core::{Chime, ChimeError, Frame, Toast, View};

pub struct TerminalView {
    json: bool,
    last: Option<Frame>,
}

impl TerminalView {
    pub fn new(json: bool) -> Self {
        Self { json, last: None }
    }
}

fn flag(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

impl View for TerminalView {
    fn render(&mut self, frame: &Frame) {
        if self.last.as_ref() == Some(frame) {
            return;
        }
        self.last = Some(frame.clone());

        if self.json {
            match serde_json::to_string(frame) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("cannot serialize frame: {e}"),
            }
            return;
        }

        let controls = &frame.controls;
        println!(
            "[{}]  {:>2}m {:>2}s  {:<40} start:{} {}:{} reset:{}",
            frame.display,
            frame.inputs.minutes,
            frame.inputs.seconds,
            frame.status,
            flag(controls.start),
            controls.pause_label.as_str().to_lowercase(),
            flag(controls.pause),
            flag(controls.reset),
        );
    }

    fn show_notification(&mut self, toast: &Toast) {
        if self.json {
            if let Ok(line) = serde_json::to_string(toast) {
                println!("{line}");
            }
            return;
        }
        println!(
            "*** {} {} (type 'dismiss {}' to close) ***",
            toast.title, toast.body, toast.id
        );
    }

    fn dismiss_notification(&mut self, toast: &Toast) {
        tracing::debug!(id = toast.id, "toast dismissed");
    }
}

/// Rings the terminal bell on stderr.
pub struct TerminalBell;

impl Chime for TerminalBell {
    fn play(&mut self) -> Result<(), ChimeError> {
        let mut stderr = std::io::stderr();
        if !stderr.is_terminal() {
            return Err(ChimeError::Unavailable);
        }
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}
