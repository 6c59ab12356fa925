//! End-to-end tests for the countdown controller and session.
//!
//! These drive the public API only, with tokio's paused clock standing in
//! for wall time.

use std::time::Duration;

use countdown_core::{
    Chime, ChimeError, Command, Controller, ControllerSettings, Event, Frame, Phase, Preset,
    Session, Toast, View,
};
use tokio::sync::mpsc;
use tokio::time::{self, Instant};

#[derive(Default)]
struct Recorder {
    displays: Vec<String>,
    toasts: usize,
}

impl View for Recorder {
    fn render(&mut self, frame: &Frame) {
        if self.displays.last() != Some(&frame.display) {
            self.displays.push(frame.display.clone());
        }
    }

    fn show_notification(&mut self, _toast: &Toast) {
        self.toasts += 1;
    }

    fn dismiss_notification(&mut self, _toast: &Toast) {}
}

struct Mute;

impl Chime for Mute {
    fn play(&mut self) -> Result<(), ChimeError> {
        Ok(())
    }
}

fn settings() -> ControllerSettings {
    ControllerSettings {
        presets: vec![Preset::new("tea", 180), Preset::new("five", 300)],
        ..ControllerSettings::default()
    }
}

#[tokio::test(start_paused = true)]
async fn ninety_seconds_display_and_reset() {
    let mut controller = Controller::new(Recorder::default(), Mute, settings());
    let now = Instant::now();
    controller.handle(Command::SetMinutes("1".into()), now);
    controller.handle(Command::SetSeconds("30".into()), now);
    controller.handle(Command::Start, now);
    assert_eq!(controller.frame().display, "01:30");

    for _ in 0..30 {
        controller.ticker_mut().tick().await;
        controller.on_tick(Instant::now());
    }
    assert_eq!(controller.frame().display, "01:00");
    assert_eq!(controller.frame().inputs.minutes, "01");
    assert_eq!(controller.frame().inputs.seconds, "00");

    controller.handle(Command::Reset, Instant::now());
    assert_eq!(controller.frame().display, "01:30");
    assert_eq!(controller.engine().phase(), Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn preset_while_running_requires_new_start() {
    let (tx, rx) = mpsc::channel(8);
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let session = Session::new(Controller::new(Recorder::default(), Mute, settings()))
        .with_event_sink(events_tx);
    let handle = tokio::spawn(session.run(rx));

    tx.send(Command::SetSeconds("20".into())).await.unwrap();
    tx.send(Command::Start).await.unwrap();
    time::sleep(Duration::from_millis(3500)).await;
    tx.send(Command::Preset("300".into())).await.unwrap();
    time::sleep(Duration::from_secs(10)).await;
    tx.send(Command::Quit).await.unwrap();

    let controller = handle.await.unwrap();
    assert_eq!(controller.engine().phase(), Phase::Idle);
    assert_eq!(controller.engine().remaining_secs(), 300);
    assert_eq!(controller.engine().initial_secs(), 300);

    let mut ticks = 0;
    while let Ok(event) = events_rx.try_recv() {
        if matches!(event, Event::Ticked { .. }) {
            ticks += 1;
        }
    }
    assert_eq!(ticks, 3);
}

#[tokio::test(start_paused = true)]
async fn full_run_fires_one_toast() {
    let (tx, rx) = mpsc::channel(8);
    tx.send(Command::Preset("tea".into())).await.unwrap();
    tx.send(Command::Start).await.unwrap();
    drop(tx);

    let begin = Instant::now();
    let controller = Session::new(Controller::new(Recorder::default(), Mute, settings()))
        .exit_on_expire(true)
        .run(rx)
        .await;

    assert_eq!(begin.elapsed(), Duration::from_secs(181));
    assert_eq!(controller.engine().phase(), Phase::Expired);
    assert_eq!(controller.view().toasts, 1);
    assert_eq!(controller.view().displays.first().map(String::as_str), Some("00:00"));
    assert_eq!(controller.view().displays.last().map(String::as_str), Some("00:00"));
    assert!(controller.view().displays.contains(&"03:00".to_string()));
}

#[tokio::test(start_paused = true)]
async fn restarting_does_not_double_tick() {
    let (tx, rx) = mpsc::channel(8);
    let handle = tokio::spawn(
        Session::new(Controller::new(Recorder::default(), Mute, settings())).run(rx),
    );

    tx.send(Command::SetSeconds("30".into())).await.unwrap();
    tx.send(Command::Start).await.unwrap();
    time::sleep(Duration::from_millis(1500)).await;
    tx.send(Command::Pause).await.unwrap();
    tx.send(Command::Pause).await.unwrap();
    tx.send(Command::Pause).await.unwrap();
    tx.send(Command::Pause).await.unwrap();
    time::sleep(Duration::from_millis(5200)).await;
    tx.send(Command::Quit).await.unwrap();

    let controller = handle.await.unwrap();
    // One tick before the pause toggles, five after the final resume.
    assert_eq!(controller.engine().remaining_secs(), 24);
    assert_eq!(controller.engine().phase(), Phase::Running);
}
