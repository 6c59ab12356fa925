//! Single-task event loop driving a [`Controller`].
//!
//! User commands, the one-second ticker and toast deadlines are multiplexed
//! with `tokio::select!` on one task, so transitions never run concurrently.

use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use crate::controller::{Chime, Command, Controller, View};
use crate::events::Event;
use crate::timer::Phase;

pub struct Session<V, C> {
    controller: Controller<V, C>,
    exit_on_expire: bool,
    events: Option<mpsc::UnboundedSender<Event>>,
}

impl<V: View, C: Chime> Session<V, C> {
    pub fn new(controller: Controller<V, C>) -> Self {
        Self {
            controller,
            exit_on_expire: false,
            events: None,
        }
    }

    /// End the session once the countdown expires. Closing the command
    /// channel then no longer ends a running countdown early.
    pub fn exit_on_expire(mut self, enabled: bool) -> Self {
        self.exit_on_expire = enabled;
        self
    }

    /// Forward every produced event (including status snapshots).
    pub fn with_event_sink(mut self, sink: mpsc::UnboundedSender<Event>) -> Self {
        self.events = Some(sink);
        self
    }

    /// Run until `Quit`, until the command channel closes, or until expiry
    /// when `exit_on_expire` is set. Returns the controller in its final state.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> Controller<V, C> {
        let mut commands_open = true;
        self.controller.render();

        loop {
            let deadline = self.controller.next_toast_deadline();

            tokio::select! {
                command = commands.recv(), if commands_open => match command {
                    Some(Command::Quit) => break,
                    Some(command) => {
                        let event = self.controller.handle(command, Instant::now());
                        self.emit(event);
                    }
                    None => {
                        commands_open = false;
                        let waiting = self.exit_on_expire && self.controller.engine().is_ticking();
                        if !waiting {
                            break;
                        }
                    }
                },
                _ = self.controller.ticker_mut().tick() => {
                    let event = self.controller.on_tick(Instant::now());
                    self.emit(event);
                    if self.exit_on_expire && self.controller.engine().phase() == Phase::Expired {
                        self.controller.dismiss_all_toasts();
                        break;
                    }
                },
                _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.controller.expire_toasts(Instant::now());
                },
            }

            if !commands_open && !self.controller.engine().is_ticking() {
                break;
            }
        }

        tracing::debug!(phase = ?self.controller.engine().phase(), "session finished");
        self.controller
    }

    fn emit(&self, event: Option<Event>) {
        if let (Some(sink), Some(event)) = (&self.events, event) {
            // A dropped receiver only means nobody is listening anymore.
            let _ = sink.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ControllerSettings, Frame};
    use crate::error::ChimeError;
    use crate::notify::Toast;
    use std::time::Duration;

    #[derive(Default)]
    struct NullView {
        toasts_shown: usize,
        toasts_dismissed: usize,
    }

    impl View for NullView {
        fn render(&mut self, _frame: &Frame) {}

        fn show_notification(&mut self, _toast: &Toast) {
            self.toasts_shown += 1;
        }

        fn dismiss_notification(&mut self, _toast: &Toast) {
            self.toasts_dismissed += 1;
        }
    }

    struct NoChime;

    impl Chime for NoChime {
        fn play(&mut self) -> Result<(), ChimeError> {
            Err(ChimeError::Unavailable)
        }
    }

    fn session() -> Session<NullView, NoChime> {
        Session::new(Controller::new(
            NullView::default(),
            NoChime,
            ControllerSettings::default(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn counts_down_in_real_seconds_and_exits_on_expiry() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(Command::SetSeconds("3".into())).await.unwrap();
        tx.send(Command::Start).await.unwrap();
        drop(tx);

        let begin = Instant::now();
        let controller = session().exit_on_expire(true).run(rx).await;
        assert_eq!(controller.engine().phase(), Phase::Expired);
        // Three decrements plus the tick that observes zero.
        assert_eq!(begin.elapsed(), Duration::from_secs(4));
        assert_eq!(controller.view().toasts_shown, 1);
        assert_eq!(controller.view().toasts_dismissed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_interval_loses_no_time() {
        let (tx, rx) = mpsc::channel(8);
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(
            session()
                .exit_on_expire(true)
                .with_event_sink(events_tx)
                .run(rx),
        );

        tx.send(Command::SetSeconds("5".into())).await.unwrap();
        tx.send(Command::Start).await.unwrap();
        time::sleep(Duration::from_millis(2500)).await;
        tx.send(Command::Pause).await.unwrap();
        time::sleep(Duration::from_secs(60)).await;
        tx.send(Command::Status).await.unwrap();
        tx.send(Command::Quit).await.unwrap();

        let controller = handle.await.unwrap();
        assert_eq!(controller.engine().phase(), Phase::Paused);
        assert_eq!(controller.engine().remaining_secs(), 3);

        let mut last_snapshot = None;
        while let Ok(event) = events_rx.try_recv() {
            if let Event::StateSnapshot { remaining_secs, .. } = event {
                last_snapshot = Some(remaining_secs);
            }
        }
        assert_eq!(last_snapshot, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn toast_auto_dismisses_while_session_runs() {
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(session().run(rx));

        tx.send(Command::SetSeconds("1".into())).await.unwrap();
        tx.send(Command::Start).await.unwrap();
        time::sleep(Duration::from_millis(2100)).await;
        time::sleep(Duration::from_millis(4600)).await;
        tx.send(Command::Quit).await.unwrap();

        let controller = handle.await.unwrap();
        assert_eq!(controller.engine().phase(), Phase::Expired);
        assert_eq!(controller.view().toasts_shown, 1);
        assert_eq!(controller.view().toasts_dismissed, 1);
        assert!(controller.notifications().live().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn closed_channel_ends_idle_session() {
        let (tx, rx) = mpsc::channel(1);
        drop(tx);
        let controller = session().run(rx).await;
        assert_eq!(controller.engine().phase(), Phase::Idle);
    }
}
