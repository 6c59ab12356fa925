//! Cancellable one-second tick source.
//!
//! At most one interval exists at a time. Starting replaces the previous
//! interval, stopping drops it, so two tick streams can never overlap.

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    /// (Re)schedule ticking. The first tick fires one full period from now.
    pub fn start(&mut self) {
        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    pub fn stop(&mut self) {
        self.interval = None;
    }

    /// Wait for the next tick. Pends forever while stopped, which makes it
    /// safe to use as a `tokio::select!` branch.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_tick_after_one_period() {
        let mut ticker = Ticker::default();
        ticker.start();
        let begin = Instant::now();
        ticker.tick().await;
        assert_eq!(begin.elapsed(), TICK_PERIOD);
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_ticker_never_fires() {
        let mut ticker = Ticker::default();
        ticker.start();
        ticker.stop();
        assert!(!ticker.is_active());
        let fired = time::timeout(Duration::from_secs(5), ticker.tick()).await;
        assert!(fired.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_schedule() {
        let mut ticker = Ticker::default();
        ticker.start();
        time::advance(Duration::from_millis(700)).await;
        ticker.start();
        let begin = Instant::now();
        ticker.tick().await;
        assert_eq!(begin.elapsed(), TICK_PERIOD);
    }
}
