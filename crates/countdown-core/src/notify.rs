//! Transient expiry notifications ("toasts").
//!
//! A toast is dismissed by the user or auto-dismisses once its deadline
//! passes. The store only tracks deadlines; whoever runs the event loop
//! waits on [`Notifications::next_deadline`] and calls `expire`.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

pub const DEFAULT_TOAST_TIMEOUT: Duration = Duration::from_millis(4500);

pub const EXPIRED_TITLE: &str = "Time's up!";
pub const EXPIRED_BODY: &str = "Your countdown has finished.";

pub type ToastId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: ToastId,
    pub title: String,
    pub body: String,
    #[serde(skip)]
    pub dismiss_at: Instant,
}

#[derive(Debug)]
pub struct Notifications {
    timeout: Duration,
    next_id: ToastId,
    live: Vec<Toast>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TIMEOUT)
    }
}

impl Notifications {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            next_id: 1,
            live: Vec::new(),
        }
    }

    pub fn live(&self) -> &[Toast] {
        &self.live
    }

    pub fn show(&mut self, now: Instant, title: &str, body: &str) -> Toast {
        let toast = Toast {
            id: self.next_id,
            title: title.to_string(),
            body: body.to_string(),
            dismiss_at: now + self.timeout,
        };
        self.next_id += 1;
        self.live.push(toast.clone());
        toast
    }

    /// Manual dismissal. Unknown or already-dismissed ids return `None`.
    pub fn dismiss(&mut self, id: ToastId) -> Option<Toast> {
        let pos = self.live.iter().position(|t| t.id == id)?;
        Some(self.live.remove(pos))
    }

    pub fn dismiss_latest(&mut self) -> Option<Toast> {
        self.live.pop()
    }

    /// Remove every toast whose deadline is at or before `now`.
    pub fn expire(&mut self, now: Instant) -> Vec<Toast> {
        let (expired, live): (Vec<Toast>, Vec<Toast>) = std::mem::take(&mut self.live)
            .into_iter()
            .partition(|t| t.dismiss_at <= now);
        self.live = live;
        expired
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.live.iter().map(|t| t.dismiss_at).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_assigns_increasing_ids() {
        let mut toasts = Notifications::default();
        let now = Instant::now();
        let a = toasts.show(now, EXPIRED_TITLE, EXPIRED_BODY);
        let b = toasts.show(now, EXPIRED_TITLE, EXPIRED_BODY);
        assert!(b.id > a.id);
        assert_eq!(toasts.live().len(), 2);
    }

    #[test]
    fn manual_dismiss_is_once_only() {
        let mut toasts = Notifications::default();
        let toast = toasts.show(Instant::now(), EXPIRED_TITLE, EXPIRED_BODY);
        assert!(toasts.dismiss(toast.id).is_some());
        assert!(toasts.dismiss(toast.id).is_none());
        assert!(toasts.live().is_empty());
    }

    #[test]
    fn expires_after_timeout() {
        let mut toasts = Notifications::new(Duration::from_secs(2));
        let now = Instant::now();
        toasts.show(now, EXPIRED_TITLE, EXPIRED_BODY);
        assert!(toasts.expire(now + Duration::from_secs(1)).is_empty());
        assert_eq!(toasts.next_deadline(), Some(now + Duration::from_secs(2)));
        assert_eq!(toasts.expire(now + Duration::from_secs(2)).len(), 1);
        assert!(toasts.next_deadline().is_none());
    }

    #[test]
    fn dismiss_latest_on_empty_is_none() {
        let mut toasts = Notifications::default();
        assert!(toasts.dismiss_latest().is_none());
    }
}
