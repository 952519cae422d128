//! User-facing notifications.
//!
//! The desk reports degraded operations (backend unreachable, local-only
//! deletes, rejected input) through a [`Notifier`]. [`Banner`] is the
//! standard implementation: it shows one message at a time and dismisses it
//! after [`DISMISS_AFTER`].

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// How long a banner message stays visible.
pub const DISMISS_AFTER: Duration = Duration::from_secs(5);

pub trait Notifier {
    fn notify(&self, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, message: &str) {
        (**self).notify(message)
    }
}

/// A single auto-dismissing message slot.
///
/// A new message replaces the current one and restarts the dismissal timer.
#[derive(Debug, Default)]
pub struct Banner {
    current: Mutex<Option<(String, Instant)>>,
}

impl Banner {
    pub fn new() -> Self {
        Self::default()
    }

    fn show_at(&self, message: &str, now: Instant) {
        if let Ok(mut current) = self.current.lock() {
            *current = Some((message.to_string(), now + DISMISS_AFTER));
        }
    }

    fn visible_at(&self, now: Instant) -> Option<String> {
        let mut current = self.current.lock().ok()?;
        match current.as_ref() {
            Some((_, deadline)) if now >= *deadline => {
                *current = None;
                None
            }
            Some((message, _)) => Some(message.clone()),
            None => None,
        }
    }

    /// The message currently shown, if it has not been dismissed yet.
    pub fn visible(&self) -> Option<String> {
        self.visible_at(Instant::now())
    }

    /// Take the current message, clearing the slot.
    pub fn take(&self) -> Option<String> {
        let message = self.visible();
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
        message
    }

    pub fn dismiss(&self) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
    }
}

impl Notifier for Banner {
    fn notify(&self, message: &str) {
        self.show_at(message, Instant::now())
    }
}

/// Keeps every message, oldest first.
#[derive(Debug, Default)]
pub struct NoticeLog {
    messages: Mutex<Vec<String>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_dismisses_after_delay() {
        let banner = Banner::new();
        let start = Instant::now();
        banner.show_at("Network error", start);

        assert_eq!(banner.visible_at(start).as_deref(), Some("Network error"));
        assert_eq!(banner.visible_at(start + DISMISS_AFTER), None);
    }

    #[test]
    fn test_new_message_replaces_and_extends() {
        let banner = Banner::new();
        let start = Instant::now();
        banner.show_at("first", start);

        let later = start + Duration::from_secs(4);
        banner.show_at("second", later);

        let after_first_deadline = start + DISMISS_AFTER + Duration::from_secs(1);
        assert_eq!(
            banner.visible_at(after_first_deadline).as_deref(),
            Some("second")
        );
        assert_eq!(banner.visible_at(later + DISMISS_AFTER), None);
    }

    #[test]
    fn test_take_clears_banner() {
        let banner = Banner::new();
        banner.notify("hello");
        assert_eq!(banner.take().as_deref(), Some("hello"));
        assert_eq!(banner.visible(), None);
    }

    #[test]
    fn test_notice_log_keeps_order() {
        let log = NoticeLog::new();
        log.notify("a");
        log.notify("b");
        assert_eq!(log.messages(), vec!["a".to_string(), "b".to_string()]);
    }
}
