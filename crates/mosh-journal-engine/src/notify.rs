//! User-visible notifications.
//!
//! The engine reports outcomes the user should see (block inserted, nothing
//! selected, insertion failed) through a [`Notifier`]. Hosts route these to
//! their own toast UI; [`LogNotifier`] sends them to the log and
//! [`RecordingNotifier`] keeps them for inspection.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Warn => "warn",
            NoticeLevel::Error => "error",
        })
    }
}

pub trait Notifier {
    fn notify(&mut self, level: NoticeLevel, message: &str);

    fn info(&mut self, message: &str) {
        self.notify(NoticeLevel::Info, message);
    }

    fn warn(&mut self, message: &str) {
        self.notify(NoticeLevel::Warn, message);
    }

    fn error(&mut self, message: &str) {
        self.notify(NoticeLevel::Error, message);
    }
}

/// Forwards notifications to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => log::info!("{message}"),
            NoticeLevel::Warn => log::warn!("{message}"),
            NoticeLevel::Error => log::error!("{message}"),
        }
    }
}

/// Keeps every notification in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    pub notices: Vec<(NoticeLevel, String)>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&(NoticeLevel, String)> {
        self.notices.last()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.notices.push((level, message.to_string()));
    }
}
