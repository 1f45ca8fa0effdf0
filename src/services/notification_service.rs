use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A user-visible toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Keeps every notice in memory and mirrors it to the log.
#[derive(Clone, Debug, Default)]
pub struct ToastLog {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .expect("toast log mutex poisoned")
            .clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices
            .lock()
            .expect("toast log mutex poisoned")
            .last()
            .cloned()
    }

    pub fn clear(&self) {
        self.notices.lock().expect("toast log mutex poisoned").clear();
    }
}

impl Notifier for ToastLog {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success | NoticeLevel::Info => info!(message = %notice.message, "notice"),
            NoticeLevel::Warning => warn!(message = %notice.message, "notice"),
            NoticeLevel::Error => error!(message = %notice.message, "notice"),
        }
        self.notices
            .lock()
            .expect("toast log mutex poisoned")
            .push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_log_keeps_order() {
        let log = ToastLog::new();
        log.notify(Notice::warning("first"));
        log.notify(Notice::success("second"));
        let notices = log.notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert_eq!(log.last().unwrap().message, "second");
        log.clear();
        assert!(log.notices().is_empty());
    }
}
