use chrono::Local;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Maximum number of entries kept in the feed.
pub const ACTIVITY_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub time: String,
    pub message: String,
    pub severity: Severity,
}

/// Bounded, most-recent-first event feed.
///
/// Cloning yields another handle onto the same buffer, so the API client
/// and the dashboard state both write into one feed.
#[derive(Clone, Default)]
pub struct ActivityLog {
    entries: Arc<Mutex<VecDeque<ActivityEntry>>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<ActivityEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn append(&self, message: impl Into<String>, severity: Severity) {
        let mut entries = self.lock();
        entries.push_front(ActivityEntry {
            time: Local::now().format("%H:%M:%S").to_string(),
            message: message.into(),
            severity,
        });
        entries.truncate(ACTIVITY_CAPACITY);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.append(message, Severity::Info);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.append(message, Severity::Success);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.append(message, Severity::Warning);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.append(message, Severity::Error);
    }

    /// Snapshot of the feed, newest first.
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.lock().iter().filter(|e| e.severity == severity).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_most_recent_first() {
        let log = ActivityLog::new();
        log.info("first");
        log.error("second");
        let entries = log.entries();
        assert_eq!(entries[0].message, "second");
        assert_eq!(entries[0].severity, Severity::Error);
        assert_eq!(entries[1].message, "first");
    }

    #[test]
    fn feed_is_bounded_to_capacity() {
        let log = ActivityLog::new();
        for i in 0..57 {
            log.info(format!("event {}", i));
            assert!(log.len() <= ACTIVITY_CAPACITY);
            assert_eq!(log.entries()[0].message, format!("event {}", i));
        }
        assert_eq!(log.len(), ACTIVITY_CAPACITY);
        // Oldest surviving entry is the 20th most recent call.
        assert_eq!(log.entries().last().unwrap().message, "event 37");
    }

    #[test]
    fn clones_share_one_buffer() {
        let log = ActivityLog::new();
        let handle = log.clone();
        handle.warn("from clone");
        assert_eq!(log.len(), 1);
        assert_eq!(log.count(Severity::Warning), 1);
        assert_eq!(log.count(Severity::Error), 0);
    }
}
