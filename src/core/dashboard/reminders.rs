use crate::core::error::{DashResult, DashboardError};
use crate::core::models::{Reminder, ReminderKind, cmp_loose_datetime};
use crate::core::store::DataStore;

/// Number of reminders the schedule view shows. Fixed display window, not
/// pagination: anything past the tenth-earliest is never rendered.
pub const REMINDER_WINDOW: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderDraft {
    pub title: String,
    pub date: String,
    pub kind: ReminderKind,
}

impl ReminderDraft {
    pub fn new(title: &str, date: &str, kind: ReminderKind) -> Self {
        Self {
            title: title.trim().to_string(),
            date: date.trim().to_string(),
            kind,
        }
    }

    pub fn validate(&self) -> DashResult<()> {
        if self.title.trim().is_empty() {
            return Err(DashboardError::validation("Reminder title is required"));
        }
        if self.date.trim().is_empty() {
            return Err(DashboardError::validation("Reminder date is required"));
        }
        Ok(())
    }

    /// Assign a locally generated identifier.
    pub fn into_reminder(self) -> Reminder {
        Reminder {
            id: uuid::Uuid::new_v4().to_string(),
            title: self.title,
            date: self.date,
            kind: self.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderRow {
    pub title: String,
    pub date: String,
    pub kind: &'static str,
    /// Still waiting for the backend to acknowledge it.
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderView {
    pub rows: Vec<ReminderRow>,
    pub total: usize,
    pub loaded: bool,
}

pub struct ReminderManager {
    store: DataStore<Reminder>,
}

impl ReminderManager {
    pub fn new() -> Self {
        Self {
            store: DataStore::new(),
        }
    }

    pub fn items(&self) -> &[Reminder] {
        self.store.items()
    }

    /// Local half of `create`: validate, assign an id, append optimistically.
    /// The caller persists the returned record and reloads afterwards.
    pub fn stage_create(&mut self, draft: ReminderDraft) -> DashResult<Reminder> {
        draft.validate()?;
        let reminder = draft.into_reminder();
        self.store.push_optimistic(reminder.clone());
        Ok(reminder)
    }

    pub fn settle(&mut self, id: &str) -> bool {
        self.store.settle(id)
    }

    pub fn rollback(&mut self, id: &str) -> bool {
        self.store.rollback(id)
    }

    pub fn apply_list(&mut self, fetched: Vec<Reminder>) {
        self.store.reconcile(fetched);
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.store.is_pending(id)
    }

    /// Earliest reminders first, truncated to the display window.
    pub fn upcoming(&self) -> Vec<&Reminder> {
        let mut sorted: Vec<&Reminder> = self.store.items().iter().collect();
        sorted.sort_by(|a, b| cmp_loose_datetime(&a.date, &b.date));
        sorted.truncate(REMINDER_WINDOW);
        sorted
    }

    pub fn view(&self) -> ReminderView {
        ReminderView {
            rows: self
                .upcoming()
                .into_iter()
                .map(|r| ReminderRow {
                    title: r.title.clone(),
                    date: r.date.clone(),
                    kind: r.kind.label(),
                    pending: self.is_pending(&r.id),
                })
                .collect(),
            total: self.store.len(),
            loaded: self.store.is_loaded(),
        }
    }
}

impl Default for ReminderManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder(id: &str, date: &str) -> Reminder {
        Reminder {
            id: id.to_string(),
            title: format!("reminder {}", id),
            date: date.to_string(),
            kind: ReminderKind::OneTime,
        }
    }

    #[test]
    fn create_requires_title_and_date() {
        let mut mgr = ReminderManager::new();
        let err = mgr
            .stage_create(ReminderDraft::new("Dentist", "", ReminderKind::OneTime))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(mgr.items().is_empty());
    }

    #[test]
    fn create_assigns_id_and_appends_optimistically() {
        let mut mgr = ReminderManager::new();
        let r = mgr
            .stage_create(ReminderDraft::new("Dentist", "2026-11-02", ReminderKind::OneTime))
            .unwrap();
        assert!(!r.id.is_empty());
        assert_eq!(mgr.items().len(), 1);
        assert!(mgr.is_pending(&r.id));
        assert!(mgr.view().rows[0].pending);
    }

    #[test]
    fn reload_with_same_id_does_not_duplicate() {
        let mut mgr = ReminderManager::new();
        let r = mgr
            .stage_create(ReminderDraft::new("Dentist", "2026-11-02", ReminderKind::Weekly))
            .unwrap();
        mgr.apply_list(vec![r.clone()]);
        mgr.apply_list(vec![r.clone()]);
        assert_eq!(mgr.items().len(), 1);
        assert!(!mgr.is_pending(&r.id));
    }

    #[test]
    fn id_less_echo_replaces_the_optimistic_reminder() {
        let mut mgr = ReminderManager::new();
        let r = mgr
            .stage_create(ReminderDraft::new("Dentist", "2026-11-02", ReminderKind::Weekly))
            .unwrap();
        let echo = Reminder {
            id: String::new(),
            ..r.clone()
        };
        let other = Reminder {
            id: String::new(),
            title: "Gym".to_string(),
            ..r.clone()
        };
        mgr.apply_list(vec![other.clone(), echo.clone()]);
        mgr.apply_list(vec![other, echo]);
        assert_eq!(mgr.items().len(), 2);
        assert!(mgr.items().iter().all(|x| x.id.is_empty()));
        assert!(!mgr.is_pending(&r.id));
    }

    #[test]
    fn upcoming_is_sorted_and_capped() {
        let mut mgr = ReminderManager::new();
        let fetched: Vec<Reminder> = (0..25)
            .rev()
            .map(|d| reminder(&format!("r{}", d), &format!("2026-01-{:02}", d + 1)))
            .collect();
        mgr.apply_list(fetched);
        let view = mgr.view();
        assert_eq!(view.total, 25);
        assert_eq!(view.rows.len(), REMINDER_WINDOW);
        let dates: Vec<&str> = view.rows.iter().map(|r| r.date.as_str()).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(dates[0], "2026-01-01");
        assert_eq!(dates[9], "2026-01-10");
    }

    #[test]
    fn rollback_removes_failed_reminder() {
        let mut mgr = ReminderManager::new();
        let r = mgr
            .stage_create(ReminderDraft::new("Dentist", "2026-11-02", ReminderKind::Daily))
            .unwrap();
        assert!(mgr.rollback(&r.id));
        assert!(mgr.items().is_empty());
    }
}
