use crate::core::dashboard::bookmarks::BookmarkDraft;
use crate::core::dashboard::reminders::ReminderDraft;
use crate::core::error::{DashResult, DashboardError};
use crate::core::models::{Bookmark, ReminderKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FormKind {
    NewBookmark,
    EditBookmark(i64),
    NewReminder,
}

pub(super) struct FormField {
    pub label: &'static str,
    pub value: String,
}

/// Modal text form; one line per field, Tab moves focus.
pub(super) struct FormState {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focused: usize,
    pub error: Option<String>,
}

fn field(label: &'static str, value: &str) -> FormField {
    FormField {
        label,
        value: value.to_string(),
    }
}

impl FormState {
    pub fn new_bookmark() -> Self {
        Self::with_fields(
            FormKind::NewBookmark,
            vec![
                field("Title", ""),
                field("URL", ""),
                field("Folder", "General"),
                field("Tags", ""),
            ],
        )
    }

    pub fn edit_bookmark(bm: &Bookmark) -> Self {
        Self::with_fields(
            FormKind::EditBookmark(bm.id),
            vec![
                field("Title", &bm.title),
                field("URL", &bm.url),
                field("Folder", &bm.folder),
                field("Tags", &bm.tags),
            ],
        )
    }

    pub fn new_reminder() -> Self {
        Self::with_fields(
            FormKind::NewReminder,
            vec![
                field("Title", ""),
                field("Date (YYYY-MM-DD HH:MM)", ""),
                field("Type (one-time/daily/weekly)", ReminderKind::OneTime.label()),
            ],
        )
    }

    fn with_fields(kind: FormKind, fields: Vec<FormField>) -> Self {
        Self {
            kind,
            fields,
            focused: 0,
            error: None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            FormKind::NewBookmark => " New bookmark ",
            FormKind::EditBookmark(_) => " Edit bookmark ",
            FormKind::NewReminder => " New reminder ",
        }
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    pub fn focus_previous(&mut self) {
        self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
    }

    pub fn push_char(&mut self, c: char) {
        self.fields[self.focused].value.push(c);
    }

    pub fn backspace(&mut self) {
        self.fields[self.focused].value.pop();
    }

    fn value(&self, i: usize) -> &str {
        self.fields.get(i).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn bookmark_draft(&self) -> BookmarkDraft {
        BookmarkDraft::new(self.value(0), self.value(1), self.value(2), self.value(3))
    }

    pub fn reminder_draft(&self) -> DashResult<ReminderDraft> {
        let kind = ReminderKind::parse(self.value(2)).ok_or_else(|| {
            DashboardError::validation("Reminder type must be one-time, daily or weekly")
        })?;
        Ok(ReminderDraft::new(self.value(0), self.value(1), kind))
    }
}
