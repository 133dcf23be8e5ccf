use serde::Serialize;

use crate::core::error::{DashResult, DashboardError};
use crate::core::models::Bookmark;
use crate::core::store::DataStore;

/// Folder filter value that matches every folder.
pub const ALL_FOLDERS: &str = "all";

/// Editable bookmark fields, as submitted by the bookmark form. Serializes
/// to the create/update request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookmarkDraft {
    pub title: String,
    pub url: String,
    pub folder: String,
    pub tags: String,
}

impl BookmarkDraft {
    pub fn new(title: &str, url: &str, folder: &str, tags: &str) -> Self {
        Self {
            title: title.trim().to_string(),
            url: url.trim().to_string(),
            folder: if folder.trim().is_empty() {
                "General".to_string()
            } else {
                folder.trim().to_string()
            },
            tags: tags.trim().to_string(),
        }
    }

    pub fn validate(&self) -> DashResult<()> {
        if self.title.trim().is_empty() {
            return Err(DashboardError::validation("Bookmark title is required"));
        }
        if self.url.trim().is_empty() {
            return Err(DashboardError::validation("Bookmark URL is required"));
        }
        Ok(())
    }
}

impl From<&Bookmark> for BookmarkDraft {
    fn from(bm: &Bookmark) -> Self {
        Self {
            title: bm.title.clone(),
            url: bm.url.clone(),
            folder: bm.folder.clone(),
            tags: bm.tags.clone(),
        }
    }
}

/// First half of the delete gate: names the record and waits for a human
/// answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    id: i64,
    title: String,
}

impl PendingDelete {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn prompt(&self) -> String {
        format!("Delete bookmark '{}'? (y/n)", self.title)
    }

    /// Call only in response to an explicit user confirmation.
    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete { id: self.id }
    }
}

/// Proof of confirmation. The only value the delete request accepts; it can
/// only be obtained through [`PendingDelete::confirm`].
#[derive(Debug, PartialEq, Eq)]
pub struct ConfirmedDelete {
    id: i64,
}

impl ConfirmedDelete {
    pub fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkRow {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub folder: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkView {
    pub rows: Vec<BookmarkRow>,
    pub search: String,
    pub folder: String,
    pub total: usize,
    pub loaded: bool,
}

pub struct BookmarkManager {
    store: DataStore<Bookmark>,
    search: String,
    folder: String,
}

impl BookmarkManager {
    pub fn new() -> Self {
        Self {
            store: DataStore::new(),
            search: String::new(),
            folder: ALL_FOLDERS.to_string(),
        }
    }

    pub fn items(&self) -> &[Bookmark] {
        self.store.items()
    }

    pub fn get(&self, id: i64) -> Option<&Bookmark> {
        self.store.get(&id.to_string())
    }

    /// Result of `list()`: the fetched collection replaces the cache.
    pub fn apply_list(&mut self, fetched: Vec<Bookmark>) {
        self.store.replace(fetched);
        if self.folder != ALL_FOLDERS && !self.folders().contains(&self.folder) {
            self.folder = ALL_FOLDERS.to_string();
        }
    }

    pub fn request_delete(&self, id: i64) -> Option<PendingDelete> {
        self.get(id).map(|bm| PendingDelete {
            id,
            title: bm.title.clone(),
        })
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Advance the folder filter: all → each known folder → all.
    pub fn cycle_folder(&mut self) {
        let folders = self.folders();
        self.folder = if self.folder == ALL_FOLDERS {
            folders
                .first()
                .cloned()
                .unwrap_or_else(|| ALL_FOLDERS.to_string())
        } else {
            match folders.iter().position(|f| *f == self.folder) {
                Some(i) if i + 1 < folders.len() => folders[i + 1].clone(),
                _ => ALL_FOLDERS.to_string(),
            }
        };
    }

    /// Distinct folders in first-seen order.
    pub fn folders(&self) -> Vec<String> {
        let mut folders: Vec<String> = Vec::new();
        for bm in self.store.items() {
            if !folders.contains(&bm.folder) {
                folders.push(bm.folder.clone());
            }
        }
        folders
    }

    pub fn filter(&self, search: &str, folder: &str) -> Vec<&Bookmark> {
        filter_bookmarks(self.store.items(), search, folder)
    }

    /// Bookmarks matching the current search and folder selection.
    pub fn visible(&self) -> Vec<&Bookmark> {
        self.filter(&self.search, &self.folder)
    }

    pub fn view(&self) -> BookmarkView {
        BookmarkView {
            rows: self
                .visible()
                .into_iter()
                .map(|bm| BookmarkRow {
                    id: bm.id,
                    title: bm.title.clone(),
                    url: bm.url.clone(),
                    folder: bm.folder.clone(),
                    tags: bm.tag_list().into_iter().map(str::to_string).collect(),
                })
                .collect(),
            search: self.search.clone(),
            folder: self.folder.clone(),
            total: self.store.len(),
            loaded: self.store.is_loaded(),
        }
    }
}

impl Default for BookmarkManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-insensitive substring match over title, url and tags, restricted to
/// one folder unless `folder` is [`ALL_FOLDERS`]. Order is preserved.
pub fn filter_bookmarks<'a>(items: &'a [Bookmark], search: &str, folder: &str) -> Vec<&'a Bookmark> {
    let needle = search.to_lowercase();
    items
        .iter()
        .filter(|bm| folder == ALL_FOLDERS || bm.folder == folder)
        .filter(|bm| {
            needle.is_empty()
                || bm.title.to_lowercase().contains(&needle)
                || bm.url.to_lowercase().contains(&needle)
                || bm.tags.to_lowercase().contains(&needle)
        })
        .collect()
}
