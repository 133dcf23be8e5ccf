use std::collections::HashSet;

/// A record with a stable identity key used for reconciliation.
pub trait Record: Clone {
    fn key(&self) -> String;

    /// Whether `fetched` is the backend's copy of this locally created
    /// record. Records with an empty key never match.
    fn same_record(&self, fetched: &Self) -> bool {
        let key = self.key();
        !key.is_empty() && key == fetched.key()
    }
}

/// Cached copy of one domain's collection.
///
/// The backend is authoritative. Locally created records that have not yet
/// shown up in a fetch are kept as unconfirmed so a reload that races ahead
/// of their persist request neither drops nor duplicates them. Pending
/// records are the unconfirmed ones still waiting for a persist ack.
#[derive(Debug, Clone)]
pub struct DataStore<T: Record> {
    items: Vec<T>,
    pending: HashSet<String>,
    unconfirmed: HashSet<String>,
    loaded: bool,
}

impl<T: Record> DataStore<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            pending: HashSet::new(),
            unconfirmed: HashSet::new(),
            loaded: false,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether at least one fetch has been applied.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.contains(key)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    /// Mirror the backend collection as-is, for collections the client never
    /// writes optimistically. Records sharing a key are all kept.
    pub fn replace(&mut self, fetched: Vec<T>) {
        self.items = fetched;
        self.pending.clear();
        self.unconfirmed.clear();
        self.loaded = true;
    }

    /// Insert a local record ahead of backend confirmation. A record with the
    /// same key is replaced in place.
    pub fn push_optimistic(&mut self, item: T) {
        let key = item.key();
        self.push_local(item);
        self.pending.insert(key);
    }

    /// Insert a record that exists only on this client. It survives reloads
    /// until a fetch carries a matching record, and is never pending.
    pub fn push_local(&mut self, item: T) {
        let key = item.key();
        match self.items.iter_mut().find(|existing| existing.key() == key) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        self.unconfirmed.insert(key);
    }

    /// The persist request for `key` was acknowledged. The record stays
    /// visible until a fetch returns the backend's copy. Returns whether the
    /// record was pending.
    pub fn settle(&mut self, key: &str) -> bool {
        self.pending.remove(key)
    }

    /// Merge an authoritative fetch with local records. Fetched records are
    /// kept as-is and in order. Each unconfirmed local record is dropped once
    /// a fetched record matches it (one fetched record per local record) and
    /// kept at the end otherwise. Applying the same fetch twice yields the
    /// same collection.
    pub fn reconcile(&mut self, fetched: Vec<T>) {
        let mut claimed = vec![false; fetched.len()];
        let mut still_local = Vec::new();

        for item in &self.items {
            let key = item.key();
            if !self.unconfirmed.contains(&key) {
                continue;
            }
            let matched = fetched
                .iter()
                .enumerate()
                .position(|(i, f)| !claimed[i] && item.same_record(f));
            match matched {
                Some(i) => claimed[i] = true,
                None => still_local.push(item.clone()),
            }
        }

        let local_keys: HashSet<String> = still_local.iter().map(Record::key).collect();
        self.unconfirmed.retain(|key| local_keys.contains(key));
        self.pending.retain(|key| local_keys.contains(key));

        self.items = fetched;
        self.items.extend(still_local);
        self.loaded = true;
    }

    /// Remove a pending record whose persist request failed. Returns whether
    /// anything was removed.
    pub fn rollback(&mut self, key: &str) -> bool {
        if !self.pending.remove(key) {
            return false;
        }
        self.unconfirmed.remove(key);
        let before = self.items.len();
        self.items.retain(|item| item.key() != key);
        self.items.len() != before
    }
}

impl<T: Record> Default for DataStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
