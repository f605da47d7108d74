use crate::error::SelectionError;
use crate::upload::types::{CandidateFile, SelectionEntry};
use std::sync::Arc;
use tokio::sync::watch;

/// Published after every mutation of a [`SelectionStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionChange {
    pub revision: u64,
    pub count: usize,
}

/// Ordered set of accepted files. Only validated files should be added.
#[derive(Debug)]
pub struct SelectionStore {
    entries: Vec<SelectionEntry>,
    changes: watch::Sender<SelectionChange>,
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStore {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(SelectionChange::default());
        Self {
            entries: Vec::new(),
            changes,
        }
    }

    pub fn add(&mut self, accepted: impl IntoIterator<Item = CandidateFile>) {
        self.entries
            .extend(accepted.into_iter().map(SelectionEntry::admit));
        self.notify();
    }

    pub fn remove_at(&mut self, index: usize) -> Result<CandidateFile, SelectionError> {
        if index >= self.entries.len() {
            return Err(SelectionError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let removed = self.entries.remove(index);
        self.notify();
        Ok(removed.into_file())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.notify();
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn snapshot(&self) -> Arc<[SelectionEntry]> {
        self.entries.iter().cloned().collect()
    }

    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|e| e.file().size_bytes).sum()
    }

    pub fn subscribe(&self) -> watch::Receiver<SelectionChange> {
        self.changes.subscribe()
    }

    fn notify(&self) {
        let count = self.entries.len();
        self.changes.send_modify(|change| {
            change.revision += 1;
            change.count = count;
        });
    }
}
