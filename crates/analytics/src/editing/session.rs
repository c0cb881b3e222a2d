use futures::future::join_all;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};

use super::{DraftFactory, EditRow, EditableRecord, RecordStore, RowId, RowState};
use crate::errors::{DatabaseError, Error};

/// A visible row together with its tracking state.
#[derive(Debug, Clone)]
pub struct SessionEntry<R> {
    row: EditRow<R>,
    state: RowState,
}

impl<R> SessionEntry<R> {
    pub fn id(&self) -> &RowId {
        &self.row.id
    }

    pub fn record(&self) -> &R {
        &self.row.record
    }

    pub fn state(&self) -> RowState {
        self.state
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOperation {
    Save,
    Delete,
}

/// A save or delete the store rejected. The row keeps its tracking state.
#[derive(Debug)]
pub struct CommitFailure {
    pub id: RowId,
    pub operation: CommitOperation,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct CommitReport {
    /// Store ids that were saved, in view order.
    pub saved: Vec<String>,
    /// Store ids that were deleted.
    pub deleted: Vec<String>,
    pub failures: Vec<CommitFailure>,
}

impl CommitReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Local editing session over a canonical list of persisted records.
///
/// Visible rows live in one arena, each tagged `Clean`, `Dirty` or `New`.
/// Deleting a persisted row removes it from view and queues its store id;
/// deleting a draft just drops it. Nothing reaches the store before `commit`.
pub struct EditSession<R: EditableRecord> {
    canonical: Vec<EditRow<R>>,
    entries: Vec<SessionEntry<R>>,
    index: HashMap<RowId, usize>,
    pending_deletions: Vec<String>,
    selection: HashSet<RowId>,
    draft_factory: Box<dyn DraftFactory<R>>,
}

impl<R: EditableRecord> EditSession<R> {
    /// Starts a session seeded from `source`, given as `(store id, record)` pairs.
    pub fn new<F>(source: Vec<(String, R)>, draft_factory: F) -> Self
    where
        F: DraftFactory<R> + 'static,
    {
        let mut session = Self {
            canonical: Vec::new(),
            entries: Vec::new(),
            index: HashMap::new(),
            pending_deletions: Vec::new(),
            selection: HashSet::new(),
            draft_factory: Box::new(draft_factory),
        };
        session.reset_from_source(source);
        session
    }

    /// Re-seeds the session after an upstream refresh.
    ///
    /// Unsaved local edits, drafts and pending deletions are discarded.
    pub fn reset_from_source(&mut self, source: Vec<(String, R)>) {
        let mut seen = HashSet::new();
        self.canonical = source
            .into_iter()
            .filter_map(|(id, record)| {
                if seen.insert(id.clone()) {
                    Some(EditRow::new(RowId::Persisted(id), record))
                } else {
                    warn!("Duplicate record id '{}' in source, keeping the first", id);
                    None
                }
            })
            .collect();
        self.cancel();
    }

    // =========================================================================
    // View
    // =========================================================================

    pub fn entries(&self) -> &[SessionEntry<R>] {
        &self.entries
    }

    /// The rows currently visible, in view order.
    pub fn local_entries(&self) -> Vec<EditRow<R>> {
        self.entries.iter().map(|e| e.row.clone()).collect()
    }

    /// The last canonical snapshot the session knows about.
    pub fn canonical_entries(&self) -> &[EditRow<R>] {
        &self.canonical
    }

    pub fn get(&self, id: &RowId) -> Option<&SessionEntry<R>> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    /// Ids of rows that will be saved on commit (edited rows and drafts).
    pub fn dirty_ids(&self) -> Vec<RowId> {
        self.entries
            .iter()
            .filter(|e| e.state.needs_save())
            .map(|e| e.row.id.clone())
            .collect()
    }

    /// Store ids that will be deleted on commit.
    pub fn deleted_ids(&self) -> &[String] {
        &self.pending_deletions
    }

    pub fn dirty_count(&self) -> usize {
        self.entries.iter().filter(|e| e.state.needs_save()).count()
    }

    pub fn deleted_count(&self) -> usize {
        self.pending_deletions.len()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty_count() > 0 || self.deleted_count() > 0
    }

    // =========================================================================
    // Drafts
    // =========================================================================

    pub fn add_draft(&mut self) -> RowId {
        let record = {
            let visible: Vec<&R> = self.entries.iter().map(|e| &e.row.record).collect();
            self.draft_factory.create_draft(&visible)
        };
        let id = RowId::temporary();
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push(SessionEntry {
            row: EditRow::new(id.clone(), record),
            state: RowState::New,
        });
        id
    }

    pub fn add_draft_batch(&mut self, count: usize) -> Vec<RowId> {
        (0..count).map(|_| self.add_draft()).collect()
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Replaces the visible rows with the grid's current content.
    ///
    /// Rows whose tracked fields changed become dirty; unchanged rows keep
    /// their state. Unknown temporary ids are taken as drafts. A store id that
    /// is not visible revives a pending deletion as a dirty row; any other
    /// store id is ignored. Visible rows missing from the snapshot are
    /// deleted. Repeated ids keep their first occurrence.
    pub fn update_from_grid_snapshot(&mut self, next_rows: Vec<EditRow<R>>) {
        let mut seen = HashSet::with_capacity(next_rows.len());
        let mut next_entries = Vec::with_capacity(next_rows.len());

        for row in next_rows {
            if !seen.insert(row.id.clone()) {
                warn!("Duplicate row id '{}' in grid snapshot, ignoring", row.id);
                continue;
            }

            let state = match self.get(&row.id) {
                Some(previous) if row.record.differs_from(&previous.row.record) => {
                    previous.state.edited()
                }
                Some(previous) => previous.state,
                None => match &row.id {
                    RowId::Temporary(_) => RowState::New,
                    RowId::Persisted(id) => {
                        let before = self.pending_deletions.len();
                        self.pending_deletions.retain(|pending| pending != id);
                        if self.pending_deletions.len() == before {
                            warn!("Unknown row id '{}' in grid snapshot, ignoring", id);
                            continue;
                        }
                        RowState::Dirty
                    }
                },
            };
            next_entries.push(SessionEntry { row, state });
        }

        let previous_entries = std::mem::replace(&mut self.entries, next_entries);
        for entry in previous_entries {
            if !seen.contains(&entry.row.id) {
                self.queue_removal(entry.row.id);
            }
        }
        self.reindex();
    }

    /// Removes rows from view. Persisted rows are queued for deletion; drafts
    /// are dropped without any store call. Unknown ids are ignored.
    pub fn delete_rows(&mut self, ids: &[RowId]) {
        let targets: HashSet<&RowId> = ids
            .iter()
            .filter(|id| self.index.contains_key(*id))
            .collect();
        if targets.is_empty() {
            return;
        }

        let mut removed = Vec::with_capacity(targets.len());
        self.entries.retain(|entry| {
            if targets.contains(&entry.row.id) {
                removed.push(entry.row.id.clone());
                false
            } else {
                true
            }
        });
        for id in removed {
            self.queue_removal(id);
        }
        self.reindex();
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Adds visible rows to the selection.
    pub fn select(&mut self, ids: impl IntoIterator<Item = RowId>) {
        for id in ids {
            if self.index.contains_key(&id) {
                self.selection.insert(id);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected ids in view order.
    pub fn selected_ids(&self) -> Vec<RowId> {
        self.entries
            .iter()
            .filter(|e| self.selection.contains(&e.row.id))
            .map(|e| e.row.id.clone())
            .collect()
    }

    pub fn delete_selected(&mut self) {
        let ids = self.selected_ids();
        self.delete_rows(&ids);
    }

    // =========================================================================
    // Commit / cancel
    // =========================================================================

    /// Pushes local changes to `store`.
    ///
    /// One save is issued per dirty row or draft (drafts under their derived
    /// store id) and one delete per queued store id; all calls run
    /// concurrently. Successful items become clean and are folded into the
    /// canonical snapshot. Failed items keep their state for the next commit.
    pub async fn commit<S>(&mut self, store: &S) -> CommitReport
    where
        S: RecordStore<R> + ?Sized,
    {
        let mut report = CommitReport::default();

        // Drafts whose derived id is already taken by a visible row (or by an
        // earlier draft) are rejected instead of silently overwriting it.
        let mut taken: HashSet<String> = self
            .entries
            .iter()
            .filter_map(|e| e.row.id.as_persisted().map(str::to_string))
            .collect();
        let mut saves: Vec<(RowId, String, R)> = Vec::new();
        for entry in self.entries.iter().filter(|e| e.state.needs_save()) {
            let target = match &entry.row.id {
                RowId::Persisted(id) => id.clone(),
                RowId::Temporary(_) => {
                    let target = entry.row.record.persisted_id();
                    if !taken.insert(target.clone()) {
                        report.failures.push(CommitFailure {
                            id: entry.row.id.clone(),
                            operation: CommitOperation::Save,
                            error: DatabaseError::UniqueViolation(format!(
                                "a row with id '{}' already exists",
                                target
                            ))
                            .into(),
                        });
                        continue;
                    }
                    target
                }
            };
            saves.push((entry.row.id.clone(), target, entry.row.record.clone()));
        }

        // A save that lands on a queued id replaces the record; deleting it
        // concurrently would race with the save.
        let save_targets: HashSet<&str> = saves
            .iter()
            .map(|(_, target, _)| target.as_str())
            .collect();
        let deletes: Vec<String> = self
            .pending_deletions
            .iter()
            .filter(|id| !save_targets.contains(id.as_str()))
            .cloned()
            .collect();

        if saves.is_empty() && deletes.is_empty() {
            return report;
        }
        debug!(
            "Committing edit session: {} saves, {} deletes",
            saves.len(),
            deletes.len()
        );

        let (save_results, delete_results) = futures::join!(
            join_all(saves.iter().map(|(_, target, record)| store.save(target, record))),
            join_all(deletes.iter().map(|id| store.delete(id)))
        );

        for ((row_id, target, record), result) in saves.into_iter().zip(save_results) {
            match result {
                Ok(stored_id) => {
                    self.apply_saved(&row_id, &target, &stored_id, record);
                    report.saved.push(stored_id);
                }
                Err(error) => {
                    warn!("Failed to save row '{}' as '{}': {}", row_id, target, error);
                    report.failures.push(CommitFailure {
                        id: row_id,
                        operation: CommitOperation::Save,
                        error,
                    });
                }
            }
        }

        for (id, result) in deletes.into_iter().zip(delete_results) {
            match result {
                Ok(()) => {
                    self.pending_deletions.retain(|pending| *pending != id);
                    self.canonical.retain(|row| row.id.as_persisted() != Some(id.as_str()));
                    report.deleted.push(id);
                }
                Err(error) => {
                    warn!("Failed to delete row '{}': {}", id, error);
                    report.failures.push(CommitFailure {
                        id: RowId::Persisted(id),
                        operation: CommitOperation::Delete,
                        error,
                    });
                }
            }
        }

        self.reindex();
        report
    }

    /// Discards local changes and restores the last canonical snapshot.
    pub fn cancel(&mut self) {
        self.entries = self
            .canonical
            .iter()
            .map(|row| SessionEntry {
                row: row.clone(),
                state: RowState::Clean,
            })
            .collect();
        self.pending_deletions.clear();
        self.selection.clear();
        self.reindex();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn queue_removal(&mut self, id: RowId) {
        self.selection.remove(&id);
        match id {
            RowId::Temporary(_) => debug!("Dropped draft '{}'", id),
            RowId::Persisted(id) => {
                if !self.pending_deletions.contains(&id) {
                    self.pending_deletions.push(id);
                }
            }
        }
    }

    fn apply_saved(&mut self, row_id: &RowId, target: &str, stored_id: &str, record: R) {
        let stored = RowId::Persisted(stored_id.to_string());

        // The save replaced whatever the store held under these ids.
        self.pending_deletions
            .retain(|pending| pending != target && pending != stored_id);

        if let Some(entry) = self.entries.iter_mut().find(|e| e.row.id == *row_id) {
            entry.row.id = stored.clone();
            entry.state = RowState::Clean;
        }
        if self.selection.remove(row_id) {
            self.selection.insert(stored.clone());
        }

        let saved_row = EditRow::new(stored, record);
        match self
            .canonical
            .iter()
            .position(|row| row.id == *row_id || row.id == saved_row.id)
        {
            Some(position) => self.canonical[position] = saved_row,
            None => self.canonical.push(saved_row),
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.row.id.clone(), i))
            .collect();
    }
}
