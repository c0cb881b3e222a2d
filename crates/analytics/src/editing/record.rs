use serde::{Deserialize, Serialize};

use super::RowId;

/// Domain fields of a row edited in an [`EditSession`](super::EditSession).
pub trait EditableRecord: Clone + Send + Sync + 'static {
    /// Deterministic store id derived from the record's domain key.
    ///
    /// Used when a draft is saved for the first time.
    fn persisted_id(&self) -> String;

    /// Whether any tracked field differs from `previous`.
    fn differs_from(&self, previous: &Self) -> bool;
}

/// Produces the initial content of draft rows.
pub trait DraftFactory<R>: Send + Sync {
    /// `visible` holds the records currently shown, drafts included, in view order.
    fn create_draft(&self, visible: &[&R]) -> R;
}

/// A row as exchanged with the grid: its id plus the record fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRow<R> {
    pub id: RowId,
    #[serde(flatten)]
    pub record: R,
}

impl<R> EditRow<R> {
    pub fn new(id: RowId, record: R) -> Self {
        Self { id, record }
    }
}

/// Tracking state of a visible row.
///
/// Rows pending deletion are no longer visible; only their store id is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowState {
    /// Matches the last canonical snapshot.
    Clean,
    /// Persisted row with unsaved edits.
    Dirty,
    /// Draft that was never persisted.
    New,
}

impl RowState {
    /// State after the row's fields were edited.
    pub fn edited(self) -> Self {
        match self {
            RowState::Clean | RowState::Dirty => RowState::Dirty,
            RowState::New => RowState::New,
        }
    }

    pub fn needs_save(self) -> bool {
        !matches!(self, RowState::Clean)
    }
}
