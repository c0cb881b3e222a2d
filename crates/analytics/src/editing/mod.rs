//! Transactional editing of persisted time-series rows.
//!
//! An [`EditSession`] keeps a local copy of a canonical record list, tracks
//! which rows were edited, added or deleted, and reconciles those changes with
//! a [`RecordStore`] on commit.

mod record;
mod row_id;
mod session;
mod store;

pub use record::{DraftFactory, EditRow, EditableRecord, RowState};
pub use row_id::RowId;
pub use session::{CommitFailure, CommitOperation, CommitReport, EditSession, SessionEntry};
pub use store::RecordStore;
