//! Persistence seam for edit sessions.

use async_trait::async_trait;

use crate::errors::Result;

/// Backing store an [`EditSession`](super::EditSession) commits to.
///
/// Every call is independent: the session issues each save and delete once per
/// commit and reports failures per item. Retries, timeouts and atomicity are
/// the implementation's concern.
#[async_trait]
pub trait RecordStore<R>: Send + Sync
where
    R: Send + Sync,
{
    /// Saves `record` under `id`, inserting or replacing it.
    ///
    /// Returns the id the store actually persisted the record under.
    async fn save(&self, id: &str, record: &R) -> Result<String>;

    /// Deletes the record stored under `id`.
    async fn delete(&self, id: &str) -> Result<()>;
}
