//! Backing stores a board persists through.

mod local;
mod remote;

#[cfg(test)]
pub(crate) mod fake;

pub use local::{LocalRecord, LocalStore, PeriodSnapshot};
pub use remote::RemoteStore;

use async_trait::async_trait;

use crate::columns::Columns;
use crate::error::StoreError;
use crate::task::{Bucket, Task, TaskDraft, TaskId};
use crate::view::View;

#[async_trait]
pub trait TaskStore: Send {
    /// Every task on the board for `view`, in display order where the store
    /// keeps one.
    async fn fetch(&mut self, view: &View) -> Result<Vec<Task>, StoreError>;

    async fn create(&mut self, view: &View, draft: TaskDraft) -> Result<Task, StoreError>;

    async fn set_status(&mut self, view: &View, id: &TaskId, bucket: Bucket) -> Result<(), StoreError>;

    async fn set_title(&mut self, id: &TaskId, title: &str) -> Result<(), StoreError>;

    async fn delete(&mut self, id: &TaskId) -> Result<(), StoreError>;

    /// Called with the full board after each committed change. Stores with
    /// no notion of order ignore it.
    async fn save_layout(&mut self, _view: &View, _columns: &Columns) -> Result<(), StoreError> {
        Ok(())
    }
}
