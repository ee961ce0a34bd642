use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::columns::Columns;
use crate::error::{StorageError, StoreError};
use crate::storage::LocalStorage;
use crate::task::{Bucket, Task, TaskDraft, TaskId};
use crate::view::View;

use super::TaskStore;

/// What a local board remembers about a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalRecord {
    pub id: TaskId,
    pub text: String,
}

/// One period's board as stored under its period key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSnapshot {
    #[serde(default)]
    pub todo: Vec<LocalRecord>,
    #[serde(default, rename = "inProcess")]
    pub in_process: Vec<LocalRecord>,
    #[serde(default)]
    pub done: Vec<LocalRecord>,
}

impl PeriodSnapshot {
    pub fn of(columns: &Columns) -> Self {
        let records = |bucket: Bucket| -> Vec<LocalRecord> {
            columns
                .get(bucket)
                .iter()
                .map(|t| LocalRecord {
                    id: t.id.clone(),
                    text: t.title.clone(),
                })
                .collect()
        };
        Self {
            todo: records(Bucket::Todo),
            in_process: records(Bucket::InProcess),
            done: records(Bucket::Done),
        }
    }

    pub fn records(&self, bucket: Bucket) -> &[LocalRecord] {
        match bucket {
            Bucket::Todo => &self.todo,
            Bucket::InProcess => &self.in_process,
            Bucket::Done => &self.done,
        }
    }

    fn into_tasks(self, is_special_day: bool) -> Vec<Task> {
        let Self {
            todo,
            in_process,
            done,
        } = self;
        [
            (Bucket::Todo, todo),
            (Bucket::InProcess, in_process),
            (Bucket::Done, done),
        ]
        .into_iter()
        .flat_map(|(bucket, records)| {
            records.into_iter().map(move |r| Task {
                id: r.id,
                title: r.text,
                bucket,
                due_date: None,
                created_date: None,
                is_special_day,
            })
        })
        .collect()
    }

    fn max_numeric_id(&self) -> Option<i64> {
        Bucket::ALL
            .into_iter()
            .flat_map(|b| self.records(b).iter())
            .filter_map(|r| match r.id {
                TaskId::Num(n) => Some(n),
                TaskId::Text(_) => None,
            })
            .max()
    }
}

/// Board snapshots kept in a [`LocalStorage`] file, one per calendar period.
/// Individual edits are acknowledged at once; the snapshot written by
/// `save_layout` is what persists them.
pub struct LocalStore {
    storage: LocalStorage,
    last_issued: i64,
}

impl LocalStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self {
            storage,
            last_issued: 0,
        }
    }

    /// Snapshot under `key`, empty when nothing was stored yet.
    pub fn read_snapshot(&self, key: &str) -> Result<PeriodSnapshot, StorageError> {
        Ok(self.storage.get_json(key)?.unwrap_or_default())
    }

    pub fn write_snapshot(&mut self, key: &str, snapshot: &PeriodSnapshot) -> Result<(), StorageError> {
        self.storage.set_json(key, snapshot)
    }

    // Millisecond timestamps, bumped past anything already handed out or
    // stored under `keys`.
    fn next_id(&mut self, keys: &[String]) -> Result<TaskId, StorageError> {
        let mut stored = 0;
        for key in keys {
            if let Some(max) = self.read_snapshot(key)?.max_numeric_id() {
                stored = stored.max(max);
            }
        }
        let floor = stored.max(self.last_issued) + 1;
        let id = Utc::now().timestamp_millis().max(floor);
        self.last_issued = id;
        Ok(TaskId::Num(id))
    }
}

#[async_trait]
impl TaskStore for LocalStore {
    async fn fetch(&mut self, view: &View) -> Result<Vec<Task>, StoreError> {
        let snapshot = self.read_snapshot(&view.period_key())?;
        Ok(snapshot.into_tasks(*view == View::SpecialDays))
    }

    async fn create(&mut self, view: &View, draft: TaskDraft) -> Result<Task, StoreError> {
        let special_key = View::SpecialDays.period_key();
        let mut keys = vec![view.period_key()];
        if draft.is_special_day && *view != View::SpecialDays {
            keys.push(special_key.clone());
        }
        let id = self.next_id(&keys)?;
        let task = draft.into_task(id);

        // Another board's layout save never reaches the special-days
        // snapshot, so the record goes there now.
        if keys.len() > 1 {
            let mut snapshot = self.read_snapshot(&special_key)?;
            snapshot.todo.push(LocalRecord {
                id: task.id.clone(),
                text: task.title.clone(),
            });
            self.write_snapshot(&special_key, &snapshot)?;
            tracing::debug!(id = %task.id, "special day stored locally");
        }
        Ok(task)
    }

    async fn set_status(&mut self, _view: &View, _id: &TaskId, _bucket: Bucket) -> Result<(), StoreError> {
        Ok(())
    }

    async fn set_title(&mut self, _id: &TaskId, _title: &str) -> Result<(), StoreError> {
        Ok(())
    }

    async fn delete(&mut self, _id: &TaskId) -> Result<(), StoreError> {
        Ok(())
    }

    async fn save_layout(&mut self, view: &View, columns: &Columns) -> Result<(), StoreError> {
        self.write_snapshot(&view.period_key(), &PeriodSnapshot::of(columns))?;
        Ok(())
    }
}
