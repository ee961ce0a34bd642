//! Scripted in-memory store for board tests.

use async_trait::async_trait;
use std::collections::VecDeque;

use crate::error::{ApiError, StoreError};
use crate::task::{Bucket, Task, TaskDraft, TaskId};
use crate::view::View;

use super::TaskStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Fetch,
    Create(String),
    SetStatus(TaskId, Bucket),
    SetTitle(TaskId, String),
    Delete(TaskId),
    SaveLayout,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Failure {
    Unauthorized,
    Server,
}

#[derive(Default)]
pub(crate) struct FakeStore {
    pub tasks: Vec<Task>,
    pub calls: Vec<Call>,
    failures: VecDeque<Failure>,
    next_id: i64,
}

impl FakeStore {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks
            .iter()
            .filter_map(|t| match t.id {
                TaskId::Num(n) => Some(n),
                TaskId::Text(_) => None,
            })
            .max()
            .unwrap_or(0);
        Self {
            tasks,
            next_id,
            ..Self::default()
        }
    }

    /// The next store call fails this way.
    pub fn fail_next(&mut self, failure: Failure) {
        self.failures.push_back(failure);
    }

    /// Calls that would have reached a server (layout saves excluded).
    pub fn writes(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| !matches!(c, Call::Fetch | Call::SaveLayout))
            .collect()
    }

    fn record(&mut self, call: Call) -> Result<(), StoreError> {
        self.calls.push(call);
        match self.failures.pop_front() {
            None => Ok(()),
            Some(Failure::Unauthorized) => Err(StoreError::Unauthorized),
            Some(Failure::Server) => Err(StoreError::Api(ApiError::Api {
                status: 500,
                message: "boom".into(),
            })),
        }
    }
}

#[async_trait]
impl TaskStore for FakeStore {
    async fn fetch(&mut self, _view: &View) -> Result<Vec<Task>, StoreError> {
        self.record(Call::Fetch)?;
        Ok(self.tasks.clone())
    }

    async fn create(&mut self, _view: &View, draft: TaskDraft) -> Result<Task, StoreError> {
        self.record(Call::Create(draft.title.clone()))?;
        self.next_id += 1;
        let task = draft.into_task(TaskId::Num(self.next_id));
        self.tasks.push(task.clone());
        Ok(task)
    }

    async fn set_status(&mut self, _view: &View, id: &TaskId, bucket: Bucket) -> Result<(), StoreError> {
        self.record(Call::SetStatus(id.clone(), bucket))?;
        if let Some(t) = self.tasks.iter_mut().find(|t| &t.id == id) {
            t.bucket = bucket;
        }
        Ok(())
    }

    async fn set_title(&mut self, id: &TaskId, title: &str) -> Result<(), StoreError> {
        self.record(Call::SetTitle(id.clone(), title.to_string()))?;
        if let Some(t) = self.tasks.iter_mut().find(|t| &t.id == id) {
            t.title = title.to_string();
        }
        Ok(())
    }

    async fn delete(&mut self, id: &TaskId) -> Result<(), StoreError> {
        self.record(Call::Delete(id.clone()))?;
        self.tasks.retain(|t| &t.id != id);
        Ok(())
    }

    async fn save_layout(&mut self, _view: &View, _columns: &crate::columns::Columns) -> Result<(), StoreError> {
        self.calls.push(Call::SaveLayout);
        Ok(())
    }
}
