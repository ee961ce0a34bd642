use async_trait::async_trait;

use crate::api::{ApiClient, TodoPatch};
use crate::error::StoreError;
use crate::task::{Bucket, Task, TaskDraft, TaskId};
use crate::view::View;

use super::TaskStore;

/// Tasks kept by the backend, reached with the session's bearer token.
/// Column order lives only in memory; the API has no field for it.
pub struct RemoteStore {
    client: ApiClient,
    access_token: String,
}

impl RemoteStore {
    pub fn new(client: ApiClient, access_token: impl Into<String>) -> Self {
        Self {
            client,
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl TaskStore for RemoteStore {
    async fn fetch(&mut self, view: &View) -> Result<Vec<Task>, StoreError> {
        let records = self.client.list_todos(&self.access_token).await?;
        let total = records.len();
        let tasks: Vec<Task> = records
            .into_iter()
            .filter(|r| view.admits(r))
            .filter_map(|r| match view.bucket_of(&r.status) {
                Some(bucket) => Some(Task::in_bucket(r, bucket)),
                None => {
                    tracing::debug!(id = %r.id, status = %r.status, "skipping task with status outside this view");
                    None
                }
            })
            .collect();
        tracing::debug!(total, kept = tasks.len(), "fetched remote tasks");
        Ok(tasks)
    }

    async fn create(&mut self, view: &View, draft: TaskDraft) -> Result<Task, StoreError> {
        let names = view.create_names(&draft);
        let record = self
            .client
            .create_todo(&self.access_token, &draft, &names)
            .await?;
        // The server may answer with a status this view does not name; the
        // draft's bucket is what the user asked for.
        let bucket = view.bucket_of(&record.status).unwrap_or(draft.bucket);
        let mut task = draft.into_task(record.id);
        task.bucket = bucket;
        task.title = record.title;
        if record.due_date.is_some() {
            task.due_date = record.due_date;
        }
        if record.created_date.is_some() {
            task.created_date = record.created_date;
        }
        Ok(task)
    }

    async fn set_status(&mut self, view: &View, id: &TaskId, bucket: Bucket) -> Result<(), StoreError> {
        let patch = TodoPatch {
            status: Some(view.status_names().name(bucket).to_string()),
            ..TodoPatch::default()
        };
        self.client.patch_todo(&self.access_token, id, &patch).await?;
        Ok(())
    }

    async fn set_title(&mut self, id: &TaskId, title: &str) -> Result<(), StoreError> {
        let patch = TodoPatch {
            title: Some(title.to_string()),
            ..TodoPatch::default()
        };
        self.client.patch_todo(&self.access_token, id, &patch).await?;
        Ok(())
    }

    async fn delete(&mut self, id: &TaskId) -> Result<(), StoreError> {
        self.client.delete_todo(&self.access_token, id).await?;
        Ok(())
    }
}
