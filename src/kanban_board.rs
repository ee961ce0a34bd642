use crate::columns::Columns;
use crate::error::{BoardError, StoreError};
use crate::special_day::SpecialDayForm;
use crate::store::TaskStore;
use crate::task::{Bucket, TaskDraft, TaskId};
use crate::view::View;

/// Three-column board for one view, kept in step with its store.
///
/// Every mutation waits for the store before touching the columns: a failed
/// call is logged, returned, and leaves the board as it was.
pub struct TaskBoard<S> {
    view: View,
    columns: Columns,
    store: S,
}

impl<S: TaskStore> TaskBoard<S> {
    pub fn new(view: View, store: S) -> Self {
        Self {
            view,
            columns: Columns::new(),
            store,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Switches to another view and loads it.
    pub async fn set_view(&mut self, view: View) -> Result<(), BoardError> {
        self.view = view;
        self.load().await
    }

    /// Replaces the columns with the store's tasks for the current view.
    /// On failure the board is left empty.
    pub async fn load(&mut self) -> Result<(), BoardError> {
        match self.store.fetch(&self.view).await {
            Ok(tasks) => {
                self.columns = Columns::partition(tasks);
                tracing::debug!(view = ?self.view, tasks = self.columns.len(), "board loaded");
                Ok(())
            }
            Err(err) => {
                self.columns = Columns::new();
                Err(logged("load", err))
            }
        }
    }

    /// Appends a new todo. Blank titles are ignored and `Ok(None)` returned.
    pub async fn add_task(&mut self, title: &str) -> Result<Option<TaskId>, BoardError> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }
        let draft = TaskDraft::new(title).due(self.view.default_due_date());
        let task = self
            .store
            .create(&self.view, draft)
            .await
            .map_err(|e| logged("add", e))?;

        let id = task.id.clone();
        let mut next = self.columns.clone();
        next.todo.push(task);
        self.commit(next).await?;
        Ok(Some(id))
    }

    /// Creates a special-day task. It joins the todo column only if this
    /// board's view shows it.
    pub async fn add_special_day(&mut self, form: SpecialDayForm) -> Result<TaskId, BoardError> {
        let draft = form.into_draft()?;
        let task = self
            .store
            .create(&self.view, draft)
            .await
            .map_err(|e| logged("add special day", e))?;

        let id = task.id.clone();
        if self.view.admits_task(&task) {
            let mut next = self.columns.clone();
            next.todo.push(task);
            self.commit(next).await?;
        }
        Ok(id)
    }

    /// Drag-and-drop: takes the task at `from_index` in `from` and drops it at
    /// `to_index` in `to` (clamped to the end). Returns `Ok(false)` when the
    /// task is dropped where it started.
    pub async fn move_task(
        &mut self,
        from: Bucket,
        from_index: usize,
        to: Bucket,
        to_index: usize,
    ) -> Result<bool, BoardError> {
        if from == to && from_index == to_index {
            return Ok(false);
        }
        let Some(task) = self.columns.get(from).get(from_index) else {
            return Err(BoardError::NoSuchPosition {
                bucket: from,
                index: from_index,
            });
        };

        if from != to {
            let id = task.id.clone();
            self.store
                .set_status(&self.view, &id, to)
                .await
                .map_err(|e| logged("move", e))?;
        }

        let mut next = self.columns.clone();
        next.relocate(from, from_index, to, to_index);
        self.commit(next).await?;
        Ok(true)
    }

    /// Moves a task to the end of `to`, wherever it currently is.
    pub async fn move_to(&mut self, id: &TaskId, to: Bucket) -> Result<bool, BoardError> {
        let (from, index) = self
            .columns
            .locate(id)
            .ok_or_else(|| BoardError::TaskNotFound(id.clone()))?;
        if from == to {
            return Ok(false);
        }
        let end = self.columns.get(to).len();
        self.move_task(from, index, to, end).await
    }

    /// Renames a task. Blank titles are ignored and `Ok(false)` returned.
    pub async fn edit_title(&mut self, id: &TaskId, title: &str) -> Result<bool, BoardError> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(false);
        }
        let (bucket, index) = self
            .columns
            .locate(id)
            .ok_or_else(|| BoardError::TaskNotFound(id.clone()))?;
        self.store
            .set_title(id, title)
            .await
            .map_err(|e| logged("edit", e))?;

        let mut next = self.columns.clone();
        next.get_mut(bucket)[index].title = title.to_string();
        self.commit(next).await?;
        Ok(true)
    }

    /// Deletes the task `id` from `bucket`; other columns are never touched.
    pub async fn delete_task(&mut self, id: &TaskId, bucket: Bucket) -> Result<(), BoardError> {
        let index = self
            .columns
            .get(bucket)
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| BoardError::TaskNotFound(id.clone()))?;
        self.store
            .delete(id)
            .await
            .map_err(|e| logged("delete", e))?;

        let mut next = self.columns.clone();
        next.get_mut(bucket).remove(index);
        self.commit(next).await
    }

    async fn commit(&mut self, next: Columns) -> Result<(), BoardError> {
        self.store
            .save_layout(&self.view, &next)
            .await
            .map_err(|e| logged("save layout", e))?;
        self.columns = next;
        Ok(())
    }
}

fn logged(op: &'static str, err: StoreError) -> BoardError {
    match &err {
        StoreError::Unauthorized => tracing::info!(op, "store refused the session"),
        other => tracing::warn!(op, error = %other, "store call failed"),
    }
    BoardError::from(err)
}
