use crate::task::{Bucket, Task, TaskId};

/// The three ordered task lists a board shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns {
    pub todo: Vec<Task>,
    pub in_process: Vec<Task>,
    pub done: Vec<Task>,
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups tasks by bucket, keeping their relative order.
    pub fn partition(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut columns = Self::new();
        for task in tasks {
            columns.get_mut(task.bucket).push(task);
        }
        columns
    }

    pub fn get(&self, bucket: Bucket) -> &Vec<Task> {
        match bucket {
            Bucket::Todo => &self.todo,
            Bucket::InProcess => &self.in_process,
            Bucket::Done => &self.done,
        }
    }

    pub fn get_mut(&mut self, bucket: Bucket) -> &mut Vec<Task> {
        match bucket {
            Bucket::Todo => &mut self.todo,
            Bucket::InProcess => &mut self.in_process,
            Bucket::Done => &mut self.done,
        }
    }

    pub fn locate(&self, id: &TaskId) -> Option<(Bucket, usize)> {
        Bucket::ALL.into_iter().find_map(|bucket| {
            self.get(bucket)
                .iter()
                .position(|t| &t.id == id)
                .map(|index| (bucket, index))
        })
    }

    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.locate(id).map(|(bucket, index)| &self.get(bucket)[index])
    }

    pub fn len(&self) -> usize {
        self.todo.len() + self.in_process.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.todo
            .iter()
            .chain(self.in_process.iter())
            .chain(self.done.iter())
    }

    /// Takes the task at `from_index` out of `from` and inserts it into `to`,
    /// clamping `to_index` to the destination length. The task's bucket is
    /// rewritten to `to`. Returns `false` when `from_index` is out of range.
    pub(crate) fn relocate(
        &mut self,
        from: Bucket,
        from_index: usize,
        to: Bucket,
        to_index: usize,
    ) -> bool {
        if from_index >= self.get(from).len() {
            return false;
        }
        let mut task = self.get_mut(from).remove(from_index);
        task.bucket = to;
        let dest = self.get_mut(to);
        let at = to_index.min(dest.len());
        dest.insert(at, task);
        true
    }
}
