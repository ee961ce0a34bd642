use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Store-assigned task key. The remote API hands out numbers, but nothing
/// in the client depends on that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Num(i64),
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Num(n) => write!(f, "{n}"),
            TaskId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        TaskId::Num(n)
    }
}

impl std::str::FromStr for TaskId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => TaskId::Num(n),
            Err(_) => TaskId::Text(s.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Todo,
    InProcess,
    Done,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Todo, Bucket::InProcess, Bucket::Done];

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Todo => "TODO",
            Bucket::InProcess => "IN PROCESS",
            Bucket::Done => "DONE",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Bucket::Todo => 0,
            Bucket::InProcess => 1,
            Bucket::Done => 2,
        }
    }

    /// Next column to the right, stopping at `Done`.
    pub fn next(self) -> Bucket {
        Bucket::ALL[(self.index() + 1).min(Bucket::ALL.len() - 1)]
    }

    /// Next column to the left, stopping at `Todo`.
    pub fn prev(self) -> Bucket {
        Bucket::ALL[self.index().saturating_sub(1)]
    }
}

impl std::str::FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "todo" | "pending" => Ok(Bucket::Todo),
            "inprocess" | "doing" => Ok(Bucket::InProcess),
            "done" | "completed" => Ok(Bucket::Done),
            other => Err(format!("unknown column '{other}' (expected todo, in-process or done)")),
        }
    }
}

/// Status strings a view exchanges with the server. The today page and the
/// weekly/special-day pages disagree on what to call the same three columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusNames {
    pub todo: &'static str,
    pub in_process: &'static str,
    pub done: &'static str,
}

impl StatusNames {
    pub const TODAY: StatusNames = StatusNames {
        todo: "todo",
        in_process: "inProcess",
        done: "done",
    };

    pub const WEEKLY: StatusNames = StatusNames {
        todo: "pending",
        in_process: "inProcess",
        done: "completed",
    };

    pub fn name(&self, bucket: Bucket) -> &'static str {
        match bucket {
            Bucket::Todo => self.todo,
            Bucket::InProcess => self.in_process,
            Bucket::Done => self.done,
        }
    }

    pub fn bucket(&self, status: &str) -> Option<Bucket> {
        Bucket::ALL.into_iter().find(|b| self.name(*b) == status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub bucket: Bucket,
    pub due_date: Option<NaiveDate>,
    pub created_date: Option<DateTime<Utc>>,
    pub is_special_day: bool,
}

impl Task {
    /// Builds a task from a server record, or `None` when its status is not
    /// one of `names`.
    pub fn from_record(record: TaskRecord, names: &StatusNames) -> Option<Task> {
        let bucket = names.bucket(&record.status)?;
        Some(Task::in_bucket(record, bucket))
    }

    /// Builds a task from a server record whose column is already known.
    pub fn in_bucket(record: TaskRecord, bucket: Bucket) -> Task {
        Task {
            id: record.id,
            title: record.title,
            bucket,
            due_date: record.due_date,
            created_date: record.created_date,
            is_special_day: record.is_special_day,
        }
    }
}

/// A to-do as the remote API serializes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub title: String,
    pub status: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_special_day: bool,
}

/// Payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub bucket: Bucket,
    pub due_date: Option<NaiveDate>,
    pub is_special_day: bool,
    pub created_date: DateTime<Utc>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            bucket: Bucket::Todo,
            due_date: None,
            is_special_day: false,
            created_date: Utc::now(),
        }
    }

    pub fn due(mut self, date: Option<NaiveDate>) -> Self {
        self.due_date = date;
        self
    }

    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            bucket: self.bucket,
            due_date: self.due_date,
            created_date: Some(self.created_date),
            is_special_day: self.is_special_day,
        }
    }
}

// Some pages send `YYYY-MM-DD`, others a full ISO timestamp. Anything else is
// dropped rather than failing the whole listing.
fn lenient_timestamp<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn lenient_date<'de, D>(de: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    Ok(raw
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_names_differ_per_view() {
        assert_eq!(StatusNames::TODAY.bucket("todo"), Some(Bucket::Todo));
        assert_eq!(StatusNames::TODAY.bucket("pending"), None);
        assert_eq!(StatusNames::WEEKLY.bucket("pending"), Some(Bucket::Todo));
        assert_eq!(StatusNames::WEEKLY.bucket("completed"), Some(Bucket::Done));
        assert_eq!(StatusNames::WEEKLY.name(Bucket::InProcess), "inProcess");
    }

    #[test]
    fn bucket_steps_clamp_at_edges() {
        assert_eq!(Bucket::Todo.prev(), Bucket::Todo);
        assert_eq!(Bucket::Todo.next(), Bucket::InProcess);
        assert_eq!(Bucket::Done.next(), Bucket::Done);
        assert_eq!("in-process".parse::<Bucket>(), Ok(Bucket::InProcess));
        assert!("later".parse::<Bucket>().is_err());
    }

    #[test]
    fn record_accepts_date_or_timestamp() {
        let json = r#"[
            {"id": 3, "title": "a", "status": "todo", "due_date": null,
             "created_date": "2024-05-01T10:00:00Z", "is_special_day": false},
            {"id": "x9", "title": "b", "status": "done", "due_date": "2024-05-05",
             "created_date": "2024-05-02"},
            {"id": 4, "title": "c", "status": "done", "due_date": "05-05",
             "created_date": "yesterday"}
        ]"#;
        let records: Vec<TaskRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(records[0].id, TaskId::Num(3));
        assert_eq!(
            records[0].created_date.unwrap().to_rfc3339(),
            "2024-05-01T10:00:00+00:00"
        );
        assert_eq!(records[1].id, TaskId::Text("x9".into()));
        assert_eq!(records[1].due_date, NaiveDate::from_ymd_opt(2024, 5, 5));
        assert_eq!(
            records[1].created_date.unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
        );
        assert!(!records[1].is_special_day);
        assert_eq!(records[2].due_date, None);
        assert_eq!(records[2].created_date, None);
    }

    #[test]
    fn record_with_foreign_status_is_skipped() {
        let record = TaskRecord {
            id: TaskId::Num(1),
            title: "t".into(),
            status: "pending".into(),
            due_date: None,
            created_date: None,
            is_special_day: false,
        };
        assert!(Task::from_record(record.clone(), &StatusNames::TODAY).is_none());
        let task = Task::from_record(record, &StatusNames::WEEKLY).unwrap();
        assert_eq!(task.bucket, Bucket::Todo);
    }

    #[test]
    fn task_id_parses_numbers_first() {
        assert_eq!("42".parse::<TaskId>().unwrap(), TaskId::Num(42));
        assert_eq!("abc".parse::<TaskId>().unwrap(), TaskId::Text("abc".into()));
        assert_eq!(TaskId::Num(7).to_string(), "7");
    }
}
