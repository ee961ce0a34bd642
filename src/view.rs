use chrono::{Datelike, Days, Months, NaiveDate};
use std::fmt;

use crate::task::{Bucket, StatusNames, Task, TaskDraft, TaskRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Shifts by `delta` months, or `None` past chrono's calendar range.
    pub fn offset(self, delta: i32) -> Option<Self> {
        let first = self.first_day()?;
        let shifted = if delta >= 0 {
            first.checked_add_months(Months::new(delta.unsigned_abs()))
        } else {
            first.checked_sub_months(Months::new(delta.unsigned_abs()))
        }?;
        Some(Self::of(shifted))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
            .map(Self::of)
            .map_err(|_| format!("expected YYYY-MM, got '{s}'"))
    }
}

/// Sunday on or before `date`.
pub fn week_start_for(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

pub const STRIP_LEN: usize = 5;

/// Which slice of the user's tasks a board shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Today { date: NaiveDate },
    /// One day of the weekly planner; only tasks due that day are shown.
    Weekly { day: NaiveDate },
    Monthly { month: YearMonth },
    SpecialDays,
}

impl View {
    /// The weekly planner opened on the Sunday starting `date`'s week.
    pub fn weekly_containing(date: NaiveDate) -> Self {
        View::Weekly {
            day: week_start_for(date),
        }
    }

    pub fn monthly_containing(date: NaiveDate) -> Self {
        View::Monthly {
            month: YearMonth::of(date),
        }
    }

    pub fn status_names(&self) -> StatusNames {
        match self {
            View::Today { .. } => StatusNames::TODAY,
            _ => StatusNames::WEEKLY,
        }
    }

    /// Column for a server status. Special days are created from every
    /// page, so their board accepts both vocabularies.
    pub fn bucket_of(&self, status: &str) -> Option<Bucket> {
        match self {
            View::SpecialDays => StatusNames::WEEKLY
                .bucket(status)
                .or_else(|| StatusNames::TODAY.bucket(status)),
            _ => self.status_names().bucket(status),
        }
    }

    /// Status words a new task is posted with. Special days always use the
    /// weekly words, whichever board adds them.
    pub fn create_names(&self, draft: &TaskDraft) -> StatusNames {
        if draft.is_special_day {
            StatusNames::WEEKLY
        } else {
            self.status_names()
        }
    }

    /// Whether a server record belongs on this board.
    pub fn admits(&self, record: &TaskRecord) -> bool {
        self.admits_parts(record.due_date, record.is_special_day)
    }

    pub fn admits_task(&self, task: &Task) -> bool {
        self.admits_parts(task.due_date, task.is_special_day)
    }

    fn admits_parts(&self, due_date: Option<NaiveDate>, is_special_day: bool) -> bool {
        match self {
            View::Today { .. } => true,
            View::Weekly { day } => due_date == Some(*day),
            View::Monthly { month } => due_date.is_some_and(|d| month.contains(d)),
            View::SpecialDays => is_special_day,
        }
    }

    /// Due date given to tasks added from this board.
    pub fn default_due_date(&self) -> Option<NaiveDate> {
        match self {
            View::Weekly { day } => Some(*day),
            _ => None,
        }
    }

    /// Key under which a local-storage board snapshot is kept.
    pub fn period_key(&self) -> String {
        match self {
            View::Today { date } => format!("todayTasks_{}", date.format("%Y-%m-%d")),
            View::Weekly { day } => format!("weeklyTasks_{}", day.format("%Y-%m-%d")),
            View::Monthly { month } => format!("monthlyTasks_{month}"),
            View::SpecialDays => "specialDays".to_string(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            View::Today { date } => format!("Today's challenges ({})", date.format("%d/%m/%Y")),
            View::Weekly { day } => format!("Weekly tasks ({})", day.format("%a %d %b %Y")),
            View::Monthly { month } => match month.first_day() {
                Some(first) => format!("Monthly tasks ({})", first.format("%B %Y")),
                None => format!("Monthly tasks ({month})"),
            },
            View::SpecialDays => "Special days".to_string(),
        }
    }

    pub fn next(&self) -> View {
        self.step(1)
    }

    pub fn prev(&self) -> View {
        self.step(-1)
    }

    /// The five days offered from the weekly planner, starting at the
    /// selected one. Empty for other views.
    pub fn day_strip(&self) -> Vec<NaiveDate> {
        match *self {
            View::Weekly { day } => (0..STRIP_LEN as u64)
                .map_while(|i| day.checked_add_days(Days::new(i)))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Jumps to the `slot`th day of [`day_strip`](Self::day_strip).
    pub fn pick_day(&self, slot: usize) -> Option<View> {
        self.day_strip()
            .get(slot)
            .map(|&day| View::Weekly { day })
    }

    // Today and special days have nowhere to go.
    fn step(&self, delta: i32) -> View {
        match *self {
            View::Weekly { day } => {
                let moved = if delta > 0 {
                    day.checked_add_days(Days::new(1))
                } else {
                    day.checked_sub_days(Days::new(1))
                };
                View::Weekly {
                    day: moved.unwrap_or(day),
                }
            }
            View::Monthly { month } => View::Monthly {
                month: month.offset(delta).unwrap_or(month),
            },
            other => other,
        }
    }
}

/// The twelve months starting at `start`, with a cursor that cannot leave
/// that range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    start: YearMonth,
    index: usize,
}

impl MonthWindow {
    pub const LEN: usize = 12;

    pub fn starting(start: YearMonth) -> Self {
        Self { start, index: 0 }
    }

    pub fn current(&self) -> YearMonth {
        self.start.offset(self.index as i32).unwrap_or(self.start)
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 < Self::LEN {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub fn back(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }
}
