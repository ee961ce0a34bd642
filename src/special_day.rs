use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::task::TaskDraft;

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Month given by number (`3`, `03`) or English name (`March`, `mar`).
pub fn parse_month(raw: &str) -> Result<u32, ValidationError> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u32>() {
        return if (1..=12).contains(&n) {
            Ok(n)
        } else {
            Err(ValidationError::UnknownMonth(raw.to_string()))
        };
    }
    let lower = raw.to_ascii_lowercase();
    MONTH_NAMES
        .iter()
        .position(|name| lower.len() >= 3 && name.starts_with(&lower))
        .map(|i| i as u32 + 1)
        .ok_or_else(|| ValidationError::UnknownMonth(raw.to_string()))
}

/// A task pinned to a yearly date, as entered in the special-day form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialDayForm {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub title: String,
}

impl SpecialDayForm {
    pub fn validate(&self) -> Result<NaiveDate, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Missing("task"));
        }
        let month = self.month.ok_or(ValidationError::Missing("month"))?;
        let day = self.day.ok_or(ValidationError::Missing("day"))?;
        NaiveDate::from_ymd_opt(self.year, month, day).ok_or(ValidationError::NoSuchDate {
            year: self.year,
            month,
            day,
        })
    }

    pub fn into_draft(self) -> Result<TaskDraft, ValidationError> {
        let date = self.validate()?;
        let mut draft = TaskDraft::new(self.title.trim()).due(Some(date));
        draft.is_special_day = true;
        Ok(draft)
    }
}
