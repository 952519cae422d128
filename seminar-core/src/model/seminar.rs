use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;
use crate::error::{DeskError, DeskResult};
use crate::id::RecordId;
use crate::schedule::{Semester, TimeWindow};

/// A seminar as stored by the backend and mirrored locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seminar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    /// Length in hours
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub duration: Option<i64>,
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default, alias = "participants", deserialize_with = "lenient::opt_int")]
    pub capacity: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub date: Option<NaiveDate>,
    /// Free text, "HH:MM AM/PM"
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub start_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_datetime: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::opt_semester")]
    pub semester: Option<Semester>,
    #[serde(default)]
    pub questions: Option<Value>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub certificate_template_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Seminar {
    pub fn new(title: impl Into<String>) -> Self {
        Seminar {
            id: None,
            title: title.into(),
            duration: None,
            speaker: None,
            capacity: None,
            date: None,
            start_time: None,
            end_time: None,
            start_datetime: None,
            end_datetime: None,
            semester: None,
            questions: None,
            metadata: None,
            certificate_template_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn has_id(&self, id: &RecordId) -> bool {
        self.id.as_ref() == Some(id)
    }

    /// The day the seminar takes place: `date`, else the day of `start_datetime`.
    pub fn schedule_date(&self) -> Option<NaiveDate> {
        self.date
            .or_else(|| self.start_datetime.map(|dt| dt.date_naive()))
    }

    /// Point in time used for ordering. A bare `date` counts as midnight UTC.
    pub fn timestamp(&self) -> i64 {
        match self.date {
            Some(date) => date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis())
                .unwrap_or(0),
            None => self
                .start_datetime
                .map(|dt| dt.timestamp_millis())
                .unwrap_or(0),
        }
    }

    /// Year derived from the schedule date; undated seminars fall into 1970.
    pub fn year(&self) -> i32 {
        self.schedule_date().map(|d| d.year()).unwrap_or(1970)
    }

    /// Semester derived from the schedule date, not the stored `semester` field.
    pub fn derived_semester(&self) -> Semester {
        self.schedule_date()
            .map(|d| Semester::of(&d))
            .unwrap_or(Semester::First)
    }

    /// Overwrite this record with an update, keeping identity and creation time.
    pub fn apply_update(&mut self, update: Seminar) {
        let id = self.id.take();
        let created_at = self.created_at;
        *self = Seminar {
            id: update.id.clone().or(id),
            created_at: update.created_at.or(created_at),
            ..update
        };
    }
}

/// Seminar form input before normalization.
///
/// Numeric fields arrive as text; `normalize` coerces them and validates the
/// time window.
#[derive(Debug, Clone, Default)]
pub struct SeminarDraft {
    pub id: Option<RecordId>,
    pub title: String,
    pub duration: Option<String>,
    pub speaker: Option<String>,
    pub capacity: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub semester: Option<String>,
    pub questions: Option<Value>,
    pub metadata: Option<Value>,
    pub certificate_template_url: Option<String>,
}

impl SeminarDraft {
    pub fn normalize(self) -> DeskResult<Seminar> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(DeskError::Validation(
                "Please fill out all required fields.".into(),
            ));
        }

        let date = non_empty(self.date)
            .map(|d| {
                NaiveDate::parse_from_str(&d, "%Y-%m-%d").map_err(|_| {
                    DeskError::Validation(format!("Invalid date '{d}'. Expected YYYY-MM-DD"))
                })
            })
            .transpose()?;

        let window = match (non_empty(self.start_time), non_empty(self.end_time)) {
            (Some(start), Some(end)) => Some(TimeWindow::parse(&start, &end)?),
            (None, None) => None,
            _ => {
                return Err(DeskError::Validation(
                    "Please select both a start and an end time.".into(),
                ));
            }
        };
        let (start_datetime, end_datetime) = match (window, date) {
            (Some(w), Some(d)) => w.on(d),
            _ => (None, None),
        };

        let semester = match non_empty(self.semester) {
            Some(s) => {
                let n = lenient::leading_int(&s)
                    .and_then(|n| u8::try_from(n).ok())
                    .ok_or_else(|| semester_error(&s))?;
                Some(Semester::try_from(n).map_err(|_| semester_error(&s))?)
            }
            None => date.as_ref().map(Semester::of),
        };

        Ok(Seminar {
            id: self.id,
            title,
            duration: parse_int("duration", self.duration)?,
            speaker: non_empty(self.speaker),
            capacity: parse_int("capacity", self.capacity)?,
            date,
            start_time: window.map(|w| w.start.to_string()),
            end_time: window.map(|w| w.end.to_string()),
            start_datetime,
            end_datetime,
            semester,
            questions: self.questions,
            metadata: self.metadata,
            certificate_template_url: non_empty(self.certificate_template_url),
            created_at: None,
            updated_at: None,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_int(field: &str, value: Option<String>) -> DeskResult<Option<i64>> {
    non_empty(value)
        .map(|s| {
            lenient::leading_int(&s).ok_or_else(|| {
                DeskError::Validation(format!("{field} must be a number, got '{s}'"))
            })
        })
        .transpose()
}

fn semester_error(s: &str) -> DeskError {
    DeskError::Validation(format!("Semester must be 1 or 2, got '{s}'"))
}
