use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::RecordId;

/// Check-in/check-out timestamps for one participant at one seminar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(alias = "seminar")]
    pub seminar_id: RecordId,
    pub participant_email: String,
    #[serde(default)]
    pub time_in: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_out: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    pub fn new(seminar_id: RecordId, participant_email: &str, now: DateTime<Utc>) -> Self {
        AttendanceRecord {
            id: Some(RecordId::generate()),
            seminar_id,
            participant_email: participant_email.to_string(),
            time_in: None,
            time_out: None,
            created_at: Some(now),
        }
    }

    pub fn is_for(&self, seminar_id: &RecordId, participant_email: &str) -> bool {
        &self.seminar_id == seminar_id && self.participant_email == participant_email
    }

    /// Set `time_in` unless already set. Returns whether anything changed.
    pub fn check_in(&mut self, at: DateTime<Utc>) -> bool {
        if self.time_in.is_some() {
            return false;
        }
        self.time_in = Some(at);
        true
    }

    /// Set `time_out` unless already set. Returns whether anything changed.
    pub fn check_out(&mut self, at: DateTime<Utc>) -> bool {
        if self.time_out.is_some() {
            return false;
        }
        self.time_out = Some(at);
        true
    }
}

/// Body of `POST /attendance/`. Exactly one of the timestamps is set.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceMark {
    pub seminar: RecordId,
    pub participant_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_out: Option<DateTime<Utc>>,
}

impl AttendanceMark {
    pub fn time_in(seminar: RecordId, participant_email: &str, at: DateTime<Utc>) -> Self {
        AttendanceMark {
            seminar,
            participant_email: participant_email.to_string(),
            time_in: Some(at),
            time_out: None,
        }
    }

    pub fn time_out(seminar: RecordId, participant_email: &str, at: DateTime<Utc>) -> Self {
        AttendanceMark {
            seminar,
            participant_email: participant_email.to_string(),
            time_in: None,
            time_out: Some(at),
        }
    }

    /// Apply this mark to a local record with first-write-wins semantics.
    pub fn apply(&self, record: &mut AttendanceRecord) -> bool {
        let mut changed = false;
        if let Some(at) = self.time_in {
            changed |= record.check_in(at);
        }
        if let Some(at) = self.time_out {
            changed |= record.check_out(at);
        }
        changed
    }
}
