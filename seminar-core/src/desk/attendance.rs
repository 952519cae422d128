use chrono::Utc;
use tracing::info;

use super::{Desk, LOADED_LOCALLY, SAVED_LOCALLY, Synced, merge, refresh};
use crate::error::DeskResult;
use crate::id::RecordId;
use crate::model::{AttendanceMark, AttendanceRecord};
use crate::notice::Notifier;
use crate::remote::Transport;
use crate::remote::protocol::{ListAttendance, MarkAttendance};

impl<T: Transport, N: Notifier> Desk<T, N> {
    /// Check a participant in. Only the first check-in is kept.
    pub async fn record_time_in(
        &self,
        seminar_id: &RecordId,
        participant_email: &str,
    ) -> DeskResult<Synced<AttendanceRecord>> {
        let email = self.require_email(participant_email)?;
        self.mark_attendance(AttendanceMark::time_in(seminar_id.clone(), email, Utc::now()))
            .await
    }

    /// Check a participant out. Only the first check-out is kept; checking
    /// out without a check-in leaves `time_in` empty.
    pub async fn record_time_out(
        &self,
        seminar_id: &RecordId,
        participant_email: &str,
    ) -> DeskResult<Synced<AttendanceRecord>> {
        let email = self.require_email(participant_email)?;
        self.mark_attendance(AttendanceMark::time_out(seminar_id.clone(), email, Utc::now()))
            .await
    }

    async fn mark_attendance(&self, mark: AttendanceMark) -> DeskResult<Synced<AttendanceRecord>> {
        let (seminar_id, email) = (&mark.seminar, mark.participant_email.as_str());

        match self.call(&MarkAttendance { mark: &mark }).await {
            Ok(record) => {
                self.mirror.update(|list: &mut Vec<AttendanceRecord>| {
                    merge(list, record.clone(), |r| r.is_for(seminar_id, email))
                })?;
                Ok(Synced::remote(record))
            }
            Err(_) => {
                let record = self.mirror.update(|list: &mut Vec<AttendanceRecord>| {
                    let idx = match list.iter().position(|r| r.is_for(seminar_id, email)) {
                        Some(idx) => idx,
                        None => {
                            let now = mark.time_in.or(mark.time_out).unwrap_or_else(Utc::now);
                            list.push(AttendanceRecord::new(seminar_id.clone(), email, now));
                            list.len() - 1
                        }
                    };
                    mark.apply(&mut list[idx]);
                    list[idx].clone()
                })?;
                info!(seminar = %seminar_id, email, "Attendance saved locally");
                Ok(Synced::local(record, SAVED_LOCALLY))
            }
        }
    }

    /// Attendance rows for a seminar, oldest first when served locally.
    pub async fn fetch_attendance(
        &self,
        seminar_id: &RecordId,
    ) -> DeskResult<Synced<Vec<AttendanceRecord>>> {
        match self.call(&ListAttendance { seminar_id }).await {
            Ok(records) => {
                self.mirror.update(|list: &mut Vec<AttendanceRecord>| {
                    refresh(list, seminar_id, &records)
                })?;
                Ok(Synced::remote(records))
            }
            Err(_) => {
                let mut records: Vec<AttendanceRecord> = self
                    .mirror
                    .load::<AttendanceRecord>()
                    .into_iter()
                    .filter(|r| &r.seminar_id == seminar_id)
                    .collect();
                records.sort_by_key(|r| r.created_at);
                Ok(Synced::local(records, LOADED_LOCALLY))
            }
        }
    }
}
