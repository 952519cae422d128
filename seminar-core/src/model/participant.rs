use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::RecordId;

/// Registration of a participant for a seminar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedParticipant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(alias = "seminar")]
    pub seminar_id: RecordId,
    pub participant_email: String,
    #[serde(default)]
    pub participant_name: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}

impl JoinedParticipant {
    pub fn is_for(&self, seminar_id: &RecordId, participant_email: &str) -> bool {
        &self.seminar_id == seminar_id && self.participant_email == participant_email
    }
}

/// What a participant submits when joining.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub participant_email: String,
    pub participant_name: Option<String>,
    pub metadata: Option<Value>,
}

/// Body of `POST /joined-participants/`.
#[derive(Debug, Clone, Serialize)]
pub struct JoinPayload {
    pub seminar: RecordId,
    pub participant_email: String,
    pub participant_name: Option<String>,
    pub metadata: Option<Value>,
}

impl JoinPayload {
    pub fn new(seminar: RecordId, registration: Registration) -> Self {
        JoinPayload {
            seminar,
            participant_email: registration.participant_email,
            participant_name: registration.participant_name,
            metadata: registration.metadata,
        }
    }

    pub fn into_local(self, now: DateTime<Utc>) -> JoinedParticipant {
        JoinedParticipant {
            id: Some(RecordId::generate()),
            seminar_id: self.seminar,
            participant_email: self.participant_email,
            participant_name: self.participant_name,
            metadata: self.metadata,
            joined_at: Some(now),
        }
    }
}
