use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::RecordId;

/// Evaluation form answers, keyed by question.
pub type Answers = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(alias = "seminar")]
    pub seminar_id: RecordId,
    pub participant_email: String,
    #[serde(default)]
    pub answers: Answers,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Evaluation {
    pub fn is_for(&self, seminar_id: &RecordId, participant_email: &str) -> bool {
        &self.seminar_id == seminar_id && self.participant_email == participant_email
    }
}

/// Body of `POST /evaluations/`.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationPayload {
    pub seminar: RecordId,
    pub participant_email: String,
    pub answers: Answers,
}

impl EvaluationPayload {
    pub fn into_local(self, now: DateTime<Utc>) -> Evaluation {
        Evaluation {
            id: Some(RecordId::generate()),
            seminar_id: self.seminar,
            participant_email: self.participant_email,
            answers: self.answers,
            created_at: Some(now),
        }
    }
}
