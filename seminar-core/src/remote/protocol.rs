//! REST endpoints exposed by the seminar backend.
//!
//! Each endpoint is a struct implementing [`Endpoint`]; the response type is
//! tied to the endpoint so callers get typed results.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::RecordId;
use crate::model::{
    AttendanceMark, AttendanceRecord, Evaluation, EvaluationPayload, JoinPayload,
    JoinedParticipant, Seminar,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// A fully built request, relative to the API base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

pub trait Endpoint {
    type Response: DeserializeOwned;

    fn method(&self) -> Method;
    fn path(&self) -> String;

    fn body(&self) -> serde_json::Result<Option<Value>> {
        Ok(None)
    }

    fn request(&self) -> serde_json::Result<ApiRequest> {
        Ok(ApiRequest {
            method: self.method(),
            path: self.path(),
            body: self.body()?,
        })
    }
}

// ============================================================================
// Seminars
// ============================================================================

/// `GET /seminars/`
pub struct ListSeminars;

impl Endpoint for ListSeminars {
    type Response = Vec<Seminar>;

    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> String {
        "/seminars/".into()
    }
}

/// `POST /seminars/`
pub struct CreateSeminar<'a> {
    pub seminar: &'a Seminar,
}

impl Endpoint for CreateSeminar<'_> {
    type Response = Seminar;

    fn method(&self) -> Method {
        Method::Post
    }

    fn path(&self) -> String {
        "/seminars/".into()
    }

    fn body(&self) -> serde_json::Result<Option<Value>> {
        serde_json::to_value(self.seminar).map(Some)
    }
}

/// `PUT /seminars/{id}/`
pub struct UpdateSeminar<'a> {
    pub id: &'a RecordId,
    pub seminar: &'a Seminar,
}

impl Endpoint for UpdateSeminar<'_> {
    type Response = Seminar;

    fn method(&self) -> Method {
        Method::Put
    }

    fn path(&self) -> String {
        format!("/seminars/{}/", self.id)
    }

    fn body(&self) -> serde_json::Result<Option<Value>> {
        serde_json::to_value(self.seminar).map(Some)
    }
}

/// `DELETE /seminars/{id}/`
pub struct DeleteSeminar<'a> {
    pub id: &'a RecordId,
}

impl Endpoint for DeleteSeminar<'_> {
    // 204 with an empty body
    type Response = IgnoredAny;

    fn method(&self) -> Method {
        Method::Delete
    }

    fn path(&self) -> String {
        format!("/seminars/{}/", self.id)
    }
}

// ============================================================================
// Attendance
// ============================================================================

/// `POST /attendance/`
pub struct MarkAttendance<'a> {
    pub mark: &'a AttendanceMark,
}

impl Endpoint for MarkAttendance<'_> {
    type Response = AttendanceRecord;

    fn method(&self) -> Method {
        Method::Post
    }

    fn path(&self) -> String {
        "/attendance/".into()
    }

    fn body(&self) -> serde_json::Result<Option<Value>> {
        serde_json::to_value(self.mark).map(Some)
    }
}

/// `GET /attendance/{seminar}/`
pub struct ListAttendance<'a> {
    pub seminar_id: &'a RecordId,
}

impl Endpoint for ListAttendance<'_> {
    type Response = Vec<AttendanceRecord>;

    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> String {
        format!("/attendance/{}/", self.seminar_id)
    }
}

// ============================================================================
// Joined participants
// ============================================================================

/// `POST /joined-participants/`
pub struct JoinSeminar<'a> {
    pub payload: &'a JoinPayload,
}

impl Endpoint for JoinSeminar<'_> {
    type Response = JoinedParticipant;

    fn method(&self) -> Method {
        Method::Post
    }

    fn path(&self) -> String {
        "/joined-participants/".into()
    }

    fn body(&self) -> serde_json::Result<Option<Value>> {
        serde_json::to_value(self.payload).map(Some)
    }
}

/// `GET /joined-participants/{seminar}/`
pub struct ListJoinedParticipants<'a> {
    pub seminar_id: &'a RecordId,
}

impl Endpoint for ListJoinedParticipants<'_> {
    type Response = Vec<JoinedParticipant>;

    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> String {
        format!("/joined-participants/{}/", self.seminar_id)
    }
}

// ============================================================================
// Evaluations
// ============================================================================

/// `POST /evaluations/`
pub struct SubmitEvaluation<'a> {
    pub payload: &'a EvaluationPayload,
}

impl Endpoint for SubmitEvaluation<'_> {
    type Response = Evaluation;

    fn method(&self) -> Method {
        Method::Post
    }

    fn path(&self) -> String {
        "/evaluations/".into()
    }

    fn body(&self) -> serde_json::Result<Option<Value>> {
        serde_json::to_value(self.payload).map(Some)
    }
}

/// `GET /evaluations/{seminar}/`
pub struct ListEvaluations<'a> {
    pub seminar_id: &'a RecordId,
}

impl Endpoint for ListEvaluations<'_> {
    type Response = Vec<Evaluation>;

    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> String {
        format!("/evaluations/{}/", self.seminar_id)
    }
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub storage: Option<String>,
}

/// `GET /health/`
pub struct HealthCheck;

impl Endpoint for HealthCheck {
    type Response = Health;

    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> String {
        "/health/".into()
    }
}
