//! Reconciliation between the backend and the local mirror.
//!
//! Every [`Desk`] operation follows the same pattern: build a normalized
//! payload, try the backend, and on success merge the canonical record into
//! the mirror. On any backend failure the equivalent change is applied to the
//! mirror instead and the result is marked [`Source::Local`]. Backend failures
//! never surface as errors; only invalid input and missing records do.

mod attendance;
mod certificate;
mod evaluations;
mod participants;
mod seminars;

use std::fmt;

use crate::error::{DeskError, DeskResult};
use crate::id::RecordId;
use crate::mirror::{Mirror, Session};
use crate::model::{AttendanceRecord, Evaluation, JoinedParticipant};
use crate::notice::Notifier;
use crate::remote::protocol::{Endpoint, Health, HealthCheck};
use crate::remote::{Remote, RemoteFailure, Transport};

pub const SAVED_LOCALLY: &str = "Saved locally";
pub const DELETED_LOCALLY: &str = "Deleted locally";
pub const LOADED_LOCALLY: &str = "Loaded from local mirror";

/// Where the data in a [`Synced`] result was confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Confirmed by the backend.
    Remote,
    /// Only applied to (or read from) the local mirror.
    Local(&'static str),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Source::Remote => write!(f, "Synced"),
            Source::Local(reason) => write!(f, "{reason}"),
        }
    }
}

/// Result of a desk operation along with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Synced<T> {
    pub data: T,
    pub source: Source,
}

impl<T> Synced<T> {
    pub fn remote(data: T) -> Self {
        Synced {
            data,
            source: Source::Remote,
        }
    }

    pub fn local(data: T, reason: &'static str) -> Self {
        Synced {
            data,
            source: Source::Local(reason),
        }
    }

    pub fn is_authoritative(&self) -> bool {
        self.source == Source::Remote
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Synced<U> {
        Synced {
            data: f(self.data),
            source: self.source,
        }
    }
}

/// Data-access service owning the backend shim and the local mirror.
pub struct Desk<T, N> {
    remote: Remote<T>,
    mirror: Mirror,
    notifier: N,
}

impl<T: Transport, N: Notifier> Desk<T, N> {
    pub fn new(transport: T, mirror: Mirror, notifier: N) -> Self {
        Desk {
            remote: Remote::new(transport),
            mirror,
            notifier,
        }
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn session(&self) -> Session {
        self.mirror.session()
    }

    pub fn save_session(&self, session: &Session) -> DeskResult<()> {
        self.mirror.save_session(session)
    }

    /// Ask the backend whether it is up. Unlike the entity operations there
    /// is no local substitute, so the failure is returned as is.
    pub async fn health(&self) -> Result<Health, RemoteFailure> {
        self.call(&HealthCheck).await
    }

    async fn call<E: Endpoint>(&self, endpoint: &E) -> Result<E::Response, RemoteFailure> {
        self.remote.call(endpoint, &self.notifier).await
    }

    /// Announce a rejected input and abort the operation.
    fn reject<X>(&self, error: DeskError) -> DeskResult<X> {
        self.notifier.notify(&error.to_string());
        Err(error)
    }

    fn require_email<'a>(&self, participant_email: &'a str) -> DeskResult<&'a str> {
        let email = participant_email.trim();
        if email.is_empty() {
            return self.reject(DeskError::Validation(
                "Participant email is required.".into(),
            ));
        }
        Ok(email)
    }
}

/// A mirror row keyed by seminar and participant.
trait PairRow: Clone {
    fn row_id(&self) -> Option<&RecordId>;
    fn seminar(&self) -> &RecordId;
    fn email(&self) -> &str;
}

macro_rules! pair_row {
    ($($ty:ty),*) => {$(
        impl PairRow for $ty {
            fn row_id(&self) -> Option<&RecordId> {
                self.id.as_ref()
            }

            fn seminar(&self) -> &RecordId {
                &self.seminar_id
            }

            fn email(&self) -> &str {
                &self.participant_email
            }
        }
    )*};
}

pair_row!(AttendanceRecord, Evaluation, JoinedParticipant);

/// Replace the rows of one seminar with the backend's listing. Rows saved
/// only locally survive unless the listing has a row for the same pair.
fn refresh<C: PairRow>(records: &mut Vec<C>, seminar_id: &RecordId, fetched: &[C]) {
    records.retain(|r| {
        if r.seminar() != seminar_id {
            return true;
        }
        let offline = r.row_id().is_some_and(RecordId::is_local);
        offline && !fetched.iter().any(|f| f.seminar() == r.seminar() && f.email() == r.email())
    });
    records.extend(fetched.iter().cloned());
}

/// Replace the first record matching `same`, or append.
fn merge<C>(records: &mut Vec<C>, record: C, same: impl Fn(&C) -> bool) {
    match records.iter_mut().find(|r| same(r)) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::testing::{Fixture, ScriptedTransport};
    use super::*;

    #[tokio::test]
    async fn test_network_failure_is_announced_with_base_url() {
        let fx = Fixture::offline();
        let result = fx.desk.health().await;

        assert!(matches!(result, Err(RemoteFailure::Network(_))));
        let notices = fx.notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("http://backend.test/api"));
        assert!(notices[0].contains("Using local fallback"));
    }

    #[tokio::test]
    async fn test_server_error_is_announced_with_status() {
        let fx = Fixture::new(ScriptedTransport::offline().respond(Err(
            RemoteFailure::Status {
                status: 500,
                body: None,
            },
        )));
        let _ = fx.desk.health().await;

        assert_eq!(fx.notices(), vec!["Server error: 500. Using local fallback.".to_string()]);
    }

    #[tokio::test]
    async fn test_unparseable_success_body_is_a_failure() {
        let fx = Fixture::new(ScriptedTransport::offline().respond(Ok(json!({"unexpected": 1}))));

        assert!(matches!(fx.desk.health().await, Err(RemoteFailure::Malformed(_))));
        assert_eq!(fx.notices().len(), 1);
    }

    #[tokio::test]
    async fn test_health_success_is_silent() {
        let fx = Fixture::new(
            ScriptedTransport::offline().respond(Ok(json!({"status": "Backend is running"}))),
        );

        let health = fx.desk.health().await.unwrap();
        assert_eq!(health.status, "Backend is running");
        assert!(fx.notices().is_empty());
    }

    #[test]
    fn test_merge_replaces_or_appends() {
        let mut list = vec![(1, "a"), (2, "b")];
        merge(&mut list, (2, "B"), |r| r.0 == 2);
        merge(&mut list, (3, "c"), |r| r.0 == 3);
        assert_eq!(list, vec![(1, "a"), (2, "B"), (3, "c")]);
    }
}
