use chrono::Utc;

use super::{Desk, LOADED_LOCALLY, SAVED_LOCALLY, Synced, merge, refresh};
use crate::error::DeskResult;
use crate::id::RecordId;
use crate::model::{JoinPayload, JoinedParticipant, Registration};
use crate::notice::Notifier;
use crate::remote::Transport;
use crate::remote::protocol::{JoinSeminar, ListJoinedParticipants};

impl<T: Transport, N: Notifier> Desk<T, N> {
    /// Register a participant for a seminar. Joining again replaces the
    /// earlier registration for the same email.
    pub async fn join_seminar(
        &self,
        seminar_id: &RecordId,
        mut registration: Registration,
    ) -> DeskResult<Synced<JoinedParticipant>> {
        registration.participant_email = self
            .require_email(&registration.participant_email)?
            .to_string();
        let payload = JoinPayload::new(seminar_id.clone(), registration);
        let email = payload.participant_email.clone();

        let (participant, source) = match self.call(&JoinSeminar { payload: &payload }).await {
            Ok(participant) => (participant, None),
            Err(_) => (payload.into_local(Utc::now()), Some(SAVED_LOCALLY)),
        };

        self.mirror.update(|list: &mut Vec<JoinedParticipant>| {
            merge(list, participant.clone(), |p| p.is_for(seminar_id, &email))
        })?;

        Ok(match source {
            None => Synced::remote(participant),
            Some(reason) => Synced::local(participant, reason),
        })
    }

    /// Everyone registered for a seminar. The local fallback lists all
    /// registrations for the seminar, not only the session participant's.
    pub async fn fetch_joined_participants(
        &self,
        seminar_id: &RecordId,
    ) -> DeskResult<Synced<Vec<JoinedParticipant>>> {
        match self.call(&ListJoinedParticipants { seminar_id }).await {
            Ok(participants) => {
                self.mirror.update(|list: &mut Vec<JoinedParticipant>| {
                    refresh(list, seminar_id, &participants)
                })?;
                Ok(Synced::remote(participants))
            }
            Err(_) => {
                let mut participants: Vec<JoinedParticipant> = self
                    .mirror
                    .load::<JoinedParticipant>()
                    .into_iter()
                    .filter(|p| &p.seminar_id == seminar_id)
                    .collect();
                participants.sort_by_key(|p| p.joined_at);
                Ok(Synced::local(participants, LOADED_LOCALLY))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::desk::testing::{Fixture, ScriptedTransport};
    use crate::remote::RemoteFailure;

    use super::*;

    fn registration(email: &str) -> Registration {
        Registration {
            participant_email: email.into(),
            participant_name: Some("Ana".into()),
            metadata: Some(json!({"year": "3", "section": "B"})),
        }
    }

    #[tokio::test]
    async fn test_join_offline_saves_locally() {
        let fx = Fixture::offline();
        let seminar = RecordId::Number(1);

        let joined = fx
            .desk
            .join_seminar(&seminar, registration("ana@example.com"))
            .await
            .unwrap();

        assert_eq!(joined.source, crate::desk::Source::Local(SAVED_LOCALLY));
        assert!(joined.data.joined_at.is_some());
        assert!(joined.data.id.as_ref().is_some_and(RecordId::is_local));
        assert_eq!(fx.desk.mirror().load::<JoinedParticipant>(), vec![joined.data]);
    }

    #[tokio::test]
    async fn test_rejoin_replaces_registration() {
        let fx = Fixture::offline();
        let seminar = RecordId::Number(1);

        fx.desk.join_seminar(&seminar, registration("ana@example.com")).await.unwrap();
        let mut again = registration("ana@example.com");
        again.participant_name = Some("Ana Maria".into());
        fx.desk.join_seminar(&seminar, again).await.unwrap();

        let stored = fx.desk.mirror().load::<JoinedParticipant>();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].participant_name.as_deref(), Some("Ana Maria"));
    }

    #[tokio::test]
    async fn test_join_online_posts_backend_field_names() {
        let fx = Fixture::new(ScriptedTransport::offline().respond(Ok(json!({
            "id": 3, "seminar": 1, "participant_email": "ana@example.com",
            "participant_name": "Ana", "joined_at": "2025-03-01T08:00:00Z"
        }))));

        let joined = fx
            .desk
            .join_seminar(&RecordId::Number(1), registration("ana@example.com"))
            .await
            .unwrap();

        assert!(joined.is_authoritative());
        let request = &fx.requests()[0];
        assert_eq!(request.path, "/joined-participants/");
        let body = request.body.as_ref().unwrap();
        assert_eq!(body["seminar"], 1);
        assert_eq!(body["metadata"]["section"], "B");
    }

    #[tokio::test]
    async fn test_fetch_keeps_registration_saved_offline() {
        let fx = Fixture::new(
            ScriptedTransport::offline()
                .respond(Err(RemoteFailure::Network("down".into())))
                .respond(Ok(json!([]))),
        );
        let seminar = RecordId::Number(1);
        fx.desk.join_seminar(&seminar, registration("ana@example.com")).await.unwrap();

        let fetched = fx.desk.fetch_joined_participants(&seminar).await.unwrap();

        assert!(fetched.is_authoritative());
        assert!(fetched.data.is_empty());
        let stored = fx.desk.mirror().load::<JoinedParticipant>();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].participant_email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_fetch_participants_offline_filters_by_seminar() {
        let fx = Fixture::offline();
        fx.desk.join_seminar(&RecordId::Number(1), registration("a@example.com")).await.unwrap();
        fx.desk.join_seminar(&RecordId::Number(2), registration("b@example.com")).await.unwrap();

        let list = fx.desk.fetch_joined_participants(&RecordId::Number(1)).await.unwrap();

        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].participant_email, "a@example.com");
    }
}
