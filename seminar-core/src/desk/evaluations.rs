use chrono::Utc;

use super::{Desk, LOADED_LOCALLY, SAVED_LOCALLY, Synced, merge, refresh};
use crate::error::DeskResult;
use crate::id::RecordId;
use crate::model::{Answers, Evaluation, EvaluationPayload};
use crate::notice::Notifier;
use crate::remote::Transport;
use crate::remote::protocol::{ListEvaluations, SubmitEvaluation};

impl<T: Transport, N: Notifier> Desk<T, N> {
    /// Submit evaluation answers. The mirror keeps one evaluation per
    /// seminar and participant; a resubmission replaces the earlier one.
    pub async fn save_evaluation(
        &self,
        seminar_id: &RecordId,
        participant_email: &str,
        answers: Answers,
    ) -> DeskResult<Synced<Evaluation>> {
        let email = self.require_email(participant_email)?;
        let payload = EvaluationPayload {
            seminar: seminar_id.clone(),
            participant_email: email.to_string(),
            answers,
        };

        let (evaluation, source) = match self.call(&SubmitEvaluation { payload: &payload }).await
        {
            Ok(evaluation) => (evaluation, None),
            Err(_) => (payload.into_local(Utc::now()), Some(SAVED_LOCALLY)),
        };

        self.mirror.update(|list: &mut Vec<Evaluation>| {
            merge(list, evaluation.clone(), |e| e.is_for(seminar_id, email))
        })?;

        Ok(match source {
            None => Synced::remote(evaluation),
            Some(reason) => Synced::local(evaluation, reason),
        })
    }

    /// Evaluations for a seminar, optionally only those of one participant.
    pub async fn fetch_evaluations(
        &self,
        seminar_id: &RecordId,
        participant_email: Option<&str>,
    ) -> DeskResult<Synced<Vec<Evaluation>>> {
        let by_email =
            |e: &Evaluation| participant_email.is_none_or(|email| e.participant_email == email);

        match self.call(&ListEvaluations { seminar_id }).await {
            Ok(evaluations) => {
                self.mirror
                    .update(|list: &mut Vec<Evaluation>| refresh(list, seminar_id, &evaluations))?;
                Ok(Synced::remote(
                    evaluations.into_iter().filter(by_email).collect(),
                ))
            }
            Err(_) => {
                let evaluations = self
                    .mirror
                    .load::<Evaluation>()
                    .into_iter()
                    .filter(|e| &e.seminar_id == seminar_id)
                    .filter(by_email)
                    .collect();
                Ok(Synced::local(evaluations, LOADED_LOCALLY))
            }
        }
    }

    /// Whether a participant has already evaluated a seminar. A missing or
    /// blank email means the session's current participant. A hit on the
    /// backend wins; otherwise the mirror is consulted.
    pub async fn has_evaluated(
        &self,
        seminar_id: &RecordId,
        participant_email: Option<&str>,
    ) -> DeskResult<bool> {
        let session = self.session();
        let email = participant_email
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .unwrap_or_else(|| session.current_email());

        let on_backend = self
            .call(&ListEvaluations { seminar_id })
            .await
            .is_ok_and(|evaluations| evaluations.iter().any(|e| e.participant_email == email));
        if on_backend {
            return Ok(true);
        }

        Ok(self
            .mirror
            .load::<Evaluation>()
            .iter()
            .any(|e| e.is_for(seminar_id, email)))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::desk::testing::{Fixture, ScriptedTransport};
    use crate::mirror::Session;
    use crate::remote::RemoteFailure;

    use super::*;

    fn answers(rating: u8) -> Answers {
        let mut answers = Answers::new();
        answers.insert("rating".into(), json!(rating));
        answers.insert("comment".into(), json!("Clear and practical"));
        answers
    }

    #[tokio::test]
    async fn test_has_evaluated_after_save() {
        let fx = Fixture::offline();
        let seminar = RecordId::Number(1);

        let saved = fx
            .desk
            .save_evaluation(&seminar, "ana@example.com", answers(5))
            .await
            .unwrap();

        assert!(!saved.is_authoritative());
        assert!(fx.desk.has_evaluated(&seminar, Some("ana@example.com")).await.unwrap());
        assert!(!fx.desk.has_evaluated(&seminar, Some("ben@example.com")).await.unwrap());
        assert!(!fx.desk.has_evaluated(&RecordId::Number(2), Some("ana@example.com")).await.unwrap());
    }

    #[tokio::test]
    async fn test_has_evaluated_defaults_to_session_email() {
        let fx = Fixture::offline();
        let seminar = RecordId::Number(1);
        fx.desk
            .save_session(&Session {
                user_email: Some("ana@example.com".into()),
                ..Session::default()
            })
            .unwrap();

        fx.desk.save_evaluation(&seminar, "ana@example.com", answers(4)).await.unwrap();

        assert!(fx.desk.has_evaluated(&seminar, None).await.unwrap());
    }

    #[tokio::test]
    async fn test_blank_email_falls_back_to_session() {
        let fx = Fixture::offline();
        let seminar = RecordId::Number(1);
        fx.desk
            .save_session(&Session {
                participant_email: Some("ana@example.com".into()),
                ..Session::default()
            })
            .unwrap();
        fx.desk.save_evaluation(&seminar, "ana@example.com", answers(3)).await.unwrap();

        assert!(fx.desk.has_evaluated(&seminar, Some("")).await.unwrap());
        assert!(fx.desk.has_evaluated(&seminar, Some("  ")).await.unwrap());
    }

    #[tokio::test]
    async fn test_fetch_keeps_evaluation_saved_offline() {
        let fx = Fixture::new(
            ScriptedTransport::offline()
                .respond(Err(RemoteFailure::Network("down".into())))
                .respond(Ok(json!([]))),
        );
        let seminar = RecordId::Number(1);
        fx.desk.save_evaluation(&seminar, "ana@example.com", answers(4)).await.unwrap();

        let fetched = fx.desk.fetch_evaluations(&seminar, None).await.unwrap();

        assert!(fetched.is_authoritative());
        assert!(fetched.data.is_empty());
        assert_eq!(fx.desk.mirror().load::<Evaluation>().len(), 1);
        assert!(fx.desk.has_evaluated(&seminar, Some("ana@example.com")).await.unwrap());
    }

    #[tokio::test]
    async fn test_has_evaluated_from_backend() {
        let fx = Fixture::new(ScriptedTransport::offline().respond(Ok(json!([
            {"id": 1, "seminar": 9, "participant_email": "ana@example.com", "answers": {}}
        ]))));

        assert!(fx.desk.has_evaluated(&RecordId::Number(9), Some("ana@example.com")).await.unwrap());
        assert_eq!(fx.requests()[0].path, "/evaluations/9/");
    }

    #[tokio::test]
    async fn test_resubmission_replaces_local_evaluation() {
        let fx = Fixture::offline();
        let seminar = RecordId::Number(1);

        fx.desk.save_evaluation(&seminar, "ana@example.com", answers(2)).await.unwrap();
        fx.desk.save_evaluation(&seminar, "ana@example.com", answers(5)).await.unwrap();

        let stored = fx.desk.mirror().load::<Evaluation>();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].answers["rating"], 5);
    }

    #[tokio::test]
    async fn test_fetch_evaluations_filters_by_email() {
        let fx = Fixture::new(ScriptedTransport::offline().respond(Ok(json!([
            {"id": 1, "seminar": 1, "participant_email": "ana@example.com", "answers": {}},
            {"id": 2, "seminar": 1, "participant_email": "ben@example.com", "answers": {}}
        ]))));

        let mine = fx
            .desk
            .fetch_evaluations(&RecordId::Number(1), Some("ben@example.com"))
            .await
            .unwrap();

        assert!(mine.is_authoritative());
        assert_eq!(mine.data.len(), 1);
        assert_eq!(mine.data[0].id, Some(RecordId::Number(2)));
        // The mirror keeps the full list
        assert_eq!(fx.desk.mirror().load::<Evaluation>().len(), 2);
    }
}
