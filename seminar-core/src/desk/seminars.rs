use chrono::Utc;
use tracing::info;

use super::{DELETED_LOCALLY, Desk, LOADED_LOCALLY, SAVED_LOCALLY, Synced, merge};
use crate::error::{DeskError, DeskResult};
use crate::id::RecordId;
use crate::model::{Seminar, SeminarDraft};
use crate::notice::Notifier;
use crate::remote::Transport;
use crate::remote::protocol::{CreateSeminar, DeleteSeminar, ListSeminars, UpdateSeminar};

fn seminar_not_found() -> DeskError {
    DeskError::NotFound("Seminar not found".into())
}

impl<T: Transport, N: Notifier> Desk<T, N> {
    /// All seminars. A successful fetch replaces the local collection.
    pub async fn fetch_seminars(&self) -> DeskResult<Synced<Vec<Seminar>>> {
        match self.call(&ListSeminars).await {
            Ok(seminars) => {
                self.mirror.save(&seminars)?;
                Ok(Synced::remote(seminars))
            }
            Err(_) => Ok(Synced::local(self.mirror.load(), LOADED_LOCALLY)),
        }
    }

    pub async fn create_seminar(&self, draft: SeminarDraft) -> DeskResult<Synced<Seminar>> {
        let mut seminar = match draft.normalize() {
            Ok(seminar) => seminar,
            Err(e) => return self.reject(e),
        };
        seminar.id = None;

        match self.call(&CreateSeminar { seminar: &seminar }).await {
            Ok(created) => {
                self.mirror.update(|list: &mut Vec<Seminar>| match &created.id {
                    Some(id) => merge(list, created.clone(), |s| s.has_id(id)),
                    None => list.push(created.clone()),
                })?;
                Ok(Synced::remote(created))
            }
            Err(_) => {
                seminar.id = Some(RecordId::generate());
                seminar.created_at = Some(Utc::now());
                self.mirror
                    .update(|list: &mut Vec<Seminar>| list.push(seminar.clone()))?;
                info!(title = %seminar.title, "Seminar saved locally");
                Ok(Synced::local(seminar, SAVED_LOCALLY))
            }
        }
    }

    /// Update a seminar by id, or create it when the draft has no id.
    ///
    /// The local copy is updated before the backend is asked, so the mirror
    /// reflects the edit even when the backend rejects it.
    pub async fn update_seminar(&self, draft: SeminarDraft) -> DeskResult<Synced<Seminar>> {
        let Some(id) = draft.id.clone() else {
            return self.create_seminar(draft).await;
        };

        let mut seminar = match draft.normalize() {
            Ok(seminar) => seminar,
            Err(e) => return self.reject(e),
        };
        seminar.updated_at = Some(Utc::now());

        let local = self.mirror.update(|list: &mut Vec<Seminar>| {
            list.iter_mut().find(|s| s.has_id(&id)).map(|existing| {
                existing.apply_update(seminar.clone());
                existing.clone()
            })
        })?;

        match self.call(&UpdateSeminar { id: &id, seminar: &seminar }).await {
            Ok(updated) => {
                self.mirror.update(|list: &mut Vec<Seminar>| {
                    match list.iter_mut().find(|s| s.has_id(&id)) {
                        Some(existing) => existing.apply_update(updated.clone()),
                        None => list.push(updated.clone()),
                    }
                })?;
                Ok(Synced::remote(updated))
            }
            Err(_) => local
                .map(|seminar| Synced::local(seminar, SAVED_LOCALLY))
                .ok_or_else(seminar_not_found),
        }
    }

    /// Delete a seminar on the backend and always from the mirror.
    ///
    /// Returns the removed local copy, if there was one.
    pub async fn delete_seminar(
        &self,
        id: Option<&RecordId>,
    ) -> DeskResult<Synced<Option<Seminar>>> {
        let Some(id) = id else {
            return Err(DeskError::IdRequired);
        };

        let remote = self.call(&DeleteSeminar { id }).await;

        let removed = self.mirror.update(|list: &mut Vec<Seminar>| {
            let idx = list.iter().position(|s| s.has_id(id))?;
            Some(list.remove(idx))
        })?;

        match (remote, removed) {
            (Ok(_), removed) => Ok(Synced::remote(removed)),
            (Err(_), Some(removed)) => {
                self.notifier
                    .notify("Seminar deleted locally (offline or API error).");
                Ok(Synced::local(Some(removed), DELETED_LOCALLY))
            }
            (Err(_), None) => Err(seminar_not_found()),
        }
    }

    /// Replace the local seminar collection wholesale. Records without an
    /// id get a generated one. The backend is not contacted.
    pub fn save_all_seminars(&self, seminars: Vec<Seminar>) -> DeskResult<Vec<Seminar>> {
        let seminars: Vec<Seminar> = seminars
            .into_iter()
            .map(|mut s| {
                if s.id.is_none() {
                    s.id = Some(RecordId::generate());
                }
                s
            })
            .collect();

        self.mirror.save(&seminars)?;
        Ok(seminars)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::desk::Source;
    use crate::desk::testing::{Fixture, ScriptedTransport};
    use crate::remote::RemoteFailure;
    use crate::remote::protocol::Method;

    use super::*;

    fn make_draft(title: &str) -> SeminarDraft {
        SeminarDraft {
            title: title.into(),
            duration: Some("2".into()),
            capacity: Some("25".into()),
            date: Some("2025-03-20".into()),
            ..SeminarDraft::default()
        }
    }

    #[tokio::test]
    async fn test_create_offline_keeps_records_with_odd_dates() {
        let fx = Fixture::offline();
        std::fs::write(
            fx.desk.mirror().path().join("seminars.json"),
            r#"[{"id": 1, "title": "Old", "date": "03/20/2025"},
                {"id": 2, "title": "Fine", "date": "2025-03-21"}]"#,
        )
        .unwrap();

        fx.desk.create_seminar(make_draft("New")).await.unwrap();

        let stored = fx.desk.mirror().load::<Seminar>();
        let titles: Vec<_> = stored.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Old", "Fine", "New"]);
        assert_eq!(stored[0].date, None);
    }

    #[tokio::test]
    async fn test_create_offline_appends_with_generated_id() {
        let fx = Fixture::offline();

        let result = fx.desk.create_seminar(make_draft("Offline")).await.unwrap();

        assert_eq!(result.source, Source::Local(SAVED_LOCALLY));
        assert!(!result.is_authoritative());
        let id = result.data.id.clone().unwrap();
        assert!(id.is_local());
        assert!(result.data.created_at.is_some());

        let stored = fx.desk.mirror().load::<Seminar>();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].has_id(&id));
        assert_eq!(stored[0].capacity, Some(25));
    }

    #[tokio::test]
    async fn test_create_online_merges_canonical_record() {
        let fx = Fixture::new(ScriptedTransport::offline().respond(Ok(json!({
            "id": 41, "title": "Online", "duration": 2, "capacity": 25, "date": "2025-03-20",
            "created_at": "2025-03-01T10:00:00Z"
        }))));

        let result = fx.desk.create_seminar(make_draft("Online")).await.unwrap();

        assert!(result.is_authoritative());
        assert_eq!(result.data.id, Some(RecordId::Number(41)));
        let stored = fx.desk.mirror().load::<Seminar>();
        assert_eq!(stored, vec![result.data]);

        let requests = fx.requests();
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].path, "/seminars/");
        assert_eq!(requests[0].body.as_ref().unwrap()["duration"], 2);
        assert!(fx.notices().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_draft_notifies_and_writes_nothing() {
        let fx = Fixture::offline();
        let mut draft = make_draft("Bad window");
        draft.start_time = Some("10:00 AM".into());
        draft.end_time = Some("09:00 AM".into());

        let err = fx.desk.create_seminar(draft).await.unwrap_err();

        assert!(matches!(err, DeskError::Validation(_)));
        assert_eq!(fx.notices(), vec!["End time must be after start time.".to_string()]);
        assert!(fx.requests().is_empty());
        assert!(fx.desk.mirror().load::<Seminar>().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_replaces_local_collection() {
        let fx = Fixture::new(
            ScriptedTransport::offline().respond(Ok(json!([{"id": 1, "title": "Remote"}]))),
        );
        fx.desk.save_all_seminars(vec![Seminar::new("Stale")]).unwrap();

        let fetched = fx.desk.fetch_seminars().await.unwrap();
        assert!(fetched.is_authoritative());

        // Second fetch finds the backend gone and serves the mirror
        let cached = fx.desk.fetch_seminars().await.unwrap();
        assert_eq!(cached.source, Source::Local(LOADED_LOCALLY));
        assert_eq!(cached.data.len(), 1);
        assert_eq!(cached.data[0].title, "Remote");
    }

    #[tokio::test]
    async fn test_update_offline_changes_local_copy() {
        let fx = Fixture::offline();
        let created = fx.desk.create_seminar(make_draft("Before")).await.unwrap().data;

        let mut draft = make_draft("After");
        draft.id = created.id.clone();
        let updated = fx.desk.update_seminar(draft).await.unwrap();

        assert_eq!(updated.source, Source::Local(SAVED_LOCALLY));
        assert_eq!(updated.data.title, "After");
        assert_eq!(updated.data.created_at, created.created_at);
        assert!(updated.data.updated_at.is_some());

        let stored = fx.desk.mirror().load::<Seminar>();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "After");
    }

    #[tokio::test]
    async fn test_update_unknown_seminar_offline_is_not_found() {
        let fx = Fixture::offline();
        let mut draft = make_draft("Ghost");
        draft.id = Some(RecordId::Number(99));

        let err = fx.desk.update_seminar(draft).await.unwrap_err();
        assert_eq!(err.to_string(), "Seminar not found");
    }

    #[tokio::test]
    async fn test_update_online_uses_put_with_id() {
        let fx = Fixture::new(
            ScriptedTransport::offline().respond(Ok(json!({"id": 7, "title": "Renamed"}))),
        );
        let mut draft = make_draft("Renamed");
        draft.id = Some(RecordId::Number(7));

        let updated = fx.desk.update_seminar(draft).await.unwrap();

        assert!(updated.is_authoritative());
        let request = &fx.requests()[0];
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.path, "/seminars/7/");
        assert_eq!(fx.desk.mirror().load::<Seminar>()[0].title, "Renamed");
    }

    #[tokio::test]
    async fn test_delete_without_id_fails_fast() {
        let fx = Fixture::offline();
        fx.desk.save_all_seminars(vec![Seminar::new("Keep")]).unwrap();

        let err = fx.desk.delete_seminar(None).await.unwrap_err();

        assert!(matches!(err, DeskError::IdRequired));
        assert!(fx.requests().is_empty());
        assert_eq!(fx.desk.mirror().load::<Seminar>().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_offline_removes_local_copy_and_notifies() {
        let fx = Fixture::offline();
        let created = fx.desk.create_seminar(make_draft("Doomed")).await.unwrap().data;

        let result = fx.desk.delete_seminar(created.id.as_ref()).await.unwrap();

        assert_eq!(result.source, Source::Local(DELETED_LOCALLY));
        assert_eq!(result.data.map(|s| s.title), Some("Doomed".to_string()));
        assert!(fx.desk.mirror().load::<Seminar>().is_empty());
        assert!(
            fx.notices()
                .iter()
                .any(|n| n == "Seminar deleted locally (offline or API error).")
        );
    }

    #[tokio::test]
    async fn test_delete_online_treats_empty_body_as_success() {
        let fx = Fixture::new(ScriptedTransport::offline().respond(Ok(json!(null))));
        let mut seminar = Seminar::new("Remote");
        seminar.id = Some(RecordId::Number(3));
        fx.desk.save_all_seminars(vec![seminar]).unwrap();

        let result = fx.desk.delete_seminar(Some(&RecordId::Number(3))).await.unwrap();

        assert!(result.is_authoritative());
        assert!(fx.desk.mirror().load::<Seminar>().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_everywhere_is_not_found() {
        let fx = Fixture::new(ScriptedTransport::offline().respond(Err(
            RemoteFailure::Status {
                status: 404,
                body: Some("{\"error\": \"Seminar not found\"}".into()),
            },
        )));

        let err = fx
            .desk
            .delete_seminar(Some(&RecordId::Number(5)))
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::NotFound(_)));
    }

    #[test]
    fn test_save_all_assigns_missing_ids() {
        let fx = Fixture::offline();
        let mut known = Seminar::new("Known");
        known.id = Some(RecordId::Number(1));

        let saved = fx
            .desk
            .save_all_seminars(vec![known, Seminar::new("New")])
            .unwrap();

        assert_eq!(saved[0].id, Some(RecordId::Number(1)));
        assert!(saved[1].id.as_ref().is_some_and(RecordId::is_local));
        assert_eq!(fx.desk.mirror().load::<Seminar>().len(), 2);
    }
}
