//! In-memory resume store used in demo mode and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::resume::{NewResume, ResumeUpdate, StoredResume};
use crate::resumes::{ResumeStore, StorageError};

#[derive(Default)]
pub struct InMemoryResumeStore {
    resumes: RwLock<HashMap<Uuid, StoredResume>>,
}

impl InMemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeStore for InMemoryResumeStore {
    async fn save(&self, resume: NewResume) -> Result<Uuid, StorageError> {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let stored = StoredResume {
            id,
            user_id: resume.user_id,
            input: resume.input,
            generated_resume: resume.generated_resume,
            created_at: now,
            updated_at: now,
        };
        self.resumes.write().await.insert(id, stored);
        Ok(id)
    }

    async fn update(&self, id: Uuid, update: ResumeUpdate) -> Result<StoredResume, StorageError> {
        let mut resumes = self.resumes.write().await;
        let stored = resumes.get_mut(&id).ok_or(StorageError::NotFound(id))?;
        stored.apply(update, Utc::now());
        Ok(stored.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<StoredResume>, StorageError> {
        Ok(self.resumes.read().await.get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<StoredResume>, StorageError> {
        Ok(self
            .resumes
            .read()
            .await
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::fixtures::sample_input;

    fn new_resume(user_id: Uuid) -> NewResume {
        NewResume {
            user_id,
            input: sample_input(),
            generated_resume: Some("JANE DOE".to_string()),
        }
    }

    #[tokio::test]
    async fn test_save_then_get_round_trips() {
        let store = InMemoryResumeStore::new();
        let user = Uuid::new_v4();
        let resume = new_resume(user);

        let id = store.save(resume.clone()).await.unwrap();
        let stored = store.get(id).await.unwrap().unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.user_id, resume.user_id);
        assert_eq!(stored.input, resume.input);
        assert_eq!(stored.generated_resume, resume.generated_resume);
        assert_eq!(stored.created_at, stored.updated_at);
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let store = InMemoryResumeStore::new();
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_merges_and_keeps_creation_time() {
        let store = InMemoryResumeStore::new();
        let id = store.save(new_resume(Uuid::new_v4())).await.unwrap();
        let before = store.get(id).await.unwrap().unwrap();

        let mut input = sample_input();
        input.job_title = "Staff Engineer".to_string();
        let updated = store
            .update(
                id,
                ResumeUpdate {
                    input: Some(input),
                    generated_resume: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.input.job_title, "Staff Engineer");
        assert_eq!(updated.generated_resume, before.generated_resume);
        assert_eq!(updated.created_at, before.created_at);
        assert!(updated.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let store = InMemoryResumeStore::new();
        let id = Uuid::new_v4();
        let err = store.update(id, ResumeUpdate::default()).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_list_by_user_filters_on_owner() {
        let store = InMemoryResumeStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store.save(new_resume(alice)).await.unwrap();
        store.save(new_resume(alice)).await.unwrap();
        store.save(new_resume(bob)).await.unwrap();

        let listed = store.list_by_user(alice).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|r| r.user_id == alice));
    }
}
