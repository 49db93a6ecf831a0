//! Resume persistence. Backends implement `ResumeStore` and are injected into
//! `AppState` as `Arc<dyn ResumeStore>`.

pub mod handlers;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::{NewResume, ResumeUpdate, StoredResume};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Resume {0} not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Persists a new resume, assigning its id and creation/update timestamps.
    async fn save(&self, resume: NewResume) -> Result<Uuid, StorageError>;

    /// Merges the given fields and refreshes `updated_at`.
    async fn update(&self, id: Uuid, update: ResumeUpdate) -> Result<StoredResume, StorageError>;

    async fn get(&self, id: Uuid) -> Result<Option<StoredResume>, StorageError>;

    /// All resumes owned by `user_id`. Order is backend-defined.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<StoredResume>, StorageError>;
}
