use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::resume::{NewResume, ResumeRow, ResumeUpdate, StoredResume};
use crate::resumes::{ResumeStore, StorageError};

pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn save(&self, resume: NewResume) -> Result<Uuid, StorageError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO resumes (id, user_id, data, generated_resume, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            "#,
        )
        .bind(id)
        .bind(resume.user_id)
        .bind(Json(&resume.input))
        .bind(&resume.generated_resume)
        .bind(now)
        .execute(&self.pool)
        .await?;

        info!("Saved resume {} for user {}", id, resume.user_id);
        Ok(id)
    }

    async fn update(&self, id: Uuid, update: ResumeUpdate) -> Result<StoredResume, StorageError> {
        let row: Option<ResumeRow> = sqlx::query_as(
            r#"
            UPDATE resumes
            SET data = COALESCE($2, data),
                generated_resume = COALESCE($3, generated_resume),
                updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.input.map(Json))
        .bind(update.generated_resume)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.map(StoredResume::from)
            .ok_or(StorageError::NotFound(id))
    }

    async fn get(&self, id: Uuid) -> Result<Option<StoredResume>, StorageError> {
        let row: Option<ResumeRow> = sqlx::query_as("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(StoredResume::from))
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<StoredResume>, StorageError> {
        let rows: Vec<ResumeRow> =
            sqlx::query_as("SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(StoredResume::from).collect())
    }
}
