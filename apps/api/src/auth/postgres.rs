//! Production credential store: accounts and profiles in PostgreSQL,
//! login sessions in Redis with a TTL.

use async_trait::async_trait;
use redis::Client as RedisClient;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::{
    check_password, new_session_token, normalize_email, AuthError, CredentialStore, Session,
};
use crate::models::user::{ProfileUpdate, UserCredentials, UserProfile};

const SESSION_KEY_PREFIX: &str = "session:";
const PROFILE_COLUMNS: &str = "id, email, display_name, created_at, has_completed_onboarding";

pub struct PgCredentialStore {
    pool: PgPool,
    redis: RedisClient,
    session_ttl_secs: u64,
    hash_cost: u32,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool, redis: RedisClient, session_ttl_secs: u64, hash_cost: u32) -> Self {
        Self {
            pool,
            redis,
            session_ttl_secs,
            hash_cost,
        }
    }

    async fn redis_conn(&self) -> Result<redis::aio::MultiplexedConnection, AuthError> {
        Ok(self.redis.get_multiplexed_async_connection().await?)
    }
}

fn session_key(token: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{token}")
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<String>,
    ) -> Result<UserProfile, AuthError> {
        let email = normalize_email(email)?;
        check_password(password)?;
        let password_hash = bcrypt::hash(password, self.hash_cost)?;

        let result = sqlx::query_as::<_, UserProfile>(&format!(
            r#"
            INSERT INTO users (id, email, password_hash, display_name, has_completed_onboarding)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&email)
        .bind(&password_hash)
        .bind(&display_name)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(profile) => {
                info!("Registered user {}", profile.id);
                Ok(profile)
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AuthError::EmailInUse)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;

        let row: Option<UserCredentials> =
            sqlx::query_as("SELECT id, password_hash FROM users WHERE email = $1")
                .bind(&email)
                .fetch_optional(&self.pool)
                .await?;
        let row = row.ok_or(AuthError::InvalidCredentials)?;

        if !bcrypt::verify(password, &row.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = new_session_token();
        let mut conn = self.redis_conn().await?;
        redis::cmd("SET")
            .arg(session_key(&token))
            .arg(row.id.to_string())
            .arg("EX")
            .arg(self.session_ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;

        Ok(Session {
            token,
            user_id: row.id,
        })
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let mut conn = self.redis_conn().await?;
        redis::cmd("DEL")
            .arg(session_key(token))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn resolve_session(&self, token: &str) -> Result<Option<Uuid>, AuthError> {
        let mut conn = self.redis_conn().await?;
        let user_id: Option<String> = redis::cmd("GET")
            .arg(session_key(token))
            .query_async(&mut conn)
            .await?;
        Ok(user_id.and_then(|id| Uuid::parse_str(&id).ok()))
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, AuthError> {
        let profile = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<UserProfile, AuthError> {
        let profile = sqlx::query_as::<_, UserProfile>(&format!(
            r#"
            UPDATE users
            SET display_name = COALESCE($2, display_name),
                has_completed_onboarding = COALESCE($3, has_completed_onboarding)
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(update.display_name)
        .bind(update.has_completed_onboarding)
        .fetch_optional(&self.pool)
        .await?;

        profile.ok_or(AuthError::ProfileNotFound)
    }
}
