//! In-memory credential store used in demo mode (no `DATABASE_URL`) and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::auth::{
    check_password, new_session_token, normalize_email, AuthError, CredentialStore, Session,
};
use crate::models::user::{ProfileUpdate, UserProfile};

struct Account {
    profile: UserProfile,
    password_hash: String,
}

pub struct InMemoryCredentialStore {
    accounts: RwLock<HashMap<Uuid, Account>>,
    sessions: RwLock<HashMap<String, Uuid>>,
    hash_cost: u32,
}

impl InMemoryCredentialStore {
    pub fn new(hash_cost: u32) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            hash_cost,
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<String>,
    ) -> Result<UserProfile, AuthError> {
        let email = normalize_email(email)?;
        check_password(password)?;
        let password_hash = bcrypt::hash(password, self.hash_cost)?;

        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.profile.email == email) {
            return Err(AuthError::EmailInUse);
        }

        let profile = UserProfile {
            id: Uuid::new_v4(),
            email,
            display_name,
            created_at: Utc::now(),
            has_completed_onboarding: false,
        };
        accounts.insert(
            profile.id,
            Account {
                profile: profile.clone(),
                password_hash,
            },
        );

        info!("Registered user {}", profile.id);
        Ok(profile)
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user_id = {
            let accounts = self.accounts.read().await;
            let account = accounts
                .values()
                .find(|a| a.profile.email == email)
                .ok_or(AuthError::InvalidCredentials)?;
            if !bcrypt::verify(password, &account.password_hash)? {
                return Err(AuthError::InvalidCredentials);
            }
            account.profile.id
        };

        let token = new_session_token();
        self.sessions.write().await.insert(token.clone(), user_id);
        Ok(Session { token, user_id })
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.sessions.write().await.remove(token);
        Ok(())
    }

    async fn resolve_session(&self, token: &str) -> Result<Option<Uuid>, AuthError> {
        Ok(self.sessions.read().await.get(token).copied())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, AuthError> {
        Ok(self
            .accounts
            .read()
            .await
            .get(&user_id)
            .map(|a| a.profile.clone()))
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<UserProfile, AuthError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&user_id)
            .ok_or(AuthError::ProfileNotFound)?;
        account.profile.apply(update);
        Ok(account.profile.clone())
    }
}
