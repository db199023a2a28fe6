use std::sync::Arc;

use common::models::UserProfile;
use common::models::user::LOGIN_PLACEHOLDER_NAME;
use thiserror::Error;
use tracing::info;

use crate::{
    error::StorageError,
    kv_store::{KeyValueStore, read_json, write_json},
};

pub const USER_KEY: &str = "trend_user";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("email is required")]
    MissingEmail,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Mock session: whoever logs in is trusted, passwords are only compared
/// against their confirmation and never stored.
pub struct SessionRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SessionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn login(&self, email: &str) -> Result<UserProfile, SessionError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(SessionError::MissingEmail);
        }

        let user = UserProfile::new(email, LOGIN_PLACEHOLDER_NAME);
        self.save(&user).await?;
        Ok(user)
    }

    pub async fn signup(&self, form: &SignupForm) -> Result<UserProfile, SessionError> {
        if form.password != form.confirm_password {
            return Err(SessionError::PasswordMismatch);
        }
        let email = form.email.trim();
        if email.is_empty() {
            return Err(SessionError::MissingEmail);
        }

        let user = UserProfile::new(email, form.full_name.trim());
        self.save(&user).await?;
        Ok(user)
    }

    pub async fn current_user(&self) -> Result<Option<UserProfile>, SessionError> {
        Ok(read_json(self.store.as_ref(), USER_KEY).await?)
    }

    pub async fn logout(&self) -> Result<(), SessionError> {
        self.store.remove(USER_KEY).await?;
        info!("Session cleared");
        Ok(())
    }

    async fn save(&self, user: &UserProfile) -> Result<(), StorageError> {
        write_json(self.store.as_ref(), USER_KEY, user).await?;
        info!("Session started for {} ({})", user.email, user.id);
        Ok(())
    }
}
