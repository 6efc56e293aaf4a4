use std::sync::Arc;

use crate::error::{AppError, AppResult};
use domain::auth::User;

/// Key-value access to user records, keyed by email.
///
/// Callers receive an owned copy of the record. Changes become visible to
/// other readers only once `update_user` has returned successfully.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserStorePort: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Persists the whole record. Either every change is written or none is.
    async fn update_user(&self, email: &str, user: &User) -> AppResult<()>;
}

pub type DynUserStorePort = Arc<dyn UserStorePort>;

pub async fn get_user(store: &dyn UserStorePort, email: &str) -> AppResult<User> {
    store
        .find_user_by_email(email)
        .await?
        .ok_or_else(|| AppError::user_not_found(email))
}
