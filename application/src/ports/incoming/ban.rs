use crate::error::AppResult;
use domain::auth::{Executor, User};

#[async_trait::async_trait]
pub trait BanUseCase: Send + Sync {
    async fn ban_user(&self, executor: &Executor, email: &str, reason: &str) -> AppResult<User>;

    async fn unban_user(&self, executor: &Executor, email: &str) -> AppResult<User>;

    /// Loads the user so the caller can render its ban history. No privilege
    /// check is applied.
    async fn inspect_ban_history(&self, executor: &Executor, email: &str) -> AppResult<User>;
}
