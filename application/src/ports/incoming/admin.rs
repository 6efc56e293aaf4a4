use crate::error::AppResult;
use domain::auth::{Executor, User};

#[async_trait::async_trait]
pub trait AdminUseCase: Send + Sync {
    async fn promote_user(&self, executor: &Executor, email: &str) -> AppResult<User>;

    async fn fire_user(&self, executor: &Executor, email: &str) -> AppResult<User>;
}
