use std::sync::Arc;

use crate::{
    error::AppResult,
    ports::{
        incoming::admin::AdminUseCase,
        outgoing::{
            notifier::{DynNotifierPort, publish},
            user_store::{DynUserStorePort, get_user},
        },
    },
};
use domain::{
    auth::{Executor, Role, User},
    events::{AuditAction, AuditEvent},
};

/// Role changes. Neither operation compares executor and target roles; access
/// is gated by the admin routes instead.
pub struct AdminService {
    user_store: DynUserStorePort,
    notifier: DynNotifierPort,
}

impl AdminService {
    pub fn new(user_store: DynUserStorePort, notifier: DynNotifierPort) -> Self {
        Self {
            user_store,
            notifier,
        }
    }

    async fn set_role(
        &self,
        executor: &Executor,
        email: &str,
        role: Role,
        action: AuditAction,
    ) -> AppResult<User> {
        let mut user = get_user(self.user_store.as_ref(), email).await?;
        let previous_role = user.role;

        user.role = role;
        self.user_store.update_user(&user.email, &user).await?;

        tracing::info!(
            target_user = %user.email,
            executor = %executor.email,
            from = %previous_role,
            to = %role,
            "User role changed"
        );
        publish(
            self.notifier.as_ref(),
            AuditEvent::new(action, &executor.email, &user.email),
        );

        Ok(user)
    }
}

#[async_trait::async_trait]
impl AdminUseCase for AdminService {
    async fn promote_user(&self, executor: &Executor, email: &str) -> AppResult<User> {
        self.set_role(executor, email, Role::Admin, AuditAction::Promoted)
            .await
    }

    async fn fire_user(&self, executor: &Executor, email: &str) -> AppResult<User> {
        self.set_role(executor, email, Role::User, AuditAction::Fired)
            .await
    }
}

pub type DynAdminUseCase = Arc<dyn AdminUseCase>;
