use std::sync::Arc;

use time::OffsetDateTime;
use validator::ValidateEmail;

use crate::error::{AppError, AppResult};
use crate::ports::incoming::ban::BanUseCase;
use crate::ports::outgoing::{
    notifier::{DynNotifierPort, publish},
    user_store::{DynUserStorePort, get_user},
};
use domain::{
    auth::{Executor, User},
    events::{AuditAction, AuditEvent},
};

pub struct BanService {
    user_store: DynUserStorePort,
    notifier: DynNotifierPort,
}

impl BanService {
    pub fn new(user_store: DynUserStorePort, notifier: DynNotifierPort) -> Self {
        Self {
            user_store,
            notifier,
        }
    }

    fn validate_email(email: &str) -> AppResult<()> {
        if email.validate_email() {
            Ok(())
        } else {
            Err(AppError::ValidationError {
                message: format!("invalid email address: {email:?}"),
            })
        }
    }

    /// Loads the target and checks the executor outranks it. Runs before any
    /// mutation so a rejected request leaves the record untouched.
    async fn load_actionable_target(&self, executor: &Executor, email: &str) -> AppResult<User> {
        Self::validate_email(email)?;

        let user = get_user(self.user_store.as_ref(), email).await?;

        if !executor.can_act_on(&user) {
            tracing::debug!(
                executor = %executor.email,
                executor_role = %executor.role,
                target = %user.email,
                target_role = %user.role,
                "Rejected ban-state change on equal or higher role"
            );
            return Err(AppError::PermissionDenied);
        }

        Ok(user)
    }

    async fn record_and_persist(
        &self,
        executor: &Executor,
        mut user: User,
        is_ban: bool,
        reason: &str,
    ) -> AppResult<User> {
        user.record_ban_event(&executor.email, is_ban, reason, OffsetDateTime::now_utc());

        self.user_store.update_user(&user.email, &user).await?;

        let action = if is_ban {
            AuditAction::Banned
        } else {
            AuditAction::Unbanned
        };
        tracing::info!(
            target_user = %user.email,
            executor = %executor.email,
            banned = user.banned,
            history_len = user.ban_history.len(),
            "User ban state changed"
        );
        publish(
            self.notifier.as_ref(),
            AuditEvent::new(action, &executor.email, &user.email),
        );

        Ok(user)
    }
}

#[async_trait::async_trait]
impl BanUseCase for BanService {
    async fn ban_user(&self, executor: &Executor, email: &str, reason: &str) -> AppResult<User> {
        let user = self.load_actionable_target(executor, email).await?;
        self.record_and_persist(executor, user, true, reason).await
    }

    async fn unban_user(&self, executor: &Executor, email: &str) -> AppResult<User> {
        let user = self.load_actionable_target(executor, email).await?;
        self.record_and_persist(executor, user, false, "").await
    }

    async fn inspect_ban_history(&self, executor: &Executor, email: &str) -> AppResult<User> {
        let user = get_user(self.user_store.as_ref(), email).await?;

        publish(
            self.notifier.as_ref(),
            AuditEvent::new(AuditAction::HistoryRequested, &executor.email, &user.email),
        );

        Ok(user)
    }
}

pub type DynBanUseCase = Arc<dyn BanUseCase>;

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use mockall::Sequence;

    use super::*;
    use crate::ports::outgoing::{notifier::MockNotifierPort, user_store::MockUserStorePort};
    use domain::auth::Role;

    fn store_with(user: User) -> MockUserStorePort {
        let mut store = MockUserStorePort::new();
        let email = user.email.clone();
        store
            .expect_find_user_by_email()
            .withf(move |requested| requested == email)
            .returning(move |_| Ok(Some(user.clone())));
        store
    }

    fn silent_notifier() -> MockNotifierPort {
        let mut notifier = MockNotifierPort::new();
        notifier.expect_notify().never();
        notifier
    }

    fn service(store: MockUserStorePort, notifier: MockNotifierPort) -> BanService {
        BanService::new(Arc::new(store), Arc::new(notifier))
    }

    fn admin() -> Executor {
        Executor::new("admin@x.com", Role::Admin)
    }

    #[tokio::test]
    async fn ban_appends_entry_persists_then_notifies() {
        let mut seq = Sequence::new();
        let saved: Arc<Mutex<Option<User>>> = Arc::default();

        let mut store = store_with(User::new("a@x.com", Role::User));
        let sink = Arc::clone(&saved);
        store
            .expect_update_user()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |email, user| {
                assert_eq!(email, "a@x.com");
                *sink.lock().unwrap() = Some(user.clone());
                Ok(())
            });

        let mut notifier = MockNotifierPort::new();
        notifier
            .expect_notify()
            .withf(|event| event.to_string() == "admin admin@x.com banned user a@x.com")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let user = service(store, notifier)
            .ban_user(&admin(), "a@x.com", "spam")
            .await
            .unwrap();

        assert!(user.banned);
        assert_eq!(user.ban_history.len(), 1);
        let entry = &user.ban_history.entries()[0];
        assert!(entry.is_ban);
        assert_eq!(entry.reason, "spam");
        assert_eq!(entry.executor_email, "admin@x.com");
        assert_eq!(saved.lock().unwrap().as_ref(), Some(&user));
    }

    #[tokio::test]
    async fn unban_discards_reason_and_clears_flag() {
        let mut banned = User::new("a@x.com", Role::User);
        banned.ban("root@x.com", "spam", OffsetDateTime::now_utc());

        let mut store = store_with(banned);
        store.expect_update_user().times(1).returning(|_, _| Ok(()));
        let mut notifier = MockNotifierPort::new();
        notifier
            .expect_notify()
            .withf(|event| event.action == AuditAction::Unbanned)
            .times(1)
            .returning(|_| Ok(()));

        let user = service(store, notifier)
            .unban_user(&admin(), "a@x.com")
            .await
            .unwrap();

        assert!(!user.banned);
        assert_eq!(user.ban_history.len(), 2);
        let last = user.ban_history.last().unwrap();
        assert!(!last.is_ban);
        assert_eq!(last.reason, "");
    }

    #[tokio::test]
    async fn ban_rejects_invalid_email_before_lookup() {
        let mut store = MockUserStorePort::new();
        store.expect_find_user_by_email().never();
        store.expect_update_user().never();

        let err = service(store, silent_notifier())
            .ban_user(&admin(), "not-an-email", "spam")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn ban_unknown_user_is_not_found() {
        let mut store = MockUserStorePort::new();
        store.expect_find_user_by_email().returning(|_| Ok(None));
        store.expect_update_user().never();

        let err = service(store, silent_notifier())
            .ban_user(&admin(), "ghost@x.com", "spam")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn lower_role_cannot_ban_admin() {
        let mut store = store_with(User::new("boss@x.com", Role::Admin));
        store.expect_update_user().never();

        let err = service(store, silent_notifier())
            .ban_user(&Executor::new("u@x.com", Role::User), "boss@x.com", "spam")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PermissionDenied));
    }

    #[tokio::test]
    async fn equal_role_cannot_unban() {
        let mut store = store_with(User::new("peer@x.com", Role::Admin));
        store.expect_update_user().never();

        let err = service(store, silent_notifier())
            .unban_user(&admin(), "peer@x.com")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PermissionDenied));
    }

    #[tokio::test]
    async fn failed_update_skips_notification() {
        let mut store = store_with(User::new("a@x.com", Role::User));
        store.expect_update_user().times(1).returning(|_, _| {
            Err(AppError::DatabaseError {
                message: "write failed".to_string(),
            })
        });

        let err = service(store, silent_notifier())
            .ban_user(&admin(), "a@x.com", "spam")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DatabaseError { .. }));
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_ban() {
        let mut store = store_with(User::new("a@x.com", Role::User));
        store.expect_update_user().times(1).returning(|_, _| Ok(()));
        let mut notifier = MockNotifierPort::new();
        notifier.expect_notify().times(1).returning(|_| {
            Err(AppError::NotificationError {
                message: "closed".to_string(),
            })
        });

        let user = service(store, notifier)
            .ban_user(&admin(), "a@x.com", "spam")
            .await
            .unwrap();

        assert!(user.banned);
    }

    #[tokio::test]
    async fn inspect_notifies_without_mutation() {
        let mut store = store_with(User::new("a@x.com", Role::SuperAdmin));
        store.expect_update_user().never();
        let mut notifier = MockNotifierPort::new();
        notifier
            .expect_notify()
            .withf(|event| {
                event.to_string() == "admin u@x.com requested for ban history of user a@x.com"
            })
            .times(1)
            .returning(|_| Ok(()));

        let user = service(store, notifier)
            .inspect_ban_history(&Executor::new("u@x.com", Role::User), "a@x.com")
            .await
            .unwrap();

        assert!(user.ban_history.is_empty());
    }

    #[tokio::test]
    async fn inspect_unknown_user_is_not_found() {
        let mut store = MockUserStorePort::new();
        store.expect_find_user_by_email().returning(|_| Ok(None));
        store.expect_update_user().never();

        let err = service(store, silent_notifier())
            .inspect_ban_history(&admin(), "ghost@x.com")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
