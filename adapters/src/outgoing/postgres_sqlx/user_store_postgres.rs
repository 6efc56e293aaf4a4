use sqlx::{PgPool, types::time::OffsetDateTime};
use time::Duration;
use tracing::{info, instrument};

use cake_api_application::{
    error::{AppError, AppResult},
    infrastructure_config::SeedUser,
    ports::outgoing::user_store::UserStorePort,
};
use domain::{
    auth::{Role, User},
    ban::{BanHistory, BanHistoryEntry},
};

use super::utils::{PostgresExecutor, column};

pub struct PostgresUserStoreAdapter {
    pool: PgPool,
    executor: PostgresExecutor,
}

impl PostgresUserStoreAdapter {
    pub fn new(pool: PgPool, query_timeout_secs: u64) -> Self {
        Self {
            pool,
            executor: PostgresExecutor::new(query_timeout_secs),
        }
    }

    #[instrument(skip(self, seeds))]
    pub async fn seed(&self, seeds: &[SeedUser]) -> AppResult<()> {
        for seed in seeds {
            let result = self
                .executor
                .execute_with_timeout(
                    || {
                        sqlx::query(
                            r#"
                            INSERT INTO users (email, role, banned)
                            VALUES ($1, $2, FALSE)
                            ON CONFLICT (email) DO NOTHING
                            "#,
                        )
                        .bind(&seed.email)
                        .bind(seed.role.as_i16())
                        .execute(&self.pool)
                    },
                    &format!("Failed to seed user {}", seed.email),
                )
                .await?;

            if result.rows_affected() > 0 {
                info!(email = %seed.email, role = %seed.role, "Seeded user");
            }
        }

        Ok(())
    }

    async fn load_history(&self, email: &str) -> AppResult<BanHistory> {
        let rows = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query(
                        r#"
                        SELECT executor_email, is_ban, created_at, reason
                        FROM ban_history
                        WHERE user_email = $1
                        ORDER BY id
                        "#,
                    )
                    .bind(email)
                    .fetch_all(&self.pool)
                },
                &format!("Failed to load ban history for {}", email),
            )
            .await?;

        let entries = rows
            .iter()
            .map(|row| {
                Ok(BanHistoryEntry {
                    executor_email: column(row, "executor_email")?,
                    is_ban: column(row, "is_ban")?,
                    time: column::<OffsetDateTime>(row, "created_at")?,
                    reason: column(row, "reason")?,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(BanHistory::from_entries(entries))
    }
}

#[async_trait::async_trait]
impl UserStorePort for PostgresUserStoreAdapter {
    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query(
                        r#"
                        SELECT email, role, banned
                        FROM users
                        WHERE email = $1
                        "#,
                    )
                    .bind(email)
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to get user {}", email),
            )
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let role = Role::try_from(column::<i16>(&row, "role")?)?;
        let ban_history = self.load_history(email).await?;

        Ok(Some(User {
            email: column(&row, "email")?,
            role,
            banned: column(&row, "banned")?,
            ban_history,
        }))
    }

    /// Writes the user row and its ledger in one transaction. Ledger rows are
    /// only ever inserted; entries already stored are skipped, so concurrent
    /// writers never drop each other's history even though the `banned` flag
    /// and role follow the last write.
    #[instrument(skip(self, user))]
    async fn update_user(&self, email: &str, user: &User) -> AppResult<()> {
        self.executor
            .execute_with_timeout(
                || async {
                    let mut tx = self.pool.begin().await?;

                    let updated = sqlx::query(
                        r#"
                        UPDATE users
                        SET role = $2, banned = $3
                        WHERE email = $1
                        "#,
                    )
                    .bind(email)
                    .bind(user.role.as_i16())
                    .bind(user.banned)
                    .execute(&mut *tx)
                    .await?;

                    if updated.rows_affected() == 0 {
                        return Err(sqlx::Error::RowNotFound);
                    }

                    for entry in user.ban_history.iter() {
                        sqlx::query(
                            r#"
                            INSERT INTO ban_history
                                (user_email, executor_email, is_ban, created_at, reason)
                            VALUES ($1, $2, $3, $4, $5)
                            ON CONFLICT (user_email, created_at, executor_email, is_ban)
                            DO NOTHING
                            "#,
                        )
                        .bind(email)
                        .bind(&entry.executor_email)
                        .bind(entry.is_ban)
                        .bind(stored_time(entry.time))
                        .bind(&entry.reason)
                        .execute(&mut *tx)
                        .await?;
                    }

                    tx.commit().await
                },
                &format!("Failed to update user {}", email),
            )
            .await
    }
}

/// `TIMESTAMPTZ` keeps microseconds. Truncating before insert makes a fresh
/// entry compare equal to the same entry once it has been read back.
fn stored_time(time: OffsetDateTime) -> OffsetDateTime {
    time - Duration::nanoseconds(i64::from(time.nanosecond() % 1_000))
}

pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::DatabaseError {
            message: format!("Failed to run migrations: {}", e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::auth::Role;
    use time::macros::datetime;

    async fn store_with(pool: PgPool, seeds: &[SeedUser]) -> PostgresUserStoreAdapter {
        let store = PostgresUserStoreAdapter::new(pool, 5);
        store.seed(seeds).await.unwrap();
        store
    }

    fn seed(email: &str, role: Role) -> SeedUser {
        SeedUser {
            email: email.to_string(),
            role,
        }
    }

    async fn history_rows(pool: &PgPool, email: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM ban_history WHERE user_email = $1")
            .bind(email)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[test]
    fn stored_time_drops_sub_microsecond_digits() {
        let time = datetime!(2024-06-01 10:00:00.123_456_789 UTC);
        assert_eq!(stored_time(time), datetime!(2024-06-01 10:00:00.123_456 UTC));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn ban_then_unban_appends_in_order(pool: PgPool) {
        let store = store_with(pool.clone(), &[seed("a@x.com", Role::User)]).await;

        let mut user = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
        user.record_ban_event("admin@x.com", true, "spam", OffsetDateTime::now_utc());
        store.update_user("a@x.com", &user).await.unwrap();

        let mut user = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
        user.record_ban_event("root@x.com", false, "", OffsetDateTime::now_utc());
        store.update_user("a@x.com", &user).await.unwrap();

        let stored = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
        assert!(!stored.banned);
        let entries = stored.ban_history.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_ban);
        assert_eq!(entries[0].executor_email, "admin@x.com");
        assert_eq!(entries[0].reason, "spam");
        assert!(!entries[1].is_ban);
        assert_eq!(entries[1].executor_email, "root@x.com");
        assert_eq!(history_rows(&pool, "a@x.com").await, 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn saving_the_same_user_twice_adds_no_rows(pool: PgPool) {
        let store = store_with(pool.clone(), &[seed("a@x.com", Role::User)]).await;

        let mut user = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
        user.record_ban_event(
            "admin@x.com",
            true,
            "spam",
            datetime!(2024-06-01 10:00:00.123_456_789 UTC),
        );
        store.update_user("a@x.com", &user).await.unwrap();
        store.update_user("a@x.com", &user).await.unwrap();

        let reloaded = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
        store.update_user("a@x.com", &reloaded).await.unwrap();

        assert_eq!(history_rows(&pool, "a@x.com").await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn updating_unknown_user_is_database_error(pool: PgPool) {
        let store = store_with(pool.clone(), &[]).await;
        let mut ghost = User::new("ghost@x.com", Role::User);
        ghost.record_ban_event("admin@x.com", true, "spam", OffsetDateTime::now_utc());

        let result = store.update_user("ghost@x.com", &ghost).await;

        assert!(matches!(result, Err(AppError::DatabaseError { .. })));
        assert_eq!(history_rows(&pool, "ghost@x.com").await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn find_round_trips_role_flag_and_history(pool: PgPool) {
        let store = store_with(pool, &[seed("mod@x.com", Role::Admin)]).await;
        let time = datetime!(2024-06-01 10:00:00 UTC);

        let mut user = store.find_user_by_email("mod@x.com").await.unwrap().unwrap();
        user.role = Role::SuperAdmin;
        user.record_ban_event("root@x.com", true, "abuse", time);
        store.update_user("mod@x.com", &user).await.unwrap();

        let stored = store.find_user_by_email("mod@x.com").await.unwrap().unwrap();
        assert_eq!(stored, user);
        assert!(store.find_user_by_email("ghost@x.com").await.unwrap().is_none());
    }
}
