use dashmap::{DashMap, mapref::entry::Entry};
use tracing::{info, instrument};

use cake_api_application::{
    error::{AppError, AppResult},
    infrastructure_config::SeedUser,
    ports::outgoing::user_store::UserStorePort,
};
use domain::auth::User;

/// Process-local user store. Each key is read and written atomically, but a
/// load followed by an update is not; concurrent writers to the same email
/// race and the last write wins.
#[derive(Default)]
pub struct InMemoryUserStoreAdapter {
    users: DashMap<String, User>,
}

impl InMemoryUserStoreAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let store = Self::new();
        for user in users {
            store.insert_if_absent(user);
        }
        store
    }

    /// Returns `false` when a user with that email already exists.
    pub fn insert_if_absent(&self, user: User) -> bool {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(user);
                true
            }
        }
    }

    pub fn seed(&self, seeds: &[SeedUser]) {
        for seed in seeds {
            if self.insert_if_absent(User::new(seed.email.clone(), seed.role)) {
                info!(email = %seed.email, role = %seed.role, "Seeded user");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait::async_trait]
impl UserStorePort for InMemoryUserStoreAdapter {
    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users.get(email).map(|entry| entry.value().clone()))
    }

    #[instrument(skip(self, user))]
    async fn update_user(&self, email: &str, user: &User) -> AppResult<()> {
        let Some(mut entry) = self.users.get_mut(email) else {
            return Err(AppError::DatabaseError {
                message: format!("Failed to update user {email}: no such user"),
            });
        };

        *entry = user.clone();
        Ok(())
    }
}
