use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use cake_api_adapters::{
    outgoing::{
        audit_mpsc::{
            consumer::{AuditLogConsumer, WebhookSink},
            tokio_mpsc::audit_channel,
        },
        memory::user_store_memory::InMemoryUserStoreAdapter,
        postgres_sqlx::user_store_postgres::{PostgresUserStoreAdapter, run_migrations},
    },
    shared::app_state::AppState as AdaptersAppState,
};
use cake_api_application::{
    admin::service::{AdminService, DynAdminUseCase},
    ban::service::{BanService, DynBanUseCase},
    error::AppError,
    infrastructure_config::{Config, StorageBackend},
    ports::outgoing::{notifier::DynNotifierPort, user_store::DynUserStorePort},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ban_service: DynBanUseCase,
    pub admin_service: DynAdminUseCase,
}

impl AppState {
    /// Wires storage, the audit channel and the services. The returned handle
    /// completes once every notifier clone has been dropped and the channel
    /// is drained.
    pub async fn new(config: Config) -> Result<(Self, JoinHandle<u64>), AppError> {
        let config = Arc::new(config);

        let user_store = Self::create_user_store(&config).await?;
        let (notifier, audit_consumer) = Self::create_notifier(&config)?;

        let ban_service: DynBanUseCase = Arc::new(BanService::new(
            Arc::clone(&user_store),
            Arc::clone(&notifier),
        ));
        let admin_service: DynAdminUseCase = Arc::new(AdminService::new(user_store, notifier));

        Ok((
            Self {
                config,
                ban_service,
                admin_service,
            },
            audit_consumer,
        ))
    }

    async fn create_user_store(config: &Config) -> Result<DynUserStorePort, AppError> {
        let storage = &config.storage;

        match storage.backend {
            StorageBackend::Memory => {
                let store = InMemoryUserStoreAdapter::new();
                store.seed(&storage.seed_users);
                info!(users = store.len(), "Using in-memory user store");
                Ok(Arc::new(store))
            }
            StorageBackend::Postgres => {
                let pool = PgPoolOptions::new()
                    .max_connections(storage.db.pool_size)
                    .connect(storage.db.database_url())
                    .await
                    .map_err(|e| AppError::DatabaseError {
                        message: format!("Failed to connect to database: {}", e),
                    })?;

                if storage.run_migrations {
                    run_migrations(&pool).await?;
                    info!("Database migrations applied");
                }

                let store = PostgresUserStoreAdapter::new(pool, storage.db.query_timeout_secs);
                store.seed(&storage.seed_users).await?;
                Ok(Arc::new(store))
            }
        }
    }

    fn create_notifier(config: &Config) -> Result<(DynNotifierPort, JoinHandle<u64>), AppError> {
        let webhook = config
            .notifier
            .webhook_url
            .as_deref()
            .map(WebhookSink::new)
            .transpose()?;

        let (notifier, rx) = audit_channel(config.notifier.buffer_size);
        let handle = AuditLogConsumer::new(rx, webhook).spawn();

        Ok((Arc::new(notifier), handle))
    }

    pub fn to_adapters_state(&self) -> AdaptersAppState {
        AdaptersAppState::new(
            Arc::clone(&self.config),
            Arc::clone(&self.ban_service),
            Arc::clone(&self.admin_service),
        )
    }
}
