use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{AppError, AppResult};
use domain::auth::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub notifier: NotifierConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackend {
    #[serde(rename = "memory")]
    Memory,
    #[serde(rename = "postgres")]
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub db: DbConfig,
    pub run_migrations: bool,
    #[serde(default)]
    pub seed_users: Vec<SeedUser>,
}

/// Account created at startup when it does not exist yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: SecretString,
    pub pool_size: u32,
    pub query_timeout_secs: u64,
}

impl Serialize for DbConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("DbConfig", 3)?;
        state.serialize_field("database_url", "[REDACTED]")?;
        state.serialize_field("pool_size", &self.pool_size)?;
        state.serialize_field("query_timeout_secs", &self.query_timeout_secs)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for DbConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct DbConfigHelper {
            database_url: String,
            pool_size: u32,
            query_timeout_secs: u64,
        }

        let helper = DbConfigHelper::deserialize(deserializer)?;
        Ok(DbConfig {
            database_url: SecretString::from(helper.database_url),
            pool_size: helper.pool_size,
            query_timeout_secs: helper.query_timeout_secs,
        })
    }
}

impl DbConfig {
    #[must_use]
    pub fn redacted_url(&self) -> String {
        let url_str = self.database_url.expose_secret();
        match url::Url::parse(url_str) {
            Ok(mut url) => {
                if url.password().is_some() {
                    url.set_password(Some("***")).ok();
                }
                url.to_string()
            }
            Err(_) => "[INVALID_URL]".to_string(),
        }
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        self.database_url.expose_secret()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Capacity of the audit channel. Lines arriving while it is full are
    /// dropped.
    pub buffer_size: usize,
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub require_admin_role: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub include_location: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "pretty")]
    Pretty,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_origin: None,
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                db: DbConfig {
                    database_url: SecretString::from("postgresql://localhost/cake"),
                    pool_size: 10,
                    query_timeout_secs: 5,
                },
                run_migrations: true,
                seed_users: Vec::new(),
            },
            notifier: NotifierConfig {
                buffer_size: 256,
                webhook_url: None,
            },
            admin: AdminConfig {
                require_admin_role: true,
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: false,
            },
            environment: EnvironmentConfig {
                env: "development".to_string(),
            },
        }
    }
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        if self.server.port == 0 {
            return Err(AppError::ConfigError {
                message: "server port must be greater than 0".to_string(),
            });
        }

        if self.storage.backend == StorageBackend::Postgres {
            if self.storage.db.database_url.expose_secret().is_empty() {
                return Err(AppError::ConfigError {
                    message: "database_url cannot be empty".to_string(),
                });
            }

            if self.storage.db.pool_size == 0 {
                return Err(AppError::ConfigError {
                    message: "db pool_size must be greater than 0".to_string(),
                });
            }

            if self.storage.db.query_timeout_secs == 0 {
                return Err(AppError::ConfigError {
                    message: "query_timeout_secs must be greater than 0".to_string(),
                });
            }
        }

        let mut seen_emails = HashSet::new();
        for seed in &self.storage.seed_users {
            if !seen_emails.insert(seed.email.as_str()) {
                return Err(AppError::ConfigError {
                    message: format!("Duplicate seed user: '{}'", seed.email),
                });
            }
        }

        if self.notifier.buffer_size == 0 {
            return Err(AppError::ConfigError {
                message: "notifier buffer_size must be greater than 0".to_string(),
            });
        }

        if let Some(webhook_url) = &self.notifier.webhook_url {
            url::Url::parse(webhook_url).map_err(|e| AppError::ConfigError {
                message: format!("Invalid notifier webhook_url: {e}"),
            })?;
        }

        Ok(())
    }

    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_buffer() {
        let mut config = Config::default();
        config.notifier.buffer_size = 0;
        assert!(matches!(
            config.validate(),
            Err(AppError::ConfigError { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_seed_users() {
        let mut config = Config::default();
        let seed = SeedUser {
            email: "root@x.com".to_string(),
            role: Role::SuperAdmin,
        };
        config.storage.seed_users = vec![seed.clone(), seed];
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_webhook() {
        let mut config = Config::default();
        config.notifier.webhook_url = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn postgres_requires_database_url() {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Postgres;
        config.storage.db.database_url = SecretString::from("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn redacts_database_password() {
        let mut config = Config::default();
        config.storage.db.database_url = SecretString::from("postgres://cake:hunter2@db/cake");
        let redacted = config.storage.db.redacted_url();
        assert!(!redacted.contains("hunter2"));
        assert!(redacted.contains("***"));
    }

    #[test]
    fn serialized_config_hides_database_url() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("[REDACTED]"));
        assert!(!json.contains("postgresql://localhost/cake"));
    }
}
