use cake_api_application::error::{AppError, AppResult};
use cake_api_application::infrastructure_config::Config;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use std::{env, fs};
use std::path::Path;
use tracing::info;

const ENV_PREFIX: &str = "CAKE_";
const TOML_FILE: &str = "config.toml";
const JSON_FILE: &str = "config.json";

pub fn load_config() -> AppResult<Config> {
    generate_env_template_if_missing()?;

    let default_config = Config::default();
    let mut figment = Figment::from(Serialized::defaults(default_config));

    if Path::new(TOML_FILE).exists() {
        figment = figment.merge(Toml::file(TOML_FILE));
    }

    if Path::new(JSON_FILE).exists() {
        figment = figment.merge(Json::file(JSON_FILE));
    }

    let config: Config = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| AppError::ConfigError {
            message: format!("Failed to load configuration: {e}"),
        })?;

    config.validate()?;
    Ok(config)
}

/// Layers that contributed to the loaded configuration, lowest precedence
/// first. Called after logging is up, since loading happens before it.
pub fn active_sources() -> Vec<String> {
    let mut sources = vec!["defaults".to_string()];

    for file in [TOML_FILE, JSON_FILE] {
        if Path::new(file).exists() {
            sources.push(file.to_string());
        }
    }

    let overrides = env::vars()
        .filter(|(key, _)| key.starts_with(ENV_PREFIX))
        .count();
    if overrides > 0 {
        sources.push(format!("{overrides} {ENV_PREFIX}* env vars"));
    }

    sources
}

fn generate_env_template_if_missing() -> AppResult<()> {
    let env_file = ".env";
    let template_file = ".env.example";

    if Path::new(env_file).exists() {
        return Ok(());
    }

    if !Path::new(template_file).exists() {
        return Ok(());
    }

    fs::copy(template_file, env_file).map_err(|e| AppError::ConfigError {
        message: format!("Failed to generate .env file from template: {e}"),
    })?;

    info!("Generated .env from template. Please configure your secrets!");
    info!("IMPORTANT: .env contains sensitive data and is gitignored.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cake_api_application::infrastructure_config::StorageBackend;
    use figment::Jail;

    #[test]
    fn env_overrides_files_which_override_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                TOML_FILE,
                r#"
                [server]
                port = 4000

                [notifier]
                buffer_size = 8

                [[storage.seed_users]]
                email = "root@x.com"
                role = "superadmin"
                "#,
            )?;
            jail.set_env("CAKE_SERVER__PORT", "5000");
            jail.set_env("CAKE_ADMIN__REQUIRE_ADMIN_ROLE", "false");

            let config = load_config().map_err(|e| e.to_string())?;

            assert_eq!(config.server.port, 5000);
            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.notifier.buffer_size, 8);
            assert!(!config.admin.require_admin_role);
            assert_eq!(config.storage.backend, StorageBackend::Memory);
            assert_eq!(config.storage.seed_users.len(), 1);

            let sources = active_sources();
            assert_eq!(sources[0], "defaults");
            assert!(sources.contains(&TOML_FILE.to_string()));
            assert!(sources.iter().any(|s| s.ends_with("env vars")));
            Ok(())
        });
    }

    #[test]
    fn invalid_override_is_a_config_error() {
        Jail::expect_with(|jail| {
            jail.set_env("CAKE_NOTIFIER__BUFFER_SIZE", "0");

            assert!(matches!(load_config(), Err(AppError::ConfigError { .. })));
            Ok(())
        });
    }
}
