use cake_api_application::infrastructure_config::{Config, StorageBackend};
use tracing::info;

pub fn print_api_info(config: &Config) {
    print_api_documentation_info(config);
    print_configuration_info(config);
}

fn print_api_documentation_info(config: &Config) {
    if cfg!(feature = "docs") {
        let base_url = format!("http://{}", config.server_address());
        info!("📋 API Documentation:");
        info!("  📖 Swagger UI: {}/docs", base_url);
        info!("  📄 OpenAPI JSON: {}/api-docs/openapi.json", base_url);
    }
}

fn print_configuration_info(config: &Config) {
    info!("⚙️  Configuration:");
    print_storage_configuration(config);
    print_notifier_configuration(config);
    print_admin_gate_configuration(config);
}

fn print_storage_configuration(config: &Config) {
    match config.storage.backend {
        StorageBackend::Memory => info!(
            "  🗄️  Storage: in-memory ({} seed users)",
            config.storage.seed_users.len()
        ),
        StorageBackend::Postgres => info!(
            "  🗄️  Storage: PostgreSQL at {} (pool {}, timeout {}s)",
            config.storage.db.redacted_url(),
            config.storage.db.pool_size,
            config.storage.db.query_timeout_secs
        ),
    }
}

fn print_notifier_configuration(config: &Config) {
    match &config.notifier.webhook_url {
        Some(url) => info!(
            "  📣 Audit notifier: buffer {}, webhook {}",
            config.notifier.buffer_size, url
        ),
        None => info!(
            "  📣 Audit notifier: buffer {}, log only",
            config.notifier.buffer_size
        ),
    }
}

fn print_admin_gate_configuration(config: &Config) {
    if config.admin.require_admin_role {
        info!("  🔐 Admin gate: ENABLED");
    } else {
        info!("  🔐 Admin gate: DISABLED");
    }
}
