use std::{error::Error, io::stdout};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{
    EnvFilter,
    filter::{Directive, ParseError},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use cake_api_application::infrastructure_config::{Config, LogFormat};

/// Audit lines go to the `audit` target at info. They stay visible when the
/// configured level is quieter, unless RUST_LOG says otherwise.
const AUDIT_DIRECTIVE: &str = "audit=info";

fn config_filter(level: &str) -> Result<EnvFilter, ParseError> {
    let audit: Directive = AUDIT_DIRECTIVE.parse()?;
    Ok(EnvFilter::try_new(level)?.add_directive(audit))
}

pub fn setup_logging(config: &Config) -> Result<(), Box<dyn Error>> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => config_filter(&config.logging.level)?,
    };

    match config.logging.format {
        LogFormat::Json => {
            let formatting_layer =
                BunyanFormattingLayer::new("cake-api".to_string(), stdout);
            let json_layer = JsonStorageLayer;

            tracing_subscriber::registry()
                .with(env_filter)
                .with(json_layer)
                .with(formatting_layer)
                .init();
        }
        LogFormat::Pretty => {
            let format = fmt::format()
                .with_target(true)
                .with_thread_ids(true)
                .compact();

            let mut subscriber = tracing_subscriber::fmt()
                .event_format(format)
                .with_env_filter(env_filter);

            if config.logging.include_location {
                subscriber = subscriber.with_file(true).with_line_number(true);
            }

            subscriber.init();
        }
    }

    Ok(())
}
