use std::time::Duration;

use serde_json::json;
use tokio::{sync::mpsc::Receiver, task::JoinHandle};
use tracing::{info, warn};
use url::Url;

use cake_api_application::error::{AppError, AppResult};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

/// Chat-style webhook receiving each audit line as `{"text": line}`.
pub struct WebhookSink {
    client: reqwest::Client,
    url: Url,
}

impl WebhookSink {
    pub fn new(url: &str) -> AppResult<Self> {
        let url = Url::parse(url).map_err(|e| AppError::ConfigError {
            message: format!("Invalid audit webhook url: {e}"),
        })?;
        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .map_err(|e| AppError::ConfigError {
                message: format!("Failed to build webhook client: {e}"),
            })?;

        Ok(Self { client, url })
    }

    async fn deliver(&self, line: &str) -> AppResult<()> {
        self.client
            .post(self.url.clone())
            .json(&json!({ "text": line }))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AppError::NotificationError {
                message: format!("Webhook delivery failed: {e}"),
            })?;
        Ok(())
    }
}

/// Drains the audit channel in arrival order until every sender is dropped.
pub struct AuditLogConsumer {
    rx: Receiver<Vec<u8>>,
    webhook: Option<WebhookSink>,
}

impl AuditLogConsumer {
    pub fn new(rx: Receiver<Vec<u8>>, webhook: Option<WebhookSink>) -> Self {
        Self { rx, webhook }
    }

    pub fn spawn(self) -> JoinHandle<u64> {
        tokio::spawn(self.run())
    }

    /// Returns the number of lines consumed.
    pub async fn run(mut self) -> u64 {
        let mut consumed = 0_u64;

        while let Some(bytes) = self.rx.recv().await {
            let line = String::from_utf8_lossy(&bytes);
            info!(target: "audit", "{}", line);

            if let Some(webhook) = &self.webhook {
                if let Err(e) = webhook.deliver(&line).await {
                    warn!("{}", e);
                }
            }

            consumed += 1;
        }

        info!(consumed, "Audit channel closed");
        consumed
    }
}
