use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tracing::warn;

use cake_api_application::{
    error::{AppError, AppResult},
    ports::outgoing::notifier::NotifierPort,
};
use domain::events::AuditEvent;

/// Non-blocking audit notifier backed by a bounded mpsc channel of raw log
/// lines. A full buffer drops the line instead of stalling the request; only
/// a closed channel is reported as an error.
pub struct TokioMpscNotifierAdapter {
    tx: Sender<Vec<u8>>,
}

impl TokioMpscNotifierAdapter {
    pub fn new(tx: Sender<Vec<u8>>) -> Self {
        Self { tx }
    }
}

pub fn audit_channel(buffer_size: usize) -> (TokioMpscNotifierAdapter, Receiver<Vec<u8>>) {
    let (tx, rx) = mpsc::channel(buffer_size.max(1));
    (TokioMpscNotifierAdapter::new(tx), rx)
}

impl NotifierPort for TokioMpscNotifierAdapter {
    fn notify(&self, event: AuditEvent) -> AppResult<()> {
        match self.tx.try_send(event.into_bytes()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(line)) => {
                warn!(
                    line = %String::from_utf8_lossy(&line),
                    "Audit channel full, dropping notification"
                );
                Ok(())
            }
            Err(TrySendError::Closed(_)) => Err(AppError::NotificationError {
                message: "audit channel closed".to_string(),
            }),
        }
    }
}
