use std::sync::Arc;

use crate::error::AppResult;
use domain::events::AuditEvent;

/// One-way output channel for audit lines. Implementations must not block.
#[cfg_attr(test, mockall::automock)]
pub trait NotifierPort: Send + Sync {
    fn notify(&self, event: AuditEvent) -> AppResult<()>;
}

pub type DynNotifierPort = Arc<dyn NotifierPort>;

/// Fire-and-forget: a failed notification is logged and never undoes the
/// operation that produced it.
pub fn publish(notifier: &dyn NotifierPort, event: AuditEvent) {
    if let Err(e) = notifier.notify(event) {
        tracing::warn!(error = %e, "Failed to publish audit notification");
    }
}
