//! No-op notifier for headless environments or `notify = false`

use async_trait::async_trait;

use crate::application::ports::{NotificationError, Notifier, NotifyLevel};

/// Notifier that silently discards every message
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _level: NotifyLevel, _message: &str) -> Result<(), NotificationError> {
        Ok(())
    }
}
