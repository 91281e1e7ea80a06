use crate::domain::ports::notifier::Notifier;
use tracing::info;

/// Used when no transport is configured; messages only reach the log.
pub struct NoopNotifier;

#[async_trait::async_trait]
impl Notifier for NoopNotifier {
    async fn send_text(&self, body: &str) {
        info!("notification not delivered, no transport configured:\n{body}");
    }

    async fn send_photo(&self, image_url: &str, caption: &str) {
        info!(image_url, "photo not delivered, no transport configured: {caption}");
    }
}
