use async_trait::async_trait;

/// Outbound message channel. Delivery is best effort: implementations log and
/// swallow their own failures and do nothing when they lack credentials.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_text(&self, body: &str);

    async fn send_photo(&self, image_url: &str, caption: &str);
}
