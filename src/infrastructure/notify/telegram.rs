use crate::config::TelegramCredentials;
use crate::domain::ports::notifier::Notifier;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

const API_BASE: &str = "https://api.telegram.org";

/// Telegram Bot API transport. Both calls are fire-and-forget: any failure is
/// logged and dropped, and without credentials nothing is sent.
pub struct TelegramNotifier {
    client: Client,
    credentials: Option<TelegramCredentials>,
    base_url: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Serialize)]
struct SendPhoto<'a> {
    chat_id: &'a str,
    photo: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
}

impl TelegramNotifier {
    pub fn new(credentials: Option<TelegramCredentials>) -> Self {
        Self {
            client: Client::new(),
            credentials,
            base_url: API_BASE.to_string(),
        }
    }

    fn method_url(&self, creds: &TelegramCredentials, method: &str) -> String {
        format!("{}/bot{}/{method}", self.base_url, creds.bot_token)
    }

    async fn post<T: Serialize + Sync>(&self, url: String, form: &T, timeout: Duration, what: &str) {
        let result = self
            .client
            .post(url)
            .timeout(timeout)
            .form(form)
            .send()
            .await;
        match result {
            Ok(resp) if resp.status().is_success() => debug!("telegram {what} delivered"),
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                warn!(%status, "telegram {what} rejected: {}", truncate(&body, 200));
            }
            // The error text can embed the request URL, which carries the token.
            Err(e) => warn!(
                timeout = e.is_timeout(),
                connect = e.is_connect(),
                "telegram {what} failed"
            ),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send_text(&self, body: &str) {
        let Some(creds) = &self.credentials else {
            return;
        };
        let form = SendMessage {
            chat_id: &creds.chat_id,
            text: body,
            parse_mode: "HTML",
        };
        let url = self.method_url(creds, "sendMessage");
        self.post(url, &form, Duration::from_secs(15), "text").await;
    }

    async fn send_photo(&self, image_url: &str, caption: &str) {
        let Some(creds) = &self.credentials else {
            return;
        };
        if image_url.is_empty() {
            return;
        }
        let caption = (!caption.is_empty()).then_some(caption);
        let form = SendPhoto {
            chat_id: &creds.chat_id,
            photo: image_url,
            caption,
            parse_mode: caption.map(|_| "HTML"),
        };
        let url = self.method_url(creds, "sendPhoto");
        self.post(url, &form, Duration::from_secs(20), "photo").await;
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
