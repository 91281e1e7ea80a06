use crate::domain::entities::watch_item::WatchItem;
use crate::domain::values::signal::SignalResult;

/// Telegram-flavoured (HTML parse mode) spike alert.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertMessage {
    pub title: String,
    pub body: String,
}

impl AlertMessage {
    pub fn spike(item: &WatchItem, price: f64, signal: &SignalResult, source: &str) -> Self {
        let mut body = format!(
            "Δ24h: {:.1}% | Δ7d: {:.1}% | breakout: {}\nNow: ${price:.2} ({})\nQueries: {}",
            signal.pct_24h * 100.0,
            signal.pct_7d * 100.0,
            signal.breakout,
            escape(source),
            escape(&item.queries.join(", ")),
        );
        let hints = item.search_hints();
        if !hints.is_empty() {
            body.push_str(&format!("\nHints: {}", escape(&hints.join(" "))));
        }
        Self {
            title: format!("📈 Spike: {}", escape(&item.name)),
            body,
        }
    }

    pub fn caption(&self) -> String {
        format!("<b>{}</b>", self.title)
    }

    /// Title and body in one message, for when there is no image to attach.
    pub fn combined(&self) -> String {
        format!("<b>{}</b>\n{}", self.title, self.body)
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spike_message() {
        let mut item = WatchItem::new("Charizard <Base>", vec!["Charizard 4/102 Base Set".into()]);
        item.language = Some("en".into());
        let msg = AlertMessage::spike(&item, 12.346, &SignalResult::forced_test(), "pokemontcg");

        assert_eq!(msg.title, "📈 Spike: Charizard &lt;Base&gt;");
        assert!(msg.body.starts_with("Δ24h: 25.0% | Δ7d: 40.0% | breakout: true\n"));
        assert!(msg.body.contains("Now: $12.35 (pokemontcg)"));
        assert!(msg.body.contains("Queries: Charizard 4/102 Base Set"));
        assert!(msg.body.ends_with("Hints: English"));
        assert!(msg.combined().starts_with("<b>📈 Spike:"));
        assert_eq!(msg.caption(), format!("<b>{}</b>", msg.title));
    }
}
