//! Application configuration.
//!
//! Everything is resolved once, at startup, into an immutable [`AppConfig`]:
//! the TOML file is parsed, environment overrides are applied, secrets are read
//! from the environment variables the file names, and the result is validated.
//! Nothing downstream reads the environment.

use crate::domain::entities::watch_item::WatchItem;
use crate::domain::error::DomainError;
use crate::domain::values::candidate_query::DEFAULT_MAX_VARIANTS;
use crate::domain::values::signal::SpikeThresholds;
use crate::domain::values::trend::TrendGate;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.pokemontcg.io/v2/cards";
pub const DEFAULT_CONFIG_PATH: &str = "cardwatch.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub retries: u32,
    pub backoff: Duration,
    pub timeout: Duration,
    pub throttle: Duration,
    /// Results kept per successful query.
    pub max_cards: usize,
    pub max_query_variants: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    pub spike: SpikeThresholds,
    pub breakout_days: u32,
    pub min_avg7_usd: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub use_trend: bool,
    pub batch_size: Option<usize>,
    pub max_runtime: Option<Duration>,
    pub force_test_alert: bool,
    pub send_ping: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub thresholds: Thresholds,
    pub run: RunOptions,
    pub telegram: Option<TelegramCredentials>,
    pub data_dir: PathBuf,
    pub docs_dir: PathBuf,
    pub log_level: String,
    pub watchlist: Vec<WatchItem>,
}

impl AppConfig {
    pub fn trend_gate(&self) -> TrendGate {
        TrendGate::new(self.run.use_trend, self.thresholds.min_avg7_usd)
    }

    /// Read `path` and resolve it against the process environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::from_toml_str(&text, &env)
    }

    /// Parse TOML text, resolving secrets and overrides from `env`.
    pub fn from_toml_str(text: &str, env: &HashMap<String, String>) -> Result<Self, DomainError> {
        let file: ConfigFile = toml::from_str(text)
            .map_err(|e| DomainError::Config(format!("Failed to parse config: {e}")))?;
        let cfg = file.resolve(env)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.watchlist.is_empty() {
            return Err(DomainError::Config("watchlist is empty".into()));
        }
        let mut slugs = HashSet::new();
        for item in &self.watchlist {
            let slug = item.slug();
            if slug.is_empty() {
                return Err(DomainError::Config(format!(
                    "watchlist item name '{}' does not produce a usable slug",
                    item.name
                )));
            }
            if !item.queries.iter().any(|q| !q.trim().is_empty()) {
                return Err(DomainError::Config(format!(
                    "watchlist item '{}' has no queries",
                    item.name
                )));
            }
            if !slugs.insert(slug.clone()) {
                return Err(DomainError::Config(format!(
                    "watchlist items share the slug '{slug}'"
                )));
            }
        }
        let t = &self.thresholds;
        if !t.spike.pct_24h.is_finite() || !t.spike.pct_7d.is_finite() {
            return Err(DomainError::Config("thresholds must be finite".into()));
        }
        if t.breakout_days == 0 {
            return Err(DomainError::Config("breakout_days must be at least 1".into()));
        }
        if self.run.batch_size == Some(0) {
            return Err(DomainError::Config("batch_size must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    source: SourceSection,
    thresholds: ThresholdsSection,
    #[serde(default)]
    run: RunSection,
    #[serde(default)]
    telegram: TelegramSection,
    #[serde(default)]
    paths: PathsSection,
    #[serde(default)]
    log_level: Option<String>,
    #[serde(default)]
    watchlist: Vec<WatchItem>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SourceSection {
    api_url: String,
    api_key_env: String,
    retries: u32,
    backoff_secs: f64,
    timeout_secs: f64,
    throttle_secs: f64,
    max_cards: usize,
    max_query_variants: usize,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key_env: "POKEMONTCG_API_KEY".to_string(),
            retries: 3,
            backoff_secs: 1.5,
            timeout_secs: 30.0,
            throttle_secs: 0.4,
            max_cards: 2,
            max_query_variants: DEFAULT_MAX_VARIANTS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ThresholdsSection {
    pct_24h: f64,
    pct_7d: f64,
    #[serde(default = "default_breakout_days")]
    breakout_days: u32,
    #[serde(default)]
    min_avg7_usd: Option<f64>,
}

fn default_breakout_days() -> u32 {
    7
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RunSection {
    use_cardmarket_trend: bool,
    batch_size: Option<usize>,
    max_runtime_secs: Option<u64>,
    force_test_alert: bool,
    send_ping: bool,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            use_cardmarket_trend: true,
            batch_size: None,
            max_runtime_secs: None,
            force_test_alert: false,
            send_ping: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct TelegramSection {
    token_env: String,
    chat_env: String,
}

impl Default for TelegramSection {
    fn default() -> Self {
        Self {
            token_env: "TELEGRAM_BOT_TOKEN".to_string(),
            chat_env: "TELEGRAM_CHAT_ID".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PathsSection {
    data_dir: PathBuf,
    docs_dir: PathBuf,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            docs_dir: PathBuf::from("docs"),
        }
    }
}

impl ConfigFile {
    fn resolve(self, env: &HashMap<String, String>) -> Result<AppConfig, DomainError> {
        let var = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let retries = parse_override(var("POKEMONTCG_RETRIES"), "POKEMONTCG_RETRIES")?
            .unwrap_or(self.source.retries);
        let backoff = parse_override(var("POKEMONTCG_BACKOFF"), "POKEMONTCG_BACKOFF")?
            .unwrap_or(self.source.backoff_secs);
        let timeout = parse_override(var("POKEMONTCG_TIMEOUT"), "POKEMONTCG_TIMEOUT")?
            .unwrap_or(self.source.timeout_secs);
        let throttle = parse_override(var("POKEMONTCG_THROTTLE"), "POKEMONTCG_THROTTLE")?
            .unwrap_or(self.source.throttle_secs);

        let source = SourceConfig {
            api_url: self.source.api_url,
            api_key: var(&self.source.api_key_env).map(str::to_string),
            retries,
            backoff: secs(backoff, "backoff")?,
            timeout: secs(timeout, "timeout")?,
            throttle: secs(throttle, "throttle")?,
            max_cards: self.source.max_cards.max(1),
            max_query_variants: self.source.max_query_variants,
        };

        let batch_size = parse_override(var("BATCH_SIZE"), "BATCH_SIZE")?.or(self.run.batch_size);
        let max_runtime_secs: Option<u64> =
            parse_override(var("MAX_RUNTIME_SEC"), "MAX_RUNTIME_SEC")?.or(self.run.max_runtime_secs);

        let run = RunOptions {
            use_trend: self.run.use_cardmarket_trend,
            batch_size,
            max_runtime: max_runtime_secs.map(Duration::from_secs),
            force_test_alert: var("FORCE_TEST_ALERT").map_or(self.run.force_test_alert, is_truthy),
            send_ping: var("SEND_PING").map_or(self.run.send_ping, is_truthy),
        };

        let telegram = match (var(&self.telegram.token_env), var(&self.telegram.chat_env)) {
            (Some(token), Some(chat)) => Some(TelegramCredentials {
                bot_token: token.to_string(),
                chat_id: chat.to_string(),
            }),
            _ => None,
        };

        Ok(AppConfig {
            source,
            thresholds: Thresholds {
                spike: SpikeThresholds {
                    pct_24h: self.thresholds.pct_24h,
                    pct_7d: self.thresholds.pct_7d,
                },
                breakout_days: self.thresholds.breakout_days,
                min_avg7_usd: self.thresholds.min_avg7_usd.filter(|v| *v > 0.0),
            },
            run,
            telegram,
            data_dir: self.paths.data_dir,
            docs_dir: self.paths.docs_dir,
            log_level: var("LOG_LEVEL")
                .map(str::to_string)
                .or(self.log_level)
                .unwrap_or_else(|| "info".to_string()),
            watchlist: self.watchlist,
        })
    }
}

fn parse_override<T: std::str::FromStr>(
    value: Option<&str>,
    key: &str,
) -> Result<Option<T>, DomainError> {
    value
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| DomainError::Config(format!("{key} has an invalid value: {v}")))
        })
        .transpose()
}

fn secs(value: f64, what: &str) -> Result<Duration, DomainError> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| DomainError::Config(format!("{what} must be a non-negative number of seconds")))
}

fn is_truthy(v: &str) -> bool {
    matches!(v.to_lowercase().as_str(), "1" | "true" | "yes")
}
