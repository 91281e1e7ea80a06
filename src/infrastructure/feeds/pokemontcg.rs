use super::card_record::CardsResponse;
use crate::config::SourceConfig;
use crate::domain::entities::price_entry::PriceEntry;
use crate::domain::error::SearchError;
use crate::domain::ports::search_provider::SearchProvider;
use crate::domain::values::candidate_query::QueryBuilder;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = "cardwatch/0.1";

/// pokemontcg.io v2 card search.
///
/// Every candidate request is retried with exponential backoff on transport
/// errors and on 429/5xx responses, and is followed by a throttle pause so a
/// run never bursts the API. A 404 counts as "no results".
pub struct PokemonTcgProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    retries: u32,
    backoff: Duration,
    throttle: Duration,
    max_cards: usize,
    builder: QueryBuilder,
}

impl PokemonTcgProvider {
    pub fn new(cfg: &SourceConfig) -> Self {
        Self {
            client: build_client(cfg.timeout),
            api_url: cfg.api_url.clone(),
            api_key: cfg.api_key.clone(),
            retries: cfg.retries,
            backoff: cfg.backoff,
            throttle: cfg.throttle,
            max_cards: cfg.max_cards,
            builder: QueryBuilder::new(cfg.max_query_variants),
        }
    }

    async fn fetch_candidate(&self, query: &str) -> Result<Vec<PriceEntry>, SearchError> {
        let mut attempt = 0u32;
        loop {
            let mut req = self.client.get(&self.api_url).query(&[("q", query)]);
            if let Some(key) = &self.api_key {
                req = req.header("X-Api-Key", key);
            }

            let err = match req.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    debug!(query, status = status.as_u16(), "card search response");

                    if status == StatusCode::NOT_FOUND {
                        return Ok(vec![]);
                    }
                    if status.is_success() {
                        let body: CardsResponse = resp.json().await.map_err(classify)?;
                        return Ok(body
                            .data
                            .into_iter()
                            .take(self.max_cards)
                            .map(|card| card.into_price_entry())
                            .collect());
                    }
                    let err = SearchError::Status {
                        code: status.as_u16(),
                        query: query.to_string(),
                    };
                    if !is_retryable(status) {
                        return Err(err);
                    }
                    err
                }
                Err(e) => classify(e),
            };

            if attempt >= self.retries {
                return Err(err);
            }
            let delay = backoff_delay(self.backoff, attempt);
            warn!(query, attempt = attempt + 1, ?delay, "retrying card search: {err}");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl SearchProvider for PokemonTcgProvider {
    fn name(&self) -> &str {
        "pokemontcg"
    }

    async fn search(&self, base_queries: &[String]) -> Result<Vec<PriceEntry>, SearchError> {
        first_productive_candidates(&self.builder, base_queries, |q| async move {
            let outcome = self.fetch_candidate(&q).await;
            tokio::time::sleep(self.throttle).await;
            outcome
        })
        .await
    }
}

/// For each base query, try its candidates in order and keep the results of the
/// first one that returns anything. Failing candidates are skipped; the last
/// failure is only reported when nothing at all was found.
pub async fn first_productive_candidates<F, Fut>(
    builder: &QueryBuilder,
    base_queries: &[String],
    mut fetch: F,
) -> Result<Vec<PriceEntry>, SearchError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Vec<PriceEntry>, SearchError>>,
{
    let mut results = Vec::new();
    let mut last_error = None;

    for base in base_queries.iter().filter(|q| !q.trim().is_empty()) {
        for candidate in builder.build(base) {
            match fetch(candidate.clone()).await {
                Ok(entries) if !entries.is_empty() => {
                    info!(query = %candidate, found = entries.len(), "card search hit");
                    results.extend(entries);
                    break;
                }
                Ok(_) => debug!(query = %candidate, "no results, trying next candidate"),
                Err(e) => {
                    warn!(query = %candidate, "card search failed: {e}");
                    last_error = Some(e);
                }
            }
        }
    }

    match last_error {
        Some(e) if results.is_empty() => Err(e),
        _ => Ok(results),
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    match reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!(?timeout, "failed to build configured HTTP client, using defaults: {e}");
            reqwest::Client::new()
        }
    }
}

fn classify(e: reqwest::Error) -> SearchError {
    if e.is_timeout() {
        SearchError::Timeout(e.to_string())
    } else if e.is_decode() {
        SearchError::Parse(e.to_string())
    } else {
        SearchError::Network(e.to_string())
    }
}

fn is_retryable(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}

fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(1u32 << attempt.min(10))
}
