//! One polling cycle over the watchlist.
//!
//! Items are processed strictly one after another. Each item goes through
//! search, price selection, history lookback, spike evaluation and the trend
//! gate, then its observation is appended to history and an alert is sent when
//! every gate agrees. A failing item is classified and recorded; it never stops
//! the cycle.

use crate::application::alert_message::AlertMessage;
use crate::application::batch::BatchPlan;
use crate::config::AppConfig;
use crate::domain::entities::history_record::HistoryRecord;
use crate::domain::entities::run_report::{ItemSummary, RunReport};
use crate::domain::entities::watch_item::WatchItem;
use crate::domain::error::ItemFailure;
use crate::domain::ports::history_store::HistoryStore;
use crate::domain::ports::notifier::Notifier;
use crate::domain::ports::search_provider::SearchProvider;
use crate::domain::values::price_stats::{first_large_image, representative_price, secondary_median};
use crate::domain::values::signal::{evaluate, SignalResult, SpikeThresholds};
use crate::domain::values::trend::TrendGate;
use chrono::{DateTime, Timelike, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const PING_MESSAGE: &str = "🤖 cardwatch started (health check).";

/// The parts of [`AppConfig`] a cycle needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSettings {
    pub thresholds: SpikeThresholds,
    pub breakout_days: u32,
    pub trend: TrendGate,
    pub batch_size: Option<usize>,
    pub max_runtime: Option<Duration>,
    pub force_test_alert: bool,
    pub send_ping: bool,
}

impl CycleSettings {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            thresholds: cfg.thresholds.spike,
            breakout_days: cfg.thresholds.breakout_days,
            trend: cfg.trend_gate(),
            batch_size: cfg.run.batch_size,
            max_runtime: cfg.run.max_runtime,
            force_test_alert: cfg.run.force_test_alert,
            send_ping: cfg.run.send_ping,
        }
    }
}

pub struct RunCycleUseCase {
    settings: CycleSettings,
    watchlist: Vec<WatchItem>,
    search: Arc<dyn SearchProvider>,
    history: Arc<dyn HistoryStore>,
    notifier: Arc<dyn Notifier>,
}

impl RunCycleUseCase {
    pub fn new(
        settings: CycleSettings,
        watchlist: Vec<WatchItem>,
        search: Arc<dyn SearchProvider>,
        history: Arc<dyn HistoryStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            settings,
            watchlist,
            search,
            history,
            notifier,
        }
    }

    pub async fn execute(&self) -> RunReport {
        self.execute_at(Utc::now()).await
    }

    /// Run one cycle as if started at `started`; its UTC hour picks the batch.
    pub async fn execute_at(&self, started: DateTime<Utc>) -> RunReport {
        let clock = Instant::now();

        if self.settings.send_ping {
            self.notifier.send_text(PING_MESSAGE).await;
        }

        let plan = BatchPlan::new(self.watchlist.len(), self.settings.batch_size, started.hour());
        let batch = &self.watchlist[plan.range.clone()];
        info!(
            total = self.watchlist.len(),
            batch = plan.batch_index + 1,
            of = plan.batches,
            items = plan.len(),
            "starting cycle"
        );

        let mut report = RunReport::new(started, self.watchlist.len(), batch.len());
        for (i, item) in batch.iter().enumerate() {
            if i > 0 {
                if let Some(budget) = self.settings.max_runtime {
                    if clock.elapsed() >= budget {
                        report.skipped = batch.len() - i;
                        warn!(
                            ?budget,
                            skipped = report.skipped,
                            "time budget exhausted, stopping cycle"
                        );
                        break;
                    }
                }
            }

            info!(item = %item.name, "processing");
            let outcome = self.process_item(item).await;
            if let Err(f) = &outcome {
                warn!(item = %item.name, kind = %f.kind, "item failed, continuing: {}", f.message);
            }
            report.record(&item.name, &outcome);
        }

        report.duration_sec = clock.elapsed().as_secs_f64();
        info!(
            processed = report.processed,
            alerts = report.alerts_sent,
            failures = report.failures(),
            skipped = report.skipped,
            duration_sec = report.duration_sec,
            "cycle finished"
        );
        report
    }

    pub async fn process_item(&self, item: &WatchItem) -> Result<ItemSummary, ItemFailure> {
        let entries = self.search.search(&item.queries).await?;
        let price = representative_price(&entries);
        let market = secondary_median(&entries);
        let image = first_large_image(&entries);
        info!(
            item = %item.name,
            entries = entries.len(),
            ?price,
            "search complete"
        );

        let slug = item.slug();
        let lookback = self.history.read_recent(&slug, self.settings.breakout_days)?;

        let computed = match price {
            Some(p) => evaluate(p, &lookback, &self.settings.thresholds),
            None => SignalResult::default(),
        };
        let trend_ok = self.settings.trend.passes(&entries);

        let mut notes = Vec::new();
        if entries.is_empty() {
            notes.push("no search results".to_string());
        } else if price.is_none() {
            notes.push("no usable price".to_string());
        }

        let (signal, alert) = if self.settings.force_test_alert {
            notes.push("forced test alert".to_string());
            (SignalResult::forced_test(), true)
        } else {
            let priced = price.is_some_and(|p| p > 0.0);
            if computed.alert && !trend_ok {
                notes.push("trend filter blocked alert".to_string());
            }
            (computed, computed.alert && trend_ok && priced)
        };

        self.history
            .append(&slug, &HistoryRecord::new(Utc::now(), price, market))?;

        if alert {
            let message = AlertMessage::spike(item, price.unwrap_or(0.0), &signal, self.search.name());
            match image {
                Some(url) => {
                    self.notifier.send_photo(url, &message.caption()).await;
                    self.notifier.send_text(&message.body).await;
                }
                None => self.notifier.send_text(&message.combined()).await,
            }
            info!(item = %item.name, "alert sent");
        } else {
            info!(
                item = %item.name,
                signal = computed.alert,
                trend_ok,
                "no alert"
            );
        }

        Ok(ItemSummary {
            name: item.name.clone(),
            entries: entries.len(),
            price_now: price,
            signal: SignalResult { alert, ..signal },
            trend_ok,
            alerted: alert,
            note: notes.join("; "),
        })
    }
}
