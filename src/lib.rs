pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::panel::PanelUseCase;
use crate::application::run_cycle::{CycleSettings, RunCycleUseCase, PING_MESSAGE};
use crate::config::AppConfig;
use crate::domain::entities::history_record::HistoryRecord;
use crate::domain::entities::run_report::RunReport;
use crate::domain::entities::watch_item::slugify;
use crate::domain::error::DomainError;
use crate::domain::ports::history_store::HistoryStore;
use crate::domain::ports::notifier::Notifier;
use crate::domain::ports::report_sink::{PanelRow, ReportSink};
use crate::domain::ports::search_provider::SearchProvider;
use crate::domain::values::candidate_query::QueryBuilder;
use crate::infrastructure::feeds::pokemontcg::PokemonTcgProvider;
use crate::infrastructure::history::csv_store::CsvHistoryStore;
use crate::infrastructure::notify::noop::NoopNotifier;
use crate::infrastructure::notify::telegram::TelegramNotifier;
use crate::infrastructure::report::files::FileReportSink;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

pub struct CardWatch {
    run_cycle_uc: RunCycleUseCase,
    panel_uc: PanelUseCase,
    history: Arc<dyn HistoryStore>,
    notifier: Arc<dyn Notifier>,
    sink: Arc<dyn ReportSink>,
    query_builder: QueryBuilder,
}

impl CardWatch {
    pub fn new(config: AppConfig) -> Self {
        let search: Arc<dyn SearchProvider> = Arc::new(PokemonTcgProvider::new(&config.source));
        let history: Arc<dyn HistoryStore> = Arc::new(CsvHistoryStore::new(config.data_dir.clone()));
        let notifier: Arc<dyn Notifier> = match &config.telegram {
            Some(creds) => Arc::new(TelegramNotifier::new(Some(creds.clone()))),
            None => {
                info!("telegram credentials not set, alerts will only be logged");
                Arc::new(NoopNotifier)
            }
        };
        let sink: Arc<dyn ReportSink> =
            Arc::new(FileReportSink::new(config.data_dir.clone(), config.docs_dir.clone()));

        Self::with_providers(config, search, history, notifier, sink)
    }

    pub fn with_providers(
        config: AppConfig,
        search: Arc<dyn SearchProvider>,
        history: Arc<dyn HistoryStore>,
        notifier: Arc<dyn Notifier>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        let settings = CycleSettings::from_config(&config);
        Self {
            run_cycle_uc: RunCycleUseCase::new(
                settings,
                config.watchlist,
                search,
                history.clone(),
                notifier.clone(),
            ),
            panel_uc: PanelUseCase::new(history.clone(), sink.clone()),
            history,
            notifier,
            sink,
            query_builder: QueryBuilder::new(config.source.max_query_variants),
        }
    }

    /// One full cycle: poll the batch, write the run report, rebuild the panel.
    /// Report and panel failures are logged; the cycle result is still returned.
    pub async fn run_cycle(&self) -> RunReport {
        let report = self.run_cycle_uc.execute().await;
        self.publish(&report);
        report
    }

    pub fn publish(&self, report: &RunReport) {
        if let Err(e) = self.sink.write_run_report(report) {
            warn!("failed to write run report: {e}");
        }
        if let Err(e) = self.panel_uc.execute() {
            warn!("failed to build price panel: {e}");
        }
    }

    pub fn candidate_queries(&self, text: &str) -> Vec<String> {
        self.query_builder.build(text)
    }

    /// Stored observations for a card name (or slug), optionally limited to
    /// the last `days`.
    pub fn history(&self, name: &str, days: Option<u32>) -> Result<Vec<HistoryRecord>, DomainError> {
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(DomainError::InvalidInput(format!("'{name}' is not a usable card name")));
        }
        if !self.history.list_slugs()?.contains(&slug) {
            return Err(DomainError::NotFound(format!("no history for '{slug}'")));
        }
        let records = self.history.read_all(&slug)?;
        Ok(match days {
            Some(d) => {
                let cutoff = Utc::now() - Duration::days(i64::from(d));
                records.into_iter().filter(|r| r.timestamp >= cutoff).collect()
            }
            None => records,
        })
    }

    pub fn build_panel(&self) -> Result<Vec<PanelRow>, DomainError> {
        self.panel_uc.execute()
    }

    pub async fn ping(&self) {
        self.notifier.send_text(PING_MESSAGE).await;
    }
}
