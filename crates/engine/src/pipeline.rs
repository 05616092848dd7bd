use crate::error::EngineError;
use crate::fetch::{fetch_histories, FetchLimits};
use crate::outcome::{CorrelationOutcome, ReportSource};
use analytics::{build_matrix, filter_by_coverage, rank_by_volume, AnalysisParams};
use api_client::MarketDataProvider;
use chrono::{DateTime, NaiveTime, Utc};
use configuration::Settings;
use core_types::{Asset, CorrelationReport, PriceSeries};
use result_cache::{CacheEntry, ResultCache};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything a pipeline run needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// First instant of history requested for every asset.
    pub history_start: DateTime<Utc>,
    pub limits: FetchLimits,
    pub analysis: AnalysisParams,
}

impl PipelineConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            history_start: settings.history.start_date.and_time(NaiveTime::MIN).and_utc(),
            limits: FetchLimits {
                max_concurrent_requests: settings.api.max_concurrent_requests,
                request_timeout: settings.api.request_timeout,
            },
            analysis: AnalysisParams {
                min_overlap: settings.analysis.min_overlap,
                max_low_data_fraction: settings.analysis.max_low_data_fraction,
            },
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// The orchestrator for one correlation cycle.
///
/// It consults the cache, fetches the universe, fans out the history requests,
/// then reduces everything into a `CorrelationReport` and stores it.
pub struct CorrelationPipeline {
    provider: Arc<dyn MarketDataProvider>,
    cache: Option<ResultCache>,
    config: PipelineConfig,
}

impl CorrelationPipeline {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: PipelineConfig) -> Self {
        Self {
            provider,
            cache: None,
            config,
        }
    }

    pub fn with_cache(mut self, cache: ResultCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Serves a fresh cached report when there is one, otherwise computes.
    pub async fn run(&self) -> CorrelationOutcome {
        if let Some(entry) = self.cached_entry().await {
            tracing::info!(
                cached_at = entry.timestamp,
                assets = entry.data.sorted_assets.len(),
                "Serving correlation report from cache."
            );
            return CorrelationOutcome::Ready {
                report: entry.data,
                source: ReportSource::Cache {
                    cached_at: entry.timestamp,
                },
            };
        }
        self.refresh().await
    }

    /// Computes a new report, bypassing any cached one, and stores it.
    pub async fn refresh(&self) -> CorrelationOutcome {
        let report = match self.compute().await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "Correlation cycle failed.");
                return CorrelationOutcome::Unavailable(e);
            }
        };

        if report.is_empty() {
            tracing::warn!("No asset passed the coverage filter.");
            return CorrelationOutcome::NoSurvivors;
        }

        self.store(&report).await;

        CorrelationOutcome::Ready {
            report,
            source: ReportSource::Computed,
        }
    }

    /// Reads the cache slot on the blocking pool; the store may touch the filesystem.
    async fn cached_entry(&self) -> Option<CacheEntry> {
        let cache = self.cache.clone()?;
        match tokio::task::spawn_blocking(move || cache.get()).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Cache read task failed, treating as a miss.");
                None
            }
        }
    }

    /// Writes `report` to the cache slot on the blocking pool. Failures are logged only.
    async fn store(&self, report: &CorrelationReport) {
        let Some(cache) = self.cache.clone() else {
            return;
        };
        let key = cache.key().to_string();
        let snapshot = report.clone();

        match tokio::task::spawn_blocking(move || cache.put(&snapshot)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                tracing::warn!(key = %key, error = %e, "Failed to store correlation report.")
            }
            Err(e) => tracing::warn!(key = %key, error = %e, "Cache write task failed."),
        }
    }

    /// Runs the fetch and reduce stages without touching the cache.
    pub async fn compute(&self) -> Result<CorrelationReport, EngineError> {
        let universe = self.provider.fetch_universe().await?;

        let end = Utc::now();
        let histories = fetch_histories(
            Arc::clone(&self.provider),
            &universe,
            self.config.history_start,
            end,
            self.config.limits,
        )
        .await?;

        let report = reduce(&universe, &histories, &self.config.analysis);
        tracing::info!(
            universe = universe.len(),
            survivors = report.sorted_assets.len(),
            "Correlation cycle complete."
        );
        Ok(report)
    }
}

/// The pure tail of a cycle: matrix, coverage filter, then volume ranking.
pub fn reduce(
    universe: &[Asset],
    histories: &HashMap<String, PriceSeries>,
    params: &AnalysisParams,
) -> CorrelationReport {
    let matrix = build_matrix(universe, histories, params);
    let (survivors, matrix) = filter_by_coverage(universe, &matrix, params.max_low_data_fraction);
    CorrelationReport::new(matrix, rank_by_volume(survivors))
}
