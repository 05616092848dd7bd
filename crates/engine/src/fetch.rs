use crate::error::EngineError;
use api_client::MarketDataProvider;
use chrono::{DateTime, Utc};
use core_types::{Asset, PriceSeries};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Bounds on the history fan-out.
#[derive(Debug, Clone, Copy)]
pub struct FetchLimits {
    /// Requests allowed in flight at once. Zero is treated as one.
    pub max_concurrent_requests: usize,
    /// Deadline for a single asset's history request.
    pub request_timeout: Duration,
}

/// Fetches every asset's daily history concurrently and waits for all of them.
///
/// One task is spawned per asset and a semaphore caps how many requests are in
/// flight. A failed or timed-out request is logged and becomes an empty series
/// for that asset. Only a failure of the fan-out itself (a panicked task, a
/// closed limiter) is returned as an error, and then no histories are returned
/// at all.
pub async fn fetch_histories(
    provider: Arc<dyn MarketDataProvider>,
    assets: &[Asset],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    limits: FetchLimits,
) -> Result<HashMap<String, PriceSeries>, EngineError> {
    let limiter = Arc::new(Semaphore::new(limits.max_concurrent_requests.max(1)));

    // Create concurrent tasks for each asset
    let tasks: Vec<_> = assets
        .iter()
        .map(|asset| {
            let provider = Arc::clone(&provider);
            let limiter = Arc::clone(&limiter);
            let coin = asset.name.clone();

            tokio::spawn(async move {
                let _permit = limiter.acquire_owned().await?;
                let fetch = provider.fetch_daily_closes(&coin, start, end);

                let series = match tokio::time::timeout(limits.request_timeout, fetch).await {
                    Ok(Ok(series)) => series,
                    Ok(Err(e)) => {
                        tracing::warn!(
                            coin = %coin,
                            error = %e,
                            "History fetch failed, treating as empty."
                        );
                        PriceSeries::empty()
                    }
                    Err(_) => {
                        tracing::warn!(
                            coin = %coin,
                            timeout = ?limits.request_timeout,
                            "History fetch timed out, treating as empty."
                        );
                        PriceSeries::empty()
                    }
                };
                Ok::<_, EngineError>((coin, series))
            })
        })
        .collect();

    // Wait for all concurrent tasks to complete
    let results = join_all(tasks).await;

    let mut histories = HashMap::with_capacity(results.len());
    for result in results {
        let (coin, series) = result??;
        histories.insert(coin, series);
    }

    let empty = histories.values().filter(|s| s.is_empty()).count();
    tracing::info!(assets = histories.len(), empty, "History fan-out complete.");
    Ok(histories)
}
