use crate::responses::{
    candles_to_series, Candle, CandleSnapshotRequest, InfoRequest, MetaAndAssetCtxs,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use configuration::ApiSettings;
use core_types::{Asset, PriceSeries};
use serde::de::DeserializeOwned;

pub mod error;
pub mod responses;

// --- Public API ---
pub use error::ApiError;

/// Candle interval used for every history request.
pub const DAILY_INTERVAL: &str = "1d";

/// The most candles the upstream returns for a single snapshot request.
pub const MAX_CANDLES: i64 = 5000;

/// The generic, abstract interface for a market data source.
/// This trait is the contract the correlation pipeline uses, allowing the
/// underlying implementation (live or mock) to be swapped out.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches the tradable universe with each asset's open interest and mark price.
    async fn fetch_universe(&self) -> Result<Vec<Asset>, ApiError>;

    /// Fetches daily closes for `coin` between `start` and `end`, oldest first.
    async fn fetch_daily_closes(
        &self,
        coin: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries, ApiError>;
}

/// A concrete implementation of the `MarketDataProvider` for the Hyperliquid info API.
#[derive(Clone)]
pub struct HyperliquidClient {
    client: reqwest::Client,
    info_url: String,
}

impl HyperliquidClient {
    /// Builds a client whose every request is bounded by `settings.request_timeout`.
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self {
            client,
            info_url: settings.info_url.clone(),
        })
    }

    async fn post_info<T: DeserializeOwned>(
        &self,
        request: &InfoRequest<'_>,
    ) -> Result<T, ApiError> {
        let response = self.client.post(&self.info_url).json(request).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str::<T>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            })
        }
    }
}

/// Moves `start` forward when the window would need more than `MAX_CANDLES`
/// daily bars to cover.
pub fn clamp_daily_window(start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
    let earliest = end - TimeDelta::days(MAX_CANDLES);
    start.max(earliest)
}

#[async_trait]
impl MarketDataProvider for HyperliquidClient {
    async fn fetch_universe(&self) -> Result<Vec<Asset>, ApiError> {
        let raw: MetaAndAssetCtxs = self.post_info(&InfoRequest::MetaAndAssetCtxs).await?;
        let assets = raw.into_assets();
        tracing::info!(assets = assets.len(), "Fetched asset universe.");
        Ok(assets)
    }

    async fn fetch_daily_closes(
        &self,
        coin: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries, ApiError> {
        let start = clamp_daily_window(start, end);
        let request = InfoRequest::CandleSnapshot {
            req: CandleSnapshotRequest {
                coin,
                interval: DAILY_INTERVAL,
                start_time: start.timestamp_millis(),
                end_time: end.timestamp_millis(),
            },
        };

        let candles: Vec<Candle> = self.post_info(&request).await?;
        let series = candles_to_series(coin, candles);
        tracing::debug!(coin, bars = series.len(), "Fetched daily closes.");
        Ok(series)
    }
}
