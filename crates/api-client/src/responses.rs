use core_types::{Asset, PriceSeries};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

// --- Request Bodies ---

/// The body of a `POST /info` request. Serialized as `{"type": "...", ...}`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InfoRequest<'a> {
    MetaAndAssetCtxs,
    CandleSnapshot { req: CandleSnapshotRequest<'a> },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandleSnapshotRequest<'a> {
    pub coin: &'a str,
    pub interval: &'a str,
    pub start_time: i64,
    pub end_time: i64,
}

// --- Universe Deserialization ---

/// The response to `metaAndAssetCtxs`: a two-element array of the perp universe
/// and the per-asset market contexts, matched by position.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaAndAssetCtxs(pub Meta, pub Vec<AssetCtx>);

#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub universe: Vec<UniverseEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniverseEntry {
    pub name: String,
    #[serde(default)]
    pub is_delisted: bool,
}

/// Market context for one asset. Numbers come as strings, e.g. `"1234.5"`.
/// There are more fields, but these are the ones the ranking needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetCtx {
    #[serde(default)]
    pub open_interest: Option<String>,
    #[serde(default)]
    pub mark_px: Option<String>,
}

impl MetaAndAssetCtxs {
    /// Validates the raw universe into `Asset`s.
    ///
    /// Delisted, unnamed and duplicate entries are skipped. A missing or malformed
    /// open interest defaults to zero and a malformed mark price to 0.0, so the
    /// asset is still correlated but ranks last.
    pub fn into_assets(self) -> Vec<Asset> {
        let MetaAndAssetCtxs(meta, ctxs) = self;
        let mut seen = HashSet::new();

        meta.universe
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                if entry.is_delisted {
                    tracing::debug!(coin = %entry.name, "Skipping delisted asset.");
                    return None;
                }
                if entry.name.trim().is_empty() || !seen.insert(entry.name.clone()) {
                    tracing::warn!(
                        coin = %entry.name,
                        index,
                        "Skipping unnamed or duplicate asset."
                    );
                    return None;
                }

                let ctx = ctxs.get(index);
                let open_interest =
                    parse_open_interest(&entry.name, ctx.and_then(|c| c.open_interest.as_deref()));
                let current_price =
                    parse_mark_price(&entry.name, ctx.and_then(|c| c.mark_px.as_deref()));

                Some(Asset::new(entry.name, open_interest, current_price, index))
            })
            .collect()
    }
}

fn parse_open_interest(coin: &str, raw: Option<&str>) -> Decimal {
    match raw.map(Decimal::from_str) {
        Some(Ok(value)) if !value.is_sign_negative() => value,
        _ => {
            tracing::warn!(coin, raw = ?raw, "Malformed open interest, defaulting to zero.");
            Decimal::ZERO
        }
    }
}

fn parse_mark_price(coin: &str, raw: Option<&str>) -> f64 {
    match raw.map(f64::from_str) {
        Some(Ok(value)) if value.is_finite() && value >= 0.0 => value,
        _ => {
            tracing::warn!(coin, raw = ?raw, "Malformed mark price, defaulting to zero.");
            0.0
        }
    }
}

// --- Candle Deserialization ---

/// One candle from `candleSnapshot`. Only the open time and close are used.
#[derive(Debug, Clone, Deserialize)]
pub struct Candle {
    #[serde(rename = "t")]
    pub open_time: i64,
    #[serde(rename = "c")]
    pub close: String,
}

/// Turns raw candles into a time-ordered, timestamp-deduplicated `PriceSeries`.
///
/// Candles whose close is not a finite positive number are dropped.
pub fn candles_to_series(coin: &str, candles: Vec<Candle>) -> PriceSeries {
    let total = candles.len();
    let bars: Vec<(i64, f64)> = candles
        .into_iter()
        .filter_map(|candle| match candle.close.parse::<f64>() {
            Ok(close) if close.is_finite() && close > 0.0 => Some((candle.open_time, close)),
            _ => None,
        })
        .collect();

    if bars.len() < total {
        tracing::warn!(coin, dropped = total - bars.len(), "Dropped malformed candles.");
    }
    PriceSeries::from_timestamped(bars)
}
