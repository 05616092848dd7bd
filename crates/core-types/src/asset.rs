use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A tradable perpetual as listed in the exchange universe.
///
/// Serialized in camelCase because the cache slot stores assets in that shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Unique coin name, e.g. "BTC".
    pub name: String,
    /// Open interest in coin units, kept as the exact decimal the exchange reports.
    pub open_interest: Decimal,
    /// Latest mark price.
    pub current_price: f64,
    /// Position of the asset in the exchange universe.
    pub asset_index: usize,
}

impl Asset {
    pub fn new(
        name: impl Into<String>,
        open_interest: Decimal,
        current_price: f64,
        asset_index: usize,
    ) -> Self {
        Self {
            name: name.into(),
            open_interest,
            current_price,
            asset_index,
        }
    }
}
