use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The correlation between two assets, scaled to [-100, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationCell {
    pub corr: f64,
    /// When set, `corr` carries no meaning and must be ignored.
    pub low_data: bool,
}

impl CorrelationCell {
    /// The cell used when the two series overlap too little to be compared.
    pub const LOW_DATA: Self = Self {
        corr: 0.0,
        low_data: true,
    };

    pub fn computed(corr: f64) -> Self {
        Self {
            corr,
            low_data: false,
        }
    }

    /// Returns the correlation, or `None` for a low-data cell.
    pub fn value(&self) -> Option<f64> {
        (!self.low_data).then_some(self.corr)
    }
}

/// A dense, symmetric asset-by-asset correlation matrix keyed by asset name.
///
/// Rows are kept in a `BTreeMap` so iteration and serialization order are
/// deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationMatrix {
    rows: BTreeMap<String, BTreeMap<String, CorrelationCell>>,
}

impl CorrelationMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `cell` under both `[a][b]` and `[b][a]`.
    pub fn insert(&mut self, a: &str, b: &str, cell: CorrelationCell) {
        self.rows
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string(), cell);
        self.rows
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string(), cell);
    }

    pub fn get(&self, a: &str, b: &str) -> Option<&CorrelationCell> {
        self.rows.get(a).and_then(|row| row.get(b))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rows.contains_key(name)
    }

    /// Asset names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Number of assets (rows) in the matrix.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when every row holds exactly one cell per asset and every cell
    /// equals its mirror.
    pub fn is_consistent(&self) -> bool {
        let names: BTreeSet<&str> = self.names().collect();

        self.rows.iter().all(|(a, row)| {
            row.len() == names.len()
                && row.iter().all(|(b, cell)| {
                    names.contains(b.as_str()) && self.get(b, a) == Some(cell)
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_mirrored() {
        let mut matrix = CorrelationMatrix::new();
        matrix.insert("BTC", "ETH", CorrelationCell::computed(42.0));

        assert_eq!(matrix.get("BTC", "ETH"), matrix.get("ETH", "BTC"));
        assert_eq!(matrix.get("ETH", "BTC").unwrap().value(), Some(42.0));
    }

    #[test]
    fn test_low_data_cell_has_no_value() {
        assert_eq!(CorrelationCell::LOW_DATA.value(), None);
    }

    #[test]
    fn test_consistency_requires_complete_rows() {
        let mut matrix = CorrelationMatrix::new();
        matrix.insert("BTC", "ETH", CorrelationCell::computed(10.0));
        // Missing self-pairs.
        assert!(!matrix.is_consistent());

        matrix.insert("BTC", "BTC", CorrelationCell::computed(100.0));
        matrix.insert("ETH", "ETH", CorrelationCell::computed(100.0));
        assert!(matrix.is_consistent());
    }

    #[test]
    fn test_serializes_as_nested_object() {
        let mut matrix = CorrelationMatrix::new();
        matrix.insert("BTC", "BTC", CorrelationCell::LOW_DATA);

        let json = serde_json::to_value(&matrix).unwrap();
        assert_eq!(json["BTC"]["BTC"]["lowData"], true);
        assert_eq!(json["BTC"]["BTC"]["corr"], 0.0);
    }
}
