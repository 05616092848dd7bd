use std::collections::BTreeMap;

/// Daily closing prices for one asset, strictly time-ascending with one close per bar.
///
/// An empty series is a valid value: it is what a failed or empty history fetch
/// degrades to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    closes: Vec<f64>,
}

impl PriceSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a series from `(open_time_ms, close)` pairs given in any order.
    ///
    /// Bars are sorted by timestamp. When two bars share a timestamp the one
    /// appearing later in the input wins.
    pub fn from_timestamped<I>(bars: I) -> Self
    where
        I: IntoIterator<Item = (i64, f64)>,
    {
        let by_time: BTreeMap<i64, f64> = bars.into_iter().collect();
        Self {
            closes: by_time.into_values().collect(),
        }
    }

    /// Wraps closes that are already in time order.
    pub fn from_closes(closes: Vec<f64>) -> Self {
        Self { closes }
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}
