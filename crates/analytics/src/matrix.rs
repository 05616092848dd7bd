use crate::correlation::correlate_with_min_overlap;
use crate::params::AnalysisParams;
use crate::returns::compute_returns;
use core_types::{Asset, CorrelationMatrix, PriceSeries};
use std::collections::HashMap;

/// Builds the full pairwise correlation matrix for `assets`, self-pairs included.
///
/// Return series are derived once per asset before the pairwise pass. An asset
/// without an entry in `histories` is treated as having an empty history, so its
/// whole row ends up low-data rather than missing.
///
/// The calculator is symmetric in its arguments, so each unordered pair is
/// computed once and mirrored into both cells.
pub fn build_matrix(
    assets: &[Asset],
    histories: &HashMap<String, PriceSeries>,
    params: &AnalysisParams,
) -> CorrelationMatrix {
    let returns: Vec<(&str, Vec<f64>)> = assets
        .iter()
        .map(|asset| {
            let series = histories
                .get(&asset.name)
                .map(|history| compute_returns(history.closes()))
                .unwrap_or_default();
            (asset.name.as_str(), series)
        })
        .collect();

    let mut matrix = CorrelationMatrix::new();
    for (i, (name_a, returns_a)) in returns.iter().enumerate() {
        for (name_b, returns_b) in &returns[i..] {
            let cell = correlate_with_min_overlap(returns_a, returns_b, params.min_overlap);
            matrix.insert(name_a, name_b, cell);
        }
    }

    tracing::debug!(assets = assets.len(), "Built correlation matrix.");
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::CorrelationCell;
    use rust_decimal_macros::dec;

    const RETURNS: [f64; 9] = [0.01, 0.02, -0.01, 0.01, 0.02, -0.01, 0.01, 0.02, -0.01];

    fn asset(name: &str, index: usize) -> Asset {
        Asset::new(name, dec!(100), 10.0, index)
    }

    fn prices_from_returns(returns: &[f64]) -> PriceSeries {
        let mut closes = vec![100.0];
        for r in returns {
            let last = *closes.last().unwrap();
            closes.push(last * (1.0 + r));
        }
        PriceSeries::from_closes(closes)
    }

    fn histories(entries: &[(&str, PriceSeries)]) -> HashMap<String, PriceSeries> {
        entries
            .iter()
            .map(|(name, series)| (name.to_string(), series.clone()))
            .collect()
    }

    #[test]
    fn test_identical_returns_correlate_fully() {
        let assets = vec![asset("AAA", 0), asset("BBB", 1)];
        let histories = histories(&[
            ("AAA", prices_from_returns(&RETURNS)),
            ("BBB", prices_from_returns(&RETURNS)),
        ]);

        let matrix = build_matrix(&assets, &histories, &AnalysisParams::default());
        let cell = matrix.get("AAA", "BBB").unwrap();

        assert!(!cell.low_data);
        assert!((cell.corr - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_negated_returns_correlate_inversely() {
        let negated: Vec<f64> = RETURNS.iter().map(|r| -r).collect();
        let assets = vec![asset("AAA", 0), asset("BBB", 1)];
        let histories = histories(&[
            ("AAA", prices_from_returns(&RETURNS)),
            ("BBB", prices_from_returns(&negated)),
        ]);

        let matrix = build_matrix(&assets, &histories, &AnalysisParams::default());
        let cell = matrix.get("AAA", "BBB").unwrap();

        assert!(!cell.low_data);
        assert!((cell.corr + 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_matrix_is_complete_and_symmetric() {
        let assets = vec![asset("AAA", 0), asset("BBB", 1), asset("CCC", 2)];
        let histories = histories(&[
            ("AAA", prices_from_returns(&RETURNS)),
            ("BBB", prices_from_returns(&[0.03, -0.02, 0.01, 0.04, -0.05, 0.02, 0.0])),
            ("CCC", prices_from_returns(&[0.01, 0.01])),
        ]);

        let matrix = build_matrix(&assets, &histories, &AnalysisParams::default());

        assert_eq!(matrix.len(), 3);
        assert!(matrix.is_consistent());
        for a in &assets {
            for b in &assets {
                assert_eq!(matrix.get(&a.name, &b.name), matrix.get(&b.name, &a.name));
            }
        }
    }

    #[test]
    fn test_self_pair_is_full_correlation() {
        let assets = vec![asset("AAA", 0)];
        let histories = histories(&[("AAA", prices_from_returns(&RETURNS))]);

        let matrix = build_matrix(&assets, &histories, &AnalysisParams::default());
        let cell = matrix.get("AAA", "AAA").unwrap();

        assert!(!cell.low_data);
        assert!((cell.corr - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_history_degrades_row_to_low_data() {
        let assets = vec![asset("AAA", 0), asset("GONE", 1)];
        let histories = histories(&[("AAA", prices_from_returns(&RETURNS))]);

        let matrix = build_matrix(&assets, &histories, &AnalysisParams::default());

        assert_eq!(matrix.get("GONE", "GONE"), Some(&CorrelationCell::LOW_DATA));
        assert_eq!(matrix.get("GONE", "AAA"), Some(&CorrelationCell::LOW_DATA));
        assert!(!matrix.get("AAA", "AAA").unwrap().low_data);
    }

    #[test]
    fn test_rebuilding_is_bit_identical() {
        let assets = vec![asset("AAA", 0), asset("BBB", 1)];
        let histories = histories(&[
            ("AAA", prices_from_returns(&RETURNS)),
            ("BBB", prices_from_returns(&[0.03, -0.02, 0.01, 0.04, -0.05, 0.02, 0.0])),
        ]);

        let first = build_matrix(&assets, &histories, &AnalysisParams::default());
        let second = build_matrix(&assets, &histories, &AnalysisParams::default());

        let bits = |m: &CorrelationMatrix| m.get("AAA", "BBB").unwrap().corr.to_bits();
        assert_eq!(first, second);
        assert_eq!(bits(&first), bits(&second));
    }
}
