use core_types::CorrelationCell;

/// Fewer overlapping daily returns than this are treated as statistically meaningless.
pub const MIN_OVERLAP: usize = 5;

/// Pearson correlation of two return series with the default overlap threshold.
pub fn correlate(a: &[f64], b: &[f64]) -> CorrelationCell {
    correlate_with_min_overlap(a, b, MIN_OVERLAP)
}

/// Pearson correlation of two return series, scaled to [-100, 100].
///
/// Both series are truncated to their common length, aligned from the start.
/// When that length is below `min_overlap` the cell is flagged low-data. A
/// constant series has no variance and correlates at 0.
///
/// The result does not depend on argument order.
pub fn correlate_with_min_overlap(a: &[f64], b: &[f64], min_overlap: usize) -> CorrelationCell {
    let n = a.len().min(b.len());
    if n < min_overlap.max(1) {
        return CorrelationCell::LOW_DATA;
    }

    let (a, b) = (&a[..n], &b[..n]);
    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;

    let mut numerator = 0.0;
    let mut sum_sq_a = 0.0;
    let mut sum_sq_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        numerator += dx * dy;
        sum_sq_a += dx * dx;
        sum_sq_b += dy * dy;
    }

    let den_a = sum_sq_a.sqrt();
    let den_b = sum_sq_b.sqrt();
    if den_a == 0.0 || den_b == 0.0 {
        return CorrelationCell::computed(0.0);
    }

    let corr = (numerator / (den_a * den_b) * 100.0).clamp(-100.0, 100.0);
    CorrelationCell::computed(corr)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RETURNS: [f64; 9] = [0.01, 0.02, -0.01, 0.01, 0.02, -0.01, 0.01, 0.02, -0.01];

    #[test]
    fn test_identical_series_correlate_fully() {
        let cell = correlate(&RETURNS, &RETURNS);
        assert!(!cell.low_data);
        assert!((cell.corr - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_negated_series_correlate_inversely() {
        let negated: Vec<f64> = RETURNS.iter().map(|r| -r).collect();
        let cell = correlate(&RETURNS, &negated);
        assert!(!cell.low_data);
        assert!((cell.corr + 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_four_points_of_overlap_is_low_data() {
        let cell = correlate(&RETURNS[..4], &RETURNS);
        assert_eq!(cell, CorrelationCell::LOW_DATA);
    }

    #[test]
    fn test_five_points_of_overlap_is_computed() {
        let cell = correlate(&RETURNS[..5], &RETURNS);
        assert!(!cell.low_data);
        assert!((cell.corr - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_series_correlates_at_zero() {
        let flat = [0.0; 9];
        let cell = correlate(&flat, &RETURNS);
        assert!(!cell.low_data);
        assert_eq!(cell.corr, 0.0);
        assert!(!cell.corr.is_nan());
    }

    #[test]
    fn test_truncates_from_the_start() {
        let longer = [0.03, -0.02, 0.01, 0.04, -0.05, 0.5, -0.5, 0.9];
        let shorter = [0.01, 0.02, -0.03, 0.02, 0.01];

        let truncated = correlate(&longer, &shorter);
        let explicit = correlate(&longer[..5], &shorter);
        assert_eq!(truncated, explicit);
    }

    #[test]
    fn test_argument_order_does_not_matter() {
        let other = [0.03, -0.02, 0.01, 0.04, -0.05, 0.02, 0.0, 0.01, -0.02];
        assert_eq!(correlate(&RETURNS, &other), correlate(&other, &RETURNS));
    }

    #[test]
    fn test_custom_overlap_threshold() {
        let cell = correlate_with_min_overlap(&RETURNS[..5], &RETURNS, 6);
        assert!(cell.low_data);
    }

    #[test]
    fn test_result_stays_within_bounds() {
        let other = [0.011, 0.019, -0.012, 0.009, 0.021, -0.008, 0.012, 0.018, -0.011];
        let cell = correlate(&RETURNS, &other);
        assert!((-100.0..=100.0).contains(&cell.corr));
    }
}
