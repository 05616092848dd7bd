/// Converts time-ordered closes into simple period-over-period returns.
///
/// Element `i` is `(prices[i + 1] - prices[i]) / prices[i]`, so the result is
/// one shorter than the input. Fewer than two prices give an empty result. A
/// zero base price yields a zero return rather than an infinity.
pub fn compute_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| {
            if w[0] == 0.0 {
                0.0
            } else {
                (w[1] - w[0]) / w[0]
            }
        })
        .collect()
}
