use core_types::{Asset, CorrelationCell, CorrelationMatrix};

/// Drops assets whose matrix row is dominated by low-data cells.
///
/// The low-data share of a row is measured over the full `assets` set, and a
/// missing cell counts as low-data. An asset survives when its share is at most
/// `max_low_data_fraction`. Survivors keep their input order.
///
/// Returns the survivors together with a freshly built matrix holding only
/// survivor-to-survivor cells.
pub fn filter_by_coverage(
    assets: &[Asset],
    matrix: &CorrelationMatrix,
    max_low_data_fraction: f64,
) -> (Vec<Asset>, CorrelationMatrix) {
    let total = assets.len() as f64;

    let survivors: Vec<Asset> = assets
        .iter()
        .filter(|asset| {
            let low_data = assets
                .iter()
                .filter(|other| {
                    matrix
                        .get(&asset.name, &other.name)
                        .is_none_or(|cell| cell.low_data)
                })
                .count();
            let fraction = low_data as f64 / total;

            if fraction > max_low_data_fraction {
                tracing::debug!(
                    coin = %asset.name,
                    fraction,
                    "Dropping asset with insufficient history coverage."
                );
                false
            } else {
                true
            }
        })
        .cloned()
        .collect();

    let mut reduced = CorrelationMatrix::new();
    for (i, a) in survivors.iter().enumerate() {
        for b in &survivors[i..] {
            let cell = matrix
                .get(&a.name, &b.name)
                .copied()
                .unwrap_or(CorrelationCell::LOW_DATA);
            reduced.insert(&a.name, &b.name, cell);
        }
    }

    tracing::info!(
        kept = survivors.len(),
        dropped = assets.len() - survivors.len(),
        "Coverage filter applied."
    );
    (survivors, reduced)
}
