use core_types::Asset;
use rust_decimal::prelude::ToPrimitive;

/// Open interest times current price, a stand-in for traded volume.
pub fn volume_proxy(asset: &Asset) -> f64 {
    asset.open_interest.to_f64().unwrap_or(0.0) * asset.current_price
}

/// Orders assets by descending volume proxy.
///
/// The sort is stable: assets with equal proxies keep their input order.
pub fn rank_by_volume(mut assets: Vec<Asset>) -> Vec<Asset> {
    assets.sort_by(|a, b| volume_proxy(b).total_cmp(&volume_proxy(a)));
    assets
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn names(assets: &[Asset]) -> Vec<&str> {
        assets.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_volume_proxy() {
        let asset = Asset::new("ETH", dec!(2.5), 4.0, 1);
        assert_eq!(volume_proxy(&asset), 10.0);
    }

    #[test]
    fn test_ranks_by_open_interest_times_price() {
        let assets = vec![
            Asset::new("SMALL", dec!(10), 1.0, 0),
            Asset::new("BIG", dec!(5), 100.0, 1),
            Asset::new("MID", dec!(1000), 0.1, 2),
        ];

        let ranked = rank_by_volume(assets);
        assert_eq!(names(&ranked), vec!["BIG", "MID", "SMALL"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let assets = vec![
            Asset::new("FIRST", dec!(2), 5.0, 0),
            Asset::new("TOP", dec!(100), 5.0, 1),
            Asset::new("SECOND", dec!(5), 2.0, 2),
        ];

        let ranked = rank_by_volume(assets);
        assert_eq!(names(&ranked), vec!["TOP", "FIRST", "SECOND"]);
    }
}
