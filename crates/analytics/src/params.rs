use crate::correlation::MIN_OVERLAP;

/// The largest share of low-data cells a matrix row may hold before its
/// asset is pruned.
pub const MAX_LOW_DATA_FRACTION: f64 = 0.8;

/// Tunables for a correlation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisParams {
    /// Fewer overlapping return observations than this yields a low-data cell.
    pub min_overlap: usize,
    /// Rows with a strictly larger low-data share than this are dropped.
    pub max_low_data_fraction: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            min_overlap: MIN_OVERLAP,
            max_low_data_fraction: MAX_LOW_DATA_FRACTION,
        }
    }
}
