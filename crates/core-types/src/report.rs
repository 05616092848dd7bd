use crate::{Asset, CorrelationMatrix};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The output of one correlation cycle: the reduced matrix and its assets
/// ranked by volume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationReport {
    pub matrix: CorrelationMatrix,
    pub sorted_assets: Vec<Asset>,
}

impl CorrelationReport {
    pub fn new(matrix: CorrelationMatrix, sorted_assets: Vec<Asset>) -> Self {
        Self {
            matrix,
            sorted_assets,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sorted_assets.is_empty()
    }

    /// The ranked assets and the matrix rows name the same set, without
    /// duplicates, and the matrix is complete and symmetric.
    pub fn is_well_formed(&self) -> bool {
        let ranked: BTreeSet<&str> = self.sorted_assets.iter().map(|a| a.name.as_str()).collect();
        let rows: BTreeSet<&str> = self.matrix.names().collect();

        ranked.len() == self.sorted_assets.len() && ranked == rows && self.matrix.is_consistent()
    }
}
