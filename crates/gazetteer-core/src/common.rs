// crates/gazetteer-core/src/common.rs
use serde::{Deserialize, Serialize};

/// Simple aggregate statistics for the catalogue.
///
/// Returned by [`crate::Gazetteer::stats`]; the counts include alias and
/// alternate-name rows, so `places` is larger than the number of distinct
/// geoids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbStats {
    pub hierarchy: usize,
    pub places: usize,
    pub alternate_names: usize,
}

impl DbStats {
    pub fn total_rows(&self) -> usize {
        self.hierarchy + self.places
    }
}
