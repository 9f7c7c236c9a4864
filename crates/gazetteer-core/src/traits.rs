// crates/gazetteer-core/src/traits.rs
use crate::common::DbStats;
use crate::model::{AlternateName, GeoRow, Partition};
use crate::store::Predicate;

/// Read-only access to a place catalogue.
///
/// The search cascade only ever talks to this trait, so lookups can run
/// against the bundled [`crate::store::Catalogue`] or any other backend that
/// can answer typed predicates.
///
/// Implementors must be `Send + Sync`: one store is shared by every lookup
/// thread.
///
/// # Examples
/// ```rust
/// use gazetteer_core::model::{GeoRecord, Partition};
/// use gazetteer_core::store::{Catalogue, Predicate, TextMatch};
/// use gazetteer_core::traits::GeoStore;
///
/// let mut catalogue = Catalogue::new();
/// let mut tx = catalogue.begin();
/// tx.insert(GeoRecord::new("Toronto", "PPLA", "6167865").in_country("ca"), None);
/// tx.commit();
///
/// let rows = catalogue.select(
///     Partition::Place,
///     &Predicate::new().name(TextMatch::prefix("toro")).country("ca"),
///     10,
/// );
/// assert_eq!(rows[0].record.geoid, "6167865");
/// ```
pub trait GeoStore: Send + Sync {
    /// Rows of `partition` satisfying every constraint of `predicate`, at
    /// most `limit` of them.
    ///
    /// Rows come back in index order; callers that need a ranking score
    /// them afterwards.
    fn select(&self, partition: Partition, predicate: &Predicate, limit: usize) -> Vec<GeoRow>;

    /// Every alternate name recorded for `geoid`.
    fn alternate_names(&self, geoid: &str) -> Vec<AlternateName>;

    /// Layout version of the underlying data.
    fn schema_version(&self) -> i32;

    fn stats(&self) -> DbStats;
}
