// crates/gazetteer-core/src/store/catalogue.rs

use super::index::TableIndex;
use super::predicate::Predicate;
use super::SCHEMA_VERSION;
use crate::common::DbStats;
use crate::model::{AlternateName, GeoRecord, GeoRow, Partition, RowId};
use crate::traits::GeoStore;
use std::collections::HashMap;

/// One partition: rows in insertion order plus derived indexes.
#[derive(Debug, Default, Clone)]
pub(crate) struct Table {
    pub(crate) rows: Vec<GeoRecord>,
    index: TableIndex,
}

impl Table {
    fn from_rows(rows: Vec<GeoRecord>) -> Self {
        let index = TableIndex::build(&rows);
        Self { rows, index }
    }

    fn select(&self, partition: Partition, p: &Predicate, limit: usize) -> Vec<GeoRow> {
        self.index
            .plan(&self.rows, p)
            .into_ids()
            .filter(|&id| p.matches(&self.rows[id as usize]))
            .take(limit)
            .map(|id| GeoRow {
                partition,
                id,
                record: self.rows[id as usize].clone(),
            })
            .collect()
    }
}

/// The in-memory catalogue: hierarchy and place partitions, alternate names
/// and the schema version they were written with.
///
/// Reads go through [`GeoStore`]; writes go through [`Catalogue::begin`].
#[derive(Debug, Clone)]
pub struct Catalogue {
    pub(crate) hierarchy: Table,
    pub(crate) places: Table,
    pub(crate) alternate_names: Vec<AlternateName>,
    alt_by_geoid: HashMap<String, Vec<usize>>,
    pub(crate) schema_version: i32,
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalogue {
    pub fn new() -> Self {
        Self {
            hierarchy: Table::default(),
            places: Table::default(),
            alternate_names: Vec::new(),
            alt_by_geoid: HashMap::new(),
            schema_version: SCHEMA_VERSION,
        }
    }

    pub(crate) fn from_parts(
        hierarchy: Vec<GeoRecord>,
        places: Vec<GeoRecord>,
        alternate_names: Vec<AlternateName>,
        schema_version: i32,
    ) -> Self {
        let mut c = Self {
            hierarchy: Table::from_rows(hierarchy),
            places: Table::from_rows(places),
            alternate_names,
            alt_by_geoid: HashMap::new(),
            schema_version,
        };
        c.index_alternate_names();
        c
    }

    fn index_alternate_names(&mut self) {
        self.alt_by_geoid.clear();
        for (i, alt) in self.alternate_names.iter().enumerate() {
            self.alt_by_geoid.entry(alt.geoid.clone()).or_default().push(i);
        }
    }

    fn table(&self, partition: Partition) -> &Table {
        match partition {
            Partition::Hierarchy => &self.hierarchy,
            Partition::Place => &self.places,
        }
    }

    pub fn record(&self, partition: Partition, id: RowId) -> Option<&GeoRecord> {
        self.table(partition).rows.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.hierarchy.rows.len() + self.places.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Starts a batched write. Nothing is visible to readers until
    /// [`Transaction::commit`]; dropping the transaction discards it.
    pub fn begin(&mut self) -> Transaction<'_> {
        let mut geoids = HashMap::new();
        for partition in [Partition::Hierarchy, Partition::Place] {
            for (id, r) in self.table(partition).rows.iter().enumerate() {
                geoids
                    .entry(r.geoid.clone())
                    .or_insert((partition, id as RowId));
            }
        }
        Transaction {
            catalogue: self,
            hierarchy: Vec::new(),
            places: Vec::new(),
            alternate_names: Vec::new(),
            geoids,
        }
    }
}

impl GeoStore for Catalogue {
    fn select(&self, partition: Partition, predicate: &Predicate, limit: usize) -> Vec<GeoRow> {
        self.table(partition).select(partition, predicate, limit)
    }

    fn alternate_names(&self, geoid: &str) -> Vec<AlternateName> {
        self.alt_by_geoid
            .get(geoid)
            .map(|ids| ids.iter().map(|&i| self.alternate_names[i].clone()).collect())
            .unwrap_or_default()
    }

    fn schema_version(&self) -> i32 {
        self.schema_version
    }

    fn stats(&self) -> DbStats {
        DbStats {
            hierarchy: self.hierarchy.rows.len(),
            places: self.places.rows.len(),
            alternate_names: self.alternate_names.len(),
        }
    }
}

// -----------------------------------------------------------------------------
// TRANSACTION
// -----------------------------------------------------------------------------

/// A staged batch of inserts against a [`Catalogue`].
///
/// Row ids handed out by [`Transaction::insert`] are final: they are the ids
/// the rows will have once committed.
pub struct Transaction<'c> {
    catalogue: &'c mut Catalogue,
    hierarchy: Vec<GeoRecord>,
    places: Vec<GeoRecord>,
    alternate_names: Vec<AlternateName>,
    geoids: HashMap<String, (Partition, RowId)>,
}

impl Transaction<'_> {
    /// Inserts `record` into `partition_hint`, or into the partition its
    /// feature code implies when no hint is given.
    pub fn insert(&mut self, record: GeoRecord, partition_hint: Option<Partition>) -> RowId {
        let partition = partition_hint.unwrap_or_else(|| record.partition());
        let (committed, staged) = match partition {
            Partition::Hierarchy => (self.catalogue.hierarchy.rows.len(), &mut self.hierarchy),
            Partition::Place => (self.catalogue.places.rows.len(), &mut self.places),
        };
        let id = (committed + staged.len()) as RowId;
        self.geoids
            .entry(record.geoid.clone())
            .or_insert((partition, id));
        staged.push(record);
        id
    }

    pub fn insert_alternate_name(&mut self, alt: AlternateName) {
        self.alternate_names.push(alt);
    }

    /// First row written for `geoid`, committed or staged.
    pub fn find_geoid(&self, geoid: &str) -> Option<(Partition, RowId)> {
        self.geoids.get(geoid).copied()
    }

    pub fn record(&self, partition: Partition, id: RowId) -> Option<&GeoRecord> {
        let (committed, staged) = match partition {
            Partition::Hierarchy => (&self.catalogue.hierarchy.rows, &self.hierarchy),
            Partition::Place => (&self.catalogue.places.rows, &self.places),
        };
        let id = id as usize;
        if id < committed.len() {
            committed.get(id)
        } else {
            staged.get(id - committed.len())
        }
    }

    /// Linear search over staged and committed rows; used for the handful of
    /// alias rows written at the end of an import.
    pub fn find_by_name(&self, name: &str, iso: &str, feature: &str) -> Option<GeoRecord> {
        let partition = if matches!(feature, "ADM0" | "ADM1") {
            Partition::Hierarchy
        } else {
            Partition::Place
        };
        let (committed, staged) = match partition {
            Partition::Hierarchy => (&self.catalogue.hierarchy.rows, &self.hierarchy),
            Partition::Place => (&self.catalogue.places.rows, &self.places),
        };
        committed
            .iter()
            .chain(staged.iter())
            .find(|r| {
                r.name == name
                    && r.feature_code.as_str() == feature
                    && (iso.is_empty() || r.country_iso == iso)
            })
            .cloned()
    }

    pub fn staged_len(&self) -> usize {
        self.hierarchy.len() + self.places.len()
    }

    /// Publishes every staged row and rebuilds the indexes.
    pub fn commit(self) {
        let Transaction {
            catalogue,
            hierarchy,
            places,
            alternate_names,
            ..
        } = self;
        tracing::debug!(
            hierarchy = hierarchy.len(),
            places = places.len(),
            alternate_names = alternate_names.len(),
            "committing catalogue batch"
        );
        let mut h = std::mem::take(&mut catalogue.hierarchy.rows);
        h.extend(hierarchy);
        let mut p = std::mem::take(&mut catalogue.places.rows);
        p.extend(places);
        catalogue.hierarchy = Table::from_rows(h);
        catalogue.places = Table::from_rows(p);
        catalogue.alternate_names.extend(alternate_names);
        catalogue.index_alternate_names();
        catalogue.schema_version = SCHEMA_VERSION;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TextMatch;

    fn sample() -> Catalogue {
        let mut c = Catalogue::new();
        let mut tx = c.begin();
        tx.insert(GeoRecord::new("Canada", "ADM0", "6251999").in_country("ca"), None);
        tx.insert(
            GeoRecord::new("Ontario", "ADM1", "6093943").in_country("ca").in_admin("08", ""),
            None,
        );
        tx.insert(
            GeoRecord::new("Toronto", "PPLA", "6167865").in_country("ca").in_admin("08", ""),
            None,
        );
        tx.commit();
        c
    }

    #[test]
    fn inserts_land_in_partitions() {
        let c = sample();
        let s = c.stats();
        assert_eq!((s.hierarchy, s.places), (2, 1));
        let rows = c.select(
            Partition::Place,
            &Predicate::new().name(TextMatch::Exact("toronto".into())),
            10,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.geoid, "6167865");
    }

    #[test]
    fn dropped_transaction_is_discarded() {
        let mut c = sample();
        {
            let mut tx = c.begin();
            tx.insert(GeoRecord::new("Ottawa", "PPLC", "6094817").in_country("ca"), None);
            assert_eq!(tx.staged_len(), 1);
        }
        assert_eq!(c.stats().places, 1);
    }

    #[test]
    fn row_ids_are_stable_across_batches() {
        let mut c = sample();
        let mut tx = c.begin();
        let id = tx.insert(GeoRecord::new("Ottawa", "PPLC", "6094817").in_country("ca"), None);
        assert_eq!(id, 1);
        assert_eq!(tx.find_geoid("6167865"), Some((Partition::Place, 0)));
        assert_eq!(tx.record(Partition::Place, 1).map(|r| r.name.as_str()), Some("ottawa"));
        tx.commit();
        assert_eq!(c.record(Partition::Place, 1).map(|r| r.name.as_str()), Some("ottawa"));
    }

    #[test]
    fn respects_partition_hint_and_limit() {
        let mut c = Catalogue::new();
        let mut tx = c.begin();
        for i in 0..5 {
            tx.insert(
                GeoRecord::new("Springfield", "PPL", i.to_string()).in_country("us"),
                Some(Partition::Place),
            );
        }
        tx.commit();
        let rows = c.select(Partition::Place, &Predicate::new().country("us"), 3);
        assert_eq!(rows.len(), 3);
    }
}
