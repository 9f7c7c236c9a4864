// crates/gazetteer-core/src/store/index.rs

//! Sorted secondary indexes over one partition.
//!
//! Each index is a permutation of row ids ordered by some key, so a prefix
//! or equality probe is two binary searches. Indexes are derived data: they
//! are rebuilt after every commit and after loading from disk, never
//! serialized.

use super::predicate::{increment, Predicate, TextMatch};
use crate::model::{GeoRecord, RowId};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub(crate) struct TableIndex {
    by_name: Vec<RowId>,
    by_key: Vec<RowId>,
    /// (country, feature)
    by_country_feature: Vec<RowId>,
    /// (country, admin1, admin2)
    by_admin: Vec<RowId>,
    words: Vec<(String, RowId)>,
    by_geoid: HashMap<String, Vec<RowId>>,
}

fn sorted(rows: &[GeoRecord], cmp: impl Fn(&GeoRecord, &GeoRecord) -> Ordering) -> Vec<RowId> {
    let mut ids: Vec<RowId> = (0..rows.len() as RowId).collect();
    ids.sort_by(|&a, &b| cmp(&rows[a as usize], &rows[b as usize]).then(a.cmp(&b)));
    ids
}

/// Sub-slice of `ids` between the first id not `below_lo` and the first id
/// not `below_hi`. `ids` must be sorted consistently with both predicates.
fn span(ids: &[RowId], below_lo: impl Fn(RowId) -> bool, below_hi: impl Fn(RowId) -> bool) -> &[RowId] {
    let start = ids.partition_point(|&id| below_lo(id));
    let end = ids.partition_point(|&id| below_hi(id));
    &ids[start..end.max(start)]
}

/// Candidate rows chosen by the planner, before the full predicate check.
pub(crate) enum Plan<'a> {
    Slice(&'a [RowId]),
    Owned(Vec<RowId>),
    Scan(usize),
}

impl<'a> Plan<'a> {
    pub(crate) fn into_ids(self) -> Box<dyn Iterator<Item = RowId> + 'a> {
        match self {
            Plan::Slice(s) => Box::new(s.iter().copied()),
            Plan::Owned(v) => Box::new(v.into_iter()),
            Plan::Scan(n) => Box::new(0..n as RowId),
        }
    }
}

impl TableIndex {
    pub(crate) fn build(rows: &[GeoRecord]) -> Self {
        let by_name = sorted(rows, |a, b| a.name.cmp(&b.name));
        let by_key = sorted(rows, |a, b| a.phonetic_key.cmp(&b.phonetic_key));
        let by_country_feature = sorted(rows, |a, b| {
            (a.country_iso.as_str(), a.feature_code.as_str())
                .cmp(&(b.country_iso.as_str(), b.feature_code.as_str()))
        });
        let by_admin = sorted(rows, |a, b| {
            (a.country_iso.as_str(), a.admin1_id.as_str(), a.admin2_id.as_str()).cmp(&(
                b.country_iso.as_str(),
                b.admin1_id.as_str(),
                b.admin2_id.as_str(),
            ))
        });

        let mut words: Vec<(String, RowId)> = rows
            .iter()
            .enumerate()
            .flat_map(|(id, r)| {
                r.name
                    .split_whitespace()
                    .map(move |w| (w.to_string(), id as RowId))
            })
            .collect();
        words.sort();
        words.dedup();

        let mut by_geoid: HashMap<String, Vec<RowId>> = HashMap::new();
        for (id, r) in rows.iter().enumerate() {
            by_geoid.entry(r.geoid.clone()).or_default().push(id as RowId);
        }

        Self {
            by_name,
            by_key,
            by_country_feature,
            by_admin,
            words,
            by_geoid,
        }
    }

    /// Picks the narrowest index the predicate allows.
    pub(crate) fn plan<'a>(&'a self, rows: &'a [GeoRecord], p: &Predicate) -> Plan<'a> {
        let row = |id: RowId| &rows[id as usize];

        if let Some(geoid) = &p.geoid {
            return match self.by_geoid.get(geoid) {
                Some(ids) => Plan::Slice(ids),
                None => Plan::Owned(Vec::new()),
            };
        }

        if let Some(m) = &p.name {
            let bounds = match m {
                TextMatch::Exact(v) => Some((v.clone(), None)),
                TextMatch::Range { lo, hi } => Some((lo.clone(), Some(hi.clone()))),
                TextMatch::Pattern(pat) if !pat.literal_prefix().is_empty() => {
                    let lo = pat.literal_prefix().to_string();
                    let hi = increment(&lo);
                    Some((lo, Some(hi)))
                }
                _ => None,
            };
            if let Some((lo, hi)) = bounds {
                let ids = match hi {
                    // exact: lo <= name <= lo
                    None => span(&self.by_name, |id| row(id).name < lo, |id| row(id).name <= lo),
                    Some(hi) if hi.is_empty() => {
                        span(&self.by_name, |id| row(id).name < lo, |_| true)
                    }
                    Some(hi) => span(&self.by_name, |id| row(id).name < lo, |id| row(id).name < hi),
                };
                return Plan::Slice(ids);
            }
            if let TextMatch::WordPrefix(w) = m {
                let hi = increment(w);
                let start = self.words.partition_point(|(word, _)| word.as_str() < w.as_str());
                let end = self
                    .words
                    .partition_point(|(word, _)| hi.is_empty() || word.as_str() < hi.as_str());
                let mut ids: Vec<RowId> =
                    self.words[start..end.max(start)].iter().map(|(_, id)| *id).collect();
                ids.sort_unstable();
                ids.dedup();
                return Plan::Owned(ids);
            }
        }

        if let Some(m) = &p.phonetic_key {
            let bounds = match m {
                TextMatch::Exact(v) => Some((v.as_str(), v.as_str(), true)),
                TextMatch::Range { lo, hi } if !hi.is_empty() => Some((lo.as_str(), hi.as_str(), false)),
                _ => None,
            };
            if let Some((lo, hi, inclusive)) = bounds {
                let ids = span(
                    &self.by_key,
                    |id| row(id).phonetic_key.as_str() < lo,
                    |id| {
                        let k = row(id).phonetic_key.as_str();
                        if inclusive {
                            k <= hi
                        } else {
                            k < hi
                        }
                    },
                );
                return Plan::Slice(ids);
            }
        }

        if let Some(country) = p.country_iso.as_deref() {
            if let Some(admin1) = p.admin1_id.as_deref() {
                let ids = span(
                    &self.by_admin,
                    |id| {
                        let r = row(id);
                        (r.country_iso.as_str(), r.admin1_id.as_str()) < (country, admin1)
                    },
                    |id| {
                        let r = row(id);
                        (r.country_iso.as_str(), r.admin1_id.as_str()) <= (country, admin1)
                    },
                );
                return Plan::Slice(ids);
            }
            let feature = match &p.feature {
                Some(TextMatch::Exact(f)) => Some(f.as_str()),
                _ => None,
            };
            let ids = match feature {
                Some(f) => span(
                    &self.by_country_feature,
                    |id| {
                        let r = row(id);
                        (r.country_iso.as_str(), r.feature_code.as_str()) < (country, f)
                    },
                    |id| {
                        let r = row(id);
                        (r.country_iso.as_str(), r.feature_code.as_str()) <= (country, f)
                    },
                ),
                None => span(
                    &self.by_country_feature,
                    |id| row(id).country_iso.as_str() < country,
                    |id| row(id).country_iso.as_str() <= country,
                ),
            };
            return Plan::Slice(ids);
        }

        Plan::Scan(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<GeoRecord> {
        vec![
            GeoRecord::new("Toronto", "PPLA", "1").in_country("ca").in_admin("08", ""),
            GeoRecord::new("Tiverton", "PPL", "2").in_country("gb").in_admin("ENG", "D4"),
            GeoRecord::new("Toronto", "PPL", "3").in_country("us").in_admin("OH", ""),
            GeoRecord::new("Winchester Cathedral", "CH", "4").in_country("gb").in_admin("ENG", "H1"),
            GeoRecord::new("Torquay", "PPL", "5").in_country("gb").in_admin("ENG", "D4"),
        ]
    }

    fn ids(plan: Plan<'_>) -> Vec<RowId> {
        let mut v: Vec<RowId> = plan.into_ids().collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn exact_name_uses_name_index() {
        let rows = rows();
        let idx = TableIndex::build(&rows);
        let p = Predicate::new().name(TextMatch::Exact("toronto".into()));
        assert_eq!(ids(idx.plan(&rows, &p)), vec![0, 2]);
    }

    #[test]
    fn prefix_range_on_name() {
        let rows = rows();
        let idx = TableIndex::build(&rows);
        let p = Predicate::new().name(TextMatch::prefix("tor"));
        assert_eq!(ids(idx.plan(&rows, &p)), vec![0, 2, 4]);
    }

    #[test]
    fn word_prefix_uses_word_index() {
        let rows = rows();
        let idx = TableIndex::build(&rows);
        let p = Predicate::new().name(TextMatch::WordPrefix("cathed".into()));
        assert_eq!(ids(idx.plan(&rows, &p)), vec![3]);
    }

    #[test]
    fn country_and_admin_narrowing() {
        let rows = rows();
        let idx = TableIndex::build(&rows);
        let p = Predicate::new().country("gb").admin1("ENG");
        assert_eq!(ids(idx.plan(&rows, &p)), vec![1, 3, 4]);
        let p = Predicate::new().country("gb").feature("CH");
        assert_eq!(ids(idx.plan(&rows, &p)), vec![3]);
    }

    #[test]
    fn geoid_lookup() {
        let rows = rows();
        let idx = TableIndex::build(&rows);
        assert_eq!(ids(idx.plan(&rows, &Predicate::new().geoid("5"))), vec![4]);
        assert!(ids(idx.plan(&rows, &Predicate::new().geoid("99"))).is_empty());
    }
}
