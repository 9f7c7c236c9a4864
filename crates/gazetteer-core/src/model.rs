// crates/gazetteer-core/src/model.rs

//! Persisted catalogue rows and the ephemeral candidate rows built from them.

use crate::feature::FeatureCode;
use crate::phonetic::phonetic_key;
use crate::text::normalize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a record inside its partition.
pub type RowId = u32;

/// Storage partitions. Countries and states are kept apart from everything
/// else so hierarchy lookups scan a small table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Partition {
    Hierarchy,
    Place,
}

impl Partition {
    pub fn for_feature(code: &FeatureCode) -> Self {
        if code.is_hierarchy() {
            Self::Hierarchy
        } else {
            Self::Place
        }
    }
}

/// One catalogue entry.
///
/// `geoid` names the source entity and is *not* unique: alias and
/// alternate-name rows repeat the geoid of the entity they stand for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    /// Normalized lower-case name.
    pub name: String,
    pub country_iso: String,
    pub admin1_id: String,
    pub admin2_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub feature_code: FeatureCode,
    pub geoid: String,
    pub phonetic_key: String,
}

impl GeoRecord {
    /// Creates a record, normalizing `name` and deriving its phonetic key.
    pub fn new(name: &str, feature: impl Into<FeatureCode>, geoid: impl Into<String>) -> Self {
        let name = normalize(name, false);
        Self {
            phonetic_key: phonetic_key(&name),
            name,
            country_iso: String::new(),
            admin1_id: String::new(),
            admin2_id: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            feature_code: feature.into(),
            geoid: geoid.into(),
        }
    }

    pub fn in_country(mut self, iso: &str) -> Self {
        self.country_iso = iso.to_ascii_lowercase();
        self
    }

    pub fn in_admin(mut self, admin1_id: &str, admin2_id: &str) -> Self {
        self.admin1_id = admin1_id.to_string();
        self.admin2_id = admin2_id.to_string();
        self
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// A copy of this record under another name (alias rows).
    pub fn renamed(&self, name: &str) -> Self {
        let name = normalize(name, false);
        Self {
            phonetic_key: phonetic_key(&name),
            name,
            ..self.clone()
        }
    }

    /// Rectilinear lat/lon distance.
    pub fn distance(&self, other: &GeoRecord) -> f64 {
        (self.latitude - other.latitude).abs() + (self.longitude - other.longitude).abs()
    }

    pub fn partition(&self) -> Partition {
        Partition::for_feature(&self.feature_code)
    }
}

/// `(geoid, language) -> name` entry of the alternate-name partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateName {
    pub geoid: String,
    pub language: String,
    pub name: String,
}

/// A record as returned by a storage probe.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRow {
    pub partition: Partition,
    pub id: RowId,
    pub record: GeoRecord,
}

/// The cascade tier that produced a candidate, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchTier {
    Exact,
    Wildcard,
    WordSubset,
    Phonetic,
    PhoneticCombination,
    FeatureInferred,
    /// Looked up directly by geoid.
    ExternalId,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Exact => "exact",
            Self::Wildcard => "wildcard",
            Self::WordSubset => "word",
            Self::Phonetic => "phonetic",
            Self::PhoneticCombination => "phonetic-combination",
            Self::FeatureInferred => "feature",
            Self::ExternalId => "geoid",
        };
        f.write_str(label)
    }
}

/// A scored candidate for one lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub partition: Partition,
    pub row: RowId,
    pub record: GeoRecord,
    pub tier: MatchTier,
    /// Lower is better. Unscored candidates carry `f64::MAX`.
    pub score: f64,
    /// Query text this candidate left unexplained.
    pub prefix: String,
    /// Returned by more than one word probe.
    pub reinforced: bool,
}

impl Candidate {
    pub fn new(row: GeoRow, tier: MatchTier) -> Self {
        Self {
            partition: row.partition,
            row: row.id,
            record: row.record,
            tier,
            score: f64::MAX,
            prefix: String::new(),
            reinforced: false,
        }
    }

    pub fn key(&self) -> (Partition, RowId) {
        (self.partition, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_normalized_and_keyed() {
        let r = GeoRecord::new("Saint-Malo", "PPL", "2978640").in_country("FR");
        assert_eq!(r.name, "st malo");
        assert_eq!(r.country_iso, "fr");
        assert_eq!(r.phonetic_key, phonetic_key("st malo"));
        assert_eq!(r.partition(), Partition::Place);
    }

    #[test]
    fn renamed_keeps_identity() {
        let r = GeoRecord::new("Bavaria", "ADM1", "2951839").in_country("de").in_admin("02", "");
        let alias = r.renamed("Bayern");
        assert_eq!(alias.name, "bayern");
        assert_eq!(alias.geoid, r.geoid);
        assert_eq!(alias.partition(), Partition::Hierarchy);
        assert_ne!(alias.phonetic_key, r.phonetic_key);
    }

    #[test]
    fn rectilinear_distance() {
        let a = GeoRecord::new("a", "PPL", "1").at(10.0, 20.0);
        let b = GeoRecord::new("b", "PPL", "2").at(10.25, 19.5);
        assert!((a.distance(&b) - 0.75).abs() < 1e-9);
    }
}
