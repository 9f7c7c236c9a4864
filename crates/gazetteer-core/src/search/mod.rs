// crates/gazetteer-core/src/search/mod.rs

//! # Search Engine
//!
//! Turns a parsed [`Place`] into scored candidates: picks the target level
//! from [`PlaceKind`], runs the [`Cascade`] over the right partitions, adds
//! a second pass for a county token that may really be the city, and scores
//! every candidate against the query.

pub mod strategy;

use crate::config::GazetteerConfig;
use crate::feature::FeatureCode;
use crate::model::{Candidate, GeoRecord, Partition};
use crate::place::{Place, PlaceKind};
use crate::score::MatchScorer;
use crate::store::{Predicate, TextMatch};
use crate::text::admin2_normalize;
use crate::traits::GeoStore;
use std::collections::HashMap;
use std::sync::RwLock;

pub use strategy::{Cascade, Limits, SearchStrategy, Target};

/// Which partitions a cascade run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Places,
    Hierarchy,
    /// Advanced searches: places first, then countries and states.
    PlacesThenHierarchy,
}

impl Scope {
    pub fn partitions(self) -> &'static [Partition] {
        match self {
            Scope::Places => &[Partition::Place],
            Scope::Hierarchy => &[Partition::Hierarchy],
            Scope::PlacesThenHierarchy => &[Partition::Place, Partition::Hierarchy],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum NameKey {
    Country(String),
    Admin1(String, String),
    Admin2(String, String, String),
}

/// Read-through cache of hierarchy display names by id.
#[derive(Debug, Default)]
struct NameCache {
    names: RwLock<HashMap<NameKey, String>>,
}

impl NameCache {
    fn get_or_insert_with(&self, key: NameKey, load: impl FnOnce() -> String) -> String {
        if let Ok(names) = self.names.read() {
            if let Some(name) = names.get(&key) {
                return name.clone();
            }
        }
        let name = load();
        if let Ok(mut names) = self.names.write() {
            names.insert(key, name.clone());
        }
        name
    }
}

pub struct SearchEngine {
    store: Box<dyn GeoStore>,
    cascade: Cascade,
    scorer: MatchScorer,
    names: NameCache,
}

impl SearchEngine {
    pub fn new(store: Box<dyn GeoStore>, config: &GazetteerConfig) -> Self {
        let limits = Limits {
            query_limit: config.query_limit,
            word_fanout_limit: config.word_fanout_limit,
        };
        Self {
            store,
            cascade: Cascade::standard(config.candidate_cap, limits),
            scorer: MatchScorer::new(config.scoring.clone()),
            names: NameCache::default(),
        }
    }

    pub fn store(&self) -> &dyn GeoStore {
        self.store.as_ref()
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    pub fn cascade(&self, target: &Target, scope: Scope) -> Vec<Candidate> {
        self.cascade.run(self.store(), scope.partitions(), target)
    }

    // ---- hierarchy names ----

    /// First (lowest row id) row matching `predicate`, if any.
    fn first(&self, partition: Partition, predicate: &Predicate) -> Option<GeoRecord> {
        self.store
            .select(partition, predicate, 1)
            .into_iter()
            .next()
            .map(|row| row.record)
    }

    pub fn country_name(&self, iso: &str) -> String {
        if iso.is_empty() {
            return String::new();
        }
        self.names.get_or_insert_with(NameKey::Country(iso.to_string()), || {
            let p = Predicate::new().country(iso).feature(FeatureCode::COUNTRY);
            self.first(Partition::Hierarchy, &p)
                .map(|r| r.name)
                .unwrap_or_default()
        })
    }

    pub fn admin1_name(&self, iso: &str, admin1_id: &str) -> String {
        if iso.is_empty() || admin1_id.is_empty() {
            return String::new();
        }
        let key = NameKey::Admin1(iso.to_string(), admin1_id.to_string());
        self.names.get_or_insert_with(key, || {
            let p = Predicate::new()
                .country(iso)
                .admin1(admin1_id)
                .feature(FeatureCode::STATE);
            self.first(Partition::Hierarchy, &p)
                .map(|r| r.name)
                .unwrap_or_default()
        })
    }

    pub fn admin2_name(&self, iso: &str, admin1_id: &str, admin2_id: &str) -> String {
        if iso.is_empty() || admin2_id.is_empty() {
            return String::new();
        }
        let key = NameKey::Admin2(iso.to_string(), admin1_id.to_string(), admin2_id.to_string());
        self.names.get_or_insert_with(key, || {
            let p = Predicate::new()
                .country(iso)
                .admin1(admin1_id)
                .admin2(admin2_id)
                .feature(FeatureCode::COUNTY);
            self.first(Partition::Place, &p)
                .map(|r| r.name)
                .unwrap_or_default()
        })
    }

    /// A record as a [`Place`] with every enclosing level named.
    pub fn describe(&self, record: &GeoRecord) -> Place {
        let mut place = Place::from_record(record);
        if place.admin2_name.is_empty() && place.place_kind == PlaceKind::City {
            place.admin2_name =
                self.admin2_name(&record.country_iso, &record.admin1_id, &record.admin2_id);
        }
        if place.admin1_name.is_empty() && place.place_kind != PlaceKind::Country {
            place.admin1_name = self.admin1_name(&record.country_iso, &record.admin1_id);
        }
        if place.country_name.is_empty() {
            place.country_name = self.country_name(&record.country_iso);
        }
        place
    }

    // ---- lookups used by the parser ----

    /// Exact country lookup by normalized name.
    pub fn find_country(&self, name: &str) -> Option<GeoRecord> {
        if name.is_empty() {
            return None;
        }
        let p = Predicate::new()
            .name(TextMatch::Exact(name.to_string()))
            .feature(FeatureCode::COUNTRY);
        self.first(Partition::Hierarchy, &p)
    }

    /// Best-scoring state named like `name` (inside `iso` when known).
    pub fn find_admin1(&self, name: &str, iso: &str) -> Option<Candidate> {
        let target = Target {
            name: name.to_string(),
            country_iso: iso.to_string(),
            feature: Some(FeatureCode::STATE.to_string()),
            ..Target::default()
        };
        let query = Place {
            admin1_name: name.to_string(),
            country_name: self.country_name(iso),
            ..Place::default()
        };
        let mut found = self.cascade(&target, Scope::Hierarchy);
        for c in found.iter_mut() {
            c.score = self.scorer.score(&query, &self.describe(&c.record));
        }
        found.into_iter().min_by(|a, b| {
            a.score
                .total_cmp(&b.score)
                .then(a.row.cmp(&b.row))
        })
    }

    /// Resolves `admin2_name` to an id: exact county name first, then the
    /// name without "shire" as a prefix.
    pub fn resolve_admin2(&self, place: &mut Place) {
        if place.admin2_name.is_empty() || !place.admin2_id.is_empty() {
            return;
        }
        let (name, _) = admin2_normalize(&place.admin2_name, &place.country_iso);
        let narrowed = |m: TextMatch| {
            Predicate::new()
                .name(m)
                .country(&place.country_iso)
                .admin1(&place.admin1_id)
                .feature(FeatureCode::COUNTY)
        };
        let mut found = self.first(Partition::Place, &narrowed(TextMatch::Exact(name.clone())));
        if found.is_none() {
            let stem = name.replace("shire", "");
            let stem = stem.trim();
            if !stem.is_empty() {
                found = self.first(Partition::Place, &narrowed(TextMatch::prefix(stem)));
            }
        }
        if let Some(record) = found {
            tracing::debug!(admin2 = %record.name, id = %record.admin2_id, "county resolved");
            place.admin2_id = record.admin2_id;
            if place.admin1_id.is_empty() {
                place.admin1_id = record.admin1_id;
            }
            if place.country_iso.is_empty() {
                place.country_iso = record.country_iso;
            }
        }
    }

    // ---- main lookup ----

    fn target_for(&self, place: &Place) -> (Target, Scope) {
        let base = Target {
            country_iso: place.country_iso.clone(),
            feature: place.feature_filter.clone(),
            ..Target::default()
        };
        match place.place_kind {
            PlaceKind::Country => (
                Target {
                    name: place.country_name.clone(),
                    feature: Some(FeatureCode::COUNTRY.to_string()),
                    ..base
                },
                Scope::Hierarchy,
            ),
            PlaceKind::Admin1 => (
                Target {
                    name: place.admin1_name.clone(),
                    admin1_id: place.admin1_id.clone(),
                    feature: Some(FeatureCode::STATE.to_string()),
                    ..base
                },
                Scope::Hierarchy,
            ),
            PlaceKind::Admin2 => (
                Target {
                    name: place.admin2_name.clone(),
                    admin1_id: place.admin1_id.clone(),
                    feature: Some(FeatureCode::COUNTY.to_string()),
                    ..base
                },
                Scope::Places,
            ),
            PlaceKind::City => (
                Target {
                    name: place.city.clone(),
                    admin1_id: place.admin1_id.clone(),
                    admin2_id: place.admin2_id.clone(),
                    ..base
                },
                Scope::Places,
            ),
            PlaceKind::AdvancedSearch => (
                Target {
                    name: place.city.clone(),
                    ..base
                },
                Scope::PlacesThenHierarchy,
            ),
        }
    }

    /// Runs the cascade for `place`, scores the candidates and stores them
    /// in `place.candidates`. Filtering is left to [`crate::filter::finalize`].
    pub fn search(&self, place: &mut Place) {
        self.resolve_admin2(place);
        let (target, scope) = self.target_for(place);
        if target.name.is_empty() {
            place.candidates.clear();
            return;
        }
        let mut found = self.cascade(&target, scope);

        // The county token may really be the city ("old mill, tiverton").
        if place.place_kind == PlaceKind::City
            && !place.admin2_name.is_empty()
            && place.admin2_id.is_empty()
        {
            let second = Target {
                name: place.admin2_name.clone(),
                admin2_id: String::new(),
                ..target.clone()
            };
            found.extend(self.cascade(&second, scope));
        }
        tracing::debug!(
            target = %target.name,
            kind = ?place.place_kind,
            raw = found.len(),
            "cascade finished"
        );

        for c in found.iter_mut() {
            let detail = self.scorer.score_detail(place, &self.describe(&c.record));
            c.score = detail.score;
            if c.reinforced {
                c.score -= self.scorer.weights().reinforced_bonus;
            }
            c.prefix = detail.prefix;
        }
        place.candidates = found;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Catalogue;

    fn engine() -> SearchEngine {
        let mut c = Catalogue::new();
        let mut tx = c.begin();
        tx.insert(GeoRecord::new("United Kingdom", "ADM0", "2635167").in_country("gb"), None);
        tx.insert(GeoRecord::new("England", "ADM1", "6269131").in_country("gb").in_admin("ENG", ""), None);
        tx.insert(
            GeoRecord::new("Devon", "ADM2", "2651292").in_country("gb").in_admin("ENG", "D4"),
            None,
        );
        tx.insert(
            GeoRecord::new("Tiverton", "PPL", "2635703")
                .in_country("gb")
                .in_admin("ENG", "D4")
                .at(50.9, -3.49),
            None,
        );
        tx.commit();
        SearchEngine::new(Box::new(c), &GazetteerConfig::default())
    }

    #[test]
    fn names_resolve_through_cache() {
        let e = engine();
        assert_eq!(e.country_name("gb"), "united kingdom");
        assert_eq!(e.admin1_name("gb", "ENG"), "england");
        assert_eq!(e.admin2_name("gb", "ENG", "D4"), "devon");
        assert_eq!(e.country_name("gb"), "united kingdom");
        assert_eq!(e.country_name("zz"), "");
    }

    #[test]
    fn describe_fills_enclosing_levels() {
        let e = engine();
        let record = GeoRecord::new("Tiverton", "PPL", "2635703")
            .in_country("gb")
            .in_admin("ENG", "D4");
        let p = e.describe(&record);
        assert_eq!(p.long_name(), "Tiverton, Devon, England, United Kingdom");
    }

    #[test]
    fn admin2_resolves_with_shire_suffix() {
        let e = engine();
        let mut p = Place {
            admin2_name: "devonshire".into(),
            country_iso: "gb".into(),
            ..Place::default()
        };
        e.resolve_admin2(&mut p);
        assert_eq!(p.admin2_id, "D4");
        assert_eq!(p.admin1_id, "ENG");
    }

    #[test]
    fn admin1_lookup_without_country() {
        let e = engine();
        let best = e.find_admin1("england", "").unwrap();
        assert_eq!(best.record.admin1_id, "ENG");
        assert_eq!(best.record.country_iso, "gb");
    }

    #[test]
    fn county_token_gets_second_pass() {
        let e = engine();
        let mut p = Place {
            original_text: "old mill, tiverton".into(),
            prefix: "old mill".into(),
            city: "old mill".into(),
            admin2_name: "tiverton".into(),
            ..Place::default()
        };
        e.search(&mut p);
        assert!(p.candidates.iter().any(|c| c.record.geoid == "2635703"));
    }

    #[test]
    fn rows_hit_by_several_words_score_better() {
        let mut c = Catalogue::new();
        let mut tx = c.begin();
        tx.insert(GeoRecord::new("United Kingdom", "ADM0", "2635167").in_country("gb"), None);
        tx.insert(GeoRecord::new("England", "ADM1", "6269131").in_country("gb").in_admin("ENG", ""), None);
        tx.insert(
            GeoRecord::new("Mill Lane Bridge", "PPL", "900001").in_country("gb").in_admin("ENG", "").at(51.0, -1.0),
            None,
        );
        tx.insert(
            GeoRecord::new("Mill Bay", "PPL", "900002").in_country("gb").in_admin("ENG", "").at(50.0, -4.0),
            None,
        );
        tx.commit();
        let e = SearchEngine::new(Box::new(c), &GazetteerConfig::default());
        let mut p = Place {
            original_text: "mill bridge, england".into(),
            prefix: "mill bridge".into(),
            city: "mill bridge".into(),
            admin1_name: "england".into(),
            admin1_id: "ENG".into(),
            country_iso: "gb".into(),
            country_name: "united kingdom".into(),
            ..Place::default()
        };
        e.search(&mut p);

        let reinforced = p.candidates.iter().find(|c| c.reinforced).unwrap();
        assert_eq!(reinforced.record.geoid, "900001");
        let raw = e.scorer().score_detail(&p, &e.describe(&reinforced.record)).score;
        let bonus = GazetteerConfig::default().scoring.reinforced_bonus;
        assert!((reinforced.score - (raw - bonus)).abs() < 1e-9);
        assert!(p
            .candidates
            .iter()
            .filter(|c| c.record.geoid == "900002")
            .all(|c| !c.reinforced));
        assert!(p
            .candidates
            .iter()
            .filter(|c| c.record.geoid == "900001" && !c.reinforced)
            .all(|c| c.score > reinforced.score));
    }
}
