// crates/gazetteer-core/src/search/strategy.rs

//! The cascade tiers, tightest first.
//!
//! Each tier is a pure function of the target and the store. The
//! [`Cascade`] runs them in order and stops once enough candidates have
//! accumulated; duplicates across tiers are left for the filter stage.

use crate::feature;
use crate::model::{Candidate, MatchTier, Partition};
use crate::phonetic::{drop_one_variants, phonetic_key};
use crate::store::{Predicate, TextMatch};
use crate::traits::GeoStore;
use std::collections::HashMap;

/// What one cascade run looks for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Target {
    /// Normalized name; may contain `*`.
    pub name: String,
    pub country_iso: String,
    pub admin1_id: String,
    pub admin2_id: String,
    /// Feature filter; may contain `*`.
    pub feature: Option<String>,
}

impl Target {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn has_wildcard(&self) -> bool {
        self.name.contains('*')
    }

    fn feature(&self) -> &str {
        self.feature.as_deref().unwrap_or_default()
    }

    /// Country and feature only; the looser tiers rely on scoring to punish
    /// a wrong county or state.
    fn loose(&self) -> Predicate {
        Predicate::new().country(&self.country_iso).feature(self.feature())
    }
}

/// Probe limits shared by every tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub query_limit: usize,
    pub word_fanout_limit: usize,
}

pub trait SearchStrategy: Send + Sync {
    fn tier(&self) -> MatchTier;

    fn applies(&self, _target: &Target) -> bool {
        true
    }

    fn run(
        &self,
        store: &dyn GeoStore,
        partition: Partition,
        target: &Target,
        limits: &Limits,
    ) -> Vec<Candidate>;
}

fn probe(
    store: &dyn GeoStore,
    partition: Partition,
    predicate: &Predicate,
    limit: usize,
    tier: MatchTier,
) -> Vec<Candidate> {
    store
        .select(partition, predicate, limit)
        .into_iter()
        .map(|row| Candidate::new(row, tier))
        .collect()
}

// ---- Exact ----

pub struct Exact;

impl SearchStrategy for Exact {
    fn tier(&self) -> MatchTier {
        MatchTier::Exact
    }

    fn applies(&self, target: &Target) -> bool {
        !target.name.is_empty() && !target.has_wildcard()
    }

    fn run(&self, store: &dyn GeoStore, partition: Partition, target: &Target, limits: &Limits) -> Vec<Candidate> {
        let p = Predicate::new()
            .name(TextMatch::Exact(target.name.clone()))
            .country(&target.country_iso)
            .admin1(&target.admin1_id)
            .admin2(&target.admin2_id)
            .feature(target.feature());
        probe(store, partition, &p, limits.query_limit, self.tier())
    }
}

// ---- Wildcard ----

pub struct Wildcard;

impl SearchStrategy for Wildcard {
    fn tier(&self) -> MatchTier {
        MatchTier::Wildcard
    }

    fn applies(&self, target: &Target) -> bool {
        target.has_wildcard() && !target.name.replace('*', "").trim().is_empty()
    }

    fn run(&self, store: &dyn GeoStore, partition: Partition, target: &Target, limits: &Limits) -> Vec<Candidate> {
        let p = Predicate::new()
            .name(TextMatch::from_wildcard(&target.name))
            .country(&target.country_iso)
            .admin1(&target.admin1_id)
            .feature(target.feature());
        probe(store, partition, &p, limits.query_limit, self.tier())
    }
}

// ---- Word subset ----

/// Probes each significant word on its own. A word matching more rows than
/// `word_fanout_limit` says nothing and is dropped.
pub struct WordSubset;

pub const MIN_WORD_LEN: usize = 4;

impl SearchStrategy for WordSubset {
    fn tier(&self) -> MatchTier {
        MatchTier::WordSubset
    }

    fn applies(&self, target: &Target) -> bool {
        target
            .name
            .split_whitespace()
            .any(|w| w.trim_matches('*').len() >= MIN_WORD_LEN)
    }

    fn run(&self, store: &dyn GeoStore, partition: Partition, target: &Target, limits: &Limits) -> Vec<Candidate> {
        let mut hits: HashMap<(Partition, u32), (Candidate, usize)> = HashMap::new();
        let mut order = Vec::new();
        for word in target.name.split_whitespace() {
            let word = word.trim_matches('*');
            if word.len() < MIN_WORD_LEN || word.contains('*') {
                continue;
            }
            let p = target.loose().name(TextMatch::WordPrefix(word.to_string()));
            let rows = probe(store, partition, &p, limits.word_fanout_limit + 1, self.tier());
            if rows.len() > limits.word_fanout_limit {
                tracing::trace!(word, "word probe too broad, ignored");
                continue;
            }
            for c in rows {
                let key = c.key();
                match hits.get_mut(&key) {
                    Some((_, n)) => *n += 1,
                    None => {
                        order.push(key);
                        hits.insert(key, (c, 1));
                    }
                }
            }
        }
        order
            .into_iter()
            .filter_map(|key| hits.remove(&key))
            .map(|(mut c, n)| {
                c.reinforced = n > 1;
                c
            })
            .collect()
    }
}

// ---- Phonetic ----

pub struct Phonetic;

impl SearchStrategy for Phonetic {
    fn tier(&self) -> MatchTier {
        MatchTier::Phonetic
    }

    fn applies(&self, target: &Target) -> bool {
        !target.name.replace('*', "").trim().is_empty()
    }

    fn run(&self, store: &dyn GeoStore, partition: Partition, target: &Target, limits: &Limits) -> Vec<Candidate> {
        let key = phonetic_key(&target.name);
        let p = target.loose().phonetic_key(TextMatch::prefix(&key));
        probe(store, partition, &p, limits.query_limit, self.tier())
    }
}

// ---- Phonetic combination ----

/// Drop-one-word variants of the key, for queries carrying a spurious word.
pub struct PhoneticCombination;

impl SearchStrategy for PhoneticCombination {
    fn tier(&self) -> MatchTier {
        MatchTier::PhoneticCombination
    }

    fn applies(&self, target: &Target) -> bool {
        target.name.split_whitespace().count() > 1
    }

    fn run(&self, store: &dyn GeoStore, partition: Partition, target: &Target, limits: &Limits) -> Vec<Candidate> {
        drop_one_variants(&phonetic_key(&target.name))
            .iter()
            .flat_map(|variant| {
                let p = target.loose().phonetic_key(TextMatch::prefix(variant));
                probe(store, partition, &p, limits.query_limit, self.tier())
            })
            .collect()
    }
}

// ---- Feature inferred ----

/// "tiverton castle" is looked up as a castle containing "tiverton".
pub struct FeatureInferred;

impl SearchStrategy for FeatureInferred {
    fn tier(&self) -> MatchTier {
        MatchTier::FeatureInferred
    }

    fn applies(&self, target: &Target) -> bool {
        feature::infer_from_name(&target.name).is_some_and(|(rest, _)| !rest.is_empty())
    }

    fn run(&self, store: &dyn GeoStore, partition: Partition, target: &Target, limits: &Limits) -> Vec<Candidate> {
        let Some((rest, code)) = feature::infer_from_name(&target.name) else {
            return Vec::new();
        };
        let rest = rest.replace('*', "");
        let p = Predicate::new()
            .country(&target.country_iso)
            .feature(code)
            .name(TextMatch::Contains(rest.trim().to_string()));
        probe(store, partition, &p, limits.query_limit, self.tier())
    }
}

// -----------------------------------------------------------------------------
// DRIVER
// -----------------------------------------------------------------------------

/// Ordered tiers plus the early-exit rule.
pub struct Cascade {
    strategies: Vec<Box<dyn SearchStrategy>>,
    candidate_cap: usize,
    limits: Limits,
}

impl Cascade {
    /// Every tier, tightest first.
    pub fn standard(candidate_cap: usize, limits: Limits) -> Self {
        Self {
            strategies: vec![
                Box::new(Exact),
                Box::new(Wildcard),
                Box::new(WordSubset),
                Box::new(Phonetic),
                Box::new(PhoneticCombination),
                Box::new(FeatureInferred),
            ],
            candidate_cap,
            limits,
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Runs the tiers over `partitions` in order, stopping once more than
    /// `candidate_cap` candidates have accumulated.
    pub fn run(&self, store: &dyn GeoStore, partitions: &[Partition], target: &Target) -> Vec<Candidate> {
        let mut out = Vec::new();
        for strategy in &self.strategies {
            if !strategy.applies(target) {
                continue;
            }
            for &partition in partitions {
                let found = strategy.run(store, partition, target, &self.limits);
                tracing::trace!(
                    tier = %strategy.tier(),
                    ?partition,
                    target = %target.name,
                    found = found.len(),
                    "cascade tier"
                );
                out.extend(found);
            }
            if out.len() > self.candidate_cap {
                tracing::debug!(
                    tier = %strategy.tier(),
                    candidates = out.len(),
                    "candidate cap reached"
                );
                break;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GeoRecord;
    use crate::store::Catalogue;

    const LIMITS: Limits = Limits {
        query_limit: 105,
        word_fanout_limit: 50,
    };

    fn catalogue() -> Catalogue {
        let mut c = Catalogue::new();
        let mut tx = c.begin();
        for (name, code, geoid, iso) in [
            ("Toronto", "PPLA", "6167865", "ca"),
            ("Toronto", "PPL", "5174095", "us"),
            ("Canterbury", "PPL", "2653877", "gb"),
            ("Canterbury Cathedral", "CH", "6284632", "gb"),
            ("Edinburgh", "PPLA", "2650225", "gb"),
            ("Tiverton", "PPL", "2635703", "gb"),
            ("Tiverton Castle", "CSTL", "6296543", "gb"),
        ] {
            tx.insert(GeoRecord::new(name, code, geoid).in_country(iso), None);
        }
        tx.commit();
        c
    }

    fn geoids(found: &[Candidate]) -> Vec<&str> {
        let mut v: Vec<&str> = found.iter().map(|c| c.record.geoid.as_str()).collect();
        v.sort_unstable();
        v.dedup();
        v
    }

    #[test]
    fn exact_respects_country() {
        let c = catalogue();
        let t = Target {
            country_iso: "ca".into(),
            ..Target::named("toronto")
        };
        let found = Exact.run(&c, Partition::Place, &t, &LIMITS);
        assert_eq!(geoids(&found), vec!["6167865"]);
    }

    #[test]
    fn wildcard_widens_exact() {
        let c = catalogue();
        let exact = Exact.run(&c, Partition::Place, &Target::named("toronto"), &LIMITS);
        let wild = Wildcard.run(&c, Partition::Place, &Target::named("toron*"), &LIMITS);
        assert!(!exact.is_empty());
        for g in geoids(&exact) {
            assert!(geoids(&wild).contains(&g));
        }
    }

    #[test]
    fn embedded_wildcards_glob() {
        let c = catalogue();
        let found = Wildcard.run(&c, Partition::Place, &Target::named("cant* cath*"), &LIMITS);
        assert_eq!(geoids(&found), vec!["6284632"]);
    }

    #[test]
    fn phonetic_tier_forgives_spelling() {
        let c = catalogue();
        let found = Phonetic.run(&c, Partition::Place, &Target::named("eddinburg"), &LIMITS);
        assert_eq!(geoids(&found), vec!["2650225"]);
    }

    #[test]
    fn word_subset_reinforces_multi_word_hits() {
        let c = catalogue();
        let found = WordSubset.run(&c, Partition::Place, &Target::named("canterbury cathedral"), &LIMITS);
        let cathedral = found.iter().find(|c| c.record.geoid == "6284632").unwrap();
        assert!(cathedral.reinforced);
        let town = found.iter().find(|c| c.record.geoid == "2653877").unwrap();
        assert!(!town.reinforced);
    }

    #[test]
    fn word_subset_drops_broad_words() {
        let c = catalogue();
        let tight = Limits {
            query_limit: 105,
            word_fanout_limit: 1,
        };
        let found = WordSubset.run(&c, Partition::Place, &Target::named("tiverton"), &tight);
        assert!(found.is_empty());
    }

    #[test]
    fn feature_inferred_uses_noun() {
        let c = catalogue();
        let found = FeatureInferred.run(&c, Partition::Place, &Target::named("castle tiverton"), &LIMITS);
        assert_eq!(geoids(&found), vec!["6296543"]);
    }

    #[test]
    fn cascade_stops_at_cap() {
        let c = catalogue();
        let cascade = Cascade::standard(0, LIMITS);
        let found = cascade.run(&c, &[Partition::Place], &Target::named("toronto"));
        assert!(found.iter().all(|c| c.tier == MatchTier::Exact));
        assert_eq!(found.len(), 2);
    }
}
