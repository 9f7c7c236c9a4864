// crates/gazetteer-core/src/score.rs

//! # Match Scorer
//!
//! Heuristic distance between what the user typed and a catalogue row,
//! lower is better. Roughly 0 is a perfect match of an important place and
//! 100+ is unrelated.
//!
//! Both sides are rendered as a five-part title
//! `prefix, city, county, state, country`. Each hierarchy level is compared
//! on characters and on phonetic keys, the levels are averaged with
//! [`ScoringWeights::token_weights`], and feature importance, unconsumed
//! prefix and wildcard use are added on top.

use crate::alias::REGION_OVERLAPS;
use crate::config::ScoringWeights;
use crate::feature;
use crate::phonetic::phonetic_key;
use crate::place::Place;
use crate::store::WildcardPattern;
use crate::text::{is_street, normalize_for_scoring};

pub const VERY_GOOD: f64 = 0.0;
pub const GOOD: f64 = 25.0;
pub const POOR: f64 = 50.0;
pub const VERY_POOR: f64 = 80.0;

const CITY_WEIGHT: f64 = 1.0;
const CHAR_SHARE: f64 = 0.6;
const PHONETIC_SHARE: f64 = 0.4;
const CLOSE_MATCH_BONUS: f64 = 5.0;
const LEAD_CHAR_BONUS: f64 = 2.0;
const SWAP_PENALTY: f64 = 5.0;

/// Penalty when the query left a level empty that the candidate fills,
/// indexed like [`Level`]. Users often skip the state, rarely the country.
const ABSENCE_PENALTY: [f64; 4] = [0.0, 5.0, 10.0, 2.0];

#[derive(Debug, Clone, Copy)]
enum Level {
    City = 0,
    County = 1,
    State = 2,
    Country = 3,
}

const LEVELS: [Level; 4] = [Level::City, Level::County, Level::State, Level::Country];

/// `[city, county, state, country]`, normalized for scoring.
struct Title {
    levels: [String; 4],
}

impl Title {
    fn of(place: &Place) -> Self {
        let normalized = normalize_for_scoring(&format!(
            "{},{},{},{}",
            place.city, place.admin2_name, place.admin1_name, place.country_name
        ));
        let mut parts = normalized.split(',').map(|s| s.trim().to_string());
        let mut levels: [String; 4] = Default::default();
        for slot in levels.iter_mut() {
            *slot = parts.next().unwrap_or_default();
        }
        Self { levels }
    }

    fn words(&self) -> Vec<&str> {
        self.levels
            .iter()
            .flat_map(|l| l.split_whitespace())
            .collect()
    }
}

/// 0 for identical strings, 100 for nothing in common.
fn distance(a: &str, b: &str) -> f64 {
    (1.0 - strsim::normalized_levenshtein(a, b)) * 100.0
}

/// Detailed result of [`MatchScorer::score_detail`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreDetail {
    pub score: f64,
    /// The query prefix left after removing words the candidate explains.
    pub prefix: String,
}

#[derive(Debug, Clone)]
pub struct MatchScorer {
    weights: ScoringWeights,
}

impl Default for MatchScorer {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

impl MatchScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, query: &Place, candidate: &Place) -> f64 {
        self.score_detail(query, candidate).score
    }

    pub fn score_detail(&self, query: &Place, candidate: &Place) -> ScoreDetail {
        let cand = Title::of(candidate);
        let prefix = clean_prefix(&normalize_for_scoring(&query.prefix), &cand);
        let mut target = Title::of(query);
        apply_overlaps(&mut target, &cand);

        let avg = self.hierarchy_score(&target, &cand);

        let fw = self.weights.feature_weight;
        let priority = candidate
            .feature
            .as_ref()
            .map_or(0, |f| feature::priority(f.as_str()));
        let mut score = (1.0 - fw) * avg
            + fw * (100.0 - f64::from(priority))
            + self.weights.prefix_weight * prefix_penalty(&prefix);
        if query.has_wildcard() {
            score += self.weights.wildcard_penalty;
        }

        ScoreDetail {
            score,
            prefix: prefix.trim().to_string(),
        }
    }

    fn weight(&self, level: Level) -> f64 {
        match level {
            Level::City => CITY_WEIGHT,
            Level::County => self.weights.token_weights[0],
            Level::State => self.weights.token_weights[1],
            Level::Country => self.weights.token_weights[2],
        }
    }

    /// Weighted average over levels; the city/county swap is also tried.
    fn hierarchy_score(&self, target: &Title, cand: &Title) -> f64 {
        let straight = self.weighted(&target.levels, &cand.levels);
        let [city, county, state, country] = &target.levels;
        if county.is_empty() {
            return straight;
        }
        let swapped = [county.clone(), city.clone(), state.clone(), country.clone()];
        straight.min(self.weighted(&swapped, &cand.levels) + SWAP_PENALTY)
    }

    fn weighted(&self, target: &[String; 4], cand: &[String; 4]) -> f64 {
        let mut total = 0.0;
        let mut used = 0.0;
        for level in LEVELS {
            let i = level as usize;
            let (q, c) = (target[i].as_str(), cand[i].as_str());
            let value = match (q.is_empty(), c.is_empty()) {
                (true, true) => continue,
                (true, false) => ABSENCE_PENALTY[i],
                _ => level_value(q, c),
            };
            let w = self.weight(level);
            total += value * w;
            used += w;
        }
        if used > 0.0 {
            total / used
        } else {
            0.0
        }
    }
}

fn level_value(q: &str, c: &str) -> f64 {
    let globbed = q.contains('*') && WildcardPattern::new(q).is_some_and(|p| p.is_match(c));
    let q_plain = if globbed { c.to_string() } else { q.replace('*', "") };
    let mut value = CHAR_SHARE * distance(&q_plain, c)
        + PHONETIC_SHARE * distance(&phonetic_key(&q_plain), &phonetic_key(c));
    if value < 10.0 {
        value -= CLOSE_MATCH_BONUS;
    }
    if q_plain.chars().next().is_some() && q_plain.chars().next() == c.chars().next() {
        value -= LEAD_CHAR_BONUS;
    }
    value
}

/// Rewrites legacy region names on the query side when the candidate uses
/// the modern one.
fn apply_overlaps(target: &mut Title, cand: &Title) {
    for &(legacy, modern) in REGION_OVERLAPS {
        let cand_has_modern = cand.levels.iter().any(|l| l.contains(modern));
        if !cand_has_modern {
            continue;
        }
        for level in target.levels.iter_mut() {
            if level.contains(legacy) {
                *level = level.replace(legacy, modern);
            }
        }
    }
}

/// Drops prefix words the candidate title already explains: literal,
/// wildcard or phonetic matches, and words that mostly contain a title word.
fn clean_prefix(prefix: &str, cand: &Title) -> String {
    let words = cand.words();
    let keys: Vec<String> = words.iter().map(|w| phonetic_key(w)).collect();
    prefix
        .split([' ', ','])
        .filter(|w| !w.is_empty())
        .filter(|w| {
            let bare = w.replace('*', "");
            if bare.is_empty() {
                return false;
            }
            if w.contains('*') {
                let globbed = WildcardPattern::new(w)
                    .is_some_and(|p| words.iter().any(|t| p.is_match(t)));
                if globbed {
                    return false;
                }
            }
            let key = phonetic_key(&bare);
            let explained = words.iter().zip(&keys).any(|(t, k)| {
                *t == bare
                    || *k == key
                    || (bare.contains(t) && t.len() as f64 / bare.len() as f64 > 0.6)
            });
            !explained
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn prefix_penalty(prefix: &str) -> f64 {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return 0.0;
    }
    let penalty = 5.0 + prefix.len() as f64;
    if is_street(prefix) {
        penalty * 0.5
    } else {
        penalty
    }
}
