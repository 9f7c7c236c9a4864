// crates/gazetteer-core/src/filter.rs

//! # Deduplication & Filtering
//!
//! Collapses the raw, scored candidate list of a [`Place`] into the final
//! ranked result and sets its [`ResultStatus`].

use crate::config::GazetteerConfig;
use crate::history;
use crate::model::Candidate;
use crate::place::{Place, ResultStatus};
use crate::score::{GOOD, VERY_GOOD};
use std::cmp::Ordering;

/// Raw candidate count above which [`crate::place::ResultFlags::limited`]
/// is set.
pub const REPORT_LIMIT: usize = 100;

/// Tunables for [`finalize`], normally taken from [`GazetteerConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterOptions {
    pub dedup_distance: f64,
    pub year_padding: i32,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self::from(&GazetteerConfig::default())
    }
}

impl From<&GazetteerConfig> for FilterOptions {
    fn from(config: &GazetteerConfig) -> Self {
        Self {
            dedup_distance: config.dedup_distance,
            year_padding: config.year_padding,
        }
    }
}

fn by_location(a: &Candidate, b: &Candidate) -> Ordering {
    a.record
        .longitude
        .total_cmp(&b.record.longitude)
        .then(a.record.latitude.total_cmp(&b.record.latitude))
        .then(a.score.total_cmp(&b.score))
}

fn by_rank(a: &Candidate, b: &Candidate) -> Ordering {
    a.score
        .total_cmp(&b.score)
        .then_with(|| b.reinforced.cmp(&a.reinforced))
        .then_with(|| a.record.admin1_id.cmp(&b.record.admin1_id))
        .then_with(|| a.record.name.cmp(&b.record.name))
        .then_with(|| a.record.geoid.cmp(&b.record.geoid))
}

fn is_twin(a: &Candidate, b: &Candidate, dedup_distance: f64) -> bool {
    a.record.geoid == b.record.geoid
        || (a.record.name == b.record.name && a.record.distance(&b.record) < dedup_distance)
}

/// One merge pass over a location-sorted list. Every row is compared with
/// every row kept so far, so a pass that merges nothing leaves no twin pair
/// behind. Returns `true` if anything merged.
fn merge_pass(rows: &mut Vec<Candidate>, dedup_distance: f64) -> bool {
    rows.sort_by(by_location);
    let mut kept: Vec<Candidate> = Vec::with_capacity(rows.len());
    let mut merged = false;
    for row in rows.drain(..) {
        let twin = kept
            .iter()
            .position(|k| k.record.geoid == row.record.geoid)
            .or_else(|| kept.iter().position(|k| is_twin(k, &row, dedup_distance)));
        match twin {
            Some(i) => {
                merged = true;
                if row.score < kept[i].score {
                    kept[i] = row;
                }
            }
            None => kept.push(row),
        }
    }
    *rows = kept;
    merged
}

/// Deduplicates, applies the historical filter, keeps the candidates within
/// the score gap of the best one and sets `result_status`.
///
/// Calling it again on its own output changes nothing.
pub fn finalize(place: &mut Place, options: &FilterOptions) {
    if place.candidates.len() > REPORT_LIMIT {
        place.flags.limited = true;
    }

    let mut rows = std::mem::take(&mut place.candidates);
    while merge_pass(&mut rows, options.dedup_distance) {}

    if let Some(year) = place.event_year {
        rows.retain(|c| {
            history::is_valid_year(year, &c.record.country_iso, &c.record.admin1_id, options.year_padding)
        });
        if rows
            .iter()
            .any(|c| !history::is_valid_year(year, &c.record.country_iso, &c.record.admin1_id, 0))
        {
            place.flags.date_filtered = true;
        }
    }

    rows.sort_by(by_rank);
    if let Some(best) = rows.first().map(|c| c.score) {
        let gap = VERY_GOOD + GOOD / 3.0 + best.max(0.0) * 0.6;
        rows.retain(|c| c.score <= best + gap);
    }
    tracing::trace!(survivors = rows.len(), "candidates finalized");

    place.result_status = match rows.len() {
        0 if matches!(
            place.result_status,
            ResultStatus::NoCountry | ResultStatus::NotSupported
        ) =>
        {
            place.result_status
        }
        0 => ResultStatus::NoMatch,
        1 if rows[0].score < VERY_GOOD => ResultStatus::StrongMatch,
        1 => ResultStatus::PartialMatch,
        _ => ResultStatus::MultipleMatches,
    };
    if let Some(best) = rows.first() {
        let best = best.clone();
        place.apply_best(&best);
    }
    place.candidates = rows;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GeoRecord, GeoRow, MatchTier, Partition};

    fn cand(name: &str, geoid: &str, lat: f64, lon: f64, score: f64) -> Candidate {
        let record = GeoRecord::new(name, "PPL", geoid)
            .in_country("gb")
            .in_admin("ENG", "")
            .at(lat, lon);
        let mut c = Candidate::new(
            GeoRow {
                partition: Partition::Place,
                id: 0,
                record,
            },
            MatchTier::Exact,
        );
        c.score = score;
        c
    }

    #[test]
    fn duplicate_geoid_collapses_to_lower_score() {
        let mut p = Place::new("tiverton");
        p.candidates = vec![
            cand("tiverton", "2635703", 50.9, -3.49, 12.0),
            cand("tiverton", "2635703", 50.9001, -3.4901, 4.0),
        ];
        finalize(&mut p, &FilterOptions::default());
        assert_eq!(p.candidates.len(), 1);
        assert_eq!(p.candidates[0].score, 4.0);
        assert_eq!(p.result_status, ResultStatus::PartialMatch);
    }

    #[test]
    fn same_name_nearby_merges_far_away_does_not() {
        let mut p = Place::new("newport");
        p.candidates = vec![
            cand("newport", "1", 51.58, -2.99, 5.0),
            cand("newport", "2", 51.60, -3.00, 6.0),
            cand("newport", "3", 50.70, -1.29, 7.0),
        ];
        finalize(&mut p, &FilterOptions::default());
        assert_eq!(p.candidates.len(), 2);
        assert_eq!(p.result_status, ResultStatus::MultipleMatches);
        assert_eq!(p.geoid, "1");
    }

    #[test]
    fn gap_drops_far_worse_rows() {
        let mut p = Place::new("x");
        p.candidates = vec![
            cand("alpha", "1", 10.0, 10.0, -3.0),
            cand("beta", "2", 20.0, 20.0, 40.0),
        ];
        finalize(&mut p, &FilterOptions::default());
        assert_eq!(p.candidates.len(), 1);
        assert_eq!(p.result_status, ResultStatus::StrongMatch);
        assert_eq!(p.score, Some(-3.0));
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut p = Place::new("x");
        p.candidates = vec![
            cand("a", "1", 1.0, 1.0, 3.0),
            cand("a", "2", 1.2, 1.2, 2.0),
            cand("a", "3", 1.4, 1.4, 1.0),
            cand("b", "4", 9.0, 9.0, 5.0),
            cand("b", "4", 30.0, 30.0, 6.0),
        ];
        finalize(&mut p, &FilterOptions::default());
        let once = p.clone();
        finalize(&mut p, &FilterOptions::default());
        assert_eq!(p, once);
    }

    #[test]
    fn same_name_merges_across_an_interleaved_row() {
        let mut p = Place::new("x");
        p.candidates = vec![
            cand("x", "1", 10.0, 0.0, 1.0),
            cand("y", "2", 10.0, 0.1, 100.0),
            cand("x", "3", 10.0, 0.2, 2.0),
        ];
        finalize(&mut p, &FilterOptions::default());
        assert_eq!(p.candidates.len(), 1);
        assert_eq!(p.geoid, "1");
        assert_eq!(p.result_status, ResultStatus::PartialMatch);
        let once = p.clone();
        finalize(&mut p, &FilterOptions::default());
        assert_eq!(p, once);
    }

    #[test]
    fn finalize_is_idempotent_on_generated_lists() {
        let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
        let mut next = move |n: u64| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed % n
        };
        for round in 0..500 {
            let mut p = Place::new("x");
            let len = 1 + next(8);
            for _ in 0..len {
                let name = ["x", "y", "z"][next(3) as usize];
                let geoid = (1 + next(6)).to_string();
                let lat = next(20) as f64 * 0.1;
                let lon = next(20) as f64 * 0.1;
                let score = next(70) as f64 - 5.0;
                let mut c = cand(name, &geoid, lat, lon, score);
                c.reinforced = next(4) == 0;
                p.candidates.push(c);
            }
            finalize(&mut p, &FilterOptions::default());
            let once = p.clone();
            finalize(&mut p, &FilterOptions::default());
            assert_eq!(p, once, "round {round}");
        }
    }

    #[test]
    fn reinforced_row_wins_a_score_tie() {
        let mut p = Place::new("canterbury cathedral");
        let single = cand("canterbury", "2653877", 51.28, 1.08, 6.0);
        let mut double = cand("canterbury cathedral", "6284632", 51.28, 1.08, 6.0);
        double.reinforced = true;
        p.candidates = vec![single, double];
        finalize(&mut p, &FilterOptions::default());
        assert_eq!(p.candidates[0].record.geoid, "6284632");
        assert_eq!(p.geoid, "6284632");
    }

    #[test]
    fn historical_filter_drops_and_flags() {
        let mut early = cand("new york", "5128581", 40.7, -74.0, 1.0);
        early.record.country_iso = "us".into();
        early.record.admin1_id = "NY".into();
        let mut p = Place::new("new york");
        p.event_year = Some(1410);
        p.candidates = vec![early.clone()];
        finalize(&mut p, &FilterOptions::default());
        assert!(p.candidates.is_empty());
        assert_eq!(p.result_status, ResultStatus::NoMatch);

        let mut p = Place::new("new york");
        p.event_year = Some(1600);
        p.candidates = vec![early];
        finalize(&mut p, &FilterOptions::default());
        assert_eq!(p.candidates.len(), 1);
        assert!(p.flags.date_filtered);
    }

    #[test]
    fn empty_result_keeps_no_country() {
        let mut p = Place::new("squid");
        p.result_status = ResultStatus::NoCountry;
        finalize(&mut p, &FilterOptions::default());
        assert_eq!(p.result_status, ResultStatus::NoCountry);
    }
}
