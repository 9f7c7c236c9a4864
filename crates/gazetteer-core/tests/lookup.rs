// crates/gazetteer-core/tests/lookup.rs
mod common;

use gazetteer_core::{MatchTier, ResultStatus, VERY_GOOD};

#[test]
fn full_hierarchy_gives_strong_match() {
    let g = common::gazetteer();
    let (found, place) = g.find_best_match("toronto,ontario,canada");
    assert!(found);
    assert_eq!(place.result_status, ResultStatus::StrongMatch);
    assert_eq!(place.candidates.len(), 1);
    assert_eq!(place.geoid, "6167865");
    assert!(place.score.unwrap() < VERY_GOOD);
    assert_eq!(place.long_name(), "Toronto, Ontario, Canada");
}

#[test]
fn misspelling_is_found_phonetically() {
    let g = common::gazetteer();
    let place = g.lookup("eddinburg,,scotland", None);
    assert!(place.result_status.is_match(), "{:?}", place.result_status);
    let best = place.best().unwrap();
    assert_eq!(best.record.name, "edinburgh");
    assert!(best.tier >= MatchTier::Phonetic);
    assert_eq!(place.admin1_name, "scotland");
}

#[test]
fn wildcards_match_name_and_feature() {
    let g = common::gazetteer();
    let matches = g.find_matches("cant* cath*,england");
    let best = &matches[0];
    assert_eq!(best.record.geoid, "6620284");
    assert_eq!(best.tier, MatchTier::Wildcard);
    assert!(best.record.name.starts_with("cant"));
    assert!(best.record.name.contains("cath"));
}

#[test]
fn city_without_country_still_resolves() {
    let g = common::gazetteer();
    let place = g.lookup("tiverton", None);
    assert!(
        place.result_status.is_match() || place.result_status == ResultStatus::NoCountry,
        "{:?}",
        place.result_status
    );
    assert_eq!(place.geoid, "2635703");
    assert_eq!(place.long_name(), "Tiverton, Devon, England, United Kingdom");
}

#[test]
fn nonsense_input_is_handled() {
    let g = common::gazetteer();
    for text in ["squid", "", ",,,", "***", "--feature=", "12 high street", "(((", "x,y,z,w,v,u"] {
        let place = g.lookup(text, None);
        assert_ne!(place.result_status, ResultStatus::NotSupported, "{text}");
    }
    let squid = g.lookup("squid", None);
    assert!(!squid.result_status.is_match() || squid.result_status == ResultStatus::MultipleMatches);
}

#[test]
fn rows_sharing_a_geoid_collapse() {
    let g = common::gazetteer();
    let matches = g.find_matches("newport, wales");
    let newports: Vec<_> = matches.iter().filter(|c| c.record.geoid == "2641598").collect();
    assert_eq!(newports.len(), 1);
}

#[test]
fn county_narrows_the_city() {
    let g = common::gazetteer();
    let place = g.lookup("12 high street, tiverton, devon, england", None);
    assert_eq!(place.geoid, "2635703");
    assert_eq!(place.admin2_id, "D4");
    assert_eq!(place.prefix, "12 high street");
}

#[test]
fn historical_year_filters_states() {
    let g = common::gazetteer();
    let place = g.lookup("new york, usa", None);
    assert_eq!(place.geoid, "5128638");
    let place = g.lookup("new york, usa", Some(1500));
    assert!(place.candidates.is_empty());
    assert_eq!(place.result_status, ResultStatus::NoMatch);
    let place = g.lookup("new york, usa", Some(1700));
    assert_eq!(place.geoid, "5128638");
}

#[test]
fn advanced_search_by_feature() {
    let g = common::gazetteer();
    let place = g.lookup("canterbury, --feature=CH, --iso=gb", None);
    assert!(place.result_status.is_match());
    assert!(place.candidates.iter().all(|c| c.record.feature_code.as_str() == "CH"));
}

#[test]
fn external_id_and_stats() {
    let g = common::gazetteer();
    let place = g.find_by_external_id("2650225");
    assert_eq!(place.long_name(), "Edinburgh, Scotland, United Kingdom");
    let stats = g.stats();
    assert_eq!(stats.hierarchy, 8);
    assert_eq!(stats.total_rows(), 18);
}
