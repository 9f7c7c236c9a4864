// crates/gazetteer-core/src/parser.rs

//! # Parser
//!
//! Splits free text such as `"12 high st, tiverton, devon, england"` into
//! hierarchy levels. The rightmost token is tried as a country, the next as
//! a state; what is left becomes city, county and unconsumed prefix.
//! Country and state are validated against the catalogue, so parsing needs
//! a [`SearchEngine`].

use crate::feature::FeatureCode;
use crate::place::{Place, PlaceKind, ResultStatus};
use crate::score::POOR;
use crate::search::SearchEngine;
use crate::text::{admin1_normalize, admin2_normalize, country_normalize, is_street, normalize};

const FEATURE_FLAG: &str = "--feature=";
const ISO_FLAG: &str = "--iso=";
const COUNTRY_FLAG: &str = "--country=";

fn is_advanced(text: &str) -> bool {
    [FEATURE_FLAG, ISO_FLAG, COUNTRY_FLAG]
        .iter()
        .any(|flag| text.contains(flag))
}

fn tokenize(text: &str) -> Vec<String> {
    let text = text.replace(['[', '('], ",");
    let mut tokens: Vec<String> = text.split(',').map(str::to_string).collect();
    if tokens.last().is_some_and(|t| t.trim().is_empty()) {
        tokens.pop();
    }
    tokens
}

/// Parses `text` into a fresh [`Place`].
pub fn parse(engine: &SearchEngine, text: &str) -> Place {
    let mut place = Place::new(text);
    let mut tokens = tokenize(text);

    if is_advanced(text) {
        parse_advanced(engine, &mut place, &tokens);
        return place;
    }

    if tokens.iter().all(|t| normalize(t, false).is_empty()) {
        place.place_kind = PlaceKind::Country;
        return place;
    }

    // ---- country: rightmost token ----
    if let Some(last) = tokens.last() {
        let (name, _) = country_normalize(last);
        match engine.find_country(&name) {
            Some(country) => {
                place.country_name = country.name;
                place.country_iso = country.country_iso;
                place.place_kind = PlaceKind::Country;
                tokens.pop();
            }
            // The token stays and is tried as the state next.
            None => place.result_status = ResultStatus::NoCountry,
        }
    }

    // ---- state: next token ----
    if let Some(last) = tokens.last() {
        let (name, _) = admin1_normalize(last, &place.country_iso);
        if name.is_empty() {
            tokens.pop();
        } else if let Some(best) = engine
            .find_admin1(&name, &place.country_iso)
            .filter(|c| c.score < POOR)
        {
            place.admin1_name = best.record.name.clone();
            place.admin1_id = best.record.admin1_id.clone();
            if place.country_iso.is_empty() {
                place.country_iso = best.record.country_iso.clone();
                place.country_name = engine.country_name(&place.country_iso);
                place.result_status = ResultStatus::NoMatch;
            }
            place.place_kind = PlaceKind::Admin1;
            tokens.pop();
        }
    }

    // ---- city, county, prefix ----
    let mut lead: Vec<String> = tokens
        .iter()
        .map(|t| normalize(t, false))
        .filter(|t| !t.is_empty())
        .collect();
    let mut prefix: Vec<String> = Vec::new();
    while lead.len() > 1 && is_street(&lead[0]) {
        prefix.push(lead.remove(0));
    }
    let mut lead = lead.into_iter();
    if let Some(city) = lead.next() {
        place.city = city.clone();
        prefix.push(city);
        place.place_kind = PlaceKind::City;
        if let Some(next) = lead.next() {
            if is_street(&next) {
                prefix.push(next);
            } else {
                place.admin2_name = admin2_normalize(&next, &place.country_iso).0;
            }
        }
        prefix.extend(lead);
    }
    place.prefix = prefix.join(" ");

    tracing::debug!(
        text,
        city = %place.city,
        admin2 = %place.admin2_name,
        admin1 = %place.admin1_name,
        country = %place.country_iso,
        prefix = %place.prefix,
        kind = ?place.place_kind,
        "parsed"
    );
    place
}

/// `name, --feature=CODE, --iso=CC, --country=NAME`
fn parse_advanced(engine: &SearchEngine, place: &mut Place, tokens: &[String]) {
    place.place_kind = PlaceKind::AdvancedSearch;
    for token in tokens {
        let token = token.trim();
        if let Some(code) = token.strip_prefix(FEATURE_FLAG) {
            let code = code.trim();
            if !code.is_empty() {
                place.feature_filter = Some(FeatureCode::new(code).to_string());
            }
        } else if let Some(iso) = token.strip_prefix(ISO_FLAG) {
            place.country_iso = iso.trim().to_ascii_lowercase();
        } else if let Some(country) = token.strip_prefix(COUNTRY_FLAG) {
            let (name, _) = country_normalize(country);
            if name.len() == 2 {
                place.country_iso = name;
            } else if let Some(record) = engine.find_country(&name) {
                place.country_iso = record.country_iso;
                place.country_name = record.name;
            } else {
                place.result_status = ResultStatus::NoCountry;
            }
        } else if place.city.is_empty() {
            place.city = normalize(token, false);
        }
    }
    if place.country_name.is_empty() {
        place.country_name = engine.country_name(&place.country_iso);
    }
}
