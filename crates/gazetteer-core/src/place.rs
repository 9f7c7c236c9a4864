// crates/gazetteer-core/src/place.rs

//! # Query Context
//!
//! A [`Place`] is created per lookup, filled in by the parser, populated
//! with candidates by the search engine, scored, filtered, and finally read
//! by the caller. The same type also describes a single resolved candidate
//! (see [`Place::from_record`]), which is what the scorer compares the query
//! against.

use crate::alias;
use crate::feature::{FeatureCode, FeatureKind};
use crate::model::{Candidate, GeoRecord};
use crate::text::capwords;
use serde::Serialize;
use std::fmt;

/// The most specific hierarchy level the query names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum PlaceKind {
    Country,
    Admin1,
    Admin2,
    #[default]
    City,
    AdvancedSearch,
}

/// Outcome of a lookup. Every outcome is data, not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ResultStatus {
    /// A single survivor scoring below [`crate::score::VERY_GOOD`].
    StrongMatch,
    MultipleMatches,
    PartialMatch,
    /// The rightmost token is not a known country; the lookup ran degraded.
    NoCountry,
    #[default]
    NoMatch,
    /// The country resolved but is outside the configured supported set.
    NotSupported,
}

impl ResultStatus {
    pub fn is_match(self) -> bool {
        matches!(
            self,
            Self::StrongMatch | Self::MultipleMatches | Self::PartialMatch
        )
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::StrongMatch => "Strong match",
            Self::MultipleMatches => "Multiple matches",
            Self::PartialMatch => "Partial match",
            Self::NoCountry => "Country not found",
            Self::NoMatch => "No match",
            Self::NotSupported => "Country not supported",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultFlags {
    /// The raw candidate list exceeded the reporting cap.
    pub limited: bool,
    /// A survivor is only plausible thanks to the year padding.
    pub date_filtered: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Place {
    pub original_text: String,
    /// Query text not consumed by a hierarchy level.
    pub prefix: String,
    pub city: String,
    pub admin2_name: String,
    pub admin2_id: String,
    pub admin1_name: String,
    pub admin1_id: String,
    pub country_name: String,
    pub country_iso: String,
    /// Feature filter from `--feature=`; may contain `*`.
    pub feature_filter: Option<String>,
    pub place_kind: PlaceKind,
    pub event_year: Option<i32>,

    pub candidates: Vec<Candidate>,
    pub result_status: ResultStatus,
    pub flags: ResultFlags,

    // Copied from the best candidate.
    pub latitude: f64,
    pub longitude: f64,
    pub geoid: String,
    pub feature: Option<FeatureCode>,
    pub score: Option<f64>,
}

impl Place {
    pub fn new(text: &str) -> Self {
        Self {
            original_text: text.to_string(),
            ..Self::default()
        }
    }

    /// Resets everything so the instance can serve another lookup.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Describes a catalogue record: its name fills the level its feature
    /// code implies, its ids are copied. Names of the enclosing levels are
    /// left for the caller to resolve.
    pub fn from_record(record: &GeoRecord) -> Self {
        let mut place = Self {
            country_iso: record.country_iso.clone(),
            admin1_id: record.admin1_id.clone(),
            admin2_id: record.admin2_id.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            geoid: record.geoid.clone(),
            feature: Some(record.feature_code.clone()),
            ..Self::default()
        };
        match record.feature_code.kind() {
            FeatureKind::Country => {
                place.country_name = record.name.clone();
                place.place_kind = PlaceKind::Country;
            }
            FeatureKind::State => {
                place.admin1_name = record.name.clone();
                place.place_kind = PlaceKind::Admin1;
            }
            FeatureKind::County if record.feature_code.as_str() == FeatureCode::COUNTY => {
                place.admin2_name = record.name.clone();
                place.place_kind = PlaceKind::Admin2;
            }
            _ => {
                place.city = record.name.clone();
                place.place_kind = PlaceKind::City;
            }
        }
        place
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// Copies location, id, feature and score of `candidate` into the
    /// query's result fields.
    pub fn apply_best(&mut self, candidate: &Candidate) {
        self.latitude = candidate.record.latitude;
        self.longitude = candidate.record.longitude;
        self.geoid = candidate.record.geoid.clone();
        self.feature = Some(candidate.record.feature_code.clone());
        self.score = Some(candidate.score);
    }

    pub fn has_wildcard(&self) -> bool {
        self.original_text.contains('*')
    }

    /// Display form "City, County, State, Country"; empty levels are skipped.
    pub fn long_name(&self) -> String {
        let country = alias::country_display(&self.country_name)
            .map(str::to_string)
            .unwrap_or_else(|| capwords(&self.country_name));
        [
            capwords(&self.prefix),
            capwords(&self.city),
            capwords(&self.admin2_name),
            capwords(&self.admin1_name),
            country,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}
