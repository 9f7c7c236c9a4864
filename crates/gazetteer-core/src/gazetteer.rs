// crates/gazetteer-core/src/gazetteer.rs

//! # Gazetteer
//!
//! The programmatic entry point. A [`Gazetteer`] owns a catalogue behind the
//! [`GeoStore`] trait and runs the full lookup pipeline:
//! parse, search, score, filter.

use crate::common::DbStats;
use crate::config::GazetteerConfig;
use crate::error::{GeoError, Result};
use crate::filter::{self, FilterOptions};
use crate::loader::Importer;
use crate::model::{Candidate, GeoRecord, MatchTier, Partition};
use crate::parser;
use crate::place::{Place, ResultStatus};
use crate::search::SearchEngine;
use crate::store::{Catalogue, Predicate};
use crate::traits::GeoStore;

/// A loaded catalogue plus everything needed to query it.
///
/// Lookups take `&self`; one instance can serve many threads.
///
/// # Examples
/// ```rust
/// use gazetteer_core::{Gazetteer, GazetteerConfig, GeoRecord, ResultStatus};
/// use gazetteer_core::store::Catalogue;
///
/// let mut catalogue = Catalogue::new();
/// let mut tx = catalogue.begin();
/// tx.insert(GeoRecord::new("Canada", "ADM0", "6251999").in_country("ca"), None);
/// tx.insert(GeoRecord::new("Ontario", "ADM1", "6093943").in_country("ca").in_admin("08", ""), None);
/// tx.insert(
///     GeoRecord::new("Toronto", "PPLA", "6167865").in_country("ca").in_admin("08", "").at(43.7, -79.4),
///     None,
/// );
/// tx.commit();
///
/// let gazetteer = Gazetteer::with_store(Box::new(catalogue), GazetteerConfig::default()).unwrap();
/// let (found, place) = gazetteer.find_best_match("Toronto, Ontario, Canada");
/// assert!(found);
/// assert_eq!(place.result_status, ResultStatus::StrongMatch);
/// assert_eq!(place.geoid, "6167865");
/// ```
pub struct Gazetteer {
    engine: SearchEngine,
    config: GazetteerConfig,
    filter: FilterOptions,
}

impl Gazetteer {
    /// Loads the catalogue at [`GazetteerConfig::catalogue_path`].
    ///
    /// When the file is missing, unreadable or written with another schema
    /// version, `repair_if_missing` rebuilds it from the GeoNames dumps in
    /// `data_dir` and saves it; otherwise the load error is returned.
    pub fn open(config: GazetteerConfig, repair_if_missing: bool) -> Result<Self> {
        config.validate()?;
        let path = config.catalogue_path();
        let catalogue = match Catalogue::load(&path) {
            Ok(c) => c,
            Err(e) if repair_if_missing && is_repairable(&e) => {
                tracing::warn!(path = %path.display(), error = %e, "catalogue unusable, rebuilding");
                let (c, report) = Importer::new(&config).build()?;
                tracing::info!(rows = report.rows, skipped = report.skipped, "catalogue rebuilt");
                c.save(&path)?;
                c
            }
            Err(e) => return Err(e),
        };
        if catalogue.len() < config.min_records {
            return Err(GeoError::TooFewRecords {
                found: catalogue.len(),
                minimum: config.min_records,
            });
        }
        tracing::info!(path = %path.display(), rows = catalogue.len(), "gazetteer opened");
        Self::with_store(Box::new(catalogue), config)
    }

    /// Wraps an already-built store. `min_records` is not checked.
    pub fn with_store(store: Box<dyn GeoStore>, config: GazetteerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine: SearchEngine::new(store, &config),
            filter: FilterOptions::from(&config),
            config,
        })
    }

    pub fn config(&self) -> &GazetteerConfig {
        &self.config
    }

    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    /// Parses `text` without searching.
    pub fn parse(&self, text: &str) -> Place {
        parser::parse(&self.engine, text)
    }

    /// Runs the whole pipeline. `year` enables the historical filter.
    ///
    /// On a match the hierarchy fields of the returned place hold the
    /// resolved names of the best candidate; `prefix` holds the query text
    /// that candidate did not explain.
    pub fn lookup(&self, text: &str, year: Option<i32>) -> Place {
        let mut place = self.parse(text);
        place.event_year = year;

        if !place.country_iso.is_empty() && !self.is_country_supported(&place.country_iso) {
            tracing::debug!(iso = %place.country_iso, "country not supported");
            place.candidates.clear();
            place.result_status = ResultStatus::NotSupported;
            return place;
        }

        self.engine.search(&mut place);
        filter::finalize(&mut place, &self.filter);

        if let Some(best) = place.best().cloned() {
            let resolved = self.engine.describe(&best.record);
            place.prefix = best.prefix;
            place.city = resolved.city;
            place.admin2_name = resolved.admin2_name;
            place.admin2_id = resolved.admin2_id;
            place.admin1_name = resolved.admin1_name;
            place.admin1_id = resolved.admin1_id;
            place.country_name = resolved.country_name;
            place.country_iso = resolved.country_iso;
        }
        tracing::debug!(text, status = %place.result_status, results = place.candidates.len(), "lookup done");
        place
    }

    /// `true` in the first slot when the lookup produced any match.
    pub fn find_best_match(&self, text: &str) -> (bool, Place) {
        let place = self.lookup(text, None);
        (place.result_status.is_match(), place)
    }

    /// Every surviving candidate, best first.
    pub fn find_matches(&self, text: &str) -> Vec<Candidate> {
        self.lookup(text, None).candidates
    }

    /// Looks a record up by its GeoNames id, places first.
    pub fn find_by_external_id(&self, geoid: &str) -> Place {
        let predicate = Predicate::new().geoid(geoid);
        let row = [Partition::Place, Partition::Hierarchy]
            .into_iter()
            .find_map(|p| self.engine.store().select(p, &predicate, 1).into_iter().next());

        let Some(row) = row else {
            let mut place = Place::new(geoid);
            place.result_status = ResultStatus::NoMatch;
            return place;
        };
        let mut candidate = Candidate::new(row, MatchTier::ExternalId);
        candidate.score = 0.0;
        let mut place = self.engine.describe(&candidate.record);
        place.original_text = geoid.to_string();
        place.apply_best(&candidate);
        place.candidates = vec![candidate];
        place.result_status = ResultStatus::StrongMatch;
        place
    }

    pub fn is_country_supported(&self, iso: &str) -> bool {
        self.config.is_supported(iso)
    }

    /// The alternate name recorded for `geoid` in `language`, if any.
    pub fn alternate_name(&self, geoid: &str, language: &str) -> Option<String> {
        self.engine
            .store()
            .alternate_names(geoid)
            .into_iter()
            .find(|alt| alt.language == language)
            .map(|alt| alt.name)
    }

    /// A record as a [`Place`] with every enclosing level named.
    pub fn describe(&self, record: &GeoRecord) -> Place {
        self.engine.describe(record)
    }

    pub fn stats(&self) -> DbStats {
        self.engine.store().stats()
    }

    pub fn schema_version(&self) -> i32 {
        self.engine.store().schema_version()
    }

    /// Releases the catalogue.
    pub fn close(self) {
        tracing::debug!("gazetteer closed");
    }
}

fn is_repairable(e: &GeoError) -> bool {
    matches!(
        e,
        GeoError::NotFound(_)
            | GeoError::SchemaMismatch { .. }
            | GeoError::InvalidData(_)
            | GeoError::Bincode(_)
            | GeoError::Io(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Gazetteer {
        let mut c = Catalogue::new();
        let mut tx = c.begin();
        tx.insert(GeoRecord::new("United Kingdom", "ADM0", "2635167").in_country("gb"), None);
        tx.insert(GeoRecord::new("France", "ADM0", "3017382").in_country("fr"), None);
        tx.insert(GeoRecord::new("England", "ADM1", "6269131").in_country("gb").in_admin("ENG", ""), None);
        tx.insert(
            GeoRecord::new("Paris", "PPLC", "2988507").in_country("fr").in_admin("11", "75").at(48.85, 2.35),
            None,
        );
        tx.insert(
            GeoRecord::new("Tiverton", "PPL", "2635703").in_country("gb").in_admin("ENG", "D4").at(50.9, -3.49),
            None,
        );
        tx.insert_alternate_name(crate::model::AlternateName {
            geoid: "2635703".into(),
            language: "fr".into(),
            name: "Tiverton-sur-Exe".into(),
        });
        tx.commit();
        let mut config = GazetteerConfig::default();
        config.supported_countries = vec!["gb".into()];
        Gazetteer::with_store(Box::new(c), config).unwrap()
    }

    #[test]
    fn unsupported_country_short_circuits() {
        let g = sample();
        let p = g.lookup("paris, france", None);
        assert_eq!(p.result_status, ResultStatus::NotSupported);
        assert!(p.candidates.is_empty());
    }

    #[test]
    fn lookup_copies_resolved_hierarchy() {
        let g = sample();
        let p = g.lookup("tiverton, england", None);
        assert!(p.result_status.is_match());
        assert_eq!(p.geoid, "2635703");
        assert_eq!(p.country_name, "united kingdom");
        assert_eq!(p.long_name(), "Tiverton, England, United Kingdom");
    }

    #[test]
    fn external_id_lookup() {
        let g = sample();
        let p = g.find_by_external_id("2635703");
        assert_eq!(p.city, "tiverton");
        assert_eq!(p.candidates[0].tier, MatchTier::ExternalId);
        assert_eq!(p.result_status, ResultStatus::StrongMatch);
        let p = g.find_by_external_id("6269131");
        assert_eq!(p.admin1_name, "england");
        assert_eq!(g.find_by_external_id("0").result_status, ResultStatus::NoMatch);
    }

    #[test]
    fn alternate_names_by_language() {
        let g = sample();
        assert_eq!(g.alternate_name("2635703", "fr").as_deref(), Some("Tiverton-sur-Exe"));
        assert_eq!(g.alternate_name("2635703", "de"), None);
    }

    #[test]
    fn open_without_repair_reports_missing_catalogue() {
        let config = GazetteerConfig::default().with_data_dir("/nonexistent/gazetteer");
        assert!(matches!(Gazetteer::open(config, false), Err(GeoError::NotFound(_))));
    }

    #[test]
    fn open_refuses_tiny_catalogue() {
        let dir = std::env::temp_dir().join(format!("gazetteer-open-{}", std::process::id()));
        let config = GazetteerConfig::default().with_data_dir(&dir);
        let mut c = Catalogue::new();
        let mut tx = c.begin();
        tx.insert(GeoRecord::new("France", "ADM0", "3017382").in_country("fr"), None);
        tx.commit();
        c.save(config.catalogue_path()).unwrap();
        assert!(matches!(
            Gazetteer::open(config, false),
            Err(GeoError::TooFewRecords { found: 1, .. })
        ));
        std::fs::remove_dir_all(dir).ok();
    }
}
