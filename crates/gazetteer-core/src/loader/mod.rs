// crates/gazetteer-core/src/loader/mod.rs

//! # Importer
//!
//! Builds a [`Catalogue`] from a directory of GeoNames text dumps:
//!
//! 1. `countryInfo.txt` gives one ADM0 row per country;
//! 2. the place dumps give everything else, filtered by the configured
//!    countries and feature codes;
//! 3. `alternateNamesV2.txt` (optional) gives alternate names in the
//!    configured languages;
//! 4. the alias table adds local and historic names.
//!
//! Everything is written in one [`crate::store::Transaction`]. A failed or
//! cancelled import leaves the target catalogue untouched.

use crate::alias::ALIASES;
use crate::config::GazetteerConfig;
use crate::error::{GeoError, Result};
use crate::feature::{self, FeatureCode};
use crate::model::{AlternateName, GeoRecord, Partition};
use crate::store::{Catalogue, Transaction};
use crate::text::normalize;
use serde::Serialize;
use std::borrow::Cow;
use std::io::BufRead;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub mod common_io;
mod geonames;

use geonames::{parse_alternate_line, parse_country_line, parse_place_line};

const PROGRESS_EVERY: usize = 250_000;

/// Counters returned by a successful import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Rows written to the hierarchy and place partitions.
    pub rows: usize,
    /// Malformed source lines that were ignored.
    pub skipped: usize,
    pub alternate_names: usize,
}

pub struct Importer<'a> {
    config: &'a GazetteerConfig,
    cancel: Arc<AtomicBool>,
}

impl<'a> Importer<'a> {
    pub fn new(config: &'a GazetteerConfig) -> Self {
        Self {
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shares a cancellation flag with the caller. Setting it makes the
    /// running import return [`GeoError::Cancelled`].
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = flag;
        self
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Imports into a fresh catalogue.
    pub fn build(&self) -> Result<(Catalogue, ImportReport)> {
        let mut catalogue = Catalogue::new();
        let report = self.import_into(&mut catalogue)?;
        Ok((catalogue, report))
    }

    pub fn import_into(&self, catalogue: &mut Catalogue) -> Result<ImportReport> {
        let dir = &self.config.data_dir;
        tracing::info!(data_dir = %dir.display(), "importing catalogue");

        let mut report = ImportReport::default();
        let mut tx = catalogue.begin();

        self.import_countries(&mut tx, &dir.join(&self.config.country_info_file), &mut report)?;
        for file in &self.config.source_files {
            self.import_places(&mut tx, &dir.join(file), &mut report)?;
        }

        let alt_path = dir.join(&self.config.alternate_names_file);
        if alt_path.exists() {
            self.import_alternate_names(&mut tx, &alt_path, &mut report)?;
        } else {
            tracing::info!(path = %alt_path.display(), "no alternate names file, skipping");
        }

        self.import_aliases(&mut tx, &mut report)?;

        tx.commit();
        tracing::info!(
            rows = report.rows,
            skipped = report.skipped,
            alternate_names = report.alternate_names,
            "import finished"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // STEPS
    // -------------------------------------------------------------------------

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.load(Ordering::Relaxed) {
            tracing::warn!("import cancelled, discarding staged rows");
            return Err(GeoError::Cancelled);
        }
        Ok(())
    }

    fn import_countries(&self, tx: &mut Transaction<'_>, path: &Path, report: &mut ImportReport) -> Result<()> {
        let mut count = 0;
        for_each_line(path, |line| {
            self.check_cancelled()?;
            if let Some((iso, name, geoid)) = parse_country_line(&line) {
                tx.insert(GeoRecord::new(name, FeatureCode::COUNTRY, geoid).in_country(&iso), None);
                count += 1;
            }
            Ok(())
        })?;
        tracing::debug!(countries = count, "country rows staged");
        report.rows += count;
        Ok(())
    }

    fn import_places(&self, tx: &mut Transaction<'_>, path: &Path, report: &mut ImportReport) -> Result<()> {
        tracing::info!(path = %path.display(), "reading place dump");
        let mut lines = 0usize;
        for_each_line(path, |line| {
            self.check_cancelled()?;
            lines += 1;
            if lines % PROGRESS_EVERY == 0 {
                tracing::info!(lines, rows = report.rows, "import progress");
            }
            let Some(p) = parse_place_line(&line) else {
                report.skipped += 1;
                return Ok(());
            };
            if !self.config.is_supported(&p.country_iso) || !self.config.wants_feature(p.feature_code) {
                return Ok(());
            }
            let name = normalize(p.name, false);
            if name.is_empty() {
                report.skipped += 1;
                return Ok(());
            }
            let code = feature::refine(p.feature_code, &name, p.population);
            let record = GeoRecord::new(&name, code, p.geoid)
                .in_country(&p.country_iso)
                .in_admin(p.admin1_id, p.admin2_id)
                .at(p.latitude, p.longitude);

            // US states are also found by their postal abbreviation.
            let abbreviation = (record.feature_code.as_str() == FeatureCode::STATE
                && record.country_iso == "us"
                && !record.admin1_id.is_empty())
            .then(|| record.renamed(&record.admin1_id));

            tx.insert(record, None);
            report.rows += 1;
            if let Some(alias) = abbreviation {
                tx.insert(alias, None);
                report.rows += 1;
            }
            Ok(())
        })?;
        tracing::debug!(lines, "place dump done");
        Ok(())
    }

    fn import_alternate_names(&self, tx: &mut Transaction<'_>, path: &Path, report: &mut ImportReport) -> Result<()> {
        tracing::info!(path = %path.display(), "reading alternate names");
        for_each_line(path, |line| {
            self.check_cancelled()?;
            let Some((geoid, language, name)) = parse_alternate_line(&line) else {
                report.skipped += 1;
                return Ok(());
            };
            if !self.config.wants_language(language) {
                return Ok(());
            }
            let Some(record) = tx
                .find_geoid(geoid)
                .and_then(|(partition, id)| tx.record(partition, id))
                .cloned()
            else {
                return Ok(());
            };
            let normalized = normalize(name, false);
            if normalized.is_empty() || normalized == record.name {
                return Ok(());
            }
            tx.insert_alternate_name(AlternateName {
                geoid: geoid.to_string(),
                language: language.to_string(),
                name: name.to_string(),
            });
            report.alternate_names += 1;

            let administrative = record.feature_code.is_hierarchy()
                || record.feature_code.as_str() == FeatureCode::COUNTY;
            if !administrative {
                tx.insert(record.renamed(&normalized), Some(Partition::Place));
                report.rows += 1;
            }
            Ok(())
        })
    }

    fn import_aliases(&self, tx: &mut Transaction<'_>, report: &mut ImportReport) -> Result<()> {
        let mut written = 0;
        for alias in ALIASES {
            self.check_cancelled()?;
            match tx.find_by_name(alias.standard, alias.iso, alias.feature) {
                Some(target) => {
                    tx.insert(target.renamed(alias.local), None);
                    written += 1;
                }
                None => tracing::trace!(local = alias.local, standard = alias.standard, "alias target missing"),
            }
        }
        tracing::debug!(aliases = written, "alias rows staged");
        report.rows += written;
        Ok(())
    }
}

/// Feeds every line of `path` to `f`. Invalid UTF-8 is replaced rather than
/// rejected.
fn for_each_line(path: &Path, mut f: impl FnMut(Cow<'_, str>) -> Result<()>) -> Result<()> {
    let reader = common_io::open_lines(path)?;
    for raw in reader.split(b'\n') {
        let raw = raw?;
        if raw.is_empty() {
            continue;
        }
        f(String::from_utf8_lossy(&raw))?;
    }
    Ok(())
}
