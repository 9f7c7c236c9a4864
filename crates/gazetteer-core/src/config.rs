// crates/gazetteer-core/src/config.rs

//! # Configuration
//!
//! Everything tunable about a [`crate::Gazetteer`] lives in
//! [`GazetteerConfig`]. The struct deserializes from JSON with every field
//! optional, so a config file only needs to name what it overrides:
//!
//! ```json
//! { "supported_countries": ["gb", "ie"], "scoring": { "prefix_weight": 2.0 } }
//! ```

use crate::error::{GeoError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CATALOGUE_FILE: &str = "gazetteer.bin";

/// Feature codes imported when a config does not list its own.
pub const DEFAULT_FEATURE_CODES: &[&str] = &[
    "ADM1", "ADM2", "ADM3", "ADM4", "ADMF", "CH", "CSTL", "CMTY", "EST", "HSP", "FT", "HSTS",
    "ISL", "MSQE", "MSTY", "MT", "MUS", "PAL", "PPL", "PPLA", "PPLA2", "PPLA3", "PPLA4", "PPLC",
    "PPLG", "PPLH", "PPLL", "PPLQ", "PPLX", "PRK", "PRN", "PRSH", "RUIN", "RLG", "STG", "SQR",
    "SYG", "VAL",
];

// -----------------------------------------------------------------------------
// SCORING
// -----------------------------------------------------------------------------

/// Weights handed to [`crate::score::MatchScorer::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Relative weight of the county, state and country levels. City is 1.0.
    pub token_weights: [f64; 3],
    /// Multiplier on the unconsumed-prefix penalty.
    pub prefix_weight: f64,
    /// Share of the final score taken by feature importance (0..=1).
    pub feature_weight: f64,
    /// Added when the query text contained a wildcard.
    pub wildcard_penalty: f64,
    /// Subtracted from candidates found by more than one query word.
    pub reinforced_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            token_weights: [0.1, 0.3, 0.5],
            prefix_weight: 1.0,
            feature_weight: 0.1,
            wildcard_penalty: 4.0,
            reinforced_bonus: 3.0,
        }
    }
}

impl ScoringWeights {
    pub fn validate(&self) -> Result<()> {
        let extra = [
            self.prefix_weight,
            self.feature_weight,
            self.wildcard_penalty,
            self.reinforced_bonus,
        ];
        let all = self.token_weights.iter().chain(extra.iter());
        for w in all {
            if !w.is_finite() || *w < 0.0 {
                return Err(GeoError::Config(format!("scoring weight {w} must be finite and >= 0")));
            }
        }
        if self.feature_weight > 1.0 {
            return Err(GeoError::Config("feature_weight must not exceed 1.0".into()));
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// GAZETTEER
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GazetteerConfig {
    /// Directory holding the GeoNames dumps and the built catalogue.
    pub data_dir: PathBuf,
    pub catalogue_file: String,
    /// Tab-separated place dumps, relative to `data_dir`. `.gz` is accepted.
    pub source_files: Vec<String>,
    pub country_info_file: String,
    pub alternate_names_file: String,

    /// Lower-case ISO codes. Empty means every country is supported.
    pub supported_countries: Vec<String>,
    /// Languages imported from the alternate-names dump.
    pub languages: Vec<String>,
    pub feature_codes: Vec<String>,

    /// Row cap for a single storage probe.
    pub query_limit: usize,
    /// The cascade stops once this many candidates have accumulated.
    pub candidate_cap: usize,
    /// A word probe returning more rows than this is ignored.
    pub word_fanout_limit: usize,
    /// `open` refuses catalogues smaller than this.
    pub min_records: usize,

    /// Rectilinear lat/lon distance under which same-named rows merge.
    pub dedup_distance: f64,
    /// Years of slack given to the historical filter.
    pub year_padding: i32,

    pub scoring: ScoringWeights,
}

impl Default for GazetteerConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            catalogue_file: DEFAULT_CATALOGUE_FILE.to_string(),
            source_files: vec!["allCountries.txt".to_string()],
            country_info_file: "countryInfo.txt".to_string(),
            alternate_names_file: "alternateNamesV2.txt".to_string(),
            supported_countries: Vec::new(),
            languages: vec!["en".to_string()],
            feature_codes: DEFAULT_FEATURE_CODES.iter().map(|s| s.to_string()).collect(),
            query_limit: 105,
            candidate_cap: 50,
            word_fanout_limit: 50,
            min_records: 1000,
            dedup_distance: 0.6,
            year_padding: 60,
            scoring: ScoringWeights::default(),
        }
    }
}

impl GazetteerConfig {
    pub fn default_data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn catalogue_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalogue_file)
    }

    /// Loads a JSON config file. Missing fields take their defaults.
    #[cfg(feature = "json")]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            GeoError::NotFound(format!("Config not found at {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        if self.candidate_cap == 0 || self.query_limit == 0 {
            return Err(GeoError::Config("candidate_cap and query_limit must be positive".into()));
        }
        if !(self.dedup_distance >= 0.0) {
            return Err(GeoError::Config("dedup_distance must be >= 0".into()));
        }
        if let Some(bad) = self.supported_countries.iter().find(|c| c.len() != 2) {
            return Err(GeoError::Config(format!("'{bad}' is not a two-letter country code")));
        }
        Ok(())
    }

    /// `true` if `iso` is inside the supported set (or the set is empty).
    pub fn is_supported(&self, iso: &str) -> bool {
        self.supported_countries.is_empty()
            || self
                .supported_countries
                .iter()
                .any(|c| c.eq_ignore_ascii_case(iso))
    }

    pub fn wants_feature(&self, code: &str) -> bool {
        self.feature_codes.iter().any(|f| f == code)
    }

    pub fn wants_language(&self, lang: &str) -> bool {
        self.languages.iter().any(|l| l == lang)
    }
}
