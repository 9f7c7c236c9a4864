// crates/gazetteer-core/src/feature.rs

//! Feature codes (GeoNames style) and the tables keyed on them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A GeoNames feature code such as `PPL`, `ADM1` or `CSTL`.
///
/// Three synthetic codes refine `PPL*` by population at import time:
/// `PP1M` (over a million), `P1HK` (over 100k) and `P10K` (over 10k).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureCode(String);

impl FeatureCode {
    pub const COUNTRY: &'static str = "ADM0";
    pub const STATE: &'static str = "ADM1";
    pub const COUNTY: &'static str = "ADM2";

    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Countries and states live in the hierarchy partition.
    pub fn is_hierarchy(&self) -> bool {
        matches!(self.0.as_str(), Self::COUNTRY | Self::STATE)
    }

    /// Importance from 0 (least) to 100 (capital / million-plus city).
    pub fn priority(&self) -> u8 {
        priority(&self.0)
    }

    pub fn kind(&self) -> FeatureKind {
        FeatureKind::from_code(&self.0)
    }
}

impl fmt::Display for FeatureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeatureCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Coarse category used for display and for choosing which hierarchy level a
/// result fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Country,
    State,
    County,
    City,
    Castle,
    Cemetery,
    Church,
    Religious,
    Historic,
    Hospital,
    Island,
    Museum,
    Palace,
    Park,
    Natural,
    Other,
}

impl FeatureKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "ADM0" => Self::Country,
            "ADM1" => Self::State,
            "ADM2" => Self::County,
            "CSTL" => Self::Castle,
            "CMTY" => Self::Cemetery,
            "CH" => Self::Church,
            "MSQE" | "MSTY" | "RLG" | "SYG" | "TMPL" | "SHRN" => Self::Religious,
            "HSTS" | "RUIN" | "MNMT" | "BTL" | "FT" | "EST" | "MILB" => Self::Historic,
            "HSP" => Self::Hospital,
            "ISL" | "ISLS" => Self::Island,
            "MUS" => Self::Museum,
            "PAL" => Self::Palace,
            "PRK" | "SQR" => Self::Park,
            "MT" | "VAL" | "LK" | "STM" | "AREA" | "RGN" => Self::Natural,
            c if c.starts_with("PP") || c == "P1HK" || c == "P10K" => Self::City,
            c if c.starts_with("ADM") => Self::County,
            _ => Self::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Country => "Country",
            Self::State => "State",
            Self::County => "County",
            Self::City => "City",
            Self::Castle => "Castle",
            Self::Cemetery => "Cemetery",
            Self::Church => "Church",
            Self::Religious => "Religious Site",
            Self::Historic => "Historic Site",
            Self::Hospital => "Hospital",
            Self::Island => "Island",
            Self::Museum => "Museum",
            Self::Palace => "Palace",
            Self::Park => "Park",
            Self::Natural => "Natural Feature",
            Self::Other => "Place",
        }
    }
}

// -----------------------------------------------------------------------------
// PRIORITY
// -----------------------------------------------------------------------------

static PRIORITY: &[(&str, u8)] = &[
    ("PP1M", 100),
    ("ADM1", 96),
    ("PPLA", 96),
    ("PPLC", 96),
    ("ADM0", 93),
    ("PPLA2", 93),
    ("P1HK", 93),
    ("P10K", 89),
    ("PPLX", 82),
    ("PP1K", 82),
    ("PPLG", 75),
    ("PPLH", 71),
    ("PRN", 71),
    ("PRSH", 71),
    ("RLG", 71),
    ("RUIN", 71),
    ("STG", 71),
    ("RGN", 71),
    ("AREA", 71),
    ("NVB", 71),
    ("PPLA3", 71),
    ("ADMF", 71),
    ("PPLA4", 69),
    ("PPLF", 69),
    ("ADMX", 66),
    ("PPLQ", 60),
    ("PPLR", 60),
    ("PPLS", 55),
    ("PPLL", 55),
    ("PPLW", 55),
    ("PPL", 55),
    ("SQR", 50),
    ("ISL", 50),
    ("ADM2", 45),
    ("CH", 44),
    ("MSQE", 44),
    ("MSTY", 44),
    ("SYG", 44),
    ("MUS", 44),
    ("CMTY", 44),
    ("CSTL", 44),
    ("EST", 44),
    ("MILB", 44),
    ("MNMT", 44),
    ("PAL", 44),
    ("HSTS", 42),
    ("PRK", 42),
    ("ADM3", 32),
    ("BTL", 22),
];

/// Priority of a raw code; unknown codes (valleys, mountains, ...) score 0.
pub fn priority(code: &str) -> u8 {
    PRIORITY
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, p)| *p)
        .unwrap_or(0)
}

// -----------------------------------------------------------------------------
// INFERENCE
// -----------------------------------------------------------------------------

/// Generic nouns that imply a feature code when they appear in a place name.
static NOUN_FEATURES: &[(&str, &str)] = &[
    ("abbey", "MSTY"),
    ("priory", "MSTY"),
    ("monastery", "MSTY"),
    ("basilica", "CH"),
    ("cathedral", "CH"),
    ("chapel", "CH"),
    ("church", "CH"),
    ("eglise", "CH"),
    ("iglesia", "CH"),
    ("chiesa", "CH"),
    ("kirche", "CH"),
    ("kerk", "CH"),
    ("kirk", "CH"),
    ("kosciol", "CH"),
    ("castle", "CSTL"),
    ("castillo", "CSTL"),
    ("castello", "CSTL"),
    ("chateau", "CSTL"),
    ("kasteel", "CSTL"),
    ("schloss", "CSTL"),
    ("burg", "CSTL"),
    ("slott", "CSTL"),
    ("zamek", "CSTL"),
    ("cemetery", "CMTY"),
    ("cimetiere", "CMTY"),
    ("friedhof", "CMTY"),
    ("begraafplaats", "CMTY"),
    ("graveyard", "CMTY"),
    ("hospital", "HSP"),
    ("hopital", "HSP"),
    ("krankenhaus", "HSP"),
    ("ospedale", "HSP"),
    ("museum", "MUS"),
    ("musee", "MUS"),
    ("museo", "MUS"),
    ("mosque", "MSQE"),
    ("mosquee", "MSQE"),
    ("moschee", "MSQE"),
    ("synagogue", "SYG"),
    ("island", "ISL"),
    ("isle", "ISL"),
    ("ile", "ISL"),
    ("isla", "ISL"),
    ("insel", "ISL"),
    ("palace", "PAL"),
    ("palais", "PAL"),
    ("palacio", "PAL"),
    ("palazzo", "PAL"),
    ("county", "ADM2"),
];

/// Finds the first generic-feature noun in `text` (normalized).
/// Returns the remaining text and the implied feature code.
pub fn infer_from_name(text: &str) -> Option<(String, &'static str)> {
    let words: Vec<&str> = text.split_whitespace().collect();
    for (i, word) in words.iter().enumerate() {
        if let Some((_, code)) = NOUN_FEATURES.iter().find(|(noun, _)| noun == word) {
            let rest: Vec<&str> = words
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, w)| *w)
                .collect();
            return Some((rest.join(" "), code));
        }
    }
    None
}

/// Refines a raw import code using population and name.
pub fn refine(code: &str, name: &str, population: u64) -> FeatureCode {
    if code.starts_with("PP") {
        if population > 1_000_000 {
            return FeatureCode::new("PP1M");
        } else if population > 100_000 {
            return FeatureCode::new("P1HK");
        } else if population > 10_000 {
            return FeatureCode::new("P10K");
        }
    }
    match code {
        "AREA" if name.contains("island") => FeatureCode::new("ISL"),
        "HSTS" | "RUIN" => {
            if name.contains("abbey") || name.contains("priory") {
                FeatureCode::new("MSTY")
            } else if name.contains("castle") {
                FeatureCode::new("CSTL")
            } else if name.contains("church") {
                FeatureCode::new("CH")
            } else {
                FeatureCode::new(code)
            }
        }
        _ => FeatureCode::new(code),
    }
}
