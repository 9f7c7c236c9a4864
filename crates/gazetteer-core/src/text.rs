// crates/gazetteer-core/src/text.rs

//! # Normalizer
//!
//! Text canonicalization shared by the importer (storage keys) and the query
//! pipeline. Everything here is a pure function of its input.
//!
//! ```
//! use gazetteer_core::text::normalize;
//!
//! assert_eq!(normalize("Sankt Pölten", false), "st polten");
//! assert_eq!(normalize("County of Kildare", false), "kildare county");
//! assert_eq!(normalize("Toronto, Ontario", true), "toronto, ontario");
//! ```

use crate::alias;
use once_cell::sync::Lazy;
use regex::Regex;

/// Backstop on phrase-table passes, per input byte. Every rewrite except the
/// `mt` and `r k` expansions shortens the text, and those two fire at most
/// once per source word, so a fixed point comes long before the cap.
const PASSES_PER_BYTE: usize = 8;

/// Accent- and case-insensitive key: ASCII transliteration + lowercase.
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

fn compile(table: &[(&str, &'static str)]) -> Vec<(Regex, &'static str)> {
    table
        .iter()
        .filter_map(|(pattern, replacement)| match Regex::new(pattern) {
            Ok(re) => Some((re, *replacement)),
            Err(e) => {
                tracing::error!("bad phrase pattern {pattern}: {e}");
                None
            }
        })
        .collect()
}

/// Ordered phrase canonicalization applied by [`normalize`].
static PHRASES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    compile(&[
        (r" {2,}", " "),
        (r"^mt ", "mount "),
        (r"\br k ", "roman catholic "),
        (r"\brooms katholieke\b", "roman catholic"),
        (r"\b(?:saints|sainte|saint|sint|sankt|sveti)\b", "st"),
        (r"\b(county|township|cathedral|palace|castle) of ([^,]+)", "${2} ${1}"),
        (r"\b(?:city|town) of ", ""),
        (r"\bunited states of america\b", "usa"),
        (r"\bunited states\b", "usa"),
        (r"\bu s a\b", "usa"),
        (r",\s*(castle|palace)\b", " ${1}"),
        (r"'(\w{2,})'", "${1}"),
    ])
});

/// Extra folding used only when computing fuzzy distances.
static SCORING_NOISE: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    compile(&[
        (r"\s*,\s*", ","),
        (r"\bwestphalia\b", "westfalen"),
        (r"\bdepartement\b", "department"),
        (r"\bregional municipality\b", "county"),
        (r"\bl'", ""),
        (r"\b(?:kommune|region)\b", ""),
        (r"(?:erry|ery)\b", "ury"),
        (r"(?:bourg|borg)\b", "burg"),
        (r"urgh\b", "urg"),
        (r"mound\b", "mund"),
        (r"ourne\b", "orn"),
        (r"ney\b", "ny"),
        (r"\bpriory\b", "abbey"),
        (r" (?:de|di|du|of) ", " "),
        (r" {2,}", " "),
    ])
});

fn keep_char(c: char, keep_commas: bool) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | ' ' | '*' | '\'' | '$') || (keep_commas && c == ',')
}

fn apply(table: &[(Regex, &'static str)], text: &str) -> String {
    let mut out = text.to_string();
    for (re, replacement) in table {
        if re.is_match(&out) {
            out = re.replace_all(&out, *replacement).into_owned();
        }
    }
    out
}

/// Transliterates, lowercases, strips punctuation and applies the phrase
/// table until the text stops changing.
///
/// Kept characters: letters, digits, space, `*` (wildcard), `'` and the
/// internal placeholder `$`; commas only when `keep_commas` is set.
/// `normalize(normalize(x, k), k) == normalize(x, k)`.
pub fn normalize(text: &str, keep_commas: bool) -> String {
    let folded: String = fold_key(text)
        .chars()
        .map(|c| if keep_char(c, keep_commas) { c } else { ' ' })
        .collect();

    let mut current = folded.trim().to_string();
    let max_passes = PASSES_PER_BYTE * current.len() + 16;
    for _ in 0..max_passes {
        let next = apply(&PHRASES, &current).trim().to_string();
        if next == current {
            return current;
        }
        current = next;
    }
    tracing::warn!(text, passes = max_passes, "phrase table did not settle");
    current
}

/// [`normalize`] (keeping commas) plus removal of noise that should not
/// influence fuzzy distance.
pub fn normalize_for_scoring(text: &str) -> String {
    let base = normalize(text, true);
    apply(&SCORING_NOISE, &base).trim().to_string()
}

fn rewrite(name: &str, iso: &str, feature: &str) -> (String, bool) {
    let name = normalize(name, false);
    match alias::standard_name(&name, iso, feature) {
        Some(standard) => (standard.to_string(), true),
        None => (name, false),
    }
}

/// Normalizes a country name and maps local/historic names to the standard
/// one. Returns the name and whether an alias fired.
pub fn country_normalize(name: &str) -> (String, bool) {
    rewrite(&name.replace('.', ""), "", "ADM0")
}

/// Normalizes a state/province name, applying `iso`'s historic-name table.
pub fn admin1_normalize(name: &str, iso: &str) -> (String, bool) {
    rewrite(name, iso, "ADM1")
}

/// Normalizes a county name, applying `iso`'s historic-name table.
pub fn admin2_normalize(name: &str, iso: &str) -> (String, bool) {
    rewrite(name, iso, "ADM2")
}

/// Title-cases a normalized name for display ("st john's" → "St John's").
pub fn capwords(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Street-address heuristic: a digit, or a street/avenue/road word.
pub fn is_street(text: &str) -> bool {
    if text.chars().any(|c| c.is_ascii_digit()) {
        return true;
    }
    text.split([' ', ',']).any(|w| {
        matches!(
            w,
            "street" | "avenue" | "ave" | "road" | "rd" | "lane" | "rue" | "strasse"
                | "straat" | "via" | "calle"
        )
    })
}
