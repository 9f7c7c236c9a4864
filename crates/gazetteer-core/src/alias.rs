// crates/gazetteer-core/src/alias.rs

//! Local, foreign and historical names for countries and regions.
//!
//! One table drives three things: the query-side rewrites in
//! [`crate::text::country_normalize`] / [`crate::text::admin1_normalize`] /
//! [`crate::text::admin2_normalize`], the alias rows the importer adds to the
//! catalogue, and the display fix-ups applied to output.

/// A local or historic name and the standard name it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alias {
    pub local: &'static str,
    pub standard: &'static str,
    /// Empty for countries.
    pub iso: &'static str,
    pub feature: &'static str,
}

const fn alias(
    local: &'static str,
    standard: &'static str,
    iso: &'static str,
    feature: &'static str,
) -> Alias {
    Alias {
        local,
        standard,
        iso,
        feature,
    }
}

/// Names are stored in normalized form (see [`crate::text::normalize`]).
pub const ALIASES: &[Alias] = &[
    // ---- COUNTRIES ----
    alias("norge", "norway", "", "ADM0"),
    alias("sverige", "sweden", "", "ADM0"),
    alias("osterreich", "austria", "", "ADM0"),
    alias("belgie", "belgium", "", "ADM0"),
    alias("belgique", "belgium", "", "ADM0"),
    alias("brasil", "brazil", "", "ADM0"),
    alias("danmark", "denmark", "", "ADM0"),
    alias("eire", "ireland", "", "ADM0"),
    alias("magyarorszag", "hungary", "", "ADM0"),
    alias("italia", "italy", "", "ADM0"),
    alias("espana", "spain", "", "ADM0"),
    alias("deutschland", "germany", "", "ADM0"),
    alias("prussia", "germany", "", "ADM0"),
    alias("suisse", "switzerland", "", "ADM0"),
    alias("schweiz", "switzerland", "", "ADM0"),
    alias("nederland", "netherlands", "", "ADM0"),
    alias("holland", "netherlands", "", "ADM0"),
    alias("polska", "poland", "", "ADM0"),
    alias("america", "usa", "", "ADM0"),
    alias("us", "usa", "", "ADM0"),
    alias("uk", "united kingdom", "", "ADM0"),
    alias("great britain", "united kingdom", "", "ADM0"),
    // ---- STATES / PROVINCES ----
    alias("bayern", "bavaria", "de", "ADM1"),
    alias("normandy", "normandie", "fr", "ADM1"),
    alias("basse normandie", "normandie", "fr", "ADM1"),
    alias("haute normandie", "normandie", "fr", "ADM1"),
    alias("brittany", "bretagne", "fr", "ADM1"),
    alias("burgundy", "bourgogne franche comte", "fr", "ADM1"),
    alias("bourgogne", "bourgogne franche comte", "fr", "ADM1"),
    alias("franche comte", "bourgogne franche comte", "fr", "ADM1"),
    alias("aquitaine", "nouvelle aquitaine", "fr", "ADM1"),
    alias("limousin", "nouvelle aquitaine", "fr", "ADM1"),
    alias("poitou charentes", "nouvelle aquitaine", "fr", "ADM1"),
    alias("alsace", "grand est", "fr", "ADM1"),
    alias("champagne ardenne", "grand est", "fr", "ADM1"),
    alias("lorraine", "grand est", "fr", "ADM1"),
    alias("languedoc roussillon", "occitanie", "fr", "ADM1"),
    alias("midi pyrenees", "occitanie", "fr", "ADM1"),
    alias("nord pas de calais", "hauts de france", "fr", "ADM1"),
    alias("picardy", "hauts de france", "fr", "ADM1"),
    alias("auvergne", "auvergne rhone alpes", "fr", "ADM1"),
    alias("rhone alpes", "auvergne rhone alpes", "fr", "ADM1"),
    alias("centre", "centre val de loire", "fr", "ADM1"),
    alias("newfoundland", "newfoundland and labrador", "ca", "ADM1"),
    alias("quebec province", "quebec", "ca", "ADM1"),
    // ---- COUNTIES ----
    alias("breconshire", "powys", "gb", "ADM2"),
    alias("brecknockshire", "powys", "gb", "ADM2"),
    alias("radnorshire", "powys", "gb", "ADM2"),
    alias("montgomeryshire", "powys", "gb", "ADM2"),
];

/// Historic region names that modern catalogues fold into a newer one.
/// `(legacy, modern)`: a query naming `legacy` is compared as `modern`
/// when the candidate carries the modern name.
pub const REGION_OVERLAPS: &[(&str, &str)] = &[
    ("middlesex", "greater london"),
    ("westmorland", "cumbria"),
    ("cumberland", "cumbria"),
    ("huntingdonshire", "cambridgeshire"),
];

/// Looks up the standard name for `local` among aliases of `feature`.
/// Country aliases ignore `iso`.
pub fn standard_name(local: &str, iso: &str, feature: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|a| a.feature == feature && a.local == local && (a.iso.is_empty() || a.iso == iso))
        .map(|a| a.standard)
}

/// Country names whose stored (normalized) form reads badly when
/// title-cased.
pub fn country_display(name: &str) -> Option<&'static str> {
    match name {
        "usa" => Some("United States"),
        "united kingdom" => Some("United Kingdom"),
        _ => None,
    }
}
