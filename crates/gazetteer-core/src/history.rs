// crates/gazetteer-core/src/history.rs

//! Years from which modern place names are plausible.
//!
//! Looking up "New York" for an event in 1410 should not resolve to the
//! American city: the name did not exist yet. The tables give, per state or
//! province, the year its modern naming begins; regions without an entry
//! are always valid.

/// `(country_iso, admin1_id lower-cased, first year)`. `-1` means always.
static ADMIN1_START_YEAR: &[(&str, &str, i32)] = &[
    ("us", "al", 1711),
    ("us", "ak", 1774),
    ("us", "az", 1775),
    ("us", "ar", 1686),
    ("us", "ca", 1769),
    ("us", "co", 1871),
    ("us", "ct", 1633),
    ("us", "de", 1638),
    ("us", "dc", 1650),
    ("us", "fl", 1565),
    ("us", "ga", 1566),
    ("us", "hi", -1),
    ("us", "id", 1862),
    ("us", "il", 1703),
    ("us", "in", 1715),
    ("us", "ia", 1785),
    ("us", "ks", 1870),
    ("us", "ky", 1775),
    ("us", "la", 1699),
    ("us", "me", 1604),
    ("us", "md", 1633),
    ("us", "ma", 1620),
    ("us", "mi", 1784),
    ("us", "mn", 1820),
    ("us", "ms", 1699),
    ("us", "mo", 1765),
    ("us", "mt", 1877),
    ("us", "ne", 1854),
    ("us", "nv", 1905),
    ("us", "nh", 1638),
    ("us", "nj", 1624),
    ("us", "nm", 1598),
    ("us", "ny", 1614),
    ("us", "nc", 1653),
    ("us", "nd", 1871),
    ("us", "oh", 1785),
    ("us", "ok", 1889),
    ("us", "or", 1811),
    ("us", "pa", 1682),
    ("us", "ri", 1636),
    ("us", "sc", 1663),
    ("us", "sd", 1865),
    ("us", "tn", 1739),
    ("us", "tx", 1685),
    ("us", "ut", 1847),
    ("us", "vt", 1650),
    ("us", "va", 1607),
    ("us", "wa", 1825),
    ("us", "wv", 1788),
    ("us", "wi", 1685),
    ("us", "wy", 1867),
    ("ca", "01", 1795),
    ("ca", "02", 1789),
    ("ca", "03", 1733),
    ("ca", "04", 1766),
    ("ca", "05", 1583),
    ("ca", "07", 1604),
    ("ca", "08", 1673),
    ("ca", "09", 1764),
    ("ca", "10", 1541),
    ("ca", "11", 1862),
    ("ca", "12", 1700),
    ("ca", "13", 1700),
    ("ca", "14", 1700),
];

/// `(country_iso, first year)` for countries without state-level data.
static COUNTRY_START_YEAR: &[(&str, i32)] = &[("cu", -1)];

/// First year the modern names of `(iso, admin1_id)` are plausible, if known.
pub fn start_year(iso: &str, admin1_id: &str) -> Option<i32> {
    let admin1 = admin1_id.to_ascii_lowercase();
    ADMIN1_START_YEAR
        .iter()
        .find(|(c, a, _)| *c == iso && *a == admin1)
        .map(|(_, _, y)| *y)
        .or_else(|| {
            COUNTRY_START_YEAR
                .iter()
                .find(|(c, _)| *c == iso)
                .map(|(_, y)| *y)
        })
}

/// `false` when `event_year + padding` predates the region's modern name.
pub fn is_valid_year(event_year: i32, iso: &str, admin1_id: &str, padding: i32) -> bool {
    match start_year(iso, admin1_id) {
        Some(start) => event_year + padding >= start,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_york_did_not_exist_in_1410() {
        assert!(!is_valid_year(1410, "us", "NY", 60));
        assert!(is_valid_year(1700, "us", "NY", 0));
    }

    #[test]
    fn padding_widens_the_window() {
        // Ontario: 1673
        assert!(!is_valid_year(1650, "ca", "08", 0));
        assert!(is_valid_year(1650, "ca", "08", 60));
    }

    #[test]
    fn unknown_regions_are_always_valid() {
        assert!(is_valid_year(900, "gb", "ENG", 0));
        assert!(is_valid_year(900, "cu", "01", 0));
        assert_eq!(start_year("us", "hi"), Some(-1));
    }
}
