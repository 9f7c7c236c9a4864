// crates/gazetteer-core/src/loader/geonames.rs

//! Field layouts of the GeoNames text dumps.

/// Columns of a place dump line (`allCountries.txt`, `GB.txt`, ...).
pub(crate) const PLACE_FIELDS: usize = 19;

mod col {
    pub const GEOID: usize = 0;
    pub const NAME: usize = 1;
    pub const LAT: usize = 4;
    pub const LON: usize = 5;
    pub const FEATURE: usize = 7;
    pub const COUNTRY: usize = 8;
    pub const ADMIN1: usize = 10;
    pub const ADMIN2: usize = 11;
    pub const POPULATION: usize = 14;
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlaceLine<'a> {
    pub geoid: &'a str,
    pub name: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub feature_code: &'a str,
    pub country_iso: String,
    pub admin1_id: &'a str,
    pub admin2_id: &'a str,
    pub population: u64,
}

/// `None` for lines with the wrong field count or bad coordinates.
pub(crate) fn parse_place_line(line: &str) -> Option<PlaceLine<'_>> {
    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
    if fields.len() != PLACE_FIELDS {
        return None;
    }
    let latitude: f64 = fields[col::LAT].parse().ok()?;
    let longitude: f64 = fields[col::LON].parse().ok()?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }
    Some(PlaceLine {
        geoid: fields[col::GEOID],
        name: fields[col::NAME],
        latitude,
        longitude,
        feature_code: fields[col::FEATURE],
        country_iso: fields[col::COUNTRY].to_ascii_lowercase(),
        admin1_id: fields[col::ADMIN1],
        admin2_id: fields[col::ADMIN2],
        population: fields[col::POPULATION].parse().unwrap_or(0),
    })
}

/// `(iso, name, geoid)` from `countryInfo.txt`; comment lines give `None`.
pub(crate) fn parse_country_line(line: &str) -> Option<(String, &str, &str)> {
    if line.starts_with('#') {
        return None;
    }
    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
    if fields.len() < 17 || fields[0].len() != 2 || fields[4].is_empty() {
        return None;
    }
    Some((fields[0].to_ascii_lowercase(), fields[4], fields[16]))
}

/// `(geoid, language, name)` from `alternateNamesV2.txt`. A blank language
/// means English.
pub(crate) fn parse_alternate_line(line: &str) -> Option<(&str, &str, &str)> {
    let mut fields = line.trim_end_matches(['\r', '\n']).split('\t');
    let _id = fields.next()?;
    let geoid = fields.next()?;
    let lang = fields.next()?;
    let name = fields.next()?;
    if geoid.is_empty() || name.is_empty() {
        return None;
    }
    Some((geoid, if lang.is_empty() { "en" } else { lang }, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIVERTON: &str = "2635703\tTiverton\tTiverton\tTiverton\t50.90244\t-3.49109\tP\tPPL\tGB\t\tENG\tD4\t18UH\t\t20587\t\t72\tEurope/London\t2018-07-03";

    #[test]
    fn place_line() {
        let p = parse_place_line(TIVERTON).unwrap();
        assert_eq!(p.geoid, "2635703");
        assert_eq!(p.feature_code, "PPL");
        assert_eq!(p.country_iso, "gb");
        assert_eq!((p.admin1_id, p.admin2_id), ("ENG", "D4"));
        assert_eq!(p.population, 20587);
        assert!((p.latitude - 50.90244).abs() < 1e-9);
    }

    #[test]
    fn malformed_place_lines() {
        assert!(parse_place_line("2635703\tTiverton").is_none());
        let bad_lat = TIVERTON.replace("50.90244", "north");
        assert!(parse_place_line(&bad_lat).is_none());
        let out_of_range = TIVERTON.replace("50.90244", "95.0");
        assert!(parse_place_line(&out_of_range).is_none());
    }

    #[test]
    fn country_line() {
        let line = "CA\tCAN\t124\tCA\tCanada\tOttawa\t9984670\t37058856\tNA\t.ca\tCAD\tDollar\t1\t\t\ten-CA,fr-CA,iu\t6251999\tUS\t";
        assert_eq!(parse_country_line(line), Some(("ca".to_string(), "Canada", "6251999")));
        assert_eq!(parse_country_line("#ISO\tISO3"), None);
    }

    #[test]
    fn alternate_line_defaults_to_english() {
        let line = "1561913\t2635703\t\tTiverton\t\t\t\t\t\t";
        assert_eq!(parse_alternate_line(line), Some(("2635703", "en", "Tiverton")));
    }
}
