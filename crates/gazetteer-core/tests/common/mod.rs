// crates/gazetteer-core/tests/common/mod.rs
#![allow(dead_code)]

use gazetteer_core::store::Catalogue;
use gazetteer_core::{Gazetteer, GazetteerConfig, GeoRecord};

fn place(name: &str, code: &str, geoid: &str, iso: &str, a1: &str, a2: &str, lat: f64, lon: f64) -> GeoRecord {
    GeoRecord::new(name, code, geoid)
        .in_country(iso)
        .in_admin(a1, a2)
        .at(lat, lon)
}

/// A small hand-made catalogue covering Canada, the UK and the US.
pub fn catalogue() -> Catalogue {
    let mut c = Catalogue::new();
    let mut tx = c.begin();

    tx.insert(GeoRecord::new("Canada", "ADM0", "6251999").in_country("ca"), None);
    tx.insert(GeoRecord::new("United Kingdom", "ADM0", "2635167").in_country("gb"), None);
    tx.insert(GeoRecord::new("United States", "ADM0", "6252001").in_country("us"), None);
    tx.insert(place("Ontario", "ADM1", "6093943", "ca", "08", "", 49.25, -84.5), None);
    tx.insert(place("England", "ADM1", "6269131", "gb", "ENG", "", 52.16, -0.7), None);
    tx.insert(place("Scotland", "ADM1", "2638360", "gb", "SCT", "", 56.5, -4.0), None);
    tx.insert(place("Wales", "ADM1", "2634895", "gb", "WLS", "", 52.5, -3.5), None);
    tx.insert(place("New York", "ADM1", "5128638", "us", "NY", "", 43.0, -75.5), None);

    tx.insert(place("Devon", "ADM2", "2651292", "gb", "ENG", "D4", 50.75, -3.75), None);
    tx.insert(place("Kent", "ADM2", "3333158", "gb", "ENG", "G5", 51.17, 0.83), None);

    tx.insert(place("Toronto", "PPLA", "6167865", "ca", "08", "", 43.70, -79.42), None);
    tx.insert(place("Edinburgh", "PPLA2", "2650225", "gb", "SCT", "", 55.95, -3.19), None);
    tx.insert(place("Canterbury", "PPL", "2653877", "gb", "ENG", "G5", 51.28, 1.08), None);
    tx.insert(place("Canterbury Cathedral", "CH", "6620284", "gb", "ENG", "G5", 51.2798, 1.0828), None);
    tx.insert(place("Tiverton", "PPL", "2635703", "gb", "ENG", "D4", 50.90, -3.49), None);
    tx.insert(place("Newport", "PPLA2", "2641598", "gb", "WLS", "", 51.58, -2.99), None);
    // Same entity under a second name, as the importer writes for alternate names.
    tx.insert(place("Newport on Usk", "PPLA2", "2641598", "gb", "WLS", "", 51.58, -2.99), None);
    tx.insert(place("New York City", "PP1M", "5128581", "us", "NY", "", 40.71, -74.0), None);
    tx.commit();
    c
}

pub fn config() -> GazetteerConfig {
    let mut config = GazetteerConfig::default();
    config.min_records = 1;
    config
}

pub fn gazetteer() -> Gazetteer {
    Gazetteer::with_store(Box::new(catalogue()), config()).unwrap()
}
