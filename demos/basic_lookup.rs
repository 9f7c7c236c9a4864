//! Basic usage example for gazetteer-rs
//!
//! This example demonstrates how to:
//! - Build a small catalogue in memory
//! - Resolve misspelled and partial place names
//! - Inspect ranked candidates and their scores
//!
//! To run against real GeoNames data instead, point `GazetteerConfig` at a
//! directory holding `countryInfo.txt` and `allCountries.txt` and call
//! `Gazetteer::open(config, true)`.

use gazetteer_core::store::Catalogue;
use gazetteer_core::{Gazetteer, GazetteerConfig, GeoRecord, Result};

fn main() -> Result<()> {
    println!("=== gazetteer-rs Basic Lookup Example ===\n");

    let mut catalogue = Catalogue::new();
    let mut tx = catalogue.begin();
    tx.insert(GeoRecord::new("United Kingdom", "ADM0", "2635167").in_country("gb"), None);
    tx.insert(GeoRecord::new("England", "ADM1", "6269131").in_country("gb").in_admin("ENG", ""), None);
    tx.insert(GeoRecord::new("Scotland", "ADM1", "2638360").in_country("gb").in_admin("SCT", ""), None);
    tx.insert(
        GeoRecord::new("Devon", "ADM2", "2651292").in_country("gb").in_admin("ENG", "D4"),
        None,
    );
    tx.insert(
        GeoRecord::new("Tiverton", "PPL", "2635703").in_country("gb").in_admin("ENG", "D4").at(50.90, -3.49),
        None,
    );
    tx.insert(
        GeoRecord::new("Edinburgh", "PPLA2", "2650225").in_country("gb").in_admin("SCT", "").at(55.95, -3.19),
        None,
    );
    tx.commit();

    let gazetteer = Gazetteer::with_store(Box::new(catalogue), GazetteerConfig::default())?;

    for text in ["tiverton, devon, england", "eddinburg,,scotland", "tiv*", "squid"] {
        println!("--- {text} ---");
        let place = gazetteer.lookup(text, None);
        println!("Status: {}", place.result_status);
        for c in &place.candidates {
            println!(
                "  {:>6.1}  {} ({})",
                c.score,
                gazetteer.describe(&c.record).long_name(),
                c.tier
            );
        }
        println!();
    }

    gazetteer.close();
    Ok(())
}
