// crates/gazetteer-core/benches/benchmarks.rs
use criterion::{criterion_group, criterion_main, Criterion};
use gazetteer_core::phonetic::phonetic_key;
use gazetteer_core::store::Catalogue;
use gazetteer_core::text::normalize;
use gazetteer_core::{Gazetteer, GazetteerConfig, GeoRecord};
use std::hint::black_box;

const TOWNS: &[&str] = &[
    "tiverton", "exeter", "plymouth", "barnstaple", "crediton", "honiton", "totnes", "bideford",
    "okehampton", "tavistock", "newton abbot", "teignmouth", "dawlish", "exmouth", "sidmouth",
];

fn catalogue() -> Catalogue {
    let mut c = Catalogue::new();
    let mut tx = c.begin();
    tx.insert(GeoRecord::new("United Kingdom", "ADM0", "2635167").in_country("gb"), None);
    tx.insert(GeoRecord::new("England", "ADM1", "6269131").in_country("gb").in_admin("ENG", ""), None);
    tx.insert(
        GeoRecord::new("Devon", "ADM2", "2651292").in_country("gb").in_admin("ENG", "D4"),
        None,
    );
    // A few thousand rows so index scans have something to skip over.
    for i in 0..4000u32 {
        let town = TOWNS[i as usize % TOWNS.len()];
        let name = if i < TOWNS.len() as u32 { town.to_string() } else { format!("{town} {i}") };
        tx.insert(
            GeoRecord::new(&name, "PPL", i.to_string())
                .in_country("gb")
                .in_admin("ENG", "D4")
                .at(50.0 + f64::from(i % 100) * 0.01, -4.0 + f64::from(i / 100) * 0.01),
            None,
        );
    }
    tx.commit();
    c
}

fn bench_text(c: &mut Criterion) {
    c.bench_function("normalize", |b| {
        b.iter(|| normalize(black_box("Sankt Johann im Pongau, Salzburg, Österreich"), true))
    });
    c.bench_function("phonetic_key", |b| {
        b.iter(|| phonetic_key(black_box("north newton abbot")))
    });
}

fn bench_lookup(c: &mut Criterion) {
    let mut config = GazetteerConfig::default();
    config.min_records = 1;
    let g = Gazetteer::with_store(Box::new(catalogue()), config).expect("bench gazetteer");

    c.bench_function("lookup_exact", |b| {
        b.iter(|| g.lookup(black_box("tiverton, devon, england"), None))
    });
    c.bench_function("lookup_misspelled", |b| {
        b.iter(|| g.lookup(black_box("tivertun, devon, england"), None))
    });
    c.bench_function("lookup_wildcard", |b| {
        b.iter(|| g.lookup(black_box("tiv*, england"), None))
    });
}

criterion_group!(benches, bench_text, bench_lookup);
criterion_main!(benches);
