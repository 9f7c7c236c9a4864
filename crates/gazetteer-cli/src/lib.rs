//! gazetteer-cli
//! =============
//!
//! Command-line interface for the `gazetteer-core` place-name resolver.
//!
//! This crate primarily provides a binary (`gazetteer`). The library target
//! exists so that docs.rs renders an overview page.
//!
//! Quick start
//! -----------
//!
//! ```text
//! gazetteer --data-dir ./geonames build --countries gb,ie
//! gazetteer --data-dir ./geonames lookup "eddinburg,,scotland"
//! gazetteer --data-dir ./geonames matches "cant* cath*, england"
//! gazetteer --data-dir ./geonames geoid 2635703
//! gazetteer --data-dir ./geonames stats
//! ```
//!
//! The data directory must hold `countryInfo.txt` and a place dump such as
//! `allCountries.txt` (optionally `.gz`) from GeoNames;
//! `alternateNamesV2.txt` is used when present.
//!
//! For programmatic access use the [`gazetteer-core`] crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
