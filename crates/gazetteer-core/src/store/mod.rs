// crates/gazetteer-core/src/store/mod.rs

//! # Storage
//!
//! The in-memory catalogue behind [`crate::traits::GeoStore`]: two
//! partitions of [`crate::model::GeoRecord`]s with sorted indexes on name,
//! phonetic key, (country, feature) and (country, admin1, admin2), an
//! alternate-name table, transactional batch inserts and a versioned file
//! format.

mod catalogue;
mod index;
mod persist;
mod predicate;

pub use catalogue::{Catalogue, Transaction};
pub use predicate::{increment, Predicate, TextMatch, WildcardPattern};

/// Layout version written at the head of every catalogue file.
pub const SCHEMA_VERSION: i32 = 3;
