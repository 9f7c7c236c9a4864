// crates/gazetteer-core/src/lib.rs

pub mod alias; // Local, foreign and historic names
pub mod common;
pub mod config;
pub mod error;
pub mod feature;
pub mod filter; // Dedup, gap and historical filter
pub mod gazetteer; // The public entry point
pub mod history;
pub mod loader; // GeoNames import
pub mod model;
pub mod parser;
pub mod phonetic;
pub mod place;
pub mod score;
pub mod search; // Cascade and engine
pub mod store; // Catalogue, indexes, persistence
pub mod text;
pub mod traits;

// Re-exports
pub use crate::common::DbStats;
pub use crate::config::{GazetteerConfig, ScoringWeights};
pub use crate::error::{GeoError, Result};
pub use crate::feature::FeatureCode;
pub use crate::gazetteer::Gazetteer;
pub use crate::loader::{ImportReport, Importer};
pub use crate::model::{AlternateName, Candidate, GeoRecord, MatchTier, Partition};
pub use crate::place::{Place, PlaceKind, ResultFlags, ResultStatus};
pub use crate::score::{MatchScorer, GOOD, POOR, VERY_GOOD, VERY_POOR};
// Export the storage trait (needed to plug in another backend)
pub use crate::traits::GeoStore;
