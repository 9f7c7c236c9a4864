// crates/gazetteer-core/src/store/persist.rs

//! Catalogue file format: a bincode header (magic + schema version)
//! followed by the bincode body, the whole stream gzip-compressed when the
//! `compact` feature is on. Indexes are not stored.

use super::catalogue::Catalogue;
use super::SCHEMA_VERSION;
use crate::error::{GeoError, Result};
use crate::loader::common_io::{self, CompressionMode};
use crate::model::{AlternateName, GeoRecord};
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

const MAGIC: [u8; 4] = *b"GZTR";

/// Refuse payloads larger than this (corrupt length prefixes).
const SIZE_LIMIT: u64 = 2 * 1024 * 1024 * 1024;

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(SIZE_LIMIT)
        .allow_trailing_bytes()
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    magic: [u8; 4],
    schema_version: i32,
}

#[derive(Serialize)]
struct BodyRef<'a> {
    hierarchy: &'a [GeoRecord],
    places: &'a [GeoRecord],
    alternate_names: &'a [AlternateName],
}

#[derive(Deserialize)]
struct Body {
    hierarchy: Vec<GeoRecord>,
    places: Vec<GeoRecord>,
    alternate_names: Vec<AlternateName>,
}

fn read_header(reader: &mut dyn Read) -> Result<Header> {
    let header: Header = codec().deserialize_from(reader)?;
    if header.magic != MAGIC {
        return Err(GeoError::InvalidData("not a gazetteer catalogue".into()));
    }
    Ok(header)
}

impl Catalogue {
    /// Writes the catalogue, gzip-compressed when `compact` is enabled.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = common_io::create_stream(path, CompressionMode::default_for_build())?;
        let header = Header {
            magic: MAGIC,
            schema_version: self.schema_version,
        };
        let body = BodyRef {
            hierarchy: &self.hierarchy.rows,
            places: &self.places.rows,
            alternate_names: &self.alternate_names,
        };
        codec().serialize_into(&mut writer, &header)?;
        codec().serialize_into(&mut writer, &body)?;
        writer.flush()?;
        tracing::info!(path = %path.display(), rows = self.len(), "catalogue saved");
        Ok(())
    }

    /// Reads just the schema-version marker.
    pub fn read_schema_version(path: impl AsRef<Path>) -> Result<i32> {
        let mut reader = common_io::open_stream(path.as_ref(), CompressionMode::default_for_build())?;
        Ok(read_header(&mut reader)?.schema_version)
    }

    /// Loads a catalogue written by [`Catalogue::save`].
    ///
    /// Fails with [`GeoError::SchemaMismatch`] when the file was written by a
    /// different layout; no migration is attempted.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = common_io::open_stream(path, CompressionMode::default_for_build())?;
        let header = read_header(&mut reader)?;
        if header.schema_version != SCHEMA_VERSION {
            return Err(GeoError::SchemaMismatch {
                found: header.schema_version,
                expected: SCHEMA_VERSION,
            });
        }
        let body: Body = codec().deserialize_from(&mut reader)?;
        tracing::debug!(
            path = %path.display(),
            hierarchy = body.hierarchy.len(),
            places = body.places.len(),
            "catalogue loaded"
        );
        Ok(Catalogue::from_parts(
            body.hierarchy,
            body.places,
            body.alternate_names,
            header.schema_version,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Partition;
    use crate::store::{Predicate, TextMatch};
    use crate::traits::GeoStore;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("gazetteer-{}-{name}", std::process::id()))
    }

    #[test]
    fn save_and_load_rebuilds_indexes() {
        let mut c = Catalogue::new();
        let mut tx = c.begin();
        tx.insert(GeoRecord::new("Canada", "ADM0", "6251999").in_country("ca"), None);
        tx.insert(GeoRecord::new("Toronto", "PPLA", "6167865").in_country("ca").at(43.7, -79.4), None);
        tx.insert_alternate_name(AlternateName {
            geoid: "6167865".into(),
            language: "fr".into(),
            name: "Toronto".into(),
        });
        tx.commit();

        let path = temp_path("roundtrip.bin");
        c.save(&path).unwrap();
        assert_eq!(Catalogue::read_schema_version(&path).unwrap(), SCHEMA_VERSION);

        let loaded = Catalogue::load(&path).unwrap();
        let rows = loaded.select(
            Partition::Place,
            &Predicate::new().name(TextMatch::prefix("tor")),
            5,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(loaded.alternate_names("6167865").len(), 1);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_other_schema_versions() {
        let mut c = Catalogue::new();
        c.schema_version = SCHEMA_VERSION + 1;
        let path = temp_path("old.bin");
        c.save(&path).unwrap();
        match Catalogue::load(&path) {
            Err(GeoError::SchemaMismatch { found, expected }) => {
                assert_eq!(found, SCHEMA_VERSION + 1);
                assert_eq!(expected, SCHEMA_VERSION);
            }
            other => panic!("expected schema mismatch, got {:?}", other.map(|c| c.len())),
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_not_found() {
        assert!(matches!(
            Catalogue::load(temp_path("does-not-exist.bin")),
            Err(GeoError::NotFound(_))
        ));
    }
}
