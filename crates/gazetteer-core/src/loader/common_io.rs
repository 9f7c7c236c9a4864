// crates/gazetteer-core/src/loader/common_io.rs
use crate::error::{GeoError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    Gzip,
    None,
}

impl CompressionMode {
    /// Gzip when the `compact` feature is enabled.
    pub fn default_for_build() -> Self {
        #[cfg(feature = "compact")]
        {
            CompressionMode::Gzip
        }
        #[cfg(not(feature = "compact"))]
        {
            CompressionMode::None
        }
    }

    /// `.gz` sources are gzip, anything else is plain text.
    pub fn for_source(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("gz") => CompressionMode::Gzip,
            _ => CompressionMode::None,
        }
    }
}

pub fn open_stream(path: &Path, compression: CompressionMode) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        GeoError::NotFound(format!("Dataset not found at {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);

    match compression {
        CompressionMode::Gzip => {
            #[cfg(feature = "compact")]
            {
                Ok(Box::new(GzDecoder::new(reader)))
            }
            #[cfg(not(feature = "compact"))]
            {
                Err(GeoError::InvalidData(format!(
                    "{} is gzip-compressed but 'compact' is disabled",
                    path.display()
                )))
            }
        }
        CompressionMode::None => Ok(Box::new(reader)),
    }
}

/// Line reader over a source dump, transparently un-gzipping `.gz` files.
pub fn open_lines(path: &Path) -> Result<Box<dyn BufRead>> {
    let stream = open_stream(path, CompressionMode::for_source(path))?;
    Ok(Box::new(BufReader::new(stream)))
}

pub fn create_stream(path: &Path, compression: CompressionMode) -> Result<Box<dyn Write>> {
    let file = File::create(path).map_err(GeoError::Io)?;
    let writer = BufWriter::new(file);

    match compression {
        CompressionMode::Gzip => {
            #[cfg(feature = "compact")]
            {
                Ok(Box::new(GzEncoder::new(writer, Compression::default())))
            }
            #[cfg(not(feature = "compact"))]
            {
                Err(GeoError::InvalidData(
                    "Gzip requested but 'compact' disabled".into(),
                ))
            }
        }
        CompressionMode::None => Ok(Box::new(writer)),
    }
}
