use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for gazetteer
#[derive(Debug, Parser)]
#[command(
    name = "gazetteer",
    version,
    about = "Resolve misspelled or partial place names against a GeoNames catalogue"
)]
pub struct CliArgs {
    /// Directory holding the GeoNames dumps and the built catalogue
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// JSON config file; fields it omits keep their defaults
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import the GeoNames dumps and write the catalogue
    Build {
        /// Comma-separated ISO2 codes to import (e.g. us,ca). Default: all.
        #[arg(long = "countries")]
        countries: Option<String>,
    },

    /// Print the best match for a place name
    Lookup {
        /// Comma-delimited place text, e.g. "tiverton, devon, england"
        text: String,

        /// Year of the event; drops places that did not exist yet
        #[arg(long = "year")]
        year: Option<i32>,
    },

    /// Print every ranked candidate with its score
    Matches {
        text: String,
    },

    /// Look a record up by GeoNames id
    Geoid {
        id: String,
    },

    /// Show a summary of the catalogue contents
    Stats,
}
