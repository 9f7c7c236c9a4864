//! gazetteer: command-line front end for gazetteer-core
//!
//! Usage examples
//! --------------
//!
//! - Build the catalogue for two countries
//!   $ gazetteer -d ./geonames build --countries gb,ie
//!
//! - Best match, optionally for a historical year
//!   $ gazetteer -d ./geonames lookup "tiverton, devon, england"
//!   $ gazetteer -d ./geonames lookup "new york, usa" --year 1600
//!
//! - Every surviving candidate
//!   $ gazetteer -d ./geonames matches "cant* cath*, england"
//!
//! Lookups open the catalogue with repair enabled: a missing or outdated
//! catalogue is rebuilt from the dumps first.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use gazetteer_core::{Gazetteer, GazetteerConfig, Importer, Place};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "gazetteer_core=debug,info",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_config(args: &CliArgs) -> anyhow::Result<GazetteerConfig> {
    let mut config = match &args.config {
        #[cfg(feature = "json")]
        Some(path) => GazetteerConfig::from_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        #[cfg(not(feature = "json"))]
        Some(_) => anyhow::bail!("--config needs the `json` feature"),
        None => GazetteerConfig::default(),
    };
    if let Some(dir) = &args.data_dir {
        config = config.with_data_dir(dir);
    }
    Ok(config)
}

fn print_place(place: &Place) {
    println!("{}", place.result_status);
    if !place.result_status.is_match() {
        return;
    }
    println!("  {}", place.long_name());
    println!("  geoid:   {}", place.geoid);
    println!("  at:      {:.5}, {:.5}", place.latitude, place.longitude);
    if let Some(feature) = &place.feature {
        println!("  feature: {} ({})", feature, feature.kind().label());
    }
    if let Some(score) = place.score {
        println!("  score:   {score:.1}");
    }
    if place.flags.limited {
        println!("  (candidate list was truncated)");
    }
    if place.flags.date_filtered {
        println!("  (kept only thanks to the year padding)");
    }
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);
    let mut config = load_config(&args)?;

    match args.command {
        Commands::Build { countries } => {
            if let Some(list) = countries {
                config.supported_countries = list
                    .split(',')
                    .map(|c| c.trim().to_ascii_lowercase())
                    .filter(|c| !c.is_empty())
                    .collect();
            }
            config.validate()?;
            let (catalogue, report) = Importer::new(&config)
                .build()
                .context("import failed")?;
            let path = config.catalogue_path();
            catalogue.save(&path)?;
            println!("Catalogue written to {}", path.display());
            println!("  Rows: {}", report.rows);
            println!("  Alternate names: {}", report.alternate_names);
            println!("  Skipped lines: {}", report.skipped);
        }

        Commands::Lookup { text, year } => {
            let gazetteer = Gazetteer::open(config, true)?;
            print_place(&gazetteer.lookup(&text, year));
            gazetteer.close();
        }

        Commands::Matches { text } => {
            let gazetteer = Gazetteer::open(config, true)?;
            let matches = gazetteer.find_matches(&text);
            if matches.is_empty() {
                println!("No match for: {text}");
            }
            for c in matches {
                let place = gazetteer.describe(&c.record);
                println!(
                    "{:>7.1}  {:<20} {} [{}] {}",
                    c.score,
                    c.tier.to_string(),
                    place.long_name(),
                    c.record.feature_code,
                    c.record.geoid
                );
            }
            gazetteer.close();
        }

        Commands::Geoid { id } => {
            let gazetteer = Gazetteer::open(config, true)?;
            print_place(&gazetteer.find_by_external_id(&id));
            gazetteer.close();
        }

        Commands::Stats => {
            let gazetteer = Gazetteer::open(config, true)?;
            let stats = gazetteer.stats();
            println!("Catalogue statistics:");
            println!("  Schema version: {}", gazetteer.schema_version());
            println!("  Countries/States: {}", stats.hierarchy);
            println!("  Places: {}", stats.places);
            println!("  Alternate names: {}", stats.alternate_names);
            gazetteer.close();
        }
    }

    Ok(())
}
