//! Command line tools for sequence matching.
//!
//! # Usage
//!
//! ```bash
//! # Match a query sequence against a reference sequence
//! smriti match configs/smriti.yaml
//!
//! # Build a dimensions-hashing index from reference bit vectors
//! smriti hash --features reference_bits.txt --output hash_table.txt
//!
//! # Find revisited places in the reference sequence
//! smriti similar-places --costs ref_vs_ref.txt --output similar_places.txt --non-match-cost 3.0
//! ```
//!
//! Enable debug logging to see per-image timing:
//!   RUST_LOG=debug smriti match configs/smriti.yaml

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{info, warn};

use smriti_loc::config::SmritiConfig;
use smriti_loc::io::{SvgConfig, SvgMatrixRenderer};
use smriti_loc::{
    CostMatrix, CostOracle, DimensionsHashing, LocError, OnlineLocalizer, Result, SimilarPlaces,
    SuccessorManager, load_bit_vectors,
};

/// Online visual localization tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match the query sequence of a cost matrix using hashing relocalization
    Match {
        /// YAML configuration file
        config: PathBuf,
    },

    /// Build and save a dimensions-hashing index
    Hash {
        /// Reference bit vectors, one per line
        #[arg(short, long)]
        features: PathBuf,

        /// Output index file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Estimate similar places from reference-vs-reference costs
    SimilarPlaces {
        /// Reference × reference cost matrix
        #[arg(short, long)]
        costs: PathBuf,

        /// Output pairs file
        #[arg(short, long)]
        output: PathBuf,

        /// Costs below this value count as the same place
        #[arg(long)]
        non_match_cost: f64,

        /// Ignore pairs this close in the sequence
        #[arg(long, default_value = "10")]
        neighbourhood: usize,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let result = match args.command {
        Command::Match { config } => run_match(&config),
        Command::Hash { features, output } => run_hash(&features, &output),
        Command::SimilarPlaces {
            costs,
            output,
            non_match_cost,
            neighbourhood,
        } => run_similar_places(&costs, &output, non_match_cost, neighbourhood),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_match(config_path: &Path) -> Result<()> {
    let config = SmritiConfig::load(config_path)?;

    let costs = Arc::new(CostMatrix::load(&config.data.costs)?);
    let query_features = load_bit_vectors(&config.data.query_features)?;

    let hashing = match (&config.data.hash_table, &config.data.reference_features) {
        (Some(table), _) => {
            let mut hashing = DimensionsHashing::load(table)?;
            hashing.weight_index(costs.ref_size())?;
            hashing
        }
        (None, Some(reference)) => {
            let reference_features = load_bit_vectors(reference)?;
            if reference_features.len() != costs.ref_size() {
                warn!(
                    "[smriti] {} reference bit vectors but {} cost matrix columns",
                    reference_features.len(),
                    costs.ref_size()
                );
            }
            DimensionsHashing::build(&reference_features)?
        }
        (None, None) => {
            return Err(LocError::Config(
                "data.hash_table or data.reference_features is required".to_string(),
            ));
        }
    }
    .with_query_features(query_features);

    let mut manager = SuccessorManager::new(costs.clone(), config.search.fan_out)
        .with_relocalizer(Arc::new(hashing));
    if let Some(ref path) = config.data.similar_places {
        manager = manager.with_similar_places(SimilarPlaces::load(path)?);
    }

    let localizer_config = config.search.to_localizer_config(costs.query_size());
    let query_size = localizer_config.query_size;
    let mut localizer = OnlineLocalizer::new(manager, localizer_config)?;
    if let Some(ref svg_file) = config.output.svg_file {
        let svg = SvgMatrixRenderer::new(svg_file, query_size, costs.ref_size(), SvgConfig::default())
            .with_title(format!("{} queries × {} references", query_size, costs.ref_size()));
        localizer = localizer.with_observer(Box::new(svg));
    }

    localizer.run()?;
    localizer.save_path(&config.output.path_file)?;

    let path = localizer.current_path()?;
    let hidden = path.iter().filter(|e| e.is_hidden()).count();
    info!(
        "[smriti] Matched {} query images, {} hidden",
        path.len(),
        hidden
    );
    Ok(())
}

fn run_hash(features: &Path, output: &Path) -> Result<()> {
    let reference_features = load_bit_vectors(features)?;
    let hashing = DimensionsHashing::build(&reference_features)?;
    hashing.log_index();
    hashing.save(output)
}

fn run_similar_places(
    costs: &Path,
    output: &Path,
    non_match_cost: f64,
    neighbourhood: usize,
) -> Result<()> {
    let costs = CostMatrix::load(costs)?;
    let places = SimilarPlaces::estimate(&costs, non_match_cost, neighbourhood)?;
    places.save(output)
}
