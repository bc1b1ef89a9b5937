extern crate color_eyre;
extern crate diodem;

use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use diodem::io::provider::{expand_home, CachedProvider, LocalProvider};
use diodem::io::write_csv;
use diodem::{load_runtime_conf, Dataset, Interpolation, LoadOptions, MotionRef, MotionStop, RuntimeConf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Load time-aligned motion capture and imu recordings", long_about = None)]
struct Cli {
    /// YAML runtime configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset mirror root (overrides the config)
    #[arg(long, global = true)]
    dataset: Option<String>,

    /// Cache directory (overrides the config)
    #[arg(long, global = true)]
    cache: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the valid motions of an experiment
    Motions { exp_id: u32 },
    /// Load, resample and crop a range of motions
    Load {
        exp_id: u32,
        /// First motion, by number or name
        #[arg(long, default_value = "1")]
        start: String,
        /// Last motion, by number or name, or `last`
        #[arg(long)]
        stop: Option<String>,
        /// Output rate in Hz
        #[arg(long)]
        hz: Option<f64>,
        /// `linear` or `cubic`
        #[arg(long)]
        interpolation: Option<String>,
        /// Crop with rounded-up sample counts instead of exact sample boundaries
        #[arg(long, action = ArgAction::SetTrue)]
        no_strict: bool,
        /// Write the flattened tree as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Start and stop of a motion within the complete trial, in seconds
    Timing { exp_id: u32, motion: String },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut runtime_conf = match &cli.config {
        Some(path) => load_runtime_conf(path)?,
        None => RuntimeConf::default()
    };
    if let Some(dataset) = &cli.dataset {
        runtime_conf.dataset_path = dataset.clone();
    }
    if let Some(cache) = &cli.cache {
        runtime_conf.cache_path = cache.clone();
    }

    let provider = CachedProvider::new(LocalProvider::new(expand_home(&runtime_conf.dataset_path)), expand_home(&runtime_conf.cache_path));
    let dataset = Dataset::new(provider);

    match cli.command {
        Command::Motions { exp_id } => {
            for motion in dataset.load_all_valid_motions_in_trial(exp_id)? {
                println!("{}", motion);
            }
        },
        Command::Timing { exp_id, motion } => {
            let (t_start, t_stop) = dataset.load_timing_relative_to_complete_trial(exp_id, &motion)?;
            println!("{} {}", t_start, t_stop);
        },
        Command::Load { exp_id, start, stop, hz, interpolation, no_strict, output } => {
            let options = LoadOptions {
                resample_to_hz: hz.unwrap_or(runtime_conf.resample_hz),
                interpolation: match interpolation {
                    Some(method) => method.parse::<Interpolation>()?,
                    None => runtime_conf.interpolation
                },
                strict_crop: runtime_conf.strict_crop && !no_strict
            };
            let motion_stop = stop.as_deref().map_or(MotionStop::Only, MotionStop::parse);
            let data = dataset.load_data_with(exp_id, MotionRef::parse(&start), motion_stop, &options)?;
            info!(leaves = data.leaf_count(), hz = options.resample_to_hz, "loaded");

            for (path, signal) in data.flatten_with_paths() {
                println!("{}\t{:?}", path, signal.shape());
            }
            if let Some(output) = output {
                write_csv(&data, File::create(&output)?)?;
                info!(path = %output.display(), "written");
            }
        }
    }
    Ok(())
}
