use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "MSMPR CLI - Steady-state crystal size distributions for continuous crystallizers with fines removal and product classification.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve the crystallizer in a working directory and write the size distributions.
    Run(RunArgs),
    /// Convert a number-fraction table into a volume-fraction table or back.
    Convert(ConvertArgs),
    /// Compute a moment of a sampled population density table.
    Moment(MomentArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    // --- Core Arguments ---
    /// Working directory holding the parameter file; results go below it.
    #[arg(required = true, value_name = "DIR")]
    pub working_dir: PathBuf,

    /// Path to a run configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the parameter file, relative to the working directory.
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Override the results directory, relative to the working directory.
    #[arg(long, value_name = "PATH")]
    pub results_dir: Option<PathBuf>,

    // --- Sampling Overrides ---
    /// Size step of the density mesh and of the fraction bins (um).
    #[arg(short, long, value_name = "FLOAT")]
    pub mesh_size: Option<f64>,

    /// Upper end of the sampled size range as a multiple of G*tau.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff_factor: Option<f64>,

    // --- Solver Overrides ---
    /// Starting growth rate for the root search (um/min).
    #[arg(long, value_name = "FLOAT")]
    pub initial_guess: Option<f64>,

    /// Relative tolerance on the growth rate.
    #[arg(long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,

    /// Maximum number of bracketing and refinement iterations.
    #[arg(long, value_name = "INT")]
    pub max_iterations: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S sampling.mesh-size=0.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Representation a fraction table is converted into.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FractionKind {
    /// Number fractions; the input must hold volume fractions.
    Number,
    /// Volume fractions; the input must hold number fractions.
    Volume,
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Input fraction table (CSV).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Representation to produce.
    #[arg(short, long, value_enum, required = true)]
    pub to: FractionKind,

    /// Output fraction table (CSV).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

/// Arguments for the `moment` subcommand.
#[derive(Args, Debug, Clone)]
pub struct MomentArgs {
    /// Population density table (CSV), e.g. Result/PDF.csv.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Moment order; 0 gives the normalization constant.
    #[arg(short, long, default_value_t = 0.0, value_name = "FLOAT")]
    pub order: f64,
}
