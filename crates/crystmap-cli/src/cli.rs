use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "crystmap",
    version,
    about = "Inspect and extract crystallographic electron-density maps (CCP4/MRC, DSN6/BRIX)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Silence all log output.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print header, cell, and statistics of a map file.
    Info(InfoArgs),
    /// Extract a block of density as JSON for isosurfacing.
    Extract(ExtractArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Ccp4,
    Dsn6,
}

#[derive(Debug, Parser)]
pub struct InfoArgs {
    /// Map file to inspect.
    pub path: PathBuf,

    /// On-disk format; guessed from the file contents when omitted.
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}

#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Map file to extract from.
    pub path: PathBuf,

    /// On-disk format; guessed from the file contents when omitted.
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Half-edge of the extraction cube in Å; requires --center.
    #[arg(short, long, requires = "center")]
    pub radius: Option<f64>,

    /// Orthogonal-space center of the cube in Å; whole box when omitted.
    #[arg(short, long, num_args = 3, value_names = ["X", "Y", "Z"], requires = "radius")]
    pub center: Option<Vec<f64>>,

    /// Also report the absolute density threshold for this sigma level.
    #[arg(short, long)]
    pub sigma: Option<f64>,

    /// Write the JSON block here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
