use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::{DEFAULT_FREQUENCY_FILE, DEFAULT_INVENTORY_FILE, DEFAULT_TOP};

#[derive(Debug, Clone, Parser)]
#[command(name = "controller-analyzer")]
#[command(about = "Map Java controllers to their endpoints and the DTO types they exchange")]
pub struct Cli {
    /// Root directory of the source tree to analyze
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Directory receiving the JSON reports (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[arg(long, value_name = "FILE", default_value = DEFAULT_INVENTORY_FILE)]
    pub inventory_file: String,

    #[arg(long, value_name = "FILE", default_value = DEFAULT_FREQUENCY_FILE)]
    pub frequency_file: String,

    /// Number of DTOs listed in the frequency summary
    #[arg(long, value_name = "N", default_value_t = DEFAULT_TOP)]
    pub top: usize,

    /// Source file extension to scan (repeatable, defaults to java)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Keep files whose syntax tree has recoverable errors
    #[arg(long)]
    pub lenient: bool,

    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
