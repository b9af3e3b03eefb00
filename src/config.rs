use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::cli::Cli;

pub const DEFAULT_INVENTORY_FILE: &str = "controller_dto_mapping.json";
pub const DEFAULT_FREQUENCY_FILE: &str = "dto_frequency.json";
pub const DEFAULT_TOP: usize = 10;
pub const DEFAULT_EXTENSION: &str = "java";
pub const OUTPUT_DIR_ENV: &str = "CONTROLLER_ANALYZER_OUTPUT_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub extensions: Vec<String>,
    pub lenient: bool,
    pub top: usize,
    pub inventory_path: PathBuf,
    pub frequency_path: PathBuf,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            lenient: false,
            top: DEFAULT_TOP,
            inventory_path: PathBuf::from(DEFAULT_INVENTORY_FILE),
            frequency_path: PathBuf::from(DEFAULT_FREQUENCY_FILE),
        }
    }
}

impl AnalyzerConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let output_dir = resolve_output_dir(cli)?;
        Ok(Self {
            extensions: normalize_extensions(&cli.extensions),
            lenient: cli.lenient,
            top: cli.top,
            inventory_path: output_dir.join(&cli.inventory_file),
            frequency_path: output_dir.join(&cli.frequency_file),
        })
    }
}

pub fn resolve_output_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(p) = cli.output_dir.clone() {
        return Ok(p);
    }

    if let Ok(p) = env::var(OUTPUT_DIR_ENV)
        && !p.is_empty()
    {
        return Ok(PathBuf::from(p));
    }

    env::current_dir().context("Failed to resolve the current directory")
}

pub fn normalize_extensions(raw: &[String]) -> Vec<String> {
    let mut extensions: Vec<String> = raw
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_string())
        .filter(|e| !e.is_empty())
        .collect();
    extensions.sort();
    extensions.dedup();
    if extensions.is_empty() {
        extensions.push(DEFAULT_EXTENSION.to_string());
    }
    extensions
}
