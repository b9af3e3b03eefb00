use anyhow::Result;
use clap::Parser;
use controller_analyzer::analyzer::{Analysis, analyze_project};
use controller_analyzer::cli::Cli;
use controller_analyzer::config::AnalyzerConfig;
use controller_analyzer::frequency::FrequencyTable;
use controller_analyzer::report::write_json;
use log::{error, info};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(root) = cli.root.clone() else {
        eprintln!("Path not specified");
        return ExitCode::FAILURE;
    };

    match run(&cli, &root) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli, root: &Path) -> Result<()> {
    let config = AnalyzerConfig::from_cli(cli)?;

    let analysis = match analyze_project(root, &config) {
        Ok(analysis) => analysis,
        Err(err) => {
            error!("An error occurred: {err:?}");
            Analysis::default()
        }
    };
    info!("{:?}", analysis.stats);

    match write_json(&analysis.inventory, &config.inventory_path) {
        Ok(()) => println!("JSON file generated successfully"),
        Err(err) => error!("Error writing JSON file: {err:#}"),
    }

    let frequencies = FrequencyTable::from_inventory(&analysis.inventory);
    print!("{}", frequencies.summary(config.top));

    if let Err(err) = write_json(&frequencies, &config.frequency_path) {
        error!("Error writing DTO frequency JSON file: {err:#}");
    }

    Ok(())
}
