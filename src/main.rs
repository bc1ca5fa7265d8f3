//! Forage CLI entry point.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use forage::cli::commands::{catalog, init, scenarios, seek};
use forage::cli::{handle_error, Cli, Commands};
use forage::domain::models::Config;
use forage::infrastructure::config::ConfigLoader;
use forage::infrastructure::logging::{LogConfig, LoggerImpl};

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

async fn run(cli: Cli, config: &Config) -> Result<ExitCode> {
    let json = cli.json;
    match cli.command {
        Commands::Seek(args) => seek::execute(args, config, json).await?,
        Commands::Scenarios(args) => {
            if !scenarios::execute(args, config, json).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Catalog(args) => catalog::execute(&args, config, json)?,
        Commands::Init(args) => init::execute(args, json).await?,
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    // init must work even when the current config is broken
    let config = match (&cli.command, load_config(&cli)) {
        (_, Ok(config)) => config,
        (Commands::Init(_), Err(_)) => Config::default(),
        (_, Err(err)) => handle_error(&err, json),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(&err, json),
    };

    match run(cli, &config).await {
        Ok(code) => code,
        Err(err) => handle_error(&err, json),
    }
}
