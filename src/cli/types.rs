//! CLI type definitions
//!
//! Clap structures for the top-level command line. Per-command arguments
//! live beside each command in [`super::commands`].

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::catalog::CatalogArgs;
use super::commands::init::InitArgs;
use super::commands::scenarios::ScenariosArgs;
use super::commands::seek::SeekArgs;

#[derive(Parser, Debug)]
#[command(name = "forage")]
#[command(about = "Forage - blind goal search and scenario checks for arcade games", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .forage/
    #[arg(short, long, global = true, env = "FORAGE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a session and search for a score increase
    Seek(SeekArgs),

    /// Run the end-to-end scenario suite
    Scenarios(ScenariosArgs),

    /// List the strategies in rotation order
    Catalog(CatalogArgs),

    /// Write a default .forage/config.yaml
    Init(InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::TargetKind;

    #[test]
    fn test_parse_seek_with_overrides() {
        let cli = Cli::try_parse_from([
            "forage",
            "--json",
            "seek",
            "--target",
            "sim",
            "--budget",
            "40",
            "--abort-on-stop",
            "--seed",
            "11",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Seek(args) => {
                assert_eq!(args.target.target, TargetKind::Sim);
                assert_eq!(args.budget, Some(40));
                assert!(args.abort_on_stop);
                assert_eq!(args.target.seed, Some(11));
                assert_eq!(args.rotation_period, None);
            }
            other => panic!("Expected seek, got {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli =
            Cli::try_parse_from(["forage", "catalog", "--config", "custom.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        assert!(matches!(cli.command, Commands::Catalog(_)));
    }

    #[test]
    fn test_unknown_target_rejected() {
        assert!(Cli::try_parse_from(["forage", "scenarios", "--target", "phone"]).is_err());
    }
}
