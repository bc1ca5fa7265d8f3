//! Implementation of the `forage init` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::cli::display::{action_failure, action_success, output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::{CONFIG_DIR, CONFIG_FILE};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_path: PathBuf,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let line = if self.success {
            action_success(&self.message)
        } else {
            action_failure(&self.message)
        };
        format!("{line}\n  {}", self.config_path.display())
    }
}

/// Render the default configuration as commented YAML.
pub fn default_config_yaml() -> Result<String> {
    let body = serde_yaml::to_string(&Config::default())
        .context("Failed to serialize default configuration")?;
    Ok(format!(
        "# forage configuration\n\
         # Overrides: .forage/local.yaml, then FORAGE_<SECTION>__<KEY> variables.\n{body}"
    ))
}

/// Write the default config under `root`. Returns the file path and whether
/// anything was written.
pub async fn write_default_config(root: &Path, force: bool) -> Result<(PathBuf, bool)> {
    let config_path = root.join(CONFIG_FILE);
    if fs::try_exists(&config_path).await.unwrap_or(false) && !force {
        return Ok((config_path, false));
    }

    fs::create_dir_all(root.join(CONFIG_DIR))
        .await
        .with_context(|| format!("Failed to create {}", root.join(CONFIG_DIR).display()))?;
    fs::write(&config_path, default_config_yaml()?)
        .await
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok((config_path, true))
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let root = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let (config_path, written) = write_default_config(&root, args.force).await?;
    let message = match (written, args.force) {
        (false, _) => "Config already exists. Use --force to overwrite.",
        (true, true) => "Config rewritten with defaults.",
        (true, false) => "Config initialized.",
    };

    output(
        &InitOutput {
            success: written,
            message: message.to_string(),
            config_path,
        },
        json_mode,
    );
    Ok(())
}
