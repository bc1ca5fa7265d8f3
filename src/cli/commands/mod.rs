//! CLI command implementations and shared target selection.

pub mod catalog;
pub mod init;
pub mod scenarios;
pub mod seek;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};

use crate::adapters::webdriver::WebDriverClient;
use crate::adapters::{GridArcade, PacedEnvironment, WebDriverEnvironment};
use crate::domain::models::Config;
use crate::domain::ports::ArcadeEnvironment;

/// Which environment a command drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// In-process snake simulator
    Sim,
    /// Browser game behind a WebDriver endpoint
    Webdriver,
}

/// Target selection shared by `seek` and `scenarios`.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Environment to drive
    #[arg(short, long, value_enum, default_value = "sim")]
    pub target: TargetKind,

    /// Simulator seed (overrides simulator.seed)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// An opened environment plus whatever is needed to tear it down.
pub struct Target {
    pub kind: TargetKind,
    pub env: Box<dyn ArcadeEnvironment>,
    browser: Option<WebDriverClient>,
}

impl Target {
    /// Build the environment named by `args`, wrapped in the observation
    /// pacer when pacing is enabled.
    pub async fn open(args: &TargetArgs, config: &Config) -> Result<Self> {
        let pacing = &config.pacing;
        match args.target {
            TargetKind::Sim => {
                let mut sim = config.simulator.clone();
                if let Some(seed) = args.seed {
                    sim.seed = seed;
                }
                let arcade = GridArcade::new(&sim).context("Failed to build simulator")?;
                info!(width = sim.width, height = sim.height, seed = sim.seed, "simulator ready");

                let env: Box<dyn ArcadeEnvironment> = if pacing.enabled {
                    Box::new(PacedEnvironment::new(arcade, pacing.max_observations_per_second)?)
                } else {
                    Box::new(arcade)
                };
                Ok(Self {
                    kind: args.target,
                    env,
                    browser: None,
                })
            }
            TargetKind::Webdriver => {
                if args.seed.is_some() {
                    warn!("--seed only applies to the simulator target");
                }
                let browser = WebDriverEnvironment::connect(config.webdriver.clone())
                    .await
                    .with_context(|| {
                        format!(
                            "Failed to open WebDriver session at {}",
                            config.webdriver.endpoint
                        )
                    })?;
                let client = browser.client().clone();

                let env: Box<dyn ArcadeEnvironment> = if pacing.enabled {
                    Box::new(PacedEnvironment::new(browser, pacing.max_observations_per_second)?)
                } else {
                    Box::new(browser)
                };
                Ok(Self {
                    kind: args.target,
                    env,
                    browser: Some(client),
                })
            }
        }
    }

    /// Release external resources. Failures are logged, not returned, so
    /// they never mask the command's own result.
    pub async fn close(self) {
        if let Some(client) = self.browser {
            if let Err(err) = client.delete_session().await {
                warn!(error = %err, "failed to close WebDriver session");
            }
        }
    }
}
