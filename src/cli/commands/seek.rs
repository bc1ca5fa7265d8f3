//! Implementation of the `forage seek` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::time::Duration;

use super::{Target, TargetArgs, TargetKind};
use crate::cli::display::{colorize_outcome, detail_table, output, CommandOutput};
use crate::cli::output::{create_spinner, ProgressBarExt};
use crate::domain::models::{Config, SearchParameters, SearchResult};
use crate::services::{SearchController, SessionLifecycle, StrategyCatalog};

#[derive(Args, Debug)]
pub struct SeekArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Maximum attempts (overrides search.budget)
    #[arg(short, long)]
    pub budget: Option<u32>,

    /// Attempts between strategy rotations (overrides search.rotation_period)
    #[arg(long)]
    pub rotation_period: Option<u32>,

    /// Settle delay after each move in milliseconds (overrides search.settle_ms)
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// Give up as soon as the environment is seen stopped
    #[arg(long)]
    pub abort_on_stop: bool,
}

impl SeekArgs {
    /// Configured parameters with command-line overrides applied.
    pub fn parameters(&self, config: &Config) -> SearchParameters {
        let mut params = config.search.to_parameters();
        if let Some(budget) = self.budget {
            params.budget = budget;
        }
        if let Some(period) = self.rotation_period {
            params.rotation_period = period;
        }
        if let Some(settle_ms) = self.settle_ms {
            params.settle = Duration::from_millis(settle_ms);
        }
        if self.abort_on_stop {
            params.continue_on_stop = false;
        }
        params
    }
}

#[derive(Debug, Serialize)]
pub struct SeekOutput {
    pub target: TargetKind,
    #[serde(flatten)]
    pub result: SearchResult,
}

impl CommandOutput for SeekOutput {
    fn to_human(&self) -> String {
        let r = &self.result;
        let stopped = r
            .stopped_at
            .map_or_else(|| "-".to_string(), |a| format!("attempt {a}"));
        let elapsed = (r.finished_at - r.started_at).num_milliseconds();

        let table = detail_table(&[
            ("Session", r.session_id.to_string()),
            ("Outcome", colorize_outcome(r.outcome.as_str()).to_string()),
            (
                "Score",
                format!("{} -> {} ({:+})", r.initial_score, r.final_score, r.score_delta()),
            ),
            ("Attempts", format!("{} / {}", r.attempts, r.budget)),
            ("Strategy", r.strategy_used.clone()),
            ("Stopped", stopped),
            ("Unreadable polls", r.degraded_polls.to_string()),
            ("Elapsed", format!("{elapsed} ms")),
        ]);
        table.to_string()
    }
}

pub async fn execute(args: SeekArgs, config: &Config, json_mode: bool) -> Result<()> {
    let params = args.parameters(config);
    let catalog = StrategyCatalog::from_kinds(&config.search.strategies)
        .context("Invalid strategy rotation")?;

    let mut target = Target::open(&args.target, config).await?;
    let outcome = run(&mut target, config, catalog, params, json_mode).await;
    target.close().await;

    let result = outcome?;
    output(
        &SeekOutput {
            target: args.target.target,
            result,
        },
        json_mode,
    );
    Ok(())
}

async fn run(
    target: &mut Target,
    config: &Config,
    catalog: StrategyCatalog,
    params: SearchParameters,
    json_mode: bool,
) -> Result<SearchResult> {
    let spinner = create_spinner("starting session", json_mode);

    SessionLifecycle::new(&mut *target.env, &config.lifecycle)
        .with_observe_timeout(params.observe_timeout)
        .ensure_running()
        .await
        .context("Failed to bring session to running")?;

    spinner.set_message(format!("searching (budget {})", params.budget));
    let mut controller = SearchController::new(&mut *target.env, catalog, params)?;
    let result = controller.seek().await?;

    if result.succeeded {
        spinner.finish_success(format!("score increased after {} attempts", result.attempts));
    } else {
        spinner.finish_warning(format!("no score increase ({})", result.outcome));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SeekArgs {
        SeekArgs {
            target: TargetArgs {
                target: TargetKind::Sim,
                seed: None,
            },
            budget: None,
            rotation_period: None,
            settle_ms: None,
            abort_on_stop: false,
        }
    }

    #[test]
    fn test_parameters_default_to_config() {
        let params = args().parameters(&Config::default());
        assert_eq!(params, Config::default().search.to_parameters());
        assert!(params.continue_on_stop);
    }

    #[test]
    fn test_overrides_apply() {
        let seek = SeekArgs {
            budget: Some(12),
            rotation_period: Some(4),
            settle_ms: Some(0),
            abort_on_stop: true,
            ..args()
        };
        let params = seek.parameters(&Config::default());
        assert_eq!(params.budget, 12);
        assert_eq!(params.rotation_period, 4);
        assert_eq!(params.settle, Duration::ZERO);
        assert!(!params.continue_on_stop);
    }

    #[tokio::test]
    async fn test_seek_against_simulator_reaches_a_verdict() {
        let mut config = Config::default();
        config.lifecycle.poll_interval_ms = 1;
        let seek = SeekArgs {
            budget: Some(30),
            settle_ms: Some(0),
            ..args()
        };
        let params = seek.parameters(&config);
        let catalog = StrategyCatalog::from_kinds(&config.search.strategies).unwrap();

        let mut target = Target::open(&seek.target, &config).await.unwrap();
        let result = run(&mut target, &config, catalog, params, true)
            .await
            .unwrap();

        assert!(result.outcome.is_terminal());
        assert!(result.attempts <= 30);
        assert_eq!(result.succeeded, result.final_score > result.initial_score);
    }
}
