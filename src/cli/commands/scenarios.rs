//! Implementation of the `forage scenarios` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use super::{Target, TargetArgs, TargetKind};
use crate::cli::display::{colorize_verdict, list_table, output, render_list, CommandOutput};
use crate::cli::output::{create_spinner, ProgressBarExt};
use crate::domain::models::Config;
use crate::services::{ScenarioRunner, StrategyCatalog, SuiteReport};

#[derive(Args, Debug)]
pub struct ScenariosArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Moves spent driving into a wall before collision-restart gives up
    #[arg(long, default_value_t = crate::services::scenario_runner::DEFAULT_COLLISION_MOVE_LIMIT)]
    pub collision_moves: u32,
}

#[derive(Debug, Serialize)]
pub struct ScenariosOutput {
    pub target: TargetKind,
    #[serde(flatten)]
    pub suite: SuiteReport,
}

impl CommandOutput for ScenariosOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["Scenario", "Result", "Duration", "Detail"]);
        for report in &self.suite.reports {
            table.add_row(vec![
                report.name.clone(),
                colorize_verdict(report.passed).to_string(),
                format!("{} ms", report.duration_ms),
                report.detail.clone(),
            ]);
        }
        format!(
            "{}\n\n{} passed, {} failed",
            render_list("scenario", "scenarios", &table, self.suite.reports.len()),
            self.suite.passed,
            self.suite.failed
        )
    }
}

/// Run the suite and print it. Returns whether every scenario passed.
pub async fn execute(args: ScenariosArgs, config: &Config, json_mode: bool) -> Result<bool> {
    let catalog = StrategyCatalog::from_kinds(&config.search.strategies)
        .context("Invalid strategy rotation")?;
    let params = config.search.to_parameters();

    let mut target = Target::open(&args.target, config).await?;
    let spinner = create_spinner("running scenarios", json_mode);

    let suite = ScenarioRunner::new(
        &mut *target.env,
        config.lifecycle.clone(),
        catalog,
        params,
    )
    .with_collision_move_limit(args.collision_moves)
    .run_all()
    .await;
    target.close().await;

    if suite.all_passed() {
        spinner.finish_success(format!("{} scenarios passed", suite.passed));
    } else {
        spinner.finish_warning(format!("{} of {} scenarios failed", suite.failed, suite.reports.len()));
    }

    let all_passed = suite.all_passed();
    output(
        &ScenariosOutput {
            target: args.target.target,
            suite,
        },
        json_mode,
    );
    Ok(all_passed)
}
