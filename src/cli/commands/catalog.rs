//! Implementation of the `forage catalog` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::display::{list_table, output, render_list, CommandOutput};
use crate::domain::models::{Config, Strategy};
use crate::services::StrategyCatalog;

/// Moves shown per strategy in the human listing.
const PREVIEW_MOVES: usize = 8;

#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Show every move instead of a preview
    #[arg(long)]
    pub full: bool,
}

#[derive(Debug, Serialize)]
pub struct StrategyEntry {
    pub index: usize,
    pub name: String,
    pub length: usize,
    pub directions_covered: usize,
    pub moves: Vec<String>,
}

impl StrategyEntry {
    fn from_strategy(index: usize, strategy: &Strategy, full: bool) -> Self {
        let take = if full { strategy.len() } else { PREVIEW_MOVES };
        Self {
            index,
            name: strategy.name().to_string(),
            length: strategy.len(),
            directions_covered: strategy.directions_covered().len(),
            moves: strategy
                .pattern()
                .iter()
                .take(take)
                .map(|mv| mv.key_name().to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogOutput {
    pub strategies: Vec<StrategyEntry>,
}

impl CommandOutput for CatalogOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["#", "Name", "Length", "Directions", "Moves"]);
        for entry in &self.strategies {
            let mut moves = entry.moves.join(" ");
            if entry.moves.len() < entry.length {
                moves.push_str(" ...");
            }
            table.add_row(vec![
                entry.index.to_string(),
                entry.name.clone(),
                entry.length.to_string(),
                entry.directions_covered.to_string(),
                moves,
            ]);
        }
        render_list("strategy", "strategies", &table, self.strategies.len())
    }
}

pub fn build(config: &Config, full: bool) -> Result<CatalogOutput> {
    let catalog = StrategyCatalog::from_kinds(&config.search.strategies)
        .context("Invalid strategy rotation")?;
    Ok(CatalogOutput {
        strategies: catalog
            .iter()
            .enumerate()
            .map(|(i, s)| StrategyEntry::from_strategy(i, s, full))
            .collect(),
    })
}

pub fn execute(args: &CatalogArgs, config: &Config, json_mode: bool) -> Result<()> {
    output(&build(config, args.full)?, json_mode);
    Ok(())
}
