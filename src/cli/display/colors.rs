//! Outcome and state color mapping for CLI output.
//!
//! `console` drops styling automatically when stdout is not a terminal.

use console::{style, StyledObject};

/// Color a search outcome: green on success, yellow when the budget ran
/// out, red when the environment stopped.
pub fn colorize_outcome(outcome: &str) -> StyledObject<&str> {
    match outcome {
        "succeeded" => style(outcome).green().bold(),
        "exhausted" => style(outcome).yellow(),
        "environment_stopped" => style(outcome).red().bold(),
        _ => style(outcome).dim(),
    }
}

/// Color a pass/fail verdict.
pub fn colorize_verdict(passed: bool) -> StyledObject<&'static str> {
    if passed {
        style("pass").green().bold()
    } else {
        style("FAIL").red().bold()
    }
}
