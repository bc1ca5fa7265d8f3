mod common;

use common::fast_params;
use forage::adapters::ScriptedEnvironment;
use forage::domain::models::{SearchOutcome, Strategy as MovePattern, StrategyKind};
use forage::services::{SearchController, StrategyCatalog};
use proptest::prelude::*;

fn any_kind() -> impl Strategy<Value = StrategyKind> {
    proptest::sample::select(StrategyKind::ALL.to_vec())
}

proptest! {
    /// Property: pattern replay is periodic in the pattern length
    #[test]
    fn prop_pattern_replay_is_periodic(
        kind in any_kind(),
        attempt in 0u32..10_000,
        laps in 1u32..20,
    ) {
        let strategy = MovePattern::reference(kind).unwrap();
        let len = u32::try_from(strategy.len()).unwrap();
        prop_assert_eq!(
            strategy.next_move(attempt),
            strategy.next_move(attempt + laps * len)
        );
    }

    /// Property: the active strategy is floor(attempt / period) mod len
    #[test]
    fn prop_rotation_index_formula(
        attempt in 0u32..100_000,
        period in 1u32..100,
        count in 1usize..=5,
    ) {
        let catalog = StrategyCatalog::from_kinds(&StrategyKind::ALL[..count]).unwrap();
        prop_assert_eq!(
            catalog.strategy_index_at(attempt, period),
            (attempt / period) as usize % count
        );
    }
}

/// Property: a rise scheduled inside the budget is found exactly there;
/// outside it the budget is spent and attempts never exceed it.
#[test_strategy::proptest(cases = 64)]
fn prop_search_finds_rise_within_budget(
    #[strategy(0u32..80)] rise_at: u32,
    #[strategy(1u32..80)] budget: u32,
    #[strategy(0u64..1_000)] initial: u64,
) {
    let result = tokio_test::block_on(async {
        let mut env = ScriptedEnvironment::running(initial).with_score_increase_at(rise_at);
        SearchController::new(&mut env, StrategyCatalog::reference().unwrap(), fast_params(budget))
            .unwrap()
            .seek()
            .await
            .unwrap()
    });

    prop_assert!(result.attempts <= budget);
    prop_assert_eq!(result.initial_score, initial);
    if rise_at < budget {
        prop_assert_eq!(result.outcome, SearchOutcome::Succeeded);
        prop_assert_eq!(result.attempts, rise_at);
        prop_assert!(result.final_score > result.initial_score);
    } else {
        prop_assert_eq!(result.outcome, SearchOutcome::Exhausted);
        prop_assert_eq!(result.attempts, budget);
        prop_assert_eq!(result.final_score, result.initial_score);
    }
}

/// Property: a stopped environment never ends the search early under the
/// default policy, and stopped_at lands on the first check boundary.
#[test_strategy::proptest(cases = 32)]
fn prop_default_policy_spends_budget_after_stop(
    #[strategy(0u32..40)] stop_at: u32,
    #[strategy(41u32..120)] budget: u32,
) {
    let result = tokio_test::block_on(async {
        let mut env = ScriptedEnvironment::running(0).with_stop_at(stop_at);
        SearchController::new(&mut env, StrategyCatalog::reference().unwrap(), fast_params(budget))
            .unwrap()
            .seek()
            .await
            .unwrap()
    });

    let first_check = (stop_at / 10) * 10 + 9;
    prop_assert_eq!(result.outcome, SearchOutcome::Exhausted);
    prop_assert_eq!(result.attempts, budget);
    prop_assert_eq!(result.stopped_at, Some(first_check));
}
