//! Search controller behaviour against scripted and simulated environments.

mod common;

use common::{fast_params, setup_test_logging, small_grid};
use forage::adapters::{GridArcade, ScriptedEnvironment};
use forage::domain::models::{LifecycleControl, SearchOutcome, SearchParameters};
use forage::domain::ports::{ControlPort, ObservationPort};
use forage::services::{SearchController, StrategyCatalog};
use forage::DomainError;
use std::time::Duration;

fn reference() -> StrategyCatalog {
    StrategyCatalog::reference().unwrap()
}

#[tokio::test]
async fn test_score_rise_on_attempt_37_of_200() {
    setup_test_logging();
    let mut env = ScriptedEnvironment::running(20).with_score_increase_at(37);

    let result = SearchController::new(&mut env, reference(), fast_params(200))
        .unwrap()
        .seek()
        .await
        .unwrap();

    assert!(result.succeeded);
    assert_eq!(result.outcome, SearchOutcome::Succeeded);
    assert_eq!(result.attempts, 37);
    assert_eq!(result.initial_score, 20);
    assert!(result.final_score > result.initial_score);
    // attempt 37 falls in the second rotation window
    assert_eq!(result.strategy_used, "random-biased");
    assert_eq!(env.dispatched(), 38);
}

#[tokio::test]
async fn test_never_increasing_environment_exhausts_budget() {
    let mut env = ScriptedEnvironment::running(7);

    let result = SearchController::new(&mut env, reference(), fast_params(10))
        .unwrap()
        .seek()
        .await
        .unwrap();

    assert!(!result.succeeded);
    assert_eq!(result.outcome, SearchOutcome::Exhausted);
    assert_eq!(result.attempts, 10);
    assert_eq!(result.final_score, result.initial_score);
    assert_eq!(result.stopped_at, None);
    assert_eq!(env.moves().len(), 10);
}

#[tokio::test]
async fn test_stop_is_recorded_and_budget_spent_by_default() {
    let mut env = ScriptedEnvironment::running(0).with_stop_at(5);

    let result = SearchController::new(&mut env, reference(), fast_params(50))
        .unwrap()
        .seek()
        .await
        .unwrap();

    assert_eq!(result.outcome, SearchOutcome::Exhausted);
    assert_eq!(result.attempts, 50);
    assert_eq!(result.stopped_at, Some(9));
    assert_eq!(result.final_score, result.initial_score);
    assert_eq!(env.dispatched(), 50);
}

#[tokio::test]
async fn test_stop_aborts_when_configured() {
    let mut env = ScriptedEnvironment::running(0).with_stop_at(5);
    let params = SearchParameters {
        continue_on_stop: false,
        ..fast_params(50)
    };

    let result = SearchController::new(&mut env, reference(), params)
        .unwrap()
        .seek()
        .await
        .unwrap();

    assert_eq!(result.outcome, SearchOutcome::EnvironmentStopped);
    assert_eq!(result.attempts, 10);
    assert_eq!(result.stopped_at, Some(9));
    assert_eq!(env.dispatched(), 10);
}

#[tokio::test]
async fn test_success_wins_over_stop_in_same_step() {
    let mut env = ScriptedEnvironment::running(0)
        .with_score_increase_at(9)
        .with_stop_at(9);

    let result = SearchController::new(&mut env, reference(), fast_params(50))
        .unwrap()
        .seek()
        .await
        .unwrap();

    assert_eq!(result.outcome, SearchOutcome::Succeeded);
    assert_eq!(result.attempts, 9);
    assert_eq!(result.stopped_at, None);
}

#[tokio::test]
async fn test_rotation_cadence_over_150_attempts() {
    let catalog = reference();
    let mut env = ScriptedEnvironment::running(0);

    SearchController::new(&mut env, catalog.clone(), fast_params(150))
        .unwrap()
        .seek()
        .await
        .unwrap();

    assert_eq!(env.moves().len(), 150);
    for (attempt, mv) in (0u32..).zip(env.moves()) {
        let index = catalog.strategy_index_at(attempt, 15);
        assert_eq!(index, (attempt / 15) as usize % 5);
        assert_eq!(
            *mv,
            catalog.next_move(index, attempt),
            "unexpected move at attempt {attempt}"
        );
    }
}

#[tokio::test]
async fn test_missing_render_surface_does_not_stop_search() {
    let mut env = ScriptedEnvironment::running(0)
        .with_invalid_surface()
        .with_score_increase_at(12);

    let result = SearchController::new(&mut env, reference(), fast_params(40))
        .unwrap()
        .seek()
        .await
        .unwrap();

    assert_eq!(result.outcome, SearchOutcome::Succeeded);
    assert_eq!(result.attempts, 12);
}

#[tokio::test]
async fn test_slow_first_poll_does_not_fake_a_score_rise() {
    // the first poll outlives the timeout; the score never changes
    let mut env =
        ScriptedEnvironment::running(40).with_slow_polls(1, Duration::from_millis(200));
    let params = SearchParameters {
        observe_timeout: Duration::from_millis(20),
        ..fast_params(20)
    };

    let result = SearchController::new(&mut env, reference(), params)
        .unwrap()
        .seek()
        .await
        .unwrap();

    assert_eq!(result.outcome, SearchOutcome::Exhausted);
    assert_eq!(result.initial_score, 40);
    assert_eq!(result.final_score, 40);
    assert_eq!(result.attempts, 20);
    assert_eq!(result.degraded_polls, 0);
}

#[tokio::test]
async fn test_unreadable_baseline_fails_without_moving() {
    let mut env =
        ScriptedEnvironment::running(40).with_observe_delay(Duration::from_millis(100));
    let params = SearchParameters {
        observe_timeout: Duration::from_millis(5),
        ..fast_params(20)
    };

    let err = SearchController::new(&mut env, reference(), params)
        .unwrap()
        .seek()
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::BaselineUnavailable { .. }));
    assert!(env.moves().is_empty());
}

#[tokio::test]
async fn test_unreadable_poll_is_neither_rise_nor_stop() {
    // the unreadable poll lands on the first stop-check boundary
    let mut env = ScriptedEnvironment::running(0).with_unreadable_poll_after(9);
    let params = SearchParameters {
        continue_on_stop: false,
        ..fast_params(20)
    };

    let result = SearchController::new(&mut env, reference(), params)
        .unwrap()
        .seek()
        .await
        .unwrap();

    assert_eq!(result.outcome, SearchOutcome::Exhausted);
    assert_eq!(result.attempts, 20);
    assert_eq!(result.stopped_at, None);
    assert_eq!(result.degraded_polls, 1);
    assert_eq!(result.final_score, result.initial_score);
}

#[tokio::test]
async fn test_baseline_retries_past_timed_out_polls() {
    // three baseline polls time out before a readable one arrives
    let mut env = ScriptedEnvironment::running(40)
        .with_slow_polls(3, Duration::from_millis(100))
        .with_score_increase_at(5);
    let params = SearchParameters {
        observe_timeout: Duration::from_millis(10),
        ..fast_params(20)
    };

    let result = SearchController::new(&mut env, reference(), params)
        .unwrap()
        .seek()
        .await
        .unwrap();

    assert_eq!(result.outcome, SearchOutcome::Succeeded);
    assert_eq!(result.initial_score, 40);
    assert_eq!(result.attempts, 5);
    assert_eq!(result.final_score, 50);
    assert_eq!(result.degraded_polls, 0);
}

#[tokio::test]
async fn test_single_strategy_catalog_never_rotates() {
    let catalog = StrategyCatalog::from_kinds(&[forage::StrategyKind::Aggressive]).unwrap();
    let mut env = ScriptedEnvironment::running(0);

    let result = SearchController::new(&mut env, catalog, fast_params(60))
        .unwrap()
        .seek()
        .await
        .unwrap();

    assert_eq!(result.strategy_used, "aggressive");
    assert_eq!(result.attempts, 60);
}

#[tokio::test]
async fn test_simulator_target_directly_ahead() {
    let mut game = GridArcade::new(&small_grid(1)).unwrap();
    game.press(LifecycleControl::Start).await.unwrap();
    let (hx, hy) = game.head();
    game.place_target((hx + 1, hy));

    let result = SearchController::new(&mut game, reference(), fast_params(20))
        .unwrap()
        .seek()
        .await
        .unwrap();

    assert_eq!(result.outcome, SearchOutcome::Succeeded);
    assert_eq!(result.attempts, 0);
    assert_eq!(result.final_score, 10);
    assert_eq!(game.observe().await.high_score, 10);
}

#[tokio::test]
async fn test_simulator_collision_is_reported_as_stop() {
    // 10x10 grid: heading right from the centre hits the wall well before
    // the first stop check at attempt 9
    let mut game = GridArcade::new(&small_grid(1)).unwrap();
    game.press(LifecycleControl::Start).await.unwrap();
    game.place_target((0, 0));
    let catalog = StrategyCatalog::from_kinds(&[forage::StrategyKind::Aggressive]).unwrap();
    let params = SearchParameters {
        continue_on_stop: false,
        ..fast_params(100)
    };

    let result = SearchController::new(&mut game, catalog, params)
        .unwrap()
        .seek()
        .await
        .unwrap();

    assert!(game.observe().await.terminated);
    assert_eq!(result.outcome, SearchOutcome::EnvironmentStopped);
    assert_eq!(result.stopped_at, Some(9));
    assert_eq!(result.attempts, 10);
}
