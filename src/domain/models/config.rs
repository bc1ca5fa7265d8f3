use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::search::SearchParameters;
use super::strategy::StrategyKind;

/// Main configuration structure for forage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Search controller configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Lifecycle wait configuration
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Observation pacing
    #[serde(default)]
    pub pacing: PacingConfig,

    /// In-process simulator target
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// WebDriver browser target
    #[serde(default)]
    pub webdriver: WebDriverConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Search controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SearchConfig {
    /// Maximum attempts per search
    #[serde(default = "default_budget")]
    pub budget: u32,

    /// Attempts between strategy rotations
    #[serde(default = "default_rotation_period")]
    pub rotation_period: u32,

    /// Settle delay after each move, in milliseconds
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Attempts between running-flag checks
    #[serde(default = "default_stop_check_interval")]
    pub stop_check_interval: u32,

    /// Keep searching after the environment is seen stopped
    #[serde(default = "default_true")]
    pub continue_on_stop: bool,

    /// Upper bound on one observation poll, in milliseconds
    #[serde(default = "default_observe_timeout_ms")]
    pub observe_timeout_ms: u64,

    /// Strategy rotation order
    #[serde(default = "default_strategies")]
    pub strategies: Vec<StrategyKind>,
}

const fn default_budget() -> u32 {
    200
}

const fn default_rotation_period() -> u32 {
    15
}

const fn default_settle_ms() -> u64 {
    100
}

const fn default_stop_check_interval() -> u32 {
    10
}

const fn default_true() -> bool {
    true
}

const fn default_observe_timeout_ms() -> u64 {
    2000
}

fn default_strategies() -> Vec<StrategyKind> {
    StrategyKind::ALL.to_vec()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            budget: default_budget(),
            rotation_period: default_rotation_period(),
            settle_ms: default_settle_ms(),
            stop_check_interval: default_stop_check_interval(),
            continue_on_stop: default_true(),
            observe_timeout_ms: default_observe_timeout_ms(),
            strategies: default_strategies(),
        }
    }
}

impl SearchConfig {
    pub const fn to_parameters(&self) -> SearchParameters {
        SearchParameters {
            budget: self.budget,
            rotation_period: self.rotation_period,
            settle: Duration::from_millis(self.settle_ms),
            stop_check_interval: self.stop_check_interval,
            continue_on_stop: self.continue_on_stop,
            observe_timeout: Duration::from_millis(self.observe_timeout_ms),
        }
    }
}

/// Lifecycle poll-until-predicate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LifecycleConfig {
    /// Delay between polls while waiting, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Give up waiting after this long, in milliseconds
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
}

const fn default_poll_interval_ms() -> u64 {
    50
}

const fn default_wait_timeout_ms() -> u64 {
    5000
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            wait_timeout_ms: default_wait_timeout_ms(),
        }
    }
}

impl LifecycleConfig {
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub const fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }
}

/// Observation pacing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PacingConfig {
    /// Wrap targets in the rate-limited observer
    #[serde(default)]
    pub enabled: bool,

    /// Maximum observation polls per second
    #[serde(default = "default_max_observations_per_second")]
    pub max_observations_per_second: u32,
}

const fn default_max_observations_per_second() -> u32 {
    60
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_observations_per_second: default_max_observations_per_second(),
        }
    }
}

/// Simulated arcade configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulatorConfig {
    /// Grid width in cells
    #[serde(default = "default_grid_size")]
    pub width: u32,

    /// Grid height in cells
    #[serde(default = "default_grid_size")]
    pub height: u32,

    /// Seed for target placement
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Score awarded per consumed target
    #[serde(default = "default_points_per_target")]
    pub points_per_target: u64,
}

const fn default_grid_size() -> u32 {
    20
}

const fn default_seed() -> u64 {
    7
}

const fn default_points_per_target() -> u64 {
    10
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            width: default_grid_size(),
            height: default_grid_size(),
            seed: default_seed(),
            points_per_target: default_points_per_target(),
        }
    }
}

/// WebDriver target configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WebDriverConfig {
    /// WebDriver server endpoint (chromedriver, geckodriver)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// URL of the game page
    #[serde(default = "default_game_url")]
    pub game_url: String,

    /// Browser name requested in capabilities
    #[serde(default = "default_browser")]
    pub browser: String,

    /// Run the browser headless
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// CSS selectors for the observed and clicked elements
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// Pause button text while running
    #[serde(default = "default_pause_label")]
    pub pause_label: String,

    /// Pause button text while paused
    #[serde(default = "default_resume_label")]
    pub resume_label: String,

    /// Class present on the game-over element once terminated
    #[serde(default = "default_terminal_class")]
    pub terminal_class: String,
}

fn default_endpoint() -> String {
    "http://localhost:9515".to_string()
}

fn default_game_url() -> String {
    "http://localhost:8080/index.html".to_string()
}

fn default_browser() -> String {
    "chrome".to_string()
}

const fn default_request_timeout_ms() -> u64 {
    1500
}

fn default_pause_label() -> String {
    "Pause".to_string()
}

fn default_resume_label() -> String {
    "Resume".to_string()
}

fn default_terminal_class() -> String {
    "show".to_string()
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            game_url: default_game_url(),
            browser: default_browser(),
            headless: default_true(),
            request_timeout_ms: default_request_timeout_ms(),
            selectors: SelectorConfig::default(),
            pause_label: default_pause_label(),
            resume_label: default_resume_label(),
            terminal_class: default_terminal_class(),
        }
    }
}

/// CSS selectors of the game page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SelectorConfig {
    #[serde(default = "default_score_selector")]
    pub score: String,
    #[serde(default = "default_high_score_selector")]
    pub high_score: String,
    #[serde(default = "default_start_selector")]
    pub start_button: String,
    #[serde(default = "default_pause_selector")]
    pub pause_button: String,
    #[serde(default = "default_reset_selector")]
    pub reset_button: String,
    #[serde(default = "default_restart_selector")]
    pub restart_button: String,
    #[serde(default = "default_game_over_selector")]
    pub game_over: String,
    #[serde(default = "default_canvas_selector")]
    pub canvas: String,
}

fn default_score_selector() -> String {
    "#score".to_string()
}

fn default_high_score_selector() -> String {
    "#highScore".to_string()
}

fn default_start_selector() -> String {
    "#startBtn".to_string()
}

fn default_pause_selector() -> String {
    "#pauseBtn".to_string()
}

fn default_reset_selector() -> String {
    "#resetBtn".to_string()
}

fn default_restart_selector() -> String {
    "#restartBtn".to_string()
}

fn default_game_over_selector() -> String {
    "#gameOver".to_string()
}

fn default_canvas_selector() -> String {
    "#gameCanvas".to_string()
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            score: default_score_selector(),
            high_score: default_high_score_selector(),
            start_button: default_start_selector(),
            pause_button: default_pause_selector(),
            reset_button: default_reset_selector(),
            restart_button: default_restart_selector(),
            game_over: default_game_over_selector(),
            canvas: default_canvas_selector(),
        }
    }
}

impl SelectorConfig {
    /// Every selector paired with its field name, for validation.
    pub fn named(&self) -> [(&'static str, &str); 8] {
        [
            ("score", self.score.as_str()),
            ("high_score", self.high_score.as_str()),
            ("start_button", self.start_button.as_str()),
            ("pause_button", self.pause_button.as_str()),
            ("reset_button", self.reset_button.as_str()),
            ("restart_button", self.restart_button.as_str()),
            ("game_over", self.game_over.as_str()),
            ("canvas", self.canvas.as_str()),
        ]
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stderr only when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
