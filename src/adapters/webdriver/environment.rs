//! Browser game driven over WebDriver.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use super::client::WebDriverClient;
use super::error::WebDriverError;
use crate::domain::errors::DomainResult;
use crate::domain::models::{
    Direction, InputFamily, LifecycleControl, Move, Observation, WebDriverConfig,
};
use crate::domain::ports::{ActionPort, ControlPort, ObservationPort};

/// WebDriver key code (or literal character) for a move.
pub const fn key_code(mv: Move) -> &'static str {
    match (mv.family, mv.direction) {
        (InputFamily::Arrow, Direction::Left) => "\u{E012}",
        (InputFamily::Arrow, Direction::Up) => "\u{E013}",
        (InputFamily::Arrow, Direction::Right) => "\u{E014}",
        (InputFamily::Arrow, Direction::Down) => "\u{E015}",
        (InputFamily::Letter, Direction::Up) => "w",
        (InputFamily::Letter, Direction::Left) => "a",
        (InputFamily::Letter, Direction::Down) => "s",
        (InputFamily::Letter, Direction::Right) => "d",
    }
}

/// Pull the digits out of a score display such as `"Score: 120"`.
pub fn parse_score(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Session capabilities for the configured browser.
pub fn capabilities(config: &WebDriverConfig) -> Value {
    let mut always_match = json!({ "browserName": config.browser });
    if config.headless {
        always_match["goog:chromeOptions"] = json!({ "args": ["--headless=new", "--window-size=1280,900"] });
        always_match["moz:firefoxOptions"] = json!({ "args": ["-headless"] });
    }
    json!({ "alwaysMatch": always_match })
}

/// The browser-hosted game behind every environment port.
pub struct WebDriverEnvironment {
    client: WebDriverClient,
    config: WebDriverConfig,
}

impl WebDriverEnvironment {
    /// Open a browser session and load the game page.
    pub async fn connect(config: WebDriverConfig) -> Result<Self, WebDriverError> {
        let client = WebDriverClient::new_session(
            &config.endpoint,
            capabilities(&config),
            Duration::from_millis(config.request_timeout_ms),
        )
        .await?;
        client.navigate(&config.game_url).await?;
        info!(
            session_id = client.session_id(),
            url = %config.game_url,
            "game page loaded"
        );
        Ok(Self { client, config })
    }

    /// Wrap an already-initialised client.
    pub const fn with_client(client: WebDriverClient, config: WebDriverConfig) -> Self {
        Self { client, config }
    }

    pub const fn client(&self) -> &WebDriverClient {
        &self.client
    }

    /// End the browser session.
    pub async fn close(self) -> Result<(), WebDriverError> {
        self.client.delete_session().await
    }

    async fn read_text(&self, css: &str) -> Result<String, WebDriverError> {
        let element = self.client.find_element(css).await?;
        self.client.element_text(&element).await
    }

    async fn read_number(&self, css: &str) -> Result<u64, WebDriverError> {
        let text = self.read_text(css).await?;
        parse_score(&text).ok_or_else(|| {
            WebDriverError::UnexpectedResponse(format!("no digits in '{}'", text.trim()))
        })
    }

    async fn read_enabled(&self, css: &str) -> Result<bool, WebDriverError> {
        let element = self.client.find_element(css).await?;
        self.client.element_enabled(&element).await
    }

    async fn has_class(&self, css: &str, class: &str) -> Result<bool, WebDriverError> {
        let element = self.client.find_element(css).await?;
        let classes = self.client.element_attribute(&element, "class").await?;
        Ok(classes.is_some_and(|c| c.split_whitespace().any(|c| c == class)))
    }

    async fn surface_valid(&self, css: &str) -> Result<bool, WebDriverError> {
        let element = self.client.find_element(css).await?;
        let width = self.client.element_property(&element, "width").await?;
        let height = self.client.element_property(&element, "height").await?;
        let positive = |v: &Value| v.as_f64().is_some_and(|n| n > 0.0);
        Ok(positive(&width) && positive(&height))
    }
}

/// Log a failed read and fall back to `fallback`, marking the snapshot
/// unreadable.
fn reading<T>(
    field: &str,
    result: Result<T, WebDriverError>,
    fallback: T,
    valid: &mut bool,
) -> T {
    result.unwrap_or_else(|err| {
        debug!(field, error = %err, "observation read failed");
        *valid = false;
        fallback
    })
}

#[async_trait]
impl ObservationPort for WebDriverEnvironment {
    async fn observe(&self) -> Observation {
        let selectors = &self.config.selectors;

        let render_surface_valid = self
            .surface_valid(&selectors.canvas)
            .await
            .unwrap_or_else(|err| {
                debug!(field = "canvas", error = %err, "observation read failed");
                false
            });

        let mut readings_valid = true;
        let score = reading(
            "score",
            self.read_number(&selectors.score).await,
            0,
            &mut readings_valid,
        );
        let high_score = reading(
            "high_score",
            self.read_number(&selectors.high_score).await,
            0,
            &mut readings_valid,
        );
        // start button is disabled while a run is in progress
        let start_enabled = reading(
            "start_button",
            self.read_enabled(&selectors.start_button).await,
            true,
            &mut readings_valid,
        );
        let pause_label = reading(
            "pause_button",
            self.read_text(&selectors.pause_button).await,
            String::new(),
            &mut readings_valid,
        );
        let terminated = reading(
            "game_over",
            self.has_class(&selectors.game_over, &self.config.terminal_class)
                .await,
            false,
            &mut readings_valid,
        );

        Observation {
            score,
            high_score,
            running: !start_enabled,
            paused: pause_label.trim() == self.config.resume_label,
            render_surface_valid,
            terminated,
            readings_valid,
        }
    }
}

#[async_trait]
impl ActionPort for WebDriverEnvironment {
    async fn dispatch(&mut self, mv: Move) -> DomainResult<()> {
        self.client.send_key(key_code(mv)).await?;
        Ok(())
    }
}

#[async_trait]
impl ControlPort for WebDriverEnvironment {
    async fn press(&mut self, control: LifecycleControl) -> DomainResult<()> {
        let selectors = &self.config.selectors;
        let css = match control {
            LifecycleControl::Start => &selectors.start_button,
            LifecycleControl::PauseToggle => &selectors.pause_button,
            LifecycleControl::Reset => &selectors.reset_button,
            LifecycleControl::Restart => &selectors.restart_button,
        };
        let element = self.client.find_element(css).await?;
        self.client.click(&element).await?;
        Ok(())
    }
}
