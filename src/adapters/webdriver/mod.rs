//! WebDriver adapter for the browser-hosted game.

pub mod client;
pub mod environment;
pub mod error;

pub use client::WebDriverClient;
pub use environment::WebDriverEnvironment;
pub use error::WebDriverError;
