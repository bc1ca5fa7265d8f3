use thiserror::Error;

use crate::domain::errors::DomainError;

/// Errors that can occur when talking to a WebDriver server
#[derive(Error, Debug)]
pub enum WebDriverError {
    /// Network error occurred during request
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The server answered with a W3C error payload
    #[error("WebDriver command failed ({status}): {error}: {message}")]
    Command {
        status: u16,
        error: String,
        message: String,
    },

    /// The response parsed but did not have the expected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl WebDriverError {
    /// Whether the error means the element simply is not on the page.
    pub fn is_no_such_element(&self) -> bool {
        matches!(self, Self::Command { error, .. } if error == "no such element")
    }
}

impl From<WebDriverError> for DomainError {
    fn from(err: WebDriverError) -> Self {
        Self::Transport(err.to_string())
    }
}
