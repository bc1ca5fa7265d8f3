//! Minimal W3C WebDriver client.
//!
//! Covers only the commands forage needs: session management, navigation,
//! element lookup and reads, clicks, and key actions.

use reqwest::{Client as ReqwestClient, Method};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument};

use super::error::WebDriverError;

/// W3C web element identifier key.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// HTTP client bound to one WebDriver session.
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    http: ReqwestClient,
    endpoint: String,
    session_id: String,
}

impl WebDriverClient {
    fn build_http(timeout: Duration) -> Result<ReqwestClient, WebDriverError> {
        Ok(ReqwestClient::builder()
            .timeout(timeout)
            .tcp_nodelay(true)
            .build()?)
    }

    /// Create a new browser session with the given capabilities.
    #[instrument(skip(capabilities))]
    pub async fn new_session(
        endpoint: &str,
        capabilities: Value,
        timeout: Duration,
    ) -> Result<Self, WebDriverError> {
        let http = Self::build_http(timeout)?;
        let endpoint = endpoint.trim_end_matches('/').to_string();

        let response = http
            .post(format!("{endpoint}/session"))
            .json(&json!({ "capabilities": capabilities }))
            .send()
            .await?;
        let value = unwrap_value(response).await?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| WebDriverError::UnexpectedResponse("missing sessionId".to_string()))?
            .to_string();

        debug!(%session_id, "webdriver session created");
        Ok(Self {
            http,
            endpoint,
            session_id,
        })
    }

    /// Bind to an existing session.
    pub fn attach(
        endpoint: &str,
        session_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WebDriverError> {
        Ok(Self {
            http: Self::build_http(timeout)?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            session_id: session_id.into(),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a session-scoped command and return its `value` payload.
    async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, WebDriverError> {
        let url = format!("{}/session/{}{}", self.endpoint, self.session_id, path);
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        unwrap_value(response).await
    }

    pub async fn navigate(&self, url: &str) -> Result<(), WebDriverError> {
        self.command(Method::POST, "/url", Some(json!({ "url": url })))
            .await
            .map(drop)
    }

    /// Locate one element by CSS selector and return its id.
    pub async fn find_element(&self, css: &str) -> Result<String, WebDriverError> {
        let value = self
            .command(
                Method::POST,
                "/element",
                Some(json!({ "using": "css selector", "value": css })),
            )
            .await?;

        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| WebDriverError::UnexpectedResponse(format!("no element id for {css}")))
    }

    pub async fn element_text(&self, element: &str) -> Result<String, WebDriverError> {
        let value = self
            .command(Method::GET, &format!("/element/{element}/text"), None)
            .await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| WebDriverError::UnexpectedResponse("text is not a string".to_string()))
    }

    pub async fn element_enabled(&self, element: &str) -> Result<bool, WebDriverError> {
        let value = self
            .command(Method::GET, &format!("/element/{element}/enabled"), None)
            .await?;
        value
            .as_bool()
            .ok_or_else(|| WebDriverError::UnexpectedResponse("enabled is not a bool".to_string()))
    }

    /// Attribute value, `None` when the attribute is absent.
    pub async fn element_attribute(
        &self,
        element: &str,
        name: &str,
    ) -> Result<Option<String>, WebDriverError> {
        let value = self
            .command(
                Method::GET,
                &format!("/element/{element}/attribute/{name}"),
                None,
            )
            .await?;
        Ok(value.as_str().map(str::to_string))
    }

    pub async fn element_property(
        &self,
        element: &str,
        name: &str,
    ) -> Result<Value, WebDriverError> {
        self.command(
            Method::GET,
            &format!("/element/{element}/property/{name}"),
            None,
        )
        .await
    }

    pub async fn click(&self, element: &str) -> Result<(), WebDriverError> {
        self.command(
            Method::POST,
            &format!("/element/{element}/click"),
            Some(json!({})),
        )
        .await
        .map(drop)
    }

    /// Press and release a single key through the actions API.
    pub async fn send_key(&self, key: &str) -> Result<(), WebDriverError> {
        let actions = json!({
            "actions": [{
                "type": "key",
                "id": "keyboard",
                "actions": [
                    { "type": "keyDown", "value": key },
                    { "type": "keyUp", "value": key }
                ]
            }]
        });
        self.command(Method::POST, "/actions", Some(actions))
            .await
            .map(drop)
    }

    pub async fn delete_session(&self) -> Result<(), WebDriverError> {
        self.command(Method::DELETE, "", None).await.map(drop)
    }
}

/// Extract `value` from a WebDriver response, mapping W3C error payloads.
async fn unwrap_value(response: reqwest::Response) -> Result<Value, WebDriverError> {
    let status = response.status();
    let body: Value = response.json().await?;
    let value = body.get("value").cloned().unwrap_or(Value::Null);

    if !status.is_success() {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        return Err(WebDriverError::Command {
            status: status.as_u16(),
            error: field("error"),
            message: field("message"),
        });
    }

    Ok(value)
}
