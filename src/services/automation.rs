use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur while driving the browser
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Automation server returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Session file error: {0}")]
    SessionFile(#[from] std::io::Error),

    #[error("Session file is not valid JSON: {0}")]
    SessionFormat(#[from] serde_json::Error),

    #[error("Timed out waiting for LinkedIn login after {attempts} checks")]
    LoginTimeout { attempts: u32 },

    #[error("An outreach run is already in progress")]
    Busy,
}

/// Browser cookie in the shape Playwright-based tools exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub expires: Option<f64>,
    #[serde(rename = "httpOnly", default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(rename = "sameSite", default)]
    pub same_site: Option<String>,
}

fn default_path() -> String {
    "/".to_string()
}

/// Primitive actions of an AI-driven browser
///
/// `act`, `observe` and `extract` take natural-language instructions that the
/// automation backend resolves against the live page.
#[async_trait]
pub trait BrowserAutomation: Send + Sync {
    async fn goto(&self, url: &str) -> Result<(), AutomationError>;
    async fn current_url(&self) -> Result<String, AutomationError>;
    async fn act(&self, action: &str) -> Result<(), AutomationError>;
    async fn observe(&self, instruction: &str) -> Result<Vec<String>, AutomationError>;
    async fn extract(&self, instruction: &str) -> Result<String, AutomationError>;
    async fn cookies(&self) -> Result<Vec<Cookie>, AutomationError>;
    async fn set_cookies(&self, cookies: &[Cookie]) -> Result<(), AutomationError>;
    async fn close(&self) -> Result<(), AutomationError>;
}

/// Client for a Stagehand-compatible automation server
///
/// A browser session is opened lazily on the first call and reused until
/// `close` is called.
pub struct StagehandClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
    session_id: Mutex<Option<String>>,
}

impl StagehandClient {
    /// Create a new automation client
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, AutomationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()),
            client,
            session_id: Mutex::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Return the current session id, starting a session if needed
    async fn session(&self) -> Result<String, AutomationError> {
        let mut guard = self.session_id.lock().await;
        if let Some(id) = guard.as_ref() {
            return Ok(id.clone());
        }

        let response = self
            .authorize(self.client.post(self.url("/sessions")))
            .json(&json!({}))
            .send()
            .await?;
        let body = read_json(response).await?;

        let id = body
            .get("sessionId")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AutomationError::InvalidResponse("Missing sessionId".into()))?
            .to_string();

        tracing::info!("Started browser session {}", id);
        *guard = Some(id.clone());
        Ok(id)
    }

    async fn post(&self, action: &str, payload: Value) -> Result<Value, AutomationError> {
        let id = self.session().await?;
        let response = self
            .authorize(self.client.post(self.url(&format!("/sessions/{}/{}", id, action))))
            .json(&payload)
            .send()
            .await?;
        read_json(response).await
    }

    async fn get(&self, resource: &str) -> Result<Value, AutomationError> {
        let id = self.session().await?;
        let response = self
            .authorize(self.client.get(self.url(&format!("/sessions/{}/{}", id, resource))))
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, AutomationError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
        return Err(AutomationError::ApiError(format!("{} - {}", status, body)));
    }
    Ok(response.json().await?)
}

fn string_field(body: &Value, field: &str) -> Result<String, AutomationError> {
    body.get(field)
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| AutomationError::InvalidResponse(format!("Missing {}", field)))
}

#[async_trait]
impl BrowserAutomation for StagehandClient {
    async fn goto(&self, url: &str) -> Result<(), AutomationError> {
        tracing::debug!("Navigating to {}", url);
        self.post("navigate", json!({ "url": url })).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, AutomationError> {
        let body = self.get("url").await?;
        string_field(&body, "url")
    }

    async fn act(&self, action: &str) -> Result<(), AutomationError> {
        tracing::debug!("Act: {}", action);
        let body = self.post("act", json!({ "action": action })).await?;

        if body.get("success").and_then(|v| v.as_bool()) == Some(false) {
            let message = body
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("action failed");
            return Err(AutomationError::ApiError(message.to_string()));
        }
        Ok(())
    }

    async fn observe(&self, instruction: &str) -> Result<Vec<String>, AutomationError> {
        let body = self.post("observe", json!({ "instruction": instruction })).await?;
        let observations = body
            .get("observations")
            .and_then(|v| v.as_array())
            .ok_or_else(|| AutomationError::InvalidResponse("Missing observations array".into()))?;

        Ok(observations
            .iter()
            .filter_map(|o| o.get("description").and_then(|d| d.as_str()))
            .map(String::from)
            .collect())
    }

    async fn extract(&self, instruction: &str) -> Result<String, AutomationError> {
        let body = self.post("extract", json!({ "instruction": instruction })).await?;
        string_field(&body, "extraction")
    }

    async fn cookies(&self) -> Result<Vec<Cookie>, AutomationError> {
        let body = self.get("cookies").await?;
        let cookies = body
            .get("cookies")
            .cloned()
            .ok_or_else(|| AutomationError::InvalidResponse("Missing cookies array".into()))?;
        Ok(serde_json::from_value(cookies)?)
    }

    async fn set_cookies(&self, cookies: &[Cookie]) -> Result<(), AutomationError> {
        self.post("cookies", json!({ "cookies": cookies })).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), AutomationError> {
        let mut guard = self.session_id.lock().await;
        if let Some(id) = guard.take() {
            let response = self
                .authorize(self.client.delete(self.url(&format!("/sessions/{}", id))))
                .send()
                .await?;
            if !response.status().is_success() {
                tracing::warn!("Failed to close browser session {}: {}", id, response.status());
            } else {
                tracing::info!("Closed browser session {}", id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_defaults() {
        let cookie: Cookie = serde_json::from_value(json!({
            "name": "li_at",
            "value": "abc",
            "domain": ".linkedin.com"
        }))
        .unwrap();
        assert_eq!(cookie.path, "/");
        assert!(!cookie.http_only);
    }

    #[test]
    fn test_client_creation() {
        let client = StagehandClient::new(
            "http://localhost:3100/".to_string(),
            Some(String::new()),
            30,
        )
        .unwrap();
        assert_eq!(client.url("/sessions"), "http://localhost:3100/sessions");
        assert!(client.api_key.is_none());
    }
}
