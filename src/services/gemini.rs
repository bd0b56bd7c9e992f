use crate::core::prompts::{clean_query, message_prompt, query_prompt};
use crate::models::{UserProfile, UserResult};
use crate::services::error::ServiceError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const SERVICE: &str = "Gemini";

/// Turns a student profile and objective into a people-search phrase
#[async_trait]
pub trait QueryGenerator: Send + Sync {
    async fn generate_query(
        &self,
        profile: &UserProfile,
        objective: &str,
    ) -> Result<String, ServiceError>;
}

/// Drafts one outreach message for a search hit
#[async_trait]
pub trait MessageWriter: Send + Sync {
    async fn write_message(
        &self,
        profile: &UserProfile,
        objective: &str,
        target: &UserResult,
    ) -> Result<String, ServiceError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

/// Gemini `generateContent` client
///
/// Used for both search-query construction and message drafting.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        timeout_secs: u64,
    ) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;

        Ok(Self {
            base_url,
            api_key,
            model,
            client,
        })
    }

    /// Send one prompt and return the concatenated text of the first candidate
    pub async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, ServiceError> {
        if self.api_key.is_empty() {
            return Err(ServiceError::NotConfigured {
                service: SERVICE,
                message: "GEMINI_API_KEY is not set".to_string(),
            });
        }

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig { temperature },
        };

        tracing::debug!("Calling Gemini model {}", self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body)
                .unwrap_or_else(|| format!("Gemini request failed with status: {}", status.as_u16()));
            tracing::error!("Gemini API error {}: {}", status, message);
            return Err(ServiceError::from_status(SERVICE, status, message));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ServiceError::InvalidResponse {
                service: SERVICE,
                message: "response contained no text".to_string(),
            });
        }

        Ok(text)
    }
}

/// Pull `error.message` out of a Google API error body
fn error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(String::from)
}

#[async_trait]
impl QueryGenerator for GeminiClient {
    async fn generate_query(
        &self,
        profile: &UserProfile,
        objective: &str,
    ) -> Result<String, ServiceError> {
        let raw = self.generate(&query_prompt(profile, objective), 0.2).await?;
        let query = clean_query(&raw);
        tracing::info!("Generated search query: {}", query);
        Ok(query)
    }
}

#[async_trait]
impl MessageWriter for GeminiClient {
    async fn write_message(
        &self,
        profile: &UserProfile,
        objective: &str,
        target: &UserResult,
    ) -> Result<String, ServiceError> {
        let message = self
            .generate(&message_prompt(profile, objective, target), 0.7)
            .await?;
        Ok(message.trim().to_string())
    }
}
