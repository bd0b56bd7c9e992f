use crate::models::SearchResponse;
use crate::services::error::ServiceError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

const SERVICE: &str = "Linkd";

/// Parameters of one people-search call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchParams {
    pub query: String,
    pub limit: usize,
    pub schools: Vec<String>,
}

impl SearchParams {
    /// Encoded query string in the order Linkd expects
    pub fn to_query_string(&self) -> String {
        let mut pairs = vec![format!("query={}", urlencoding::encode(&self.query))];

        if self.limit > 0 {
            pairs.push(format!("limit={}", self.limit));
        }

        for school in &self.schools {
            pairs.push(format!("school={}", urlencoding::encode(school)));
        }

        pairs.join("&")
    }
}

/// People-search backend
#[async_trait]
pub trait PeopleSearch: Send + Sync {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, ServiceError>;
}

/// Linkd search API client
pub struct LinkdClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl LinkdClient {
    /// Create a new Linkd client; requests are unauthenticated without a key
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;

        Ok(Self {
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()),
            client,
        })
    }
}

#[async_trait]
impl PeopleSearch for LinkdClient {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, ServiceError> {
        let url = format!(
            "{}/search/users?{}",
            self.base_url.trim_end_matches('/'),
            params.to_query_string()
        );

        tracing::debug!("Searching Linkd: {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("Content-Type", "application/json");

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_detail(status, &body);
            tracing::error!("Linkd search failed {}: {}", status, message);
            return Err(ServiceError::from_status(SERVICE, status, message));
        }

        let results: SearchResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;

        tracing::debug!(
            "Linkd returned {} results (total: {})",
            results.results.len(),
            results.total
        );

        Ok(results)
    }
}

/// Readable detail from a failed Linkd response body
fn error_detail(status: StatusCode, body: &str) -> String {
    let json: Option<Value> = serde_json::from_str(body).ok();

    if status == StatusCode::UNAUTHORIZED {
        return json
            .as_ref()
            .and_then(|j| j.get("detail"))
            .and_then(|d| d.as_str())
            .map(String::from)
            .unwrap_or_else(|| "Invalid or expired API key".to_string());
    }

    match json {
        Some(json) => ["error", "detail", "message"]
            .iter()
            .find_map(|key| json.get(*key).and_then(|v| v.as_str()).map(String::from))
            .unwrap_or_else(|| json.to_string()),
        None => format!("Request failed with status: {}", status.as_u16()),
    }
}
