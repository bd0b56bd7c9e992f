use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::models::domain::{MessageResult, UserProfile, UserResult};

/// Response for the query-generation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub success: bool,
    pub text: String,
    #[serde(rename = "sampleData", skip_serializing_if = "Option::is_none")]
    pub sample_data: Option<SampleData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleData {
    pub profile: UserProfile,
    pub objective: String,
}

/// Either one generated message or a list of them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneratedMessages {
    Single(MessageResult),
    Bulk(Vec<MessageResult>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateMessagesResponse {
    pub success: bool,
    pub results: GeneratedMessages,
    #[serde(rename = "filePath", skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// Response for the full outreach pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutreachResponse {
    #[serde(rename = "runId")]
    pub run_id: String,
    pub query: Option<String>,
    pub profiles: Vec<UserResult>,
    pub messages: BTreeMap<String, String>,
    #[serde(rename = "backupSearchUsed")]
    pub backup_search_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendFailure {
    #[serde(rename = "linkedinUrl")]
    pub linkedin_url: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessagesResponse {
    pub success: bool,
    pub sent: usize,
    pub failed: Vec<SendFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
