use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{OutreachMessage, UserProfile, UserResult};

/// Request to turn a profile and objective into a search phrase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(rename = "userProfile")]
    pub user_profile: Option<UserProfile>,
    #[serde(rename = "userObjective")]
    pub user_objective: Option<String>,
}

/// Request for an AI-assisted people search
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[serde(rename = "userProfile")]
    pub user_profile: Option<UserProfile>,
    #[serde(rename = "userObjective")]
    pub user_objective: Option<String>,
    #[validate(range(min = 1))]
    pub limit: Option<u16>,
    #[serde(rename = "additionalSchools", default)]
    pub additional_schools: Option<Vec<String>>,
    #[serde(rename = "generatedQuery", default)]
    pub generated_query: Option<String>,
}

/// Request to draft outreach messages
///
/// Three modes: single (first selected profile), bulk (every selected
/// profile) and auto-generate-all (every profile, archived to a file).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateMessagesRequest {
    #[serde(rename = "userProfile")]
    pub user_profile: Option<UserProfile>,
    #[serde(rename = "userObjective")]
    pub user_objective: Option<String>,
    #[serde(rename = "selectedProfiles", default)]
    pub selected_profiles: Option<Vec<UserResult>>,
    #[serde(rename = "bulkGenerate", default)]
    pub bulk_generate: bool,
    #[serde(rename = "autoGenerateAll", default)]
    pub auto_generate_all: bool,
    #[serde(rename = "allProfiles", default)]
    pub all_profiles: Vec<UserResult>,
}

/// Request to run the full search-and-draft pipeline
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OutreachRequest {
    #[serde(rename = "userProfile", default)]
    pub user_profile: Option<UserProfile>,
    #[validate(length(min = 1))]
    pub prompt: String,
    #[validate(range(min = 1))]
    pub limit: Option<u16>,
    #[serde(rename = "alumniOnly", default = "default_alumni_only")]
    pub alumni_only: bool,
    #[serde(rename = "additionalSchools", default)]
    pub additional_schools: Vec<String>,
}

fn default_alumni_only() -> bool {
    true
}

/// Request to send messages through LinkedIn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessagesRequest {
    #[serde(default)]
    pub messages: Vec<OutreachMessage>,
}
