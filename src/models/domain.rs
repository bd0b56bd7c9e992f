use crate::core::is_finished_message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// The student running the outreach
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "universityName", default)]
    pub university_name: String,
    #[serde(rename = "fullName", default)]
    pub full_name: String,
    #[serde(rename = "gradeYear", default)]
    pub grade_year: String,
    #[serde(default, deserialize_with = "list_or_lines")]
    pub clubs: Vec<String>,
    #[serde(default, deserialize_with = "list_or_lines")]
    pub societies: Vec<String>,
    #[serde(default)]
    pub location: String,
}

impl UserProfile {
    /// JSON name of the first required text field left empty, if any
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("universityName", &self.university_name),
            ("fullName", &self.full_name),
            ("gradeYear", &self.grade_year),
            ("location", &self.location),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrLines {
    List(Vec<String>),
    Lines(String),
}

/// Accepts either a JSON array or one newline-separated string
fn list_or_lines<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<ListOrLines>::deserialize(deserializer)? {
        Some(ListOrLines::List(items)) => clean_items(items),
        Some(ListOrLines::Lines(text)) => parse_lines(&text),
        None => Vec::new(),
    })
}

/// Split free text into one entry per non-blank line
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

fn clean_items(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Person-level attributes of a search hit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub headline: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub profile_picture_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub linkedin_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company_name: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default)]
    pub company_logo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub degree: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub field_of_study: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub school_name: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub school_logo: Option<String>,
}

/// One search hit: profile plus its work and school history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserResult {
    pub profile: Profile,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
}

impl UserResult {
    pub fn id(&self) -> &str {
        &self.profile.id
    }
}

/// Body returned by the people-search service and by `/api/linkd-search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<UserResult>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// A finished message ready to be sent through LinkedIn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutreachMessage {
    #[serde(rename = "linkedinUrl")]
    pub linkedin_url: String,
    pub body: String,
}

/// Generated message paired with the profile it was written for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResult {
    pub profile: UserResult,
    pub message: String,
}

/// Archived output of an auto-generate-all run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagesCollection {
    #[serde(rename = "userProfile")]
    pub user_profile: UserProfile,
    pub objective: String,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
    pub messages: Vec<SavedMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedMessage {
    #[serde(rename = "profileId")]
    pub profile_id: String,
    pub name: String,
    #[serde(rename = "linkedinURL")]
    pub linkedin_url: String,
    #[serde(rename = "coldMessage")]
    pub cold_message: String,
}

impl From<&MessageResult> for SavedMessage {
    fn from(result: &MessageResult) -> Self {
        Self {
            profile_id: result.profile.profile.id.clone(),
            name: result.profile.profile.name.clone(),
            linkedin_url: result.profile.profile.linkedin_url.clone(),
            cold_message: result.message.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStatus {
    Pending,
    Sent,
    Failed,
}

/// Form and results state kept between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiState {
    #[serde(rename = "userProfile", default)]
    pub user_profile: Option<UserProfile>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_ui_limit")]
    pub limit: u16,
    #[serde(rename = "alumniOnly", default = "default_true")]
    pub alumni_only: bool,
    #[serde(default)]
    pub profiles: Vec<UserResult>,
    #[serde(rename = "generatedMessages", default)]
    pub generated_messages: BTreeMap<String, String>,
    #[serde(rename = "sendStatus", default)]
    pub send_status: BTreeMap<String, SendStatus>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            user_profile: None,
            prompt: String::new(),
            limit: default_ui_limit(),
            alumni_only: true,
            profiles: Vec::new(),
            generated_messages: BTreeMap::new(),
            send_status: BTreeMap::new(),
            updated_at: None,
        }
    }
}

impl UiState {
    /// Pair every displayed profile with its drafted message
    ///
    /// Placeholders and failure strings are never sent.
    pub fn outreach_messages(&self) -> Vec<OutreachMessage> {
        self.profiles
            .iter()
            .filter(|result| !result.profile.linkedin_url.is_empty())
            .filter_map(|result| {
                self.generated_messages
                    .get(result.id())
                    .filter(|body| is_finished_message(body))
                    .map(|body| OutreachMessage {
                        linkedin_url: result.profile.linkedin_url.clone(),
                        body: body.clone(),
                    })
            })
            .collect()
    }
}

fn default_ui_limit() -> u16 { 5 }
fn default_true() -> bool { true }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ERROR_MESSAGE, FAILED_MESSAGE, PLACEHOLDER_MESSAGE};

    #[test]
    fn test_clubs_from_lines_and_array_match() {
        let from_lines: UserProfile = serde_json::from_value(serde_json::json!({
            "universityName": "USC",
            "fullName": "John Doe",
            "gradeYear": "Senior",
            "clubs": "Lavalab\n  Startup Incubator \n\n",
            "societies": "BAP",
            "location": "Los Angeles"
        }))
        .unwrap();

        let from_array: UserProfile = serde_json::from_value(serde_json::json!({
            "universityName": "USC",
            "fullName": "John Doe",
            "gradeYear": "Senior",
            "clubs": ["Lavalab", "Startup Incubator"],
            "societies": ["BAP"],
            "location": "Los Angeles"
        }))
        .unwrap();

        assert_eq!(from_lines, from_array);
        assert_eq!(from_lines.clubs, vec!["Lavalab", "Startup Incubator"]);
    }

    #[test]
    fn test_missing_field_reports_json_name() {
        let profile = UserProfile {
            university_name: "USC".to_string(),
            full_name: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(profile.missing_field(), Some("fullName"));
    }

    #[test]
    fn test_profile_nulls_decode_to_empty() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name": "Jane",
            "headline": null
        }))
        .unwrap();
        assert_eq!(profile.headline, "");
        assert_eq!(profile.linkedin_url, "");
    }

    #[test]
    fn test_outreach_messages_skip_profiles_without_url() {
        let mut state = UiState::default();
        state.profiles = vec![
            UserResult {
                profile: Profile {
                    id: "a".to_string(),
                    linkedin_url: "https://linkedin.com/in/a".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
            UserResult {
                profile: Profile { id: "b".to_string(), ..Default::default() },
                ..Default::default()
            },
        ];
        state.generated_messages.insert("a".to_string(), "hi a".to_string());
        state.generated_messages.insert("b".to_string(), "hi b".to_string());

        let messages = state.outreach_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body, "hi a");
    }

    #[test]
    fn test_outreach_messages_skip_unfinished_drafts() {
        let mut state = UiState::default();
        state.profiles = ["a", "b", "c", "d"]
            .iter()
            .map(|id| UserResult {
                profile: Profile {
                    id: id.to_string(),
                    linkedin_url: format!("https://www.linkedin.com/in/{}", id),
                    ..Default::default()
                },
                ..Default::default()
            })
            .collect();
        state.generated_messages.insert("a".to_string(), FAILED_MESSAGE.to_string());
        state.generated_messages.insert("b".to_string(), PLACEHOLDER_MESSAGE.to_string());
        state.generated_messages.insert("c".to_string(), ERROR_MESSAGE.to_string());
        state.generated_messages.insert("d".to_string(), "Hi d".to_string());

        let messages = state.outreach_messages();
        assert_eq!(
            messages,
            vec![OutreachMessage {
                linkedin_url: "https://www.linkedin.com/in/d".to_string(),
                body: "Hi d".to_string(),
            }]
        );
    }
}
