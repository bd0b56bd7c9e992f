use crate::core::messages::generate_sequentially;
use crate::core::search::{error_result, schools_for, search_with_fallback};
use crate::models::{UserProfile, UserResult};
use crate::services::{MessageWriter, PeopleSearch, QueryGenerator};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// What to search for and how many people to reach
#[derive(Debug, Clone)]
pub struct OutreachPlan {
    pub profile: UserProfile,
    pub objective: String,
    pub limit: usize,
    pub alumni_only: bool,
    pub additional_schools: Vec<String>,
}

/// Result of a full pipeline run
#[derive(Debug, Clone, Default)]
pub struct OutreachOutcome {
    pub query: Option<String>,
    pub profiles: Vec<UserResult>,
    pub messages: BTreeMap<String, String>,
    pub backup_used: bool,
    pub error: Option<String>,
}

/// Observer for incremental pipeline state
#[async_trait]
pub trait OutreachProgress: Send {
    async fn profiles_found(&mut self, _profiles: &[UserResult]) {}
    async fn message_updated(&mut self, _profile_id: &str, _message: &str) {}
}

#[async_trait]
impl OutreachProgress for () {}

/// Query generation, search with fallback, then sequential message drafting
#[derive(Clone)]
pub struct OutreachPipeline {
    generator: Arc<dyn QueryGenerator>,
    search: Arc<dyn PeopleSearch>,
    writer: Arc<dyn MessageWriter>,
}

impl OutreachPipeline {
    pub fn new(
        generator: Arc<dyn QueryGenerator>,
        search: Arc<dyn PeopleSearch>,
        writer: Arc<dyn MessageWriter>,
    ) -> Self {
        Self {
            generator,
            search,
            writer,
        }
    }

    pub async fn run<P>(&self, plan: &OutreachPlan, progress: &mut P) -> OutreachOutcome
    where
        P: OutreachProgress,
    {
        let query = match self
            .generator
            .generate_query(&plan.profile, &plan.objective)
            .await
        {
            Ok(query) => query,
            Err(e) => {
                tracing::error!("Query generation failed: {}", e);
                return Self::failed(None, e.to_string(), progress).await;
            }
        };

        let schools = schools_for(&plan.profile, plan.alumni_only, &plan.additional_schools);

        let found = match search_with_fallback(
            self.search.as_ref(),
            &query,
            &plan.profile.university_name,
            plan.limit,
            &schools,
        )
        .await
        {
            Ok(found) => found,
            Err(e) => {
                tracing::error!("Search failed for query '{}': {}", query, e);
                return Self::failed(Some(query), e.to_string(), progress).await;
            }
        };

        tracing::info!(
            "Found {} profiles for '{}' (backup search: {})",
            found.results.len(),
            query,
            found.backup_used
        );
        progress.profiles_found(&found.results).await;

        let messages = generate_sequentially(
            self.writer.as_ref(),
            &plan.profile,
            &plan.objective,
            &found.results,
            progress,
        )
        .await;

        OutreachOutcome {
            query: Some(query),
            profiles: found.results,
            messages,
            backup_used: found.backup_used,
            error: None,
        }
    }

    async fn failed<P: OutreachProgress>(
        query: Option<String>,
        error: String,
        progress: &mut P,
    ) -> OutreachOutcome {
        let profiles = vec![error_result(&error)];
        progress.profiles_found(&profiles).await;

        OutreachOutcome {
            query,
            profiles,
            messages: BTreeMap::new(),
            backup_used: false,
            error: Some(error),
        }
    }
}
