use crate::models::{Profile, SearchResponse, UserProfile, UserResult};
use crate::services::{PeopleSearch, QueryGenerator, SearchParams, ServiceError};
use std::collections::HashSet;

/// Results of a search that may have needed a broadened second call
#[derive(Debug, Clone)]
pub struct FallbackOutcome {
    pub results: Vec<UserResult>,
    pub backup_used: bool,
}

/// School filter for a search
///
/// Alumni-only searches lead with the student's own university. Blank and
/// repeated names (case-insensitive) are dropped.
pub fn schools_for(profile: &UserProfile, alumni_only: bool, additional: &[String]) -> Vec<String> {
    let own = alumni_only.then(|| profile.university_name.clone());

    let mut seen = HashSet::new();
    own.into_iter()
        .chain(additional.iter().cloned())
        .map(|school| school.trim().to_string())
        .filter(|school| !school.is_empty())
        .filter(|school| seen.insert(school.to_lowercase()))
        .collect()
}

pub fn broaden_query(query: &str, university: &str) -> String {
    format!("{} OR {} alumni", query.trim(), university.trim())
}

/// Concatenate two result lists keeping only the first hit per profile id
pub fn merge_results(primary: Vec<UserResult>, backup: Vec<UserResult>) -> Vec<UserResult> {
    let mut seen = HashSet::new();
    primary
        .into_iter()
        .chain(backup)
        .filter(|result| seen.insert(result.profile.id.clone()))
        .collect()
}

/// Search once, and once more with a broadened query if too few came back
pub async fn search_with_fallback(
    search: &dyn PeopleSearch,
    query: &str,
    university: &str,
    limit: usize,
    schools: &[String],
) -> Result<FallbackOutcome, ServiceError> {
    let first = search
        .search(&SearchParams {
            query: query.to_string(),
            limit,
            schools: schools.to_vec(),
        })
        .await?;

    let mut results = merge_results(first.results, Vec::new());

    if results.len() >= limit {
        results.truncate(limit);
        return Ok(FallbackOutcome {
            results,
            backup_used: false,
        });
    }

    let backup_query = broaden_query(query, university);
    tracing::info!(
        "Only {} of {} results, running backup search: {}",
        results.len(),
        limit,
        backup_query
    );

    let backup = search
        .search(&SearchParams {
            query: backup_query,
            limit,
            schools: schools.to_vec(),
        })
        .await?;

    let mut results = merge_results(results, backup.results);
    results.truncate(limit);

    Ok(FallbackOutcome {
        results,
        backup_used: true,
    })
}

/// Generate (or reuse) a query and search the student's schools with it
pub async fn search_users_with_ai(
    generator: &dyn QueryGenerator,
    search: &dyn PeopleSearch,
    profile: &UserProfile,
    objective: &str,
    limit: usize,
    additional_schools: &[String],
    generated_query: Option<&str>,
) -> Result<SearchResponse, ServiceError> {
    let query = match generated_query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => query.to_string(),
        None => generator.generate_query(profile, objective).await?,
    };

    let params = SearchParams {
        query: query.clone(),
        limit,
        schools: schools_for(profile, true, additional_schools),
    };

    let mut response = search.search(&params).await?;
    if response.query.is_empty() {
        response.query = query;
    }
    Ok(response)
}

/// Placeholder card standing in for results when the search pipeline fails
pub fn error_result(message: &str) -> UserResult {
    UserResult {
        profile: Profile {
            id: "error".to_string(),
            name: "Error".to_string(),
            headline: "Search failed".to_string(),
            description: message.to_string(),
            ..Default::default()
        },
        experience: Vec::new(),
        education: Vec::new(),
    }
}
