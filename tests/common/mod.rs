// Shared fakes for the service's external collaborators
#![allow(dead_code)]

use alumni_connect::config::SearchSettings;
use alumni_connect::core::{LoginPolicy, OutreachDispatcher};
use alumni_connect::models::{Experience, Profile, SearchResponse, UserProfile, UserResult};
use alumni_connect::routes::AppState;
use alumni_connect::services::{
    AutomationError, BrowserAutomation, Cookie, MessageArchive, MessageWriter, PeopleSearch,
    QueryGenerator, SearchParams, ServiceError, SessionStore, StateStore,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn student() -> UserProfile {
    UserProfile {
        university_name: "USC".to_string(),
        full_name: "John Doe".to_string(),
        grade_year: "Senior".to_string(),
        clubs: vec!["Lavalab".to_string(), "Startup Incubator".to_string()],
        societies: vec!["BAP".to_string()],
        location: "Los Angeles".to_string(),
    }
}

pub fn person(id: &str) -> UserResult {
    UserResult {
        profile: Profile {
            id: id.to_string(),
            name: format!("Person {}", id),
            headline: "Software Engineer".to_string(),
            title: "Software Engineer at Google".to_string(),
            linkedin_url: format!("https://www.linkedin.com/in/{}", id),
            ..Default::default()
        },
        experience: vec![Experience {
            title: "Software Engineer".to_string(),
            company_name: "Google".to_string(),
            ..Default::default()
        }],
        education: vec![],
    }
}

pub fn people(ids: &[&str]) -> Vec<UserResult> {
    ids.iter().map(|id| person(id)).collect()
}

pub fn ids(results: &[UserResult]) -> Vec<String> {
    results.iter().map(|r| r.profile.id.clone()).collect()
}

/// Query generator returning a fixed phrase, or failing when `query` is None
pub struct FakeGenerator {
    pub query: Option<String>,
    pub calls: AtomicUsize,
}

impl FakeGenerator {
    pub fn returning(query: &str) -> Arc<Self> {
        Arc::new(Self {
            query: Some(query.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            query: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryGenerator for FakeGenerator {
    async fn generate_query(
        &self,
        _profile: &UserProfile,
        _objective: &str,
    ) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.query.clone().ok_or_else(|| ServiceError::Upstream {
            service: "Gemini",
            status: 500,
            message: "model overloaded".to_string(),
        })
    }
}

pub enum Scripted {
    Results(Vec<UserResult>),
    Fail(&'static str),
}

/// Search backend answering from a queue, recording every call
pub struct FakeSearch {
    script: Mutex<VecDeque<Scripted>>,
    pub calls: Mutex<Vec<SearchParams>>,
}

impl FakeSearch {
    pub fn new(script: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<SearchParams> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PeopleSearch for FakeSearch {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, ServiceError> {
        self.calls.lock().unwrap().push(params.clone());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Results(results)) => Ok(SearchResponse {
                total: results.len(),
                results,
                query: params.query.clone(),
                error: None,
            }),
            Some(Scripted::Fail(message)) => Err(ServiceError::Auth {
                service: "Linkd",
                message: message.to_string(),
            }),
            None => Ok(SearchResponse {
                query: params.query.clone(),
                ..Default::default()
            }),
        }
    }
}

#[derive(Clone, Copy)]
pub enum WriterFailure {
    Upstream,
    Network,
}

/// Message writer that tracks call order and concurrency
pub struct FakeWriter {
    failures: HashMap<String, WriterFailure>,
    pub calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeWriter {
    pub fn new() -> Arc<Self> {
        Self::failing_for(&[])
    }

    pub fn failing_for(failures: &[(&str, WriterFailure)]) -> Arc<Self> {
        Arc::new(Self {
            failures: failures
                .iter()
                .map(|(id, kind)| (id.to_string(), *kind))
                .collect(),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageWriter for FakeWriter {
    async fn write_message(
        &self,
        _profile: &UserProfile,
        _objective: &str,
        target: &UserResult,
    ) -> Result<String, ServiceError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().unwrap().push(target.profile.id.clone());

        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.failures.get(&target.profile.id) {
            Some(WriterFailure::Upstream) => Err(ServiceError::Upstream {
                service: "Gemini",
                status: 500,
                message: "internal".to_string(),
            }),
            Some(WriterFailure::Network) => Err(ServiceError::Network {
                service: "Gemini",
                message: "connection reset".to_string(),
            }),
            None => Ok(format!("Hi {}!", target.profile.name)),
        }
    }
}

/// Browser whose login state flips to signed-in from a given URL check onward
pub struct FakeBrowser {
    logged_in_from_check: Option<usize>,
    pub url_checks: AtomicUsize,
    pub visited: Mutex<Vec<String>>,
    pub acts: Mutex<Vec<String>>,
    pub restored: Mutex<Vec<Cookie>>,
    pub extract_calls: AtomicUsize,
    fail_on_url: Option<String>,
    page: Option<(String, String)>,
}

impl FakeBrowser {
    pub fn never_logged_in() -> Arc<Self> {
        Self::build(None, None)
    }

    pub fn logged_in_from(check: usize) -> Arc<Self> {
        Self::build(Some(check), None)
    }

    pub fn failing_on(check: usize, url: &str) -> Arc<Self> {
        Self::build(Some(check), Some(url.to_string()))
    }

    /// Stays on `url`; `extract` answers with `extraction`
    pub fn on_page(url: &str, extraction: &str) -> Arc<Self> {
        let mut browser = Self::unshared(None, None);
        browser.page = Some((url.to_string(), extraction.to_string()));
        Arc::new(browser)
    }

    fn build(logged_in_from_check: Option<usize>, fail_on_url: Option<String>) -> Arc<Self> {
        Arc::new(Self::unshared(logged_in_from_check, fail_on_url))
    }

    fn unshared(logged_in_from_check: Option<usize>, fail_on_url: Option<String>) -> Self {
        Self {
            logged_in_from_check,
            url_checks: AtomicUsize::new(0),
            visited: Mutex::new(Vec::new()),
            acts: Mutex::new(Vec::new()),
            restored: Mutex::new(Vec::new()),
            extract_calls: AtomicUsize::new(0),
            fail_on_url,
            page: None,
        }
    }

    pub fn url_checks(&self) -> usize {
        self.url_checks.load(Ordering::SeqCst)
    }

    pub fn acts(&self) -> Vec<String> {
        self.acts.lock().unwrap().clone()
    }
}

pub fn session_cookie() -> Cookie {
    Cookie {
        name: "li_at".to_string(),
        value: "session-token".to_string(),
        domain: ".linkedin.com".to_string(),
        path: "/".to_string(),
        expires: None,
        http_only: true,
        secure: true,
        same_site: Some("None".to_string()),
    }
}

#[async_trait]
impl BrowserAutomation for FakeBrowser {
    async fn goto(&self, url: &str) -> Result<(), AutomationError> {
        self.visited.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String, AutomationError> {
        let check = self.url_checks.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((url, _)) = &self.page {
            return Ok(url.clone());
        }
        let logged_in = self.logged_in_from_check.map_or(false, |from| check >= from);
        Ok(if logged_in {
            "https://www.linkedin.com/feed/".to_string()
        } else {
            "https://www.linkedin.com/login".to_string()
        })
    }

    async fn act(&self, action: &str) -> Result<(), AutomationError> {
        let last_visited = self.visited.lock().unwrap().last().cloned().unwrap_or_default();
        if self.fail_on_url.as_deref() == Some(last_visited.as_str()) {
            return Err(AutomationError::ApiError("Message button not found".to_string()));
        }
        self.acts.lock().unwrap().push(action.to_string());
        Ok(())
    }

    async fn observe(&self, _instruction: &str) -> Result<Vec<String>, AutomationError> {
        Ok(Vec::new())
    }

    async fn extract(&self, _instruction: &str) -> Result<String, AutomationError> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .page
            .as_ref()
            .map_or_else(|| "no".to_string(), |(_, answer)| answer.clone()))
    }

    async fn cookies(&self) -> Result<Vec<Cookie>, AutomationError> {
        Ok(vec![session_cookie()])
    }

    async fn set_cookies(&self, cookies: &[Cookie]) -> Result<(), AutomationError> {
        self.restored.lock().unwrap().extend_from_slice(cookies);
        Ok(())
    }

    async fn close(&self) -> Result<(), AutomationError> {
        Ok(())
    }
}

pub fn instant_policy() -> LoginPolicy {
    LoginPolicy {
        interval: Duration::ZERO,
        max_attempts: 120,
    }
}

pub fn dispatcher(browser: Arc<FakeBrowser>, dir: &Path) -> OutreachDispatcher {
    OutreachDispatcher::new(
        browser,
        SessionStore::new(dir.join("linkedin-auth.json")),
        instant_policy(),
        Duration::ZERO,
    )
}

pub fn app_state(
    generator: Arc<FakeGenerator>,
    search: Arc<FakeSearch>,
    writer: Arc<FakeWriter>,
    browser: Arc<FakeBrowser>,
    dir: &Path,
) -> AppState {
    AppState::new(
        generator,
        search,
        writer,
        Arc::new(MessageArchive::new(dir.join("messages"))),
        Arc::new(StateStore::new(dir.join("ui-state.json"))),
        Arc::new(dispatcher(browser, dir)),
        SearchSettings::default(),
    )
}
