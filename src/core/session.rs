use crate::models::OutreachMessage;
use crate::services::{AutomationError, BrowserAutomation, SessionStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};

pub const LINKEDIN_FEED_URL: &str = "https://www.linkedin.com/feed/";
pub const LINKEDIN_LOGIN_URL: &str = "https://www.linkedin.com/login";

const LOGGED_IN_PATHS: [&str; 4] = ["/feed", "/mynetwork", "/messaging", "/in/"];
const LOGGED_OUT_PATHS: [&str; 4] = ["/login", "/checkpoint", "/authwall", "/signup"];

/// How long to wait for a human to finish logging in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for LoginPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 120,
        }
    }
}

/// Login state implied by the URL alone, if it is conclusive
pub fn login_state_from_url(url: &str) -> Option<bool> {
    if !url.contains("linkedin.com") {
        return None;
    }
    if LOGGED_OUT_PATHS.iter().any(|p| url.contains(p)) {
        return Some(false);
    }
    if LOGGED_IN_PATHS.iter().any(|p| url.contains(p)) {
        return Some(true);
    }
    None
}

/// Check the current page for an active LinkedIn session
///
/// Falls back to asking the automation model about the page when the URL
/// does not settle it.
pub async fn is_logged_in(browser: &dyn BrowserAutomation) -> Result<bool, AutomationError> {
    let url = browser.current_url().await?;
    if let Some(state) = login_state_from_url(&url) {
        return Ok(state);
    }

    let answer = browser
        .extract(
            "Is a user signed in to LinkedIn on this page (for example a 'Me' menu or \
             profile avatar in the top navigation)? Answer only yes or no.",
        )
        .await?;

    Ok(answer.trim().to_lowercase().starts_with("yes"))
}

/// Poll until the user is logged in or the attempt budget runs out
///
/// Every poll sleeps `interval` first. Errors while checking count as a
/// failed poll.
pub async fn wait_for_login(browser: &dyn BrowserAutomation, policy: LoginPolicy) -> bool {
    for attempt in 1..=policy.max_attempts {
        tokio::time::sleep(policy.interval).await;

        match is_logged_in(browser).await {
            Ok(true) => {
                tracing::info!("LinkedIn login detected after {} checks", attempt);
                return true;
            }
            Ok(false) => {}
            Err(e) => tracing::warn!("Login check {} failed: {}", attempt, e),
        }

        if attempt % 12 == 0 {
            tracing::info!(
                "Still waiting for LinkedIn login ({}/{})",
                attempt,
                policy.max_attempts
            );
        }
    }

    tracing::warn!("Gave up waiting for LinkedIn login after {} checks", policy.max_attempts);
    false
}

/// Outcome of a dispatch run
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub sent: Vec<String>,
    pub failed: Vec<(String, String)>,
}

/// Sends outreach messages by driving LinkedIn in a browser
pub struct OutreachDispatcher {
    browser: Arc<dyn BrowserAutomation>,
    sessions: SessionStore,
    policy: LoginPolicy,
    send_delay: Duration,
    running: Mutex<()>,
}

impl OutreachDispatcher {
    pub fn new(
        browser: Arc<dyn BrowserAutomation>,
        sessions: SessionStore,
        policy: LoginPolicy,
        send_delay: Duration,
    ) -> Self {
        Self {
            browser,
            sessions,
            policy,
            send_delay,
            running: Mutex::new(()),
        }
    }

    /// True when a saved LinkedIn session is available
    pub async fn is_auth_setup(&self) -> bool {
        self.sessions.is_auth_setup().await
    }

    /// Claim the browser for one dispatch run
    ///
    /// Only one run may be active; a second caller gets `AutomationError::Busy`.
    pub fn begin(&self) -> Result<DispatchRun<'_>, AutomationError> {
        let guard = self.running.try_lock().map_err(|_| AutomationError::Busy)?;
        Ok(DispatchRun {
            dispatcher: self,
            _guard: guard,
        })
    }

    /// Log in (reusing the saved session when possible) and send every message
    pub async fn run(&self, messages: &[OutreachMessage]) -> Result<DispatchReport, AutomationError> {
        self.begin()?.send(messages).await
    }

    async fn run_exclusive(
        &self,
        messages: &[OutreachMessage],
    ) -> Result<DispatchReport, AutomationError> {
        self.restore_session().await;
        self.ensure_logged_in().await?;

        let mut report = DispatchReport::default();
        for message in messages {
            match self.send_one(message).await {
                Ok(()) => {
                    tracing::info!("Sent message to {}", message.linkedin_url);
                    report.sent.push(message.linkedin_url.clone());
                }
                Err(e) => {
                    tracing::error!("Failed to send message to {}: {}", message.linkedin_url, e);
                    report
                        .failed
                        .push((message.linkedin_url.clone(), e.to_string()));
                }
            }

            if !self.send_delay.is_zero() {
                tokio::time::sleep(self.send_delay).await;
            }
        }

        tracing::info!(
            "Outreach finished: {} sent, {} failed",
            report.sent.len(),
            report.failed.len()
        );
        Ok(report)
    }

    async fn restore_session(&self) {
        match self.sessions.load().await {
            Ok(Some(cookies)) if !cookies.is_empty() => {
                tracing::info!("Restoring {} saved session cookies", cookies.len());
                if let Err(e) = self.browser.set_cookies(&cookies).await {
                    tracing::warn!("Failed to restore session cookies: {}", e);
                }
            }
            Ok(_) => tracing::info!("No saved LinkedIn session, manual login required"),
            Err(e) => tracing::warn!("Ignoring unreadable session file: {}", e),
        }
    }

    async fn ensure_logged_in(&self) -> Result<(), AutomationError> {
        let browser = self.browser.as_ref();
        browser.goto(LINKEDIN_FEED_URL).await?;

        let logged_in = match is_logged_in(browser).await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("Initial login check failed: {}", e);
                false
            }
        };

        if !logged_in {
            tracing::info!("Waiting for manual LinkedIn login in the automation browser");
            browser.goto(LINKEDIN_LOGIN_URL).await?;

            if !wait_for_login(browser, self.policy).await {
                return Err(AutomationError::LoginTimeout {
                    attempts: self.policy.max_attempts,
                });
            }
        }

        match browser.cookies().await {
            Ok(cookies) => {
                if let Err(e) = self.sessions.save(&cookies).await {
                    tracing::warn!("Failed to save session cookies: {}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to read session cookies: {}", e),
        }

        Ok(())
    }

    async fn send_one(&self, message: &OutreachMessage) -> Result<(), AutomationError> {
        let browser = self.browser.as_ref();
        browser.goto(&message.linkedin_url).await?;
        browser
            .act("Click the 'Message' button on this profile")
            .await?;
        browser
            .act(&format!(
                "Type the following text into the message box: {}",
                message.body
            ))
            .await?;
        browser.act("Click the 'Send' button in the message window").await
    }
}

/// An active dispatch run; the browser stays claimed until it is dropped
pub struct DispatchRun<'a> {
    dispatcher: &'a OutreachDispatcher,
    _guard: MutexGuard<'a, ()>,
}

impl DispatchRun<'_> {
    pub async fn send(self, messages: &[OutreachMessage]) -> Result<DispatchReport, AutomationError> {
        let dispatcher = self.dispatcher;
        let result = dispatcher.run_exclusive(messages).await;

        if let Err(e) = dispatcher.browser.close().await {
            tracing::warn!("Failed to close browser session: {}", e);
        }

        result
    }
}
