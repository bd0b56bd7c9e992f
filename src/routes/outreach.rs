use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{is_finished_message, OutreachPlan, OutreachProgress};
use crate::models::{
    AuthStatusResponse, ErrorResponse, OutreachMessage, OutreachRequest, OutreachResponse,
    SendFailure, SendMessagesRequest, SendMessagesResponse, SendStatus, UserResult,
};
use crate::routes::{bad_request, AppState};
use crate::services::{AutomationError, StateStore};
use async_trait::async_trait;
use std::collections::HashMap;

/// Configure pipeline and LinkedIn dispatch routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/outreach", web::post().to(run_outreach))
        .route("/linkedin/auth", web::get().to(auth_status))
        .route("/linkedin/outreach", web::post().to(send_messages));
}

/// Mirrors pipeline progress into the persisted UI state
struct StateProgress<'a> {
    store: &'a StateStore,
}

#[async_trait]
impl OutreachProgress for StateProgress<'_> {
    async fn profiles_found(&mut self, profiles: &[UserResult]) {
        let result = self
            .store
            .update(|ui| {
                ui.profiles = profiles.to_vec();
                ui.generated_messages.clear();
                ui.send_status.clear();
            })
            .await;
        if let Err(e) = result {
            tracing::warn!("Failed to persist found profiles: {}", e);
        }
    }

    async fn message_updated(&mut self, profile_id: &str, message: &str) {
        let result = self
            .store
            .update(|ui| {
                ui.generated_messages
                    .insert(profile_id.to_string(), message.to_string());
            })
            .await;
        if let Err(e) = result {
            tracing::warn!("Failed to persist message for {}: {}", profile_id, e);
        }
    }
}

/// Search and draft messages in one call
///
/// POST /api/outreach
///
/// Request body:
/// ```json
/// {
///   "userProfile": { ... },
///   "prompt": "string",
///   "limit": 5,
///   "alumniOnly": true,
///   "additionalSchools": ["string"]
/// }
/// ```
///
/// `userProfile` may be omitted when one was saved through `/api/state`.
async fn run_outreach(
    state: web::Data<AppState>,
    req: web::Json<OutreachRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for outreach request: {:?}", errors);
        return bad_request(errors.to_string());
    }

    let req = req.into_inner();

    let saved_profile = match req.user_profile {
        Some(profile) => Some(profile),
        None => match state.state_store.load().await {
            Ok(ui) => ui.user_profile,
            Err(e) => {
                tracing::warn!("Failed to read saved profile: {}", e);
                None
            }
        },
    };

    let Some(profile) = saved_profile else {
        return bad_request("userProfile is required when no profile has been saved");
    };

    if let Some(field) = profile.missing_field() {
        return bad_request(format!("{} is required in userProfile", field));
    }

    let limit = state
        .search_settings
        .resolve_limit(req.limit, state.search_settings.outreach_limit);

    let plan = OutreachPlan {
        profile,
        objective: req.prompt,
        limit,
        alumni_only: req.alumni_only,
        additional_schools: req.additional_schools,
    };

    let saved = state
        .state_store
        .update(|ui| {
            ui.user_profile = Some(plan.profile.clone());
            ui.prompt = plan.objective.clone();
            ui.limit = plan.limit as u16;
            ui.alumni_only = plan.alumni_only;
        })
        .await;
    if let Err(e) = saved {
        tracing::warn!("Failed to persist outreach form: {}", e);
    }

    let run_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(
        "Outreach run {} for {} (limit: {}, alumni only: {})",
        run_id,
        plan.profile.full_name,
        plan.limit,
        plan.alumni_only
    );

    let mut progress = StateProgress {
        store: state.state_store.as_ref(),
    };
    let outcome = state.pipeline.run(&plan, &mut progress).await;

    if let Some(error) = &outcome.error {
        tracing::warn!("Outreach run {} ended with an error: {}", run_id, error);
    }

    HttpResponse::Ok().json(OutreachResponse {
        run_id,
        query: outcome.query,
        profiles: outcome.profiles,
        messages: outcome.messages,
        backup_search_used: outcome.backup_used,
        error: outcome.error,
    })
}

/// GET /api/linkedin/auth
async fn auth_status(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(AuthStatusResponse {
        authenticated: state.dispatcher.is_auth_setup().await,
    })
}

/// Send messages through LinkedIn
///
/// POST /api/linkedin/outreach
///
/// Request body (optional):
/// ```json
/// { "messages": [{ "linkedinUrl": "string", "body": "string" }] }
/// ```
///
/// With an empty body (or no messages) the persisted profiles and their
/// drafted messages are sent. A body that is present but malformed is
/// rejected rather than falling back to the saved messages.
async fn send_messages(state: web::Data<AppState>, body: web::Bytes) -> impl Responder {
    let requested = match parse_send_request(&body) {
        Ok(req) => req.map(|r| r.messages).unwrap_or_default(),
        Err(e) => {
            tracing::info!("Rejected LinkedIn outreach body: {}", e);
            return bad_request(format!("Invalid request body: {}", e));
        }
    };

    if let Some(unfinished) = requested
        .iter()
        .find(|m| m.linkedin_url.trim().is_empty() || !is_finished_message(&m.body))
    {
        return bad_request(format!(
            "Message for '{}' is not ready to send",
            unfinished.linkedin_url
        ));
    }

    let ui = state.state_store.load().await.unwrap_or_else(|e| {
        tracing::warn!("Failed to read UI state: {}", e);
        Default::default()
    });

    let messages = if requested.is_empty() {
        ui.outreach_messages()
    } else {
        requested
    };

    if messages.is_empty() {
        return bad_request("No messages to send");
    }

    let ids_by_url: HashMap<String, String> = ui
        .profiles
        .iter()
        .map(|r| (r.profile.linkedin_url.clone(), r.profile.id.clone()))
        .collect();

    let run = match state.dispatcher.begin() {
        Ok(run) => run,
        Err(e) => {
            tracing::info!("LinkedIn outreach rejected: {}", e);
            return HttpResponse::Conflict().json(ErrorResponse::new(e.to_string()));
        }
    };

    record_status(&state, &ids_by_url, &messages, |_| SendStatus::Pending).await;

    tracing::info!("Dispatching {} LinkedIn messages", messages.len());

    match run.send(&messages).await {
        Ok(report) => {
            record_status(&state, &ids_by_url, &messages, |url| {
                if report.sent.iter().any(|sent| sent == url) {
                    SendStatus::Sent
                } else {
                    SendStatus::Failed
                }
            })
            .await;

            HttpResponse::Ok().json(SendMessagesResponse {
                success: report.failed.is_empty(),
                sent: report.sent.len(),
                failed: report
                    .failed
                    .into_iter()
                    .map(|(linkedin_url, error)| SendFailure { linkedin_url, error })
                    .collect(),
            })
        }
        Err(e) => {
            tracing::error!("LinkedIn outreach failed: {}", e);
            record_status(&state, &ids_by_url, &messages, |_| SendStatus::Failed).await;

            let response = ErrorResponse::new(e.to_string());
            match e {
                AutomationError::LoginTimeout { .. } => HttpResponse::GatewayTimeout().json(response),
                _ => HttpResponse::InternalServerError().json(response),
            }
        }
    }
}

/// An empty or whitespace-only body means "send the saved messages"
fn parse_send_request(body: &[u8]) -> Result<Option<SendMessagesRequest>, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body).map(Some)
}

async fn record_status<F>(
    state: &AppState,
    ids_by_url: &HashMap<String, String>,
    messages: &[OutreachMessage],
    status: F,
) where
    F: Fn(&str) -> SendStatus,
{
    let result = state
        .state_store
        .update(|ui| {
            for message in messages {
                if let Some(id) = ids_by_url.get(&message.linkedin_url) {
                    ui.send_status.insert(id.clone(), status(&message.linkedin_url));
                }
            }
        })
        .await;
    if let Err(e) = result {
        tracing::warn!("Failed to persist send status: {}", e);
    }
}
