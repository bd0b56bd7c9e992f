// Route exports
pub mod gemini;
pub mod messages;
pub mod outreach;
pub mod search;
pub mod state;

use crate::config::SearchSettings;
use crate::core::{OutreachDispatcher, OutreachPipeline};
use crate::models::{ErrorResponse, HealthResponse};
use crate::services::{
    MessageArchive, MessageWriter, PeopleSearch, QueryGenerator, ServiceError, StateStore,
};
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn QueryGenerator>,
    pub search: Arc<dyn PeopleSearch>,
    pub writer: Arc<dyn MessageWriter>,
    pub pipeline: OutreachPipeline,
    pub archive: Arc<MessageArchive>,
    pub state_store: Arc<StateStore>,
    pub dispatcher: Arc<OutreachDispatcher>,
    pub search_settings: SearchSettings,
}

impl AppState {
    pub fn new(
        generator: Arc<dyn QueryGenerator>,
        search: Arc<dyn PeopleSearch>,
        writer: Arc<dyn MessageWriter>,
        archive: Arc<MessageArchive>,
        state_store: Arc<StateStore>,
        dispatcher: Arc<OutreachDispatcher>,
        search_settings: SearchSettings,
    ) -> Self {
        let pipeline = OutreachPipeline::new(generator.clone(), search.clone(), writer.clone());
        Self {
            generator,
            search,
            writer,
            pipeline,
            archive,
            state_store,
            dispatcher,
            search_settings,
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/messages/{filename}", web::get().to(messages::get_archived))
        .service(
            web::scope("/api")
                .configure(gemini::configure)
                .configure(search::configure)
                .configure(messages::configure)
                .configure(outreach::configure)
                .configure(state::configure),
        );
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// HTTP status used when a downstream service call fails
pub(crate) fn service_error_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        ServiceError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        ServiceError::NotConfigured { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn service_error_response(err: &ServiceError) -> HttpResponse {
    HttpResponse::build(service_error_status(err)).json(ErrorResponse::new(err.to_string()))
}

pub(crate) fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(message))
}
