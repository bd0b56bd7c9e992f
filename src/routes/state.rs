use actix_web::{web, HttpResponse, Responder};
use crate::models::{ErrorResponse, UiState};
use crate::routes::AppState;

/// Configure persisted UI state routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/state", web::get().to(get_state))
        .route("/state", web::put().to(put_state))
        .route("/state", web::delete().to(clear_state));
}

/// GET /api/state
async fn get_state(state: web::Data<AppState>) -> impl Responder {
    match state.state_store.load().await {
        Ok(ui) => HttpResponse::Ok().json(ui),
        Err(e) => {
            tracing::error!("Failed to load UI state: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string()))
        }
    }
}

/// PUT /api/state
async fn put_state(state: web::Data<AppState>, body: web::Json<UiState>) -> impl Responder {
    match state.state_store.save(&body).await {
        Ok(saved) => HttpResponse::Ok().json(saved),
        Err(e) => {
            tracing::error!("Failed to save UI state: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string()))
        }
    }
}

/// DELETE /api/state
async fn clear_state(state: web::Data<AppState>) -> impl Responder {
    match state.state_store.clear().await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => {
            tracing::error!("Failed to clear UI state: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string()))
        }
    }
}
