use actix_web::{web, HttpResponse, Responder};
use crate::core::generate_bulk;
use crate::models::{
    ErrorResponse, GenerateMessagesRequest, GenerateMessagesResponse, GeneratedMessages,
    MessageResult,
};
use crate::routes::{bad_request, service_error_response, AppState};
use crate::services::StorageError;

/// Configure message-generation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/generate-messages", web::post().to(generate_messages));
}

/// Draft outreach messages
///
/// POST /api/generate-messages
///
/// Request body:
/// ```json
/// {
///   "userProfile": { ... },
///   "userObjective": "string",
///   "selectedProfiles": [ ... ],
///   "bulkGenerate": false,
///   "autoGenerateAll": false,
///   "allProfiles": [ ... ]
/// }
/// ```
async fn generate_messages(
    state: web::Data<AppState>,
    req: web::Json<GenerateMessagesRequest>,
) -> impl Responder {
    let req = req.into_inner();
    let objective = req.user_objective.filter(|o| !o.trim().is_empty());

    let (profile, objective) = match (req.user_profile, objective) {
        (Some(profile), Some(objective)) => (profile, objective),
        _ => return bad_request("userProfile and userObjective are required"),
    };

    if req.auto_generate_all {
        if req.all_profiles.is_empty() {
            return bad_request("No profiles available for automatic message generation");
        }

        let results =
            generate_bulk(state.writer.as_ref(), &profile, &objective, &req.all_profiles).await;

        return match state.archive.save(&profile, &objective, &results).await {
            Ok(filename) => HttpResponse::Ok().json(GenerateMessagesResponse {
                success: true,
                results: GeneratedMessages::Bulk(results),
                file_path: Some(format!("/messages/{}", filename)),
            }),
            Err(e) => {
                tracing::error!("Failed to save generated messages: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string()))
            }
        };
    }

    let selected = match req.selected_profiles {
        Some(selected) => selected,
        None => return bad_request("selectedProfiles must be an array"),
    };

    if req.bulk_generate {
        let results = generate_bulk(state.writer.as_ref(), &profile, &objective, &selected).await;
        return HttpResponse::Ok().json(GenerateMessagesResponse {
            success: true,
            results: GeneratedMessages::Bulk(results),
            file_path: None,
        });
    }

    let Some(target) = selected.into_iter().next() else {
        return bad_request("At least one profile must be selected");
    };

    match state.writer.write_message(&profile, &objective, &target).await {
        Ok(message) => HttpResponse::Ok().json(GenerateMessagesResponse {
            success: true,
            results: GeneratedMessages::Single(MessageResult {
                profile: target,
                message,
            }),
            file_path: None,
        }),
        Err(e) => {
            tracing::error!("Error generating message for {}: {}", target.id(), e);
            service_error_response(&e)
        }
    }
}

/// Serve an archived message collection
///
/// GET /messages/{filename}
pub async fn get_archived(
    state: web::Data<AppState>,
    filename: web::Path<String>,
) -> impl Responder {
    match state.archive.load(&filename).await {
        Ok(collection) => HttpResponse::Ok().json(collection),
        Err(StorageError::NotFound(name)) => {
            HttpResponse::NotFound().json(ErrorResponse::new(format!("Messages not found: {}", name)))
        }
        Err(StorageError::InvalidFileName(name)) => {
            bad_request(format!("Invalid messages file name: {}", name))
        }
        Err(e) => {
            tracing::error!("Failed to load messages file {}: {}", filename, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string()))
        }
    }
}
