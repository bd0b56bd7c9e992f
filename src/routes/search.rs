use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::search_users_with_ai;
use crate::models::SearchRequest;
use crate::routes::{bad_request, service_error_response, AppState};

/// Configure search routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/linkd-search", web::post().to(linkd_search));
}

/// AI-assisted people search
///
/// POST /api/linkd-search
///
/// Request body:
/// ```json
/// {
///   "userProfile": { "universityName": "USC", ... },
///   "userObjective": "string",
///   "limit": 10,
///   "additionalSchools": ["string"],
///   "generatedQuery": "string"
/// }
/// ```
async fn linkd_search(
    state: web::Data<AppState>,
    req: web::Json<SearchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for linkd_search request: {:?}", errors);
        return bad_request(errors.to_string());
    }

    let req = req.into_inner();
    let objective = req.user_objective.filter(|o| !o.trim().is_empty());

    let (profile, objective) = match (req.user_profile, objective) {
        (Some(profile), Some(objective)) => (profile, objective),
        _ => return bad_request("userProfile and userObjective are required"),
    };

    if let Some(field) = profile.missing_field() {
        return bad_request(format!("{} is required in userProfile", field));
    }

    let limit = state
        .search_settings
        .resolve_limit(req.limit, state.search_settings.default_limit);
    let additional = req.additional_schools.unwrap_or_default();

    tracing::info!(
        "Linkd search for {} (limit: {}, extra schools: {})",
        profile.university_name,
        limit,
        additional.len()
    );

    match search_users_with_ai(
        state.generator.as_ref(),
        state.search.as_ref(),
        &profile,
        &objective,
        limit,
        &additional,
        req.generated_query.as_deref(),
    )
    .await
    {
        Ok(results) => HttpResponse::Ok().json(results),
        Err(e) => {
            tracing::error!("Error in Linkd search: {}", e);
            service_error_response(&e)
        }
    }
}
