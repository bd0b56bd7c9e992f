use actix_web::{web, HttpResponse, Responder};
use crate::models::{QueryRequest, QueryResponse, SampleData, UserProfile};
use crate::routes::{bad_request, service_error_response, AppState};

const SAMPLE_OBJECTIVE: &str =
    "I want to cold email senior developers who work at Google about setting up coffee chats";

/// Configure query-generation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/gemini-test", web::get().to(sample_query))
        .route("/gemini-test", web::post().to(generate_query));
}

fn sample_profile() -> UserProfile {
    UserProfile {
        university_name: "USC".to_string(),
        full_name: "John Doe".to_string(),
        grade_year: "Freshman".to_string(),
        clubs: vec!["Lavalab".to_string(), "Startup Incubator".to_string()],
        societies: vec!["BAP".to_string(), "Marketing Association".to_string()],
        location: "Los Angeles".to_string(),
    }
}

/// Generate a query for fixed sample data
///
/// GET /api/gemini-test
async fn sample_query(state: web::Data<AppState>) -> impl Responder {
    let profile = sample_profile();

    match state.generator.generate_query(&profile, SAMPLE_OBJECTIVE).await {
        Ok(text) => HttpResponse::Ok().json(QueryResponse {
            success: true,
            text,
            sample_data: Some(SampleData {
                profile,
                objective: SAMPLE_OBJECTIVE.to_string(),
            }),
        }),
        Err(e) => {
            tracing::error!("Error calling Gemini API: {}", e);
            service_error_response(&e)
        }
    }
}

/// Generate a search query from a profile and objective
///
/// POST /api/gemini-test
///
/// Request body:
/// ```json
/// {
///   "userProfile": { "universityName": "USC", ... },
///   "userObjective": "string"
/// }
/// ```
async fn generate_query(
    state: web::Data<AppState>,
    req: web::Json<QueryRequest>,
) -> impl Responder {
    let req = req.into_inner();
    let objective = req.user_objective.filter(|o| !o.trim().is_empty());

    let (profile, objective) = match (req.user_profile, objective) {
        (Some(profile), Some(objective)) => (profile, objective),
        _ => return bad_request("userProfile and userObjective are required"),
    };

    match state.generator.generate_query(&profile, &objective).await {
        Ok(text) => HttpResponse::Ok().json(QueryResponse {
            success: true,
            text,
            sample_data: None,
        }),
        Err(e) => {
            tracing::error!("Error calling Gemini API: {}", e);
            service_error_response(&e)
        }
    }
}
