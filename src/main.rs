use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use alumni_connect::config::{LoggingSettings, Settings};
use alumni_connect::core::{LoginPolicy, OutreachDispatcher};
use alumni_connect::routes::{configure_routes, AppState};
use alumni_connect::services::{
    CachedSearch, GeminiClient, LinkdClient, MessageArchive, MessageWriter, PeopleSearch,
    QueryGenerator, SessionStore, StagehandClient, StateStore,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub success: bool,
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        success: false,
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging);

    info!("Starting Alumni Connect service...");

    let gemini = Arc::new(
        GeminiClient::new(
            settings.gemini.endpoint.clone(),
            settings.gemini.api_key.clone(),
            settings.gemini.model.clone(),
            settings.gemini.timeout_secs.unwrap_or(60),
        )
        .map_err(|e| startup_error("Failed to create Gemini client", e))?,
    );

    if settings.gemini.api_key.is_empty() {
        error!("GEMINI_API_KEY is not set; query and message generation will fail");
    }

    info!("Gemini client initialized (model: {})", settings.gemini.model);

    let linkd = LinkdClient::new(
        settings.linkd.endpoint.clone(),
        settings.linkd.api_key.clone(),
        settings.linkd.timeout_secs.unwrap_or(30),
    )
    .map_err(|e| startup_error("Failed to create Linkd client", e))?;

    let cache_ttl = settings.linkd.cache_ttl_secs.unwrap_or(60);
    let cache_size = settings.linkd.cache_size.unwrap_or(500);
    let search: Arc<dyn PeopleSearch> =
        Arc::new(CachedSearch::new(Arc::new(linkd), cache_size, cache_ttl));

    info!("Linkd client initialized (cache: {} entries, TTL: {}s)", cache_size, cache_ttl);

    let browser = Arc::new(
        StagehandClient::new(
            settings.automation.endpoint.clone(),
            settings.automation.api_key.clone(),
            settings.automation.timeout_secs.unwrap_or(120),
        )
        .map_err(|e| startup_error("Failed to create automation client", e))?,
    );

    let policy = LoginPolicy {
        interval: Duration::from_secs(settings.automation.login_poll_interval_secs),
        max_attempts: settings.automation.max_login_attempts,
    };

    let dispatcher = Arc::new(OutreachDispatcher::new(
        browser,
        SessionStore::new(&settings.automation.session_file),
        policy,
        Duration::from_millis(settings.automation.send_delay_ms),
    ));

    info!(
        "Automation client initialized ({}; login wait: {} x {:?})",
        settings.automation.endpoint, policy.max_attempts, policy.interval
    );

    let generator: Arc<dyn QueryGenerator> = gemini.clone();
    let writer: Arc<dyn MessageWriter> = gemini;

    let app_state = AppState::new(
        generator,
        search,
        writer,
        Arc::new(MessageArchive::new(&settings.storage.messages_dir)),
        Arc::new(StateStore::new(&settings.storage.state_file)),
        dispatcher,
        settings.search.clone(),
    );

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
