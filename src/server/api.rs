//! HTTP API server implementation

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::core::client::{AsyncTranslator, Translator};
use crate::core::config::RelayConfig;
use crate::core::models::{TranslationRequest, TranslationResult};
use crate::server::cors::{cors, CorsPolicy};

/// Path the dictionary file is served under
pub const DICTIONARY_ROUTE: &str = "/chinookwords.json";

/// Error returned when `inputWord` is absent or blank
pub const MISSING_INPUT_MESSAGE: &str = "Missing input word.";

/// Error returned for any upstream failure
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Error fetching AI translation.";

/// Application state
#[derive(Clone)]
pub struct AppState {
    translator: Arc<dyn Translator>,
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Caller-facing message
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Health check handler
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Translation handler
async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> Result<Json<TranslationResult>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!("Rejected translate body: {}", rejection.body_text());
        error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid request body: {}", rejection.body_text()),
        )
    })?;

    let word = payload
        .word()
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, MISSING_INPUT_MESSAGE))?;

    match state.translator.translate(word).await {
        Ok(result) => {
            info!("Translated {:?}", word);
            Ok(Json(result))
        }
        Err(e) => {
            // Detail stays in the log; the caller gets the generic envelope.
            if e.is_upstream() {
                error!("Upstream API error for {:?}: {}", word, e);
            } else {
                error!("Translation failed for {:?}: {}", word, e);
            }
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                UPSTREAM_FAILURE_MESSAGE,
            ))
        }
    }
}

/// Build the relay router around any translator
pub fn build_app(translator: Arc<dyn Translator>, config: &RelayConfig) -> Router {
    let state = Arc::new(AppState { translator });
    let policy = Arc::new(CorsPolicy::from_config(config));

    Router::new()
        .route("/health", get(health_check))
        .route("/translate", post(translate))
        .route_service(DICTIONARY_ROUTE, ServeFile::new(&config.dictionary_path))
        .fallback_service(ServeDir::new(&config.static_root))
        .with_state(state)
        .layer(middleware::from_fn_with_state(policy, cors))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server
pub async fn run_server(config: RelayConfig) -> anyhow::Result<()> {
    // Fails on a missing key, before anything is bound
    let translator = Arc::new(AsyncTranslator::new(config.clone())?);

    if !config.dictionary_path.is_file() {
        warn!(
            "Dictionary file {} not found, {} will answer 404",
            config.dictionary_path.display(),
            DICTIONARY_ROUTE
        );
    }

    let app = build_app(translator, &config);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    let addr: SocketAddr = listener.local_addr()?;

    info!("Starting server on {}", addr);
    info!("Serving static files from {}", config.static_root.display());

    axum::serve(listener, app).await?;

    Ok(())
}
