use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use genchat_client::{call_with_retry, GenerationClient, GenerationRequest, RetryPolicy};
use genchat_export::{archive_filename, build_zip, extract_files, ExportError};
use genchat_types::GenerationError;

use crate::web::inflight::InflightChats;
use crate::web::protocol::{ChatRequest, ErrorBody, ExportRequest, ProbeReport};

/// How long the connectivity probe waits for the service
const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    /// None when the API key is missing; chat requests then fail with 500
    /// without touching the network.
    pub client: Option<Arc<dyn GenerationClient>>,
    pub retry: RetryPolicy,
    pub inflight: Arc<InflightChats>,
}

impl AppState {
    pub fn new(client: Option<Arc<dyn GenerationClient>>, retry: RetryPolicy) -> Self {
        Self {
            client,
            retry,
            inflight: InflightChats::new(),
        }
    }
}

/// Create router with all routes. The CORS layer answers OPTIONS preflights
/// with 200 and permissive headers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/api/chat", post(create_or_continue_chat))
        .route("/api/chat/:chat_id", get(chat_details))
        .route("/api/export", post(export_project))
        .route("/api/probe", get(probe_service))
        .layer(cors)
        .with_state(state)
}

/// POST /api/chat - forward a prompt to the generation service
async fn create_or_continue_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> Response {
    let message = body.message.trim();
    if message.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Message is required",
            "the message field must be a non-empty string",
        );
    }

    let Some(client) = state.client.clone() else {
        error!("chat request refused: generation API key not configured");
        return generation_error_response(GenerationError::MissingApiKey);
    };

    // Sign-in enforcement lives upstream in the UI layer; the identity
    // header only feeds the request log.
    let caller = headers
        .get("x-user-email")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("anonymous");

    // A second submission for a chat that already has a request in flight
    // is rejected rather than raced.
    let _guard = match &body.chat_id {
        Some(chat_id) => match InflightChats::try_begin(&state.inflight, chat_id) {
            Some(guard) => Some(guard),
            None => {
                return error_response(
                    StatusCode::CONFLICT,
                    "Chat busy",
                    format!("a request for chat {chat_id} is already in flight"),
                );
            }
        },
        None => None,
    };

    let request = match body.chat_id.clone() {
        Some(chat_id) => GenerationRequest::Continue {
            chat_id,
            message: message.to_string(),
        },
        None => GenerationRequest::Create {
            message: message.to_string(),
        },
    };

    info!(
        caller,
        chat_id = request.chat_id().unwrap_or("<new>"),
        "forwarding prompt to generation service"
    );

    let deadline = state.retry.overall_deadline();
    let outcome = tokio::time::timeout(
        deadline,
        call_with_retry(client.as_ref(), &request, &state.retry),
    )
    .await;

    match outcome {
        Ok(Ok(chat)) => Json(chat).into_response(),
        Ok(Err(err)) => generation_error_response(err),
        Err(_) => generation_error_response(GenerationError::Timeout(deadline)),
    }
}

/// GET /api/chat/:chat_id - not implemented; chat state lives with the
/// caller, not the gateway
async fn chat_details(Path(chat_id): Path<String>) -> Response {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(serde_json::json!({
            "error": "Chat details endpoint not implemented",
            "message": "Use the data from the original chat creation response",
            "chatId": chat_id,
        })),
    )
        .into_response()
}

/// POST /api/export - package generated files into a ZIP download
async fn export_project(Json(body): Json<ExportRequest>) -> Response {
    let files = extract_files(&body.messages);
    match build_zip(&files) {
        Ok(bytes) => {
            let filename = archive_filename(body.project_name.as_deref());
            info!(file_count = files.len(), filename = %filename, "project archive built");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/zip".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(ExportError::NoFiles) => error_response(
            StatusCode::NOT_FOUND,
            "No files found to export",
            "the chat messages carry no file artifacts",
        ),
        Err(err) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to build archive",
            err.to_string(),
        ),
    }
}

/// GET /api/probe - one quick generation call to verify connectivity
async fn probe_service(State(state): State<AppState>) -> Response {
    let Some(client) = state.client.clone() else {
        return generation_error_response(GenerationError::MissingApiKey);
    };

    let started = Instant::now();
    let outcome = tokio::time::timeout(PROBE_TIMEOUT, client.create_chat("hello")).await;
    let duration_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(Ok(chat)) => Json(ProbeReport {
            status: "success".to_string(),
            message: "generation API connection working".to_string(),
            duration_ms,
            chat_id: Some(chat.id),
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
        .into_response(),
        Ok(Err(err)) => probe_failure(err.to_string(), duration_ms),
        Err(_) => probe_failure(
            format!("probe timed out after {}s", PROBE_TIMEOUT.as_secs()),
            duration_ms,
        ),
    }
}

fn probe_failure(message: String, duration_ms: u64) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ProbeReport {
            status: "error".to_string(),
            message,
            duration_ms,
            chat_id: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }),
    )
        .into_response()
}

/// Map a typed generation failure to the gateway's HTTP surface.
fn generation_error_response(err: GenerationError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error!(status = status.as_u16(), error = %err, "generation request failed");
    (
        status,
        Json(ErrorBody::new("Failed to process request", err.to_string())),
    )
        .into_response()
}

fn error_response(status: StatusCode, error: &str, details: impl Into<String>) -> Response {
    (status, Json(ErrorBody::new(error, details))).into_response()
}
