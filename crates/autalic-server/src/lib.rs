//! HTTP façade for the AUTALIC agent.
//!
//! Three meaningful routes: the embedded chat page at `/`, `POST /chat` which
//! runs one agent turn against the caller's session, and `POST /reset` which
//! clears a session. Replies that parse as a JSON object are surfaced as an
//! `analysis` payload, everything else as `conversation`. Internal failures
//! become a fixed 500 body; nothing leaks.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::{middleware, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use autalic_core::session::DEFAULT_SESSION;
use autalic_core::{Agent, AgentError, Message, SessionStore};

const CHAT_PAGE: &str = include_str!("../static/index.html");
const INTERNAL_ERROR_BODY: &str = "An internal error occurred.";

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<Agent>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(agent: Arc<Agent>, sessions: Arc<SessionStore>) -> Self {
        Self { agent, sessions }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ResetRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Builds the axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .route("/reset", post(reset_handler))
        .with_state(state);

    router
        .layer(middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn request_logging(
    request: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    log::info!("Request {} {} {}", request_id, method, uri);

    let start = std::time::Instant::now();
    let response = next.run(request).await;
    log::info!("Response {} completed in {:?}", request_id, start.elapsed());
    response
}

async fn root_handler() -> Html<&'static str> {
    Html(CHAT_PAGE)
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn chat_handler(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Response {
    match run_chat_turn(&state, request).await {
        Ok(payload) => Json(payload).into_response(),
        Err(e) => {
            log::error!("Chat turn failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": INTERNAL_ERROR_BODY})),
            )
                .into_response()
        }
    }
}

async fn run_chat_turn(state: &AppState, request: ChatRequest) -> Result<Value, AgentError> {
    let session_id = request.session_id.as_deref().unwrap_or(DEFAULT_SESSION);

    state
        .sessions
        .append(session_id, Message::user(request.message))?;
    let history = state.sessions.history(session_id)?;

    let reply = state.agent.run(&history).await;
    log::debug!("Agent reply: {:?}", reply);

    state
        .sessions
        .append(session_id, Message::assistant(reply.clone()))?;

    Ok(classify_reply(reply))
}

/// A reply that parses as a JSON object is an analysis; anything else is
/// conversation.
fn classify_reply(reply: String) -> Value {
    match serde_json::from_str::<Value>(&reply) {
        Ok(parsed) if parsed.is_object() => json!({"type": "analysis", "data": parsed}),
        _ => json!({"type": "conversation", "data": reply}),
    }
}

async fn reset_handler(State(state): State<AppState>, body: axum::body::Bytes) -> Response {
    // The chat page posts an empty body; API callers may name a session.
    let request: ResetRequest = if body.is_empty() {
        ResetRequest::default()
    } else {
        serde_json::from_slice(&body).unwrap_or_default()
    };
    let session_id = request.session_id.as_deref().unwrap_or(DEFAULT_SESSION);

    match state.sessions.reset(session_id) {
        Ok(()) => Json(json!({"message": "Chat history has been reset."})).into_response(),
        Err(e) => {
            log::error!("Reset failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": INTERNAL_ERROR_BODY})),
            )
                .into_response()
        }
    }
}

/// Resolves when Ctrl+C or SIGTERM arrives.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            log::info!("Received SIGTERM, shutting down...");
        },
    }
}
