//! # HepChat HTTP Handlers
//!
//! File: cli/src/commands/serve/handlers.rs
//!
//! ## Overview
//!
//! Request handlers for the chat API. All of them read from the shared,
//! immutable `Chatbot` in `AppState`; none of them keep per-user state.
//!
//! | Method | Path        | Response                                  |
//! |--------|-------------|-------------------------------------------|
//! | GET    | `/`         | HTML documentation and chat page          |
//! | POST   | `/chat`     | `{"reply", "intent", "confidence"}`       |
//! | GET    | `/examples` | `{"ask": [...]}`                          |
//! | GET    | `/intents`  | `{"intents": [...]}`                      |
//! | GET    | `/health`   | `{"status": "ok"}`                        |
//!
//! Client errors are JSON `{"detail": "..."}` with a 4xx status. The detail
//! is a fixed message per failure kind; the extractor's own text only goes
//! to the log.
//!
use crate::bot::chatbot::{Chatbot, Reply};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub chatbot: Arc<Chatbot>,
}

/// Body of `POST /chat`. Extra fields (such as a chat history) are ignored.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// A client error rendered as `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: &'static str,
}

impl ApiError {
    fn new(status: StatusCode, detail: &'static str) -> Self {
        Self { status, detail }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected chat request: {}", rejection.body_text());
        let status = rejection.status();
        let detail = match rejection {
            JsonRejection::JsonDataError(_) => {
                "Request body must be a JSON object with a string field 'message'."
            }
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON.",
            JsonRejection::MissingJsonContentType(_) => {
                "Expected request with 'Content-Type: application/json'."
            }
            _ => "Could not read the request body.",
        };
        Self::new(status, detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// `GET /`
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../../assets/index.html"))
}

/// `POST /chat`
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Reply>, ApiError> {
    let Json(request) = payload?;
    if request.message.is_empty() {
        return Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Field 'message' must not be empty.",
        ));
    }

    let reply = state.chatbot.reply(&request.message);
    debug!(
        "Chat from {}: intent {} ({:.2})",
        request.user_id.as_deref().unwrap_or("anonymous"),
        reply.intent,
        reply.confidence
    );
    Ok(Json(reply))
}

/// `GET /examples`
pub async fn examples(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "ask": state.chatbot.table().samples() }))
}

/// `GET /intents`
pub async fn intents(State(state): State<AppState>) -> Json<Value> {
    let names: Vec<&str> = state
        .chatbot
        .table()
        .intents()
        .iter()
        .map(|intent| intent.name())
        .collect();
    Json(json!({ "intents": names }))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
