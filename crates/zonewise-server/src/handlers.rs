use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use zonewise_core::ids::SessionId;
use zonewise_engine::{EngineError, TurnRequest};
use zonewise_store::StoreError;

use crate::server::AppState;

const DEFAULT_SESSION_LIMIT: u32 = 50;
const MAX_SESSION_LIMIT: u32 = 500;

/// Client-facing errors. Bodies stay generic; details go to the log.
#[derive(Debug)]
pub enum ApiError {
    BadRequest,
    NotFound(&'static str),
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest => (StatusCode::BAD_REQUEST, "Failed to process request"),
            Self::NotFound(what) => (StatusCode::NOT_FOUND, what),
            Self::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to process request"),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::InvalidConversation(reason) => {
                warn!(reason = %reason, "rejected chat request");
                Self::BadRequest
            }
            other => {
                error!(error = %other, error_kind = other.error_kind(), "chat turn failed");
                Self::Internal
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => Self::NotFound("Not found"),
            other => {
                error!(error = %other, "store request failed");
                Self::Internal
            }
        }
    }
}

pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<TurnRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body.map_err(|e| {
        warn!(error = %e, "malformed chat request");
        ApiError::BadRequest
    })?;
    let response = state.assistant.respond(request).await?;
    Ok(Json(response))
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateSession {
    #[serde(default)]
    pub title: Option<String>,
}

/// The body is optional; an empty body creates an untitled session.
pub async fn create_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let params: CreateSession = if body.is_empty() {
        CreateSession::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "malformed session request");
            ApiError::BadRequest
        })?
    };
    let session = state.sessions.create(params.title.as_deref())?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
}

pub async fn list_sessions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_SESSION_LIMIT)
        .min(MAX_SESSION_LIMIT);
    Ok(Json(state.sessions.list(limit)?))
}

pub async fn session_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = SessionId::from_raw(id);
    state.sessions.get(&session_id).map_err(|e| match e {
        StoreError::NotFound(_) => ApiError::NotFound("Session not found"),
        other => ApiError::from(other),
    })?;
    Ok(Json(state.messages.list_for_session(&session_id)?))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.assistant.provider().name(),
        "model": state.assistant.provider().model(),
    }))
}
