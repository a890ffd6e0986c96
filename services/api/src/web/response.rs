//! services/api/src/web/response.rs
//!
//! The single response envelope every route answers with, the handler error
//! type, and the request validation helpers shared by all handlers.
//!
//! ```json
//! { "success": true, "data": { ... }, "message": "Word marked as solved" }
//! ```

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use progress_core::ports::PortError;
use serde::{Deserialize, Serialize};
use tracing::error;

//=========================================================================================
// Envelope
//=========================================================================================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// A negative but non-exceptional outcome (e.g. "already solved").
    pub fn failure(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            message: message.into(),
        }
    }
}

/// What every handler returns: a status plus an envelope, or a `HandlerError`.
pub type HandlerResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), HandlerError>;

pub fn ok<T: Serialize>(data: T, message: impl Into<String>) -> HandlerResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data, message))))
}

pub fn reply<T: Serialize>(status: StatusCode, body: ApiResponse<T>) -> HandlerResult<T> {
    Ok((status, Json(body)))
}

//=========================================================================================
// Handler Errors
//=========================================================================================

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// Storage or internal failure. The detail is logged, never sent.
    #[error("Internal server error")]
    Fault(String),
}

impl HandlerError {
    fn status(&self) -> StatusCode {
        match self {
            HandlerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HandlerError::NotFound(_) => StatusCode::NOT_FOUND,
            HandlerError::Conflict(_) => StatusCode::CONFLICT,
            HandlerError::Fault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        if let HandlerError::Fault(detail) = &self {
            error!("Request failed: {}", detail);
        }
        let body = ApiResponse::failure((), self.to_string());
        (self.status(), Json(body)).into_response()
    }
}

impl From<PortError> for HandlerError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(what) => HandlerError::NotFound(what),
            PortError::Conflict(what) => HandlerError::Conflict(what),
            PortError::Unexpected(detail) => HandlerError::Fault(detail),
        }
    }
}

//=========================================================================================
// Request Validation
//=========================================================================================

/// `axum::Json` whose rejection is answered with the envelope as a 400.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(HandlerError::BadRequest(rejection.body_text())),
        }
    }
}

fn missing(field: &str) -> HandlerError {
    HandlerError::BadRequest(format!("Missing required field: {}", field))
}

/// A required text field. Absent, blank and whitespace-only values are missing.
pub fn require_text(value: Option<String>, field: &str) -> Result<String, HandlerError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(missing(field)),
    }
}

pub fn require<T>(value: Option<T>, field: &str) -> Result<T, HandlerError> {
    value.ok_or_else(|| missing(field))
}

/// Parses a required field into an enum such as `Difficulty` or `Level`.
pub fn require_parsed<T>(value: Option<String>, field: &str) -> Result<T, HandlerError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    require_text(value, field)?
        .parse::<T>()
        .map_err(|e| HandlerError::BadRequest(e.to_string()))
}

/// A field clients send either as a single string or as a list of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// The non-blank values, trimmed.
    pub fn into_vec(self) -> Vec<String> {
        let values = match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        };
        values
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    }
}

/// A required `OneOrMany` field with at least one non-blank value.
pub fn require_list(value: Option<OneOrMany>, field: &str) -> Result<Vec<String>, HandlerError> {
    let values = value.map(OneOrMany::into_vec).unwrap_or_default();
    if values.is_empty() {
        return Err(missing(field));
    }
    Ok(values)
}
