use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::datetoken::ParseError;
use crate::fetch::FetchError;
use crate::partition::ResolveError;

/// API error with HTTP status code and a plain-text body.
///
/// The message is returned to the client verbatim; the handler that
/// produced the error is responsible for logging it.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

/// Date token rejections are the client's fault.
impl From<ParseError> for ApiError {
    fn from(e: ParseError) -> Self {
        ApiError::bad_request(e.to_string())
    }
}

impl From<ResolveError> for ApiError {
    fn from(e: ResolveError) -> Self {
        ApiError::bad_request(e.to_string())
    }
}

/// Every fetch failure is a server-side error; the kind only shapes
/// the message.
impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        ApiError::internal_error(e.to_string())
    }
}
