//! Maps gateway errors onto HTTP responses

use axum::{
    extract::{
        rejection::{BytesRejection, JsonRejection, QueryRejection},
        OriginalUri,
    },
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use swapdeck_types::{ApiResponse, ErrorKind, GatewayError};
use tracing::{error, warn};

/// Handler error; always rendered as a failure envelope
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl ApiError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ApiError(GatewayError::invalid_argument(message))
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.0.kind())
    }
}

/// Transport status for an error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound | ErrorKind::NoPoolsFound => StatusCode::NOT_FOUND,
        ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::AdapterInit
        | ErrorKind::NotImplemented
        | ErrorKind::Upstream
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_argument(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        ApiError::invalid_argument(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::invalid_argument(format!("Invalid query: {}", rejection.body_text()))
    }
}

/// Fallback for paths no route matches
pub async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError(GatewayError::NotFound(format!("No route for {} {}", method, uri.path())))
}

/// Fallback for known paths hit with an unsupported method
pub async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError(GatewayError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed ({:?}): {}", self.0.kind(), self.0);
        } else {
            warn!("Request rejected ({:?}): {}", self.0.kind(), self.0);
        }

        let body = ApiResponse::<()>::error(self.0.public_message());
        (status, Json(body)).into_response()
    }
}
