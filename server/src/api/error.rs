use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::constants;
use crate::service::ServiceError;
use crate::types::FieldErrors;

/// Error type returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    Service(ServiceError),
    /// The request body was not valid JSON for the expected shape.
    InvalidBody(JsonRejection),
}

/// `{ "mensagem": ... }`, the body of every non-validation error.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    #[serde(rename = "mensagem")]
    pub message: String,
}

impl MessageBody {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ValidationBody {
    #[serde(rename = "erros")]
    errors: FieldErrors,
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self::Service(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::InvalidBody(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Service(ServiceError::ValidationFailed(errors)) => {
                return (StatusCode::BAD_REQUEST, Json(ValidationBody { errors })).into_response();
            }
            Self::Service(ServiceError::Conflict(message)) => (StatusCode::CONFLICT, message),
            Self::Service(ServiceError::NotFound(message)) => (StatusCode::NOT_FOUND, message),
            Self::Service(ServiceError::Unavailable(message)) => {
                (StatusCode::SERVICE_UNAVAILABLE, message)
            }
            Self::InvalidBody(rejection) => {
                tracing::debug!("Rejecting request body: {rejection}");
                (StatusCode::BAD_REQUEST, constants::INVALID_BODY.to_string())
            }
        };
        (status, Json(MessageBody::new(message))).into_response()
    }
}
