//! Handler for `/restricoes/{cpf}`.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::AppState;
use super::error::{ApiError, MessageBody};
use crate::constants;
use crate::restriction::check_with_timeout;
use crate::service::ServiceError;

/// 200 with a message if `cpf` is restricted, 204 if it is not.
pub async fn check(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
) -> Result<Response, ApiError> {
    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected for shared state
    let lookup = std::sync::Arc::clone(&state.restrictions);
    match check_with_timeout(lookup, cpf.clone(), state.restriction_timeout).await {
        Ok(true) => Ok(Json(MessageBody::new(constants::cpf_restricted(&cpf))).into_response()),
        Ok(false) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(e) => {
            tracing::warn!("Restriction lookup for {cpf} failed: {e}");
            Err(ServiceError::Unavailable(constants::RESTRICTIONS_UNAVAILABLE.to_string()).into())
        }
    }
}
