//! HTTP surface.
//!
//! Handlers translate between JSON and the service; every service outcome
//! maps to exactly one status code (see `error.rs`).

mod error;
mod restrictions;
mod simulations;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;

pub use error::{ApiError, MessageBody};

use crate::restriction::RestrictionLookup;
use crate::service::SimulationService;

/// Prefix every route is mounted under.
pub const BASE_PATH: &str = "/api/v1";

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SimulationService>,
    pub restrictions: Arc<dyn RestrictionLookup>,
    pub restriction_timeout: Duration,
}

/// Build the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/simulacoes",
            get(simulations::list).post(simulations::create),
        )
        .route(
            "/simulacoes/{cpf}",
            get(simulations::find)
                .put(simulations::update)
                .delete(simulations::remove),
        )
        .route("/restricoes/{cpf}", get(restrictions::check));

    Router::new().nest(BASE_PATH, api).with_state(state)
}
