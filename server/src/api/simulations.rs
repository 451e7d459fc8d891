//! Handlers for `/simulacoes`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;

use super::AppState;
use super::error::{ApiError, MessageBody};
use crate::constants;
use crate::types::{Simulation, SimulationRequest};

#[derive(Debug, Serialize)]
pub struct SimulationList {
    #[serde(rename = "mensagem")]
    message: &'static str,
    #[serde(rename = "simulacoes")]
    simulations: Vec<Simulation>,
}

#[derive(Debug, Serialize)]
pub struct SimulationEnvelope {
    #[serde(rename = "mensagem")]
    message: &'static str,
    #[serde(rename = "simulacao")]
    simulation: Simulation,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<SimulationList>, ApiError> {
    let simulations = state.service.list()?;
    Ok(Json(SimulationList {
        message: constants::SIMULATIONS_FOUND,
        simulations,
    }))
}

pub async fn find(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
) -> Result<Json<SimulationEnvelope>, ApiError> {
    let simulation = state.service.find(&cpf)?;
    Ok(Json(SimulationEnvelope {
        message: constants::SIMULATION_FOUND,
        simulation,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<SimulationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SimulationEnvelope>), ApiError> {
    let Json(request) = payload?;
    let simulation = state.service.create(request)?;
    Ok((
        StatusCode::CREATED,
        Json(SimulationEnvelope {
            message: constants::SIMULATION_CREATED,
            simulation,
        }),
    ))
}

/// Responds with the updated simulation itself, not an envelope.
///
/// An absent CPF is reported before anything about the body, including a
/// body that does not decode.
pub async fn update(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
    payload: Result<Json<SimulationRequest>, JsonRejection>,
) -> Result<Json<Simulation>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            state.service.ensure_present(&cpf)?;
            return Err(rejection.into());
        }
    };
    Ok(Json(state.service.update(&cpf, request)?))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    state.service.delete(&cpf)?;
    Ok(Json(MessageBody::new(constants::SIMULATION_REMOVED)))
}
