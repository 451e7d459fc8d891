//! Simulation service.
//!
//! Owns the business rules for simulations: request validation, the
//! uniqueness rule, and the translation of store outcomes into the
//! user-facing error taxonomy.
//!
//! Per CPF the lifecycle is `Absent -> Present -> Absent`:
//!
//! - `create` moves a CPF to `Present`.
//! - `update` changes attributes of a `Present` CPF; the CPF itself never
//!   changes.
//! - `delete` moves a CPF back to `Absent`.
//!
//! # Invariants
//!
//! - Every error is exactly one `ServiceError` kind with a stable message.
//! - A stored simulation never has an empty name.

use std::sync::Arc;

use crate::constants::{self, fields};
use crate::cpf::Cpf;
use crate::storage::{SimulationStore, StoreError};
use crate::types::{FieldErrors, Simulation, SimulationAttributes, SimulationRequest};

/// Errors returned by service operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The request is malformed; messages are keyed by field.
    ValidationFailed(FieldErrors),
    /// The CPF is already taken.
    Conflict(String),
    /// The targeted CPF has no simulation.
    NotFound(String),
    /// A dependency could not serve the request. Transient.
    Unavailable(String),
}

impl ServiceError {
    fn validation(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        Self::ValidationFailed(errors)
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValidationFailed(errors) => write!(f, "validation failed: {errors}"),
            Self::Conflict(message) => write!(f, "conflict: {message}"),
            Self::NotFound(message) => write!(f, "not found: {message}"),
            Self::Unavailable(message) => write!(f, "unavailable: {message}"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Map store failures that no operation expects.
///
/// I/O, corruption and lock poisoning are logged with their cause and
/// surfaced as `Unavailable`.
fn unexpected(operation: &str, error: &StoreError) -> ServiceError {
    tracing::error!("{operation} failed in store: {error}");
    ServiceError::Unavailable(constants::STORAGE_UNAVAILABLE.to_string())
}

pub struct SimulationService {
    store: Arc<dyn SimulationStore>,
}

impl SimulationService {
    #[must_use]
    pub fn new(store: Arc<dyn SimulationStore>) -> Self {
        Self { store }
    }

    /// Validate `request` and store it as a new simulation.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the name is missing/blank or the CPF is
    ///   missing/malformed. All failing fields are reported together.
    /// - `Conflict("CPF já existente")` if the CPF is already present.
    pub fn create(&self, request: SimulationRequest) -> Result<Simulation, ServiceError> {
        let mut errors = FieldErrors::new();

        if request.name.as_deref().is_none_or(is_blank) {
            errors.add(fields::NAME, constants::NAME_EMPTY);
        }

        let cpf = match request.cpf.as_deref().map(str::trim) {
            None | Some("") => {
                errors.add(fields::CPF, constants::CPF_EMPTY);
                None
            }
            Some(raw) => match Cpf::parse(raw) {
                Ok(cpf) => Some(cpf),
                Err(e) => {
                    tracing::debug!("Rejecting malformed CPF '{raw}': {e}");
                    errors.add(fields::CPF, constants::CPF_INVALID);
                    None
                }
            },
        };

        errors.into_result().map_err(ServiceError::ValidationFailed)?;
        let Some(cpf) = cpf else {
            return Err(ServiceError::validation(fields::CPF, constants::CPF_INVALID));
        };

        let attributes = request.merge_into(&SimulationAttributes::default());
        match self.store.insert(cpf, attributes) {
            Ok(simulation) => {
                tracing::info!("Created simulation {} for CPF {}", simulation.id, cpf);
                Ok(simulation)
            }
            Err(StoreError::AlreadyExists(_)) => {
                tracing::debug!("Rejecting duplicate simulation for CPF {cpf}");
                Err(ServiceError::Conflict(constants::CPF_ALREADY_EXISTS.to_string()))
            }
            Err(e) => Err(unexpected("create", &e)),
        }
    }

    /// Look up the simulation for `cpf`.
    ///
    /// Malformed CPFs are simply absent.
    ///
    /// # Errors
    ///
    /// `NotFound("Simulação não encontrada")` if there is no simulation.
    pub fn find(&self, cpf: &str) -> Result<Simulation, ServiceError> {
        let not_found = || ServiceError::NotFound(constants::SIMULATION_NOT_FOUND.to_string());
        let cpf = Cpf::parse(cpf).map_err(|_| not_found())?;
        match self.store.find_by_cpf(&cpf) {
            Ok(simulation) => Ok(simulation),
            Err(StoreError::NotFound(_)) => Err(not_found()),
            Err(e) => Err(unexpected("find", &e)),
        }
    }

    /// Every simulation, in creation order. Empty if there are none.
    pub fn list(&self) -> Result<Vec<Simulation>, ServiceError> {
        self.store.list_all().map_err(|e| unexpected("list", &e))
    }

    /// Update the simulation stored under `cpf` with the fields present in
    /// `request`. Fields absent from the request keep their values.
    ///
    /// The body may repeat the path CPF; naming a different CPF is an attempt
    /// to change identity and is rejected.
    ///
    /// # Errors
    ///
    /// - `NotFound("CPF {cpf} não encontrado")` if `cpf` has no simulation.
    /// - `Conflict("CPF {other} já existe")` if the body names a different
    ///   CPF that already has a simulation.
    /// - `ValidationFailed` if the body names a different CPF that is free or
    ///   malformed, or supplies a blank name.
    pub fn update(&self, cpf: &str, request: SimulationRequest) -> Result<Simulation, ServiceError> {
        let target = self.ensure_present(cpf)?;

        let mut errors = FieldErrors::new();

        let requested_cpf = request.cpf.as_deref().map(str::trim).filter(|s| !s.is_empty());
        if let Some(requested) = requested_cpf {
            if requested != cpf {
                match Cpf::parse(requested) {
                    Ok(other) if other == target => {}
                    Ok(other) => {
                        let taken = self
                            .store
                            .contains(&other)
                            .map_err(|e| unexpected("update", &e))?;
                        if taken {
                            tracing::debug!("Rejecting move of CPF {target} onto existing {other}");
                            return Err(ServiceError::Conflict(constants::cpf_taken(requested)));
                        }
                        errors.add(fields::CPF, constants::CPF_IMMUTABLE);
                    }
                    Err(_) => errors.add(fields::CPF, constants::CPF_INVALID),
                }
            }
        }

        if request.name.as_deref().is_some_and(is_blank) {
            errors.add(fields::NAME, constants::NAME_EMPTY);
        }

        errors.into_result().map_err(ServiceError::ValidationFailed)?;

        let patch = |current: &SimulationAttributes| request.merge_into(current);
        match self.store.update(&target, &patch) {
            Ok(simulation) => {
                tracing::info!("Updated simulation {} for CPF {}", simulation.id, target);
                Ok(simulation)
            }
            Err(StoreError::NotFound(_)) => {
                Err(ServiceError::NotFound(constants::cpf_not_found(cpf)))
            }
            Err(e) => Err(unexpected("update", &e)),
        }
    }

    /// Check that `cpf` has a simulation that can be updated.
    ///
    /// # Errors
    ///
    /// `NotFound("CPF {cpf} não encontrado")` if it has none.
    pub fn ensure_present(&self, cpf: &str) -> Result<Cpf, ServiceError> {
        let not_found = || ServiceError::NotFound(constants::cpf_not_found(cpf));
        let target = Cpf::parse(cpf).map_err(|_| not_found())?;
        match self.store.contains(&target) {
            Ok(true) => Ok(target),
            Ok(false) => Err(not_found()),
            Err(e) => Err(unexpected("update", &e)),
        }
    }

    /// Remove the simulation stored under `cpf`.
    ///
    /// # Errors
    ///
    /// `NotFound("Simulação não encontrada")` if there is no simulation.
    pub fn delete(&self, cpf: &str) -> Result<(), ServiceError> {
        let not_found = || ServiceError::NotFound(constants::SIMULATION_NOT_FOUND.to_string());
        let cpf = Cpf::parse(cpf).map_err(|_| not_found())?;
        match self.store.delete(&cpf) {
            Ok(()) => {
                tracing::info!("Deleted simulation for CPF {cpf}");
                Ok(())
            }
            Err(StoreError::NotFound(_)) => Err(not_found()),
            Err(e) => Err(unexpected("delete", &e)),
        }
    }

    /// Create each seed simulation whose CPF is not already present.
    ///
    /// Returns how many were created. Seeding an already-seeded store is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns the first error other than a duplicate CPF.
    pub fn seed(
        &self,
        seeds: impl IntoIterator<Item = SimulationRequest>,
    ) -> Result<usize, ServiceError> {
        let mut created = 0;
        for request in seeds {
            match self.create(request) {
                Ok(_) => created += 1,
                Err(ServiceError::Conflict(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(created)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// The simulations a fresh deployment starts with.
#[must_use]
pub fn default_seed() -> Vec<SimulationRequest> {
    vec![
        SimulationRequest {
            email: Some("fulano@gmail.com".to_string()),
            amount: Some(11000.0),
            installments: Some(3),
            insurance: Some(true),
            ..SimulationRequest::new("66414919004", "Fulano")
        },
        SimulationRequest {
            email: Some("deltrano@gmail.com".to_string()),
            amount: Some(20000.0),
            installments: Some(5),
            insurance: Some(false),
            ..SimulationRequest::new("17822386034", "Deltrano")
        },
    ]
}
