//! Simulation records and request payloads.

use serde::{Deserialize, Serialize};

use crate::cpf::Cpf;

/// Identifier assigned by the store on insert.
///
/// Ids increase monotonically and are never reused, so ordering by id is
/// ordering by insertion.
pub type SimulationId = u64;

/// The non-key attributes of a simulation.
///
/// Everything except `name` is an opaque payload: it is stored and returned
/// as-is and carries no validation rules.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationAttributes {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "valor", default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(rename = "parcelas", default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    #[serde(rename = "seguro", default, skip_serializing_if = "Option::is_none")]
    pub insurance: Option<bool>,
}

/// A stored simulation.
///
/// # Invariants
///
/// - `cpf` never changes after the record is created.
/// - `attributes.name` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub id: SimulationId,
    pub cpf: Cpf,
    #[serde(flatten)]
    pub attributes: SimulationAttributes,
}

impl Simulation {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.attributes.name
    }
}

/// A simulation as submitted by a client, before validation.
///
/// Every field is optional so that missing fields surface as validation
/// errors rather than deserialization failures. A client-supplied `id` is
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulationRequest {
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "valor", default)]
    pub amount: Option<f64>,
    #[serde(rename = "parcelas", default)]
    pub installments: Option<u32>,
    #[serde(rename = "seguro", default)]
    pub insurance: Option<bool>,
}

impl SimulationRequest {
    /// Build a request with only a CPF and a name set.
    #[must_use]
    pub fn new(cpf: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            cpf: Some(cpf.into()),
            ..Self::default()
        }
    }

    /// Overlay the fields present in this request onto `current`.
    ///
    /// Fields absent from the request keep their current value. The caller is
    /// responsible for validating `name` beforehand.
    #[must_use]
    pub fn merge_into(&self, current: &SimulationAttributes) -> SimulationAttributes {
        SimulationAttributes {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            email: self.email.clone().or_else(|| current.email.clone()),
            amount: self.amount.or(current.amount),
            installments: self.installments.or(current.installments),
            insurance: self.insurance.or(current.insurance),
        }
    }
}
