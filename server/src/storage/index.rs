//! In-memory index of simulations keyed by CPF.
//!
//! Both store backings keep their live state here. Mutations are expressed as
//! `LogRecord`s: a store first *prepares* a record (validating it against the
//! current state), optionally persists it, and then *applies* it.
//!
//! # Invariants
//!
//! - At most one simulation per CPF.
//! - `next_id` is greater than every id ever applied.

use std::collections::HashMap;

use crate::cpf::Cpf;
use crate::storage::{AttributePatch, StoreError};
use crate::storage::record::LogRecord;
use crate::types::{Simulation, SimulationAttributes, SimulationId};

#[derive(Debug)]
pub struct SimulationIndex {
    records: HashMap<Cpf, Simulation>,
    next_id: SimulationId,
}

impl Default for SimulationIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationIndex {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn get(&self, cpf: &Cpf) -> Result<Simulation, StoreError> {
        self.records
            .get(cpf)
            .cloned()
            .ok_or(StoreError::NotFound(*cpf))
    }

    #[must_use]
    pub fn contains(&self, cpf: &Cpf) -> bool {
        self.records.contains_key(cpf)
    }

    /// All simulations in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<Simulation> {
        let mut all: Vec<Simulation> = self.records.values().cloned().collect();
        all.sort_unstable_by_key(|simulation| simulation.id);
        all
    }

    pub fn prepare_insert(
        &self,
        cpf: Cpf,
        attributes: SimulationAttributes,
    ) -> Result<LogRecord, StoreError> {
        if self.contains(&cpf) {
            return Err(StoreError::AlreadyExists(cpf));
        }
        // Applying the insert must be able to advance `next_id`.
        if self.next_id.checked_add(1).is_none() {
            return Err(StoreError::IdsExhausted);
        }
        Ok(LogRecord::Insert(Simulation {
            id: self.next_id,
            cpf,
            attributes,
        }))
    }

    /// Rewrite the attributes of the current record with `patch`.
    ///
    /// The stored id and CPF are kept; only the attributes change.
    pub fn prepare_update(
        &self,
        cpf: &Cpf,
        patch: AttributePatch<'_>,
    ) -> Result<LogRecord, StoreError> {
        let current = self.records.get(cpf).ok_or(StoreError::NotFound(*cpf))?;
        Ok(LogRecord::Update(Simulation {
            id: current.id,
            cpf: current.cpf,
            attributes: patch(&current.attributes),
        }))
    }

    pub fn prepare_delete(&self, cpf: &Cpf) -> Result<LogRecord, StoreError> {
        if !self.contains(cpf) {
            return Err(StoreError::NotFound(*cpf));
        }
        Ok(LogRecord::Delete(*cpf))
    }

    /// Apply a record to the index.
    ///
    /// Records produced by the `prepare_*` methods always apply cleanly.
    /// Records read back from disk may not, in which case the log is
    /// inconsistent and the error is returned unchanged.
    pub fn apply(&mut self, record: LogRecord) -> Result<(), StoreError> {
        match record {
            LogRecord::Insert(simulation) => {
                if self.contains(&simulation.cpf) {
                    return Err(StoreError::AlreadyExists(simulation.cpf));
                }
                let after = simulation
                    .id
                    .checked_add(1)
                    .ok_or(StoreError::IdsExhausted)?;
                self.next_id = self.next_id.max(after);
                self.records.insert(simulation.cpf, simulation);
            }
            LogRecord::Update(simulation) => {
                let slot = self
                    .records
                    .get_mut(&simulation.cpf)
                    .ok_or(StoreError::NotFound(simulation.cpf))?;
                *slot = simulation;
            }
            LogRecord::Delete(cpf) => {
                self.records.remove(&cpf).ok_or(StoreError::NotFound(cpf))?;
            }
        }
        Ok(())
    }
}
