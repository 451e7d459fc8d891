use std::sync::RwLock;

use crate::cpf::Cpf;
use crate::storage::{AttributePatch, SimulationIndex, SimulationStore, StoreError};
use crate::types::{Simulation, SimulationAttributes};

/// Non-durable store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    index: RwLock<SimulationIndex>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SimulationStore for MemoryStore {
    fn insert(&self, cpf: Cpf, attributes: SimulationAttributes) -> Result<Simulation, StoreError> {
        let mut index = self.index.write().map_err(|_| StoreError::LockPoisoned)?;
        let record = index.prepare_insert(cpf, attributes)?;
        index.apply(record)?;
        index.get(&cpf)
    }

    fn find_by_cpf(&self, cpf: &Cpf) -> Result<Simulation, StoreError> {
        let index = self.index.read().map_err(|_| StoreError::LockPoisoned)?;
        index.get(cpf)
    }

    fn update(&self, cpf: &Cpf, patch: AttributePatch<'_>) -> Result<Simulation, StoreError> {
        let mut index = self.index.write().map_err(|_| StoreError::LockPoisoned)?;
        let record = index.prepare_update(cpf, patch)?;
        index.apply(record)?;
        index.get(cpf)
    }

    fn delete(&self, cpf: &Cpf) -> Result<(), StoreError> {
        let mut index = self.index.write().map_err(|_| StoreError::LockPoisoned)?;
        let record = index.prepare_delete(cpf)?;
        index.apply(record)
    }

    fn list_all(&self) -> Result<Vec<Simulation>, StoreError> {
        let index = self.index.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(index.list())
    }

    fn contains(&self, cpf: &Cpf) -> Result<bool, StoreError> {
        let index = self.index.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(index.contains(cpf))
    }
}
