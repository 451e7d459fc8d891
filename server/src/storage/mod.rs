//! Simulation storage.
//!
//! The service talks to storage only through the `SimulationStore` trait.
//! Two backings are provided:
//!
//! - `MemoryStore`: a lock-guarded in-process index, used in tests and when
//!   no data directory is configured.
//! - `LogStore`: the same index, made durable by an append-only file of
//!   CRC-checked records that is replayed on open.
//!
//! # Invariants
//!
//! - At most one simulation exists per CPF. Insert checks and inserts under a
//!   single write lock, so concurrent inserts of one CPF cannot both succeed.
//! - Lookup by CPF is a hash map access, never a scan.

mod index;
mod log_store;
mod memory;
mod record;

pub use index::SimulationIndex;
pub use log_store::{LogStore, ReplayResult};
pub use memory::MemoryStore;
pub use record::{LogRecord, LogRecordType, RecordError};

use std::path::Path;
use std::sync::Arc;

use crate::cpf::Cpf;
use crate::types::{Simulation, SimulationAttributes};

/// Rewrites the attributes of an existing simulation. Runs under the store's
/// write lock, so it always sees the latest committed value.
pub type AttributePatch<'a> = &'a dyn Fn(&SimulationAttributes) -> SimulationAttributes;

/// Keyed collection of simulations.
///
/// All operations are atomic with respect to a single CPF.
pub trait SimulationStore: Send + Sync {
    /// Insert a new simulation and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if the CPF is already present.
    fn insert(&self, cpf: Cpf, attributes: SimulationAttributes) -> Result<Simulation, StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the CPF is absent.
    fn find_by_cpf(&self, cpf: &Cpf) -> Result<Simulation, StoreError>;

    /// Replace the attributes of an existing simulation with
    /// `patch(current)`. Reading the current value and writing the new one
    /// happen atomically.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the CPF is absent.
    fn update(&self, cpf: &Cpf, patch: AttributePatch<'_>) -> Result<Simulation, StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the CPF is absent.
    fn delete(&self, cpf: &Cpf) -> Result<(), StoreError>;

    /// Every stored simulation, in insertion order.
    fn list_all(&self) -> Result<Vec<Simulation>, StoreError>;

    fn contains(&self, cpf: &Cpf) -> Result<bool, StoreError>;
}

/// Errors that can occur during store operations.
#[derive(Debug)]
pub enum StoreError {
    /// A simulation with this CPF already exists.
    AlreadyExists(Cpf),
    /// No simulation with this CPF exists.
    NotFound(Cpf),
    /// File I/O error.
    Io(std::io::Error),
    /// The log file is damaged before its final record, or its records do
    /// not replay cleanly.
    Corrupt { offset: u64, reason: String },
    /// A record could not be encoded for writing.
    Encode(RecordError),
    /// A thread panicked while holding the store lock.
    LockPoisoned,
    /// No simulation id is left to assign.
    IdsExhausted,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyExists(cpf) => write!(f, "simulation for CPF {cpf} already exists"),
            Self::NotFound(cpf) => write!(f, "no simulation for CPF {cpf}"),
            Self::Io(e) => write!(f, "store I/O error: {e}"),
            Self::Corrupt { offset, reason } => {
                write!(f, "corrupt log at offset {offset}: {reason}")
            }
            Self::Encode(e) => write!(f, "failed to encode log record: {e}"),
            Self::LockPoisoned => write!(f, "store lock poisoned"),
            Self::IdsExhausted => write!(f, "simulation ids exhausted"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Encode(e) => Some(e),
            Self::AlreadyExists(_)
            | Self::NotFound(_)
            | Self::Corrupt { .. }
            | Self::LockPoisoned
            | Self::IdsExhausted => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// A store ready to serve requests.
pub struct OpenedStore {
    pub store: Arc<dyn SimulationStore>,
    /// True if the store has never held any simulation. A log that has
    /// records, even if they all cancel out, is not new.
    pub is_new: bool,
}

/// Open the durable log at `log_path`, or an in-memory store if there is none.
///
/// # Errors
///
/// Returns the error from `LogStore::open`.
pub fn open_store(log_path: Option<&Path>) -> Result<OpenedStore, StoreError> {
    let Some(path) = log_path else {
        return Ok(OpenedStore {
            store: Arc::new(MemoryStore::new()),
            is_new: true,
        });
    };

    let (store, replay) = LogStore::open(path)?;
    tracing::info!(
        "Opened {}: replayed {} records, discarded {} bytes",
        store.path().display(),
        replay.records_replayed,
        replay.bytes_discarded
    );
    Ok(OpenedStore {
        store: Arc::new(store),
        is_new: replay.records_replayed == 0,
    })
}
