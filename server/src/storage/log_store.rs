//! Durable simulation store backed by an append-only log file.
//!
//! Every mutation is encoded as a `LogRecord`, appended to the file and
//! synced before it is applied to the in-memory index. Opening the store
//! replays the file from the start.
//!
//! # Recovery
//!
//! - A truncated final record, or a final record whose checksum does not
//!   match, is a torn write: it is discarded and the file is cut back to the
//!   last good record. A record whose length runs past the end of the file is
//!   only torn if no intact record follows it; otherwise its length field is
//!   damaged.
//! - Any damaged record before the final one makes the log `Corrupt`; the
//!   store refuses to open rather than silently dropping data.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::cpf::Cpf;
use crate::storage::record::{
    CHECKSUM_SIZE, LogRecord, LogRecordType, RECORD_HEADER_SIZE, RecordError,
};
use crate::storage::{AttributePatch, SimulationIndex, SimulationStore, StoreError};
use crate::types::{Simulation, SimulationAttributes};

/// Summary of what happened while replaying the log on open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayResult {
    /// Number of records applied.
    pub records_replayed: usize,
    /// Number of bytes discarded from a torn tail.
    pub bytes_discarded: u64,
}

struct LogState {
    index: SimulationIndex,
    file: File,
    /// Length of the valid prefix of the file.
    len: u64,
}

pub struct LogStore {
    path: PathBuf,
    state: RwLock<LogState>,
}

impl LogStore {
    /// Open the log at `path`, creating it if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file cannot be opened, read or
    /// truncated, and `StoreError::Corrupt` if it is damaged before its tail.
    pub fn open(path: &Path) -> Result<(Self, ReplayResult), StoreError> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        let (index, valid_len, records_replayed) = replay(&bytes)?;
        let total_len = bytes.len() as u64;
        let bytes_discarded = total_len - valid_len;

        if bytes_discarded > 0 {
            tracing::warn!(
                "Discarding {} bytes of torn tail from {}",
                bytes_discarded,
                path.display()
            );
            file.set_len(valid_len)?;
            file.sync_all()?;
        }

        let store = Self {
            path: path.to_path_buf(),
            state: RwLock::new(LogState {
                index,
                file,
                len: valid_len,
            }),
        };
        Ok((
            store,
            ReplayResult {
                records_replayed,
                bytes_discarded,
            },
        ))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `record`, then apply it to the index.
    ///
    /// On a failed write the file is cut back to its previous length so a
    /// partial record never sits in front of later appends.
    fn commit(state: &mut LogState, record: LogRecord) -> Result<(), StoreError> {
        let bytes = record.to_bytes().map_err(StoreError::Encode)?;

        let written = state
            .file
            .write_all(&bytes)
            .and_then(|()| state.file.sync_data());
        if let Err(e) = written {
            tracing::error!("Failed to append log record: {e}");
            if let Err(rollback) = state.file.set_len(state.len) {
                tracing::error!("Failed to roll back partial log record: {rollback}");
            }
            return Err(StoreError::Io(e));
        }

        state.len += bytes.len() as u64;
        state.index.apply(record)
    }
}

/// Rebuild the index from raw log bytes.
///
/// Returns the index, the length of the valid prefix and the number of
/// records applied.
fn replay(bytes: &[u8]) -> Result<(SimulationIndex, u64, usize), StoreError> {
    let mut index = SimulationIndex::new();
    let mut offset = 0usize;
    let mut records = 0usize;

    while offset < bytes.len() {
        let rest = &bytes[offset..];
        match LogRecord::from_bytes(rest) {
            Ok((record, consumed)) => {
                index.apply(record).map_err(|e| StoreError::Corrupt {
                    offset: offset as u64,
                    reason: e.to_string(),
                })?;
                offset += consumed;
                records += 1;
            }
            Err(RecordError::Truncated) if !contains_record(rest) => break,
            Err(RecordError::ChecksumMismatch { .. })
                if is_final_record(rest) && !contains_record(rest) =>
            {
                break;
            }
            Err(e) => {
                return Err(StoreError::Corrupt {
                    offset: offset as u64,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok((index, offset as u64, records))
}

/// Whether an intact record starts anywhere after the first byte of `rest`.
///
/// A torn write leaves at most one partial record, so finding a whole one
/// behind it means the bytes in front were damaged, not torn.
fn contains_record(rest: &[u8]) -> bool {
    (1..rest.len()).any(|start| {
        rest.get(start + 4)
            .is_some_and(|&kind| LogRecordType::try_from(kind).is_ok())
            && LogRecord::from_bytes(&rest[start..]).is_ok()
    })
}

/// Whether the record at the front of `rest` extends exactly to its end.
fn is_final_record(rest: &[u8]) -> bool {
    if rest.len() < RECORD_HEADER_SIZE + CHECKSUM_SIZE {
        return true;
    }
    let record_len = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
    record_len == rest.len()
}

impl SimulationStore for LogStore {
    fn insert(&self, cpf: Cpf, attributes: SimulationAttributes) -> Result<Simulation, StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        let record = state.index.prepare_insert(cpf, attributes)?;
        Self::commit(&mut state, record)?;
        state.index.get(&cpf)
    }

    fn find_by_cpf(&self, cpf: &Cpf) -> Result<Simulation, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        state.index.get(cpf)
    }

    fn update(&self, cpf: &Cpf, patch: AttributePatch<'_>) -> Result<Simulation, StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        let record = state.index.prepare_update(cpf, patch)?;
        Self::commit(&mut state, record)?;
        state.index.get(cpf)
    }

    fn delete(&self, cpf: &Cpf) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        let record = state.index.prepare_delete(cpf)?;
        Self::commit(&mut state, record)
    }

    fn list_all(&self) -> Result<Vec<Simulation>, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.index.list())
    }

    fn contains(&self, cpf: &Cpf) -> Result<bool, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.index.contains(cpf))
    }
}
