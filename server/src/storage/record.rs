//! On-disk record format for the simulation log.
//!
//! # Record Format
//!
//! ```text
//! +----------+--------------------------------------------------+
//! | 0-3      | record_length (4 bytes, includes header+checksum)|
//! | 4        | record_type (1 byte)                             |
//! | 5-N      | payload (JSON, variable)                         |
//! | N-N+3    | CRC32 checksum (4 bytes)                         |
//! +----------+--------------------------------------------------+
//! ```
//!
//! The checksum covers every byte before it, including the length.

use crate::cpf::Cpf;
use crate::types::Simulation;

/// `record_length` (4) + `record_type` (1).
pub const RECORD_HEADER_SIZE: usize = 5;

/// CRC32 checksum size at end of record.
pub const CHECKSUM_SIZE: usize = 4;

/// Log record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LogRecordType {
    Insert = 0x01,
    Update = 0x02,
    Delete = 0x03,
}

impl TryFrom<u8> for LogRecordType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Insert),
            0x02 => Ok(Self::Update),
            0x03 => Ok(Self::Delete),
            _ => Err(value),
        }
    }
}

/// A single mutation of the simulation set.
#[derive(Debug, Clone, PartialEq)]
pub enum LogRecord {
    /// A new simulation, with its assigned id.
    Insert(Simulation),
    /// The full replacement value of an existing simulation.
    Update(Simulation),
    /// Removal of the simulation with this CPF.
    Delete(Cpf),
}

impl LogRecord {
    #[must_use]
    pub const fn record_type(&self) -> LogRecordType {
        match self {
            Self::Insert(_) => LogRecordType::Insert,
            Self::Update(_) => LogRecordType::Update,
            Self::Delete(_) => LogRecordType::Delete,
        }
    }

    /// Serialize this record to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        let payload = match self {
            Self::Insert(simulation) | Self::Update(simulation) => {
                serde_json::to_vec(simulation)
            }
            Self::Delete(cpf) => serde_json::to_vec(cpf),
        }
        .map_err(RecordError::Payload)?;

        let total_len = RECORD_HEADER_SIZE + payload.len() + CHECKSUM_SIZE;
        let length_field = u32::try_from(total_len).map_err(|_| RecordError::TooLarge(total_len))?;

        let mut bytes = Vec::with_capacity(total_len);
        bytes.extend_from_slice(&length_field.to_le_bytes());
        bytes.push(self.record_type() as u8);
        bytes.extend_from_slice(&payload);

        let checksum = crc32fast::hash(&bytes);
        bytes.extend_from_slice(&checksum.to_le_bytes());

        Ok(bytes)
    }

    /// Deserialize a record from the front of `bytes`.
    ///
    /// Returns the record and the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Truncated` if `bytes` ends before the record
    /// does, which is what a torn final write looks like.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize), RecordError> {
        if bytes.len() < RECORD_HEADER_SIZE + CHECKSUM_SIZE {
            return Err(RecordError::Truncated);
        }

        let record_len = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        if record_len < RECORD_HEADER_SIZE + CHECKSUM_SIZE {
            return Err(RecordError::CorruptRecord);
        }
        if record_len > bytes.len() {
            return Err(RecordError::Truncated);
        }

        let stored_checksum = u32::from_le_bytes([
            bytes[record_len - 4],
            bytes[record_len - 3],
            bytes[record_len - 2],
            bytes[record_len - 1],
        ]);
        let computed_checksum = crc32fast::hash(&bytes[..record_len - CHECKSUM_SIZE]);
        if stored_checksum != computed_checksum {
            return Err(RecordError::ChecksumMismatch {
                expected: stored_checksum,
                actual: computed_checksum,
            });
        }

        let record_type =
            LogRecordType::try_from(bytes[4]).map_err(RecordError::InvalidRecordType)?;
        let payload = &bytes[RECORD_HEADER_SIZE..record_len - CHECKSUM_SIZE];

        let record = match record_type {
            LogRecordType::Insert => {
                Self::Insert(serde_json::from_slice(payload).map_err(RecordError::Payload)?)
            }
            LogRecordType::Update => {
                Self::Update(serde_json::from_slice(payload).map_err(RecordError::Payload)?)
            }
            LogRecordType::Delete => {
                Self::Delete(serde_json::from_slice(payload).map_err(RecordError::Payload)?)
            }
        };

        Ok((record, record_len))
    }
}

/// Errors from encoding or decoding a log record.
#[derive(Debug)]
pub enum RecordError {
    /// The buffer ends before the record does.
    Truncated,
    /// The length field is impossible.
    CorruptRecord,
    /// Invalid record type byte.
    InvalidRecordType(u8),
    /// Checksum mismatch.
    ChecksumMismatch { expected: u32, actual: u32 },
    /// The encoded record does not fit the length field.
    TooLarge(usize),
    /// The JSON payload could not be encoded or decoded.
    Payload(serde_json::Error),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Truncated => write!(f, "truncated log record"),
            Self::CorruptRecord => write!(f, "corrupt log record"),
            Self::InvalidRecordType(t) => write!(f, "invalid log record type: 0x{t:02x}"),
            Self::ChecksumMismatch { expected, actual } => {
                write!(
                    f,
                    "log checksum mismatch: expected 0x{expected:08x}, got 0x{actual:08x}"
                )
            }
            Self::TooLarge(size) => write!(f, "log record too large: {size} bytes"),
            Self::Payload(e) => write!(f, "invalid log record payload: {e}"),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Payload(e) => Some(e),
            _ => None,
        }
    }
}
