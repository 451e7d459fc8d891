//! Restriction lookup.
//!
//! Answers whether a CPF is flagged as restricted. The lookup is an external
//! dependency from the service's point of view: it is queried on its own
//! route and is never consulted when simulations are created.
//!
//! # Invariants
//!
//! - A lookup failure is reported as `RestrictionError::Unavailable`, never
//!   as "not restricted".
//! - `check_with_timeout` always returns within its timeout.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::cpf::{Cpf, CpfError};

/// CPFs restricted when no restrictions file is configured.
pub const DEFAULT_RESTRICTED_CPFS: [&str; 10] = [
    "97093236014",
    "60094146012",
    "84809766080",
    "62648716050",
    "26276298085",
    "01317496094",
    "55856777050",
    "19626829001",
    "24094592008",
    "58063164083",
];

/// Source of restriction flags.
pub trait RestrictionLookup: Send + Sync {
    /// Returns whether `cpf` is currently restricted.
    ///
    /// Malformed CPFs are never restricted.
    ///
    /// # Errors
    ///
    /// Returns `RestrictionError::Unavailable` if the source cannot be reached.
    fn has_restriction(&self, cpf: &str) -> Result<bool, RestrictionError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestrictionError {
    /// The restriction source could not answer.
    Unavailable(String),
}

impl std::fmt::Display for RestrictionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "restriction lookup unavailable: {reason}"),
        }
    }
}

impl std::error::Error for RestrictionError {}

/// Error returned when loading a restrictions file fails.
#[derive(Debug)]
pub enum RestrictionLoadError {
    Io(std::io::Error),
    InvalidCpf { line: usize, error: CpfError },
}

impl std::fmt::Display for RestrictionLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read restrictions file: {e}"),
            Self::InvalidCpf { line, error } => {
                write!(f, "invalid CPF on line {line}: {error}")
            }
        }
    }
}

impl std::error::Error for RestrictionLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::InvalidCpf { error, .. } => Some(error),
        }
    }
}

/// A fixed set of restricted CPFs.
#[derive(Debug, Clone, Default)]
pub struct FixedRestrictionList {
    restricted: HashSet<Cpf>,
}

impl FixedRestrictionList {
    #[must_use]
    pub fn new(restricted: impl IntoIterator<Item = Cpf>) -> Self {
        Self {
            restricted: restricted.into_iter().collect(),
        }
    }

    /// The built-in dataset (`DEFAULT_RESTRICTED_CPFS`).
    #[must_use]
    pub fn default_dataset() -> Self {
        Self::new(
            DEFAULT_RESTRICTED_CPFS
                .iter()
                .filter_map(|raw| Cpf::parse(raw).ok()),
        )
    }

    /// Parse a restrictions list: one CPF per line, blank lines and lines
    /// starting with `#` ignored.
    pub fn parse(contents: &str) -> Result<Self, RestrictionLoadError> {
        let mut restricted = HashSet::new();
        for (number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let cpf = Cpf::parse(line).map_err(|error| RestrictionLoadError::InvalidCpf {
                line: number + 1,
                error,
            })?;
            restricted.insert(cpf);
        }
        Ok(Self { restricted })
    }

    pub fn from_file(path: &Path) -> Result<Self, RestrictionLoadError> {
        let contents = std::fs::read_to_string(path).map_err(RestrictionLoadError::Io)?;
        Self::parse(&contents)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.restricted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.restricted.is_empty()
    }
}

impl RestrictionLookup for FixedRestrictionList {
    fn has_restriction(&self, cpf: &str) -> Result<bool, RestrictionError> {
        Ok(Cpf::parse(cpf).is_ok_and(|cpf| self.restricted.contains(&cpf)))
    }
}

/// Query `lookup` on the blocking pool, giving up after `timeout`.
///
/// # Errors
///
/// Returns `RestrictionError::Unavailable` if the lookup fails, panics, or
/// does not answer in time.
pub async fn check_with_timeout(
    lookup: Arc<dyn RestrictionLookup>,
    cpf: String,
    timeout: Duration,
) -> Result<bool, RestrictionError> {
    let task = tokio::task::spawn_blocking(move || lookup.has_restriction(&cpf));
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(RestrictionError::Unavailable(format!(
            "lookup task failed: {join_error}"
        ))),
        Err(_) => Err(RestrictionError::Unavailable(format!(
            "no answer within {}ms",
            timeout.as_millis()
        ))),
    }
}
