//! Brazilian individual taxpayer identifier (CPF).
//!
//! A CPF is an 11-digit string where the last two digits are check digits
//! computed from the preceding ones with a weighted mod-11 sum.
//!
//! # Invariants
//!
//! - A `Cpf` value always holds exactly 11 ASCII digits.
//! - Its check digits are always consistent with the first nine digits.
//! - It is never a sequence of a single repeated digit.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of digits in a CPF.
pub const CPF_LENGTH: usize = 11;

/// Reason a candidate string is not a valid CPF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpfError {
    /// The candidate does not have exactly 11 characters.
    WrongLength(usize),
    /// The candidate contains a character that is not an ASCII digit.
    NonDigit,
    /// Every digit is the same (e.g. `11111111111`).
    RepeatedDigits,
    /// One of the two check digits does not match.
    CheckDigitMismatch,
}

impl fmt::Display for CpfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength(len) => {
                write!(f, "CPF must have {CPF_LENGTH} digits, got {len}")
            }
            Self::NonDigit => write!(f, "CPF must contain only digits"),
            Self::RepeatedDigits => write!(f, "CPF must not be a repeated digit sequence"),
            Self::CheckDigitMismatch => write!(f, "CPF check digits do not match"),
        }
    }
}

impl std::error::Error for CpfError {}

/// A validated CPF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cpf([u8; CPF_LENGTH]);

impl Cpf {
    /// Parse and validate a CPF.
    ///
    /// Only bare digits are accepted; punctuated forms such as
    /// `970.932.360-14` are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use simulacao::cpf::{Cpf, CpfError};
    ///
    /// assert!(Cpf::parse("97093236014").is_ok());
    /// assert_eq!(Cpf::parse("11111111111"), Err(CpfError::RepeatedDigits));
    /// ```
    pub fn parse(candidate: &str) -> Result<Self, CpfError> {
        let len = candidate.chars().count();
        if len != CPF_LENGTH {
            return Err(CpfError::WrongLength(len));
        }
        let bytes = candidate.as_bytes();
        if !bytes.iter().all(u8::is_ascii_digit) {
            return Err(CpfError::NonDigit);
        }

        let mut digits = [0u8; CPF_LENGTH];
        for (digit, byte) in digits.iter_mut().zip(bytes) {
            *digit = byte - b'0';
        }

        if digits.iter().all(|&d| d == digits[0]) {
            return Err(CpfError::RepeatedDigits);
        }

        let first = check_digit(&digits[..9]);
        let second = check_digit(&digits[..10]);
        if digits[9] != first || digits[10] != second {
            return Err(CpfError::CheckDigitMismatch);
        }

        Ok(Self(digits))
    }

    /// Generate a random valid CPF.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        loop {
            let mut digits = [0u8; CPF_LENGTH];
            for digit in &mut digits[..9] {
                *digit = rng.random_range(0..10);
            }
            // Repeated base digits always yield repeated check digits too.
            if digits[..9].iter().all(|&d| d == digits[0]) {
                continue;
            }
            digits[9] = check_digit(&digits[..9]);
            digits[10] = check_digit(&digits[..10]);
            return Self(digits);
        }
    }
}

/// Returns true if `candidate` is a well-formed CPF.
///
/// Never panics; any malformed input yields `false`.
#[must_use]
pub fn is_valid(candidate: &str) -> bool {
    Cpf::parse(candidate).is_ok()
}

/// Compute the check digit for a prefix of 9 or 10 digits.
///
/// Weights run from `prefix.len() + 1` on the first digit down to 2 on the last.
#[allow(clippy::cast_possible_truncation)] // remainder < 11
fn check_digit(prefix: &[u8]) -> u8 {
    let sum: u32 = prefix
        .iter()
        .rev()
        .zip(2u32..)
        .map(|(&digit, weight)| u32::from(digit) * weight)
        .sum();
    let remainder = (sum * 10) % 11;
    if remainder == 10 { 0 } else { remainder as u8 }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.0 {
            write!(f, "{digit}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Cpf {
    type Err = CpfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Cpf {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cpf {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
