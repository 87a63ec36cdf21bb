//! Crate-wide error type.
//!
//! Mirrors the error taxonomy of §7: contract violations and integration
//! violations are fatal and raised synchronously at the API boundary.
//! Transient physics failures and invalid numeric input are *not* part of
//! this enum — those are recoverable by policy and handled inline (see
//! `collision::solve`).

use thiserror::Error;

/// Crate-wide error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A construction/registration-time contract was violated: missing host
    /// capability, malformed mode meta, duplicate or unknown mode id,
    /// non-callable update.
    #[error("contract violation: {0}")]
    Contract(String),

    /// A capability negotiation failed at runtime: the player-model handle
    /// does not support the operation the orchestrator needed.
    #[error("integration violation: {0}")]
    Integration(String),

    /// Configuration was rejected outright (not just clamped).
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    #[inline]
    pub fn contract<S: Into<String>>(msg: S) -> Self {
        Self::Contract(msg.into())
    }

    #[inline]
    pub fn integration<S: Into<String>>(msg: S) -> Self {
        Self::Integration(msg.into())
    }

    #[inline]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    #[inline]
    pub fn is_contract(&self) -> bool {
        matches!(self, Error::Contract(_))
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message() {
        let e = Error::contract("duplicate mode id 'third'");
        assert!(e.to_string().contains("duplicate mode id"));
    }

    #[test]
    fn is_contract_discriminates() {
        assert!(Error::contract("x").is_contract());
        assert!(!Error::config("x").is_contract());
    }
}
