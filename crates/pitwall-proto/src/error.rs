//! Common error types shared across the Pit Wall crates.

use crate::role::RoleId;
use thiserror::Error;

/// Result alias using the shared [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur across the Pit Wall simulator.
///
/// Incomplete lap records (missing position, tyre age, compound) are not
/// errors: they are represented as `Option` fields on [`crate::LapRecord`]
/// and degrade to "unavailable" display values downstream.
#[derive(Debug, Error)]
pub enum Error {
    /// The telemetry provider could not resolve the requested session.
    ///
    /// Fatal to starting a run; recoverable by choosing different
    /// parameters. Never leaves the simulator partially initialized.
    #[error("session data unavailable: {cause}")]
    DataUnavailable { cause: String },

    /// A single role's text-generation call failed.
    ///
    /// Recovered locally by the commentary orchestrator with a neutral
    /// fallback string; never reaches the phase state machine.
    #[error("generator call for {role} failed: {cause}")]
    GeneratorFailure { role: RoleId, cause: String },

    /// The decision-analysis pass failed entirely.
    ///
    /// Surfaced to the user as a single apologetic paragraph.
    #[error("decision analysis failed: {cause}")]
    AnalysisFailure { cause: String },
}

impl Error {
    /// Convenience constructor for provider failures.
    pub fn data_unavailable(cause: impl Into<String>) -> Self {
        Error::DataUnavailable {
            cause: cause.into(),
        }
    }

    /// Convenience constructor for per-role generator failures.
    pub fn generator(role: RoleId, cause: impl Into<String>) -> Self {
        Error::GeneratorFailure {
            role,
            cause: cause.into(),
        }
    }
}
