//! Error types for period resolution and ranking queries.
//!
//! This module defines [`PeriodError`]. The first group of variants reports malformed
//! caller input (an unknown statement or period name, a year outside the configured
//! bounds) and is never repaired silently. Illegal *combinations* of otherwise valid
//! inputs are not errors: the resolver repairs them. The remaining variants cover the
//! backend query boundary.

use thiserror::Error;

use crate::statement::StatementType;

/// Errors that can occur while resolving selections or querying rankings.
#[derive(Error, Debug)]
pub enum PeriodError {
    /// The statement type name is not one of the known statement types.
    #[error("Invalid statement type: {0}")]
    InvalidStatementType(String),

    /// The period type name is not one of the known period types.
    #[error("Invalid period type: {0}")]
    InvalidPeriodType(String),

    /// The year lies outside the configured bounds for the statement type.
    #[error("Year {year} out of range for {statement}: expected {min}..={max}")]
    YearOutOfRange {
        /// Statement type the year was checked against.
        statement: StatementType,
        /// The rejected year.
        year: i32,
        /// Earliest year with data for the statement type.
        min: i32,
        /// Latest year with data for the statement type.
        max: i32,
    },

    /// The period configuration is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Network-related errors (connection failures, HTTP errors, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded by the backend.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// Error parsing a backend response or a configuration document.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl PeriodError {
    /// Returns true for errors caused by malformed caller input.
    ///
    /// These indicate a bug upstream of the resolver rather than a transient
    /// state of the user interface.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidStatementType(_) | Self::InvalidPeriodType(_) | Self::YearOutOfRange { .. }
        )
    }
}

/// Result type alias using [`PeriodError`].
pub type Result<T> = std::result::Result<T, PeriodError>;
