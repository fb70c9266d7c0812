//! Error types for cost evaluation.

use sim_telemetry::TelemetryError;
use thiserror::Error;

/// Errors that abort a cost evaluation.
///
/// None of these are recovered internally: an evaluation that fails produces
/// no cost vector, and the caller decides how to score the rollout.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ObjectiveError {
    /// A named channel is absent from a buffer.
    #[error("lookup error: {0}")]
    Lookup(String),

    /// A buffer that must hold samples is empty.
    #[error("empty data: {0}")]
    EmptyData(String),

    /// A parameter is outside its domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A weight sequence or paired series has the wrong length.
    #[error("inconsistent length: expected {expected}, got {actual}")]
    InconsistentLength {
        /// Length of the series.
        expected: usize,
        /// Length of the paired sequence.
        actual: usize,
    },
}

impl ObjectiveError {
    /// Create a lookup error.
    #[must_use]
    pub fn lookup(what: impl Into<String>) -> Self {
        Self::Lookup(what.into())
    }

    /// Create an empty-data error.
    #[must_use]
    pub fn empty(what: impl Into<String>) -> Self {
        Self::EmptyData(what.into())
    }

    /// Create an invalid-parameter error.
    #[must_use]
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter(reason.into())
    }

    /// Create an inconsistent-length error.
    #[must_use]
    pub const fn inconsistent_length(expected: usize, actual: usize) -> Self {
        Self::InconsistentLength { expected, actual }
    }

    /// Check if this is a lookup error.
    #[must_use]
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup(_))
    }

    /// Check if this is an empty-data error.
    #[must_use]
    pub fn is_empty_data(&self) -> bool {
        matches!(self, Self::EmptyData(_))
    }

    /// Check if this is an invalid-parameter error.
    #[must_use]
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter(_))
    }
}

impl From<TelemetryError> for ObjectiveError {
    fn from(err: TelemetryError) -> Self {
        match err {
            TelemetryError::ChannelNotFound { .. } => Self::Lookup(err.to_string()),
            TelemetryError::EmptyData(what) => Self::EmptyData(what),
            other => Self::InvalidParameter(other.to_string()),
        }
    }
}

/// Result type for cost evaluation.
pub type Result<T> = std::result::Result<T, ObjectiveError>;

/// Rejects zero-length inputs with an [`ObjectiveError::EmptyData`].
pub(crate) fn require_non_empty(len: usize, what: &str) -> Result<()> {
    if len == 0 {
        return Err(ObjectiveError::empty(what));
    }
    Ok(())
}

/// Rejects a paired sequence whose length differs from its series.
pub(crate) fn require_aligned(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(ObjectiveError::inconsistent_length(expected, actual));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn telemetry_errors_map_to_categories() {
        let lookup: ObjectiveError = TelemetryError::channel_not_found("forces", "Fx").into();
        assert!(lookup.is_lookup());
        assert!(lookup.to_string().contains("Fx"));

        let empty: ObjectiveError = TelemetryError::empty("center of mass").into();
        assert!(empty.is_empty_data());

        let other: ObjectiveError = TelemetryError::InvalidInterval(-1.0).into();
        assert!(other.is_invalid_parameter());
    }

    #[test]
    fn length_error_display() {
        let err = ObjectiveError::inconsistent_length(10, 9);
        let msg = err.to_string();
        assert!(msg.contains("10"));
        assert!(msg.contains('9'));
    }

    #[test]
    fn guards() {
        assert!(require_non_empty(0, "x").is_err());
        assert!(require_non_empty(1, "x").is_ok());
        assert!(require_aligned(3, 3).is_ok());
        assert_eq!(
            require_aligned(3, 2),
            Err(ObjectiveError::inconsistent_length(3, 2))
        );
    }
}
