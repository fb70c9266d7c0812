//! Error types for telemetry buffers.

use thiserror::Error;

/// Errors that can occur while recording or reading telemetry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TelemetryError {
    /// A named channel is absent from a table.
    #[error("channel not found in {table}: {name}")]
    ChannelNotFound {
        /// Name of the table that was searched.
        table: String,
        /// The missing channel label.
        name: String,
    },

    /// A buffer that must hold samples is empty.
    #[error("empty data: {0}")]
    EmptyData(String),

    /// A sample was pushed with a time not after the previous one.
    #[error("non-increasing time: {next} does not follow {previous}")]
    NonIncreasingTime {
        /// Time of the last stored sample.
        previous: f64,
        /// Time of the rejected sample.
        next: f64,
    },

    /// Consecutive sample times are not evenly spaced.
    #[error("non-uniform sampling at row {index}: expected interval {expected}, got {actual}")]
    NonUniformSampling {
        /// Row whose interval to its predecessor is off.
        index: usize,
        /// Interval established by the first two rows.
        expected: f64,
        /// Interval found at `index`.
        actual: f64,
    },

    /// A row does not have one value per channel.
    #[error("row width mismatch: expected {expected} values, got {actual}")]
    RowWidthMismatch {
        /// Number of channels in the table.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// Sampling interval is zero, negative or not finite.
    #[error("invalid sampling interval: {0} (must be positive and finite)")]
    InvalidInterval(f64),
}

impl TelemetryError {
    /// Create a channel-not-found error.
    #[must_use]
    pub fn channel_not_found(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::ChannelNotFound {
            table: table.into(),
            name: name.into(),
        }
    }

    /// Create an empty-data error.
    #[must_use]
    pub fn empty(what: impl Into<String>) -> Self {
        Self::EmptyData(what.into())
    }

    /// Check if this is a missing-channel error.
    #[must_use]
    pub fn is_channel_not_found(&self) -> bool {
        matches!(self, Self::ChannelNotFound { .. })
    }

    /// Check if this is an empty-data error.
    #[must_use]
    pub fn is_empty_data(&self) -> bool {
        matches!(self, Self::EmptyData(_))
    }
}

/// Result type for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;
