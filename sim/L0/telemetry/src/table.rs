//! Labelled multi-channel time series.

use crate::error::{Result, TelemetryError};
use crate::series::{check_next_time, nearest_index, validate_uniform};

/// Position of a channel inside a [`TimeSeriesTable`].
///
/// Obtained once from [`TimeSeriesTable::channel`] so that per-sample loops
/// never look names up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelIndex(usize);

impl ChannelIndex {
    /// Raw column position.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// A time series with one value per named channel at every row.
///
/// # Example
///
/// ```
/// use sim_telemetry::TimeSeriesTable;
///
/// let mut table = TimeSeriesTable::new("activations", ["soleus", "vasti"]);
/// table.append_row(0.0, vec![0.1, 0.2]).unwrap();
/// table.append_row(0.01, vec![0.3, 0.4]).unwrap();
///
/// let vasti = table.channel("vasti").unwrap();
/// let values: Vec<f64> = table.column(vasti).copied().collect();
/// assert_eq!(values, vec![0.2, 0.4]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesTable<V> {
    name: String,
    labels: Vec<String>,
    times: Vec<f64>,
    rows: Vec<Vec<V>>,
}

impl<V> TimeSeriesTable<V> {
    /// Creates an empty table with the given channel labels.
    #[must_use]
    pub fn new<S: Into<String>>(name: impl Into<String>, labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            times: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Table name, used in error messages.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Channel labels in column order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of channels.
    #[must_use]
    pub fn num_channels(&self) -> usize {
        self.labels.len()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns true if no rows are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Resolves a channel label to its column.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::ChannelNotFound`] if no channel carries `label`.
    pub fn channel(&self, label: &str) -> Result<ChannelIndex> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(ChannelIndex)
            .ok_or_else(|| TelemetryError::channel_not_found(&self.name, label))
    }

    /// Resolves several labels at once, failing on the first missing one.
    pub fn channels<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<ChannelIndex>> {
        labels.iter().map(|l| self.channel(l.as_ref())).collect()
    }

    /// Every column, in order.
    pub fn all_channels(&self) -> impl Iterator<Item = ChannelIndex> {
        (0..self.labels.len()).map(ChannelIndex)
    }

    /// Appends a row of values, one per channel.
    ///
    /// # Errors
    ///
    /// Fails if the row width differs from the channel count or if `time`
    /// does not come strictly after the previous row.
    pub fn append_row(&mut self, time: f64, row: Vec<V>) -> Result<()> {
        if row.len() != self.labels.len() {
            return Err(TelemetryError::RowWidthMismatch {
                expected: self.labels.len(),
                actual: row.len(),
            });
        }
        check_next_time(self.times.last().copied(), time)?;
        self.times.push(time);
        self.rows.push(row);
        Ok(())
    }

    /// Row times.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Row at `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[V]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Iterates over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[V]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Iterates over one channel's values.
    pub fn column(&self, channel: ChannelIndex) -> impl Iterator<Item = &V> {
        self.rows.iter().filter_map(move |row| row.get(channel.0))
    }

    /// Value of `channel` at row `index`.
    #[must_use]
    pub fn value(&self, index: usize, channel: ChannelIndex) -> Option<&V> {
        self.rows.get(index)?.get(channel.0)
    }

    /// Value of `channel` at the last row.
    #[must_use]
    pub fn last_value(&self, channel: ChannelIndex) -> Option<&V> {
        self.rows.last()?.get(channel.0)
    }

    /// Time of the last row.
    #[must_use]
    pub fn final_time(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// Index of the row closest in time to `time`.
    #[must_use]
    pub fn nearest_row_index(&self, time: f64) -> Option<usize> {
        nearest_index(&self.times, time)
    }

    /// Checks that rows are evenly spaced and returns the interval.
    pub fn validate_uniform(&self, tolerance: f64) -> Result<Option<f64>> {
        validate_uniform(&self.times, tolerance)
    }

    /// Removes every row, keeping the channel labels.
    pub fn clear(&mut self) {
        self.times.clear();
        self.rows.clear();
    }
}
