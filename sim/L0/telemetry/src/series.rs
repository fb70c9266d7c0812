//! Uniformly sampled, time-ordered series.

use crate::error::{Result, TelemetryError};

/// A time-ordered series of samples recorded during one rollout.
///
/// Sample times are strictly increasing. The reporting interval is expected
/// to be constant; [`TimeSeries::validate_uniform`] checks this before the
/// series is reduced to a cost.
///
/// # Example
///
/// ```
/// use sim_telemetry::TimeSeries;
///
/// let mut series = TimeSeries::new();
/// series.push(0.0, 1.0).unwrap();
/// series.push(0.1, 2.0).unwrap();
/// series.push(0.2, 3.0).unwrap();
///
/// assert_eq!(series.len(), 3);
/// assert!((series.final_time().unwrap() - 0.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<V> {
    times: Vec<f64>,
    values: Vec<V>,
}

impl<V> Default for TimeSeries<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TimeSeries<V> {
    /// Creates an empty series.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            times: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates an empty series with room for `capacity` samples.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            times: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Builds a series from `(time, value)` pairs.
    pub fn from_samples(samples: impl IntoIterator<Item = (f64, V)>) -> Result<Self> {
        let mut series = Self::new();
        for (t, v) in samples {
            series.push(t, v)?;
        }
        Ok(series)
    }

    /// Appends a sample.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::NonIncreasingTime`] if `time` does not come
    /// strictly after the last stored sample.
    pub fn push(&mut self, time: f64, value: V) -> Result<()> {
        check_next_time(self.times.last().copied(), time)?;
        self.times.push(time);
        self.values.push(value);
        Ok(())
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns true if no samples are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Removes every sample.
    pub fn clear(&mut self) {
        self.times.clear();
        self.values.clear();
    }

    /// Sample times.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Sample values, aligned with [`TimeSeries::times`].
    #[must_use]
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Iterates over `(time, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &V)> {
        self.times.iter().copied().zip(self.values.iter())
    }

    /// First sample.
    #[must_use]
    pub fn first(&self) -> Option<(f64, &V)> {
        Some((*self.times.first()?, self.values.first()?))
    }

    /// Last sample.
    #[must_use]
    pub fn last(&self) -> Option<(f64, &V)> {
        Some((*self.times.last()?, self.values.last()?))
    }

    /// Time of the last sample.
    #[must_use]
    pub fn final_time(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// Index of the sample closest in time to `time`.
    #[must_use]
    pub fn nearest_index(&self, time: f64) -> Option<usize> {
        nearest_index(&self.times, time)
    }

    /// Checks that samples are evenly spaced and returns the interval.
    ///
    /// Returns `Ok(None)` for series with fewer than two samples.
    pub fn validate_uniform(&self, tolerance: f64) -> Result<Option<f64>> {
        validate_uniform(&self.times, tolerance)
    }
}

pub(crate) fn check_next_time(previous: Option<f64>, next: f64) -> Result<()> {
    if !next.is_finite() {
        return Err(TelemetryError::NonIncreasingTime {
            previous: previous.unwrap_or(f64::NEG_INFINITY),
            next,
        });
    }
    match previous {
        Some(previous) if next <= previous => {
            Err(TelemetryError::NonIncreasingTime { previous, next })
        }
        _ => Ok(()),
    }
}

/// Index of the time closest to `time` in a sorted slice.
///
/// Ties resolve to the later sample.
#[must_use]
pub fn nearest_index(times: &[f64], time: f64) -> Option<usize> {
    if times.is_empty() {
        return None;
    }
    let upper = times.partition_point(|&t| t < time);
    if upper == 0 {
        return Some(0);
    }
    if upper >= times.len() {
        return Some(times.len() - 1);
    }
    let before = time - times[upper - 1];
    let after = times[upper] - time;
    if before < after {
        Some(upper - 1)
    } else {
        Some(upper)
    }
}

/// Checks that `times` are evenly spaced within `tolerance`.
pub fn validate_uniform(times: &[f64], tolerance: f64) -> Result<Option<f64>> {
    if times.len() < 2 {
        return Ok(None);
    }
    let expected = times[1] - times[0];
    if !(expected.is_finite() && expected > 0.0) {
        return Err(TelemetryError::InvalidInterval(expected));
    }
    for (index, pair) in times.windows(2).enumerate().skip(1) {
        let actual = pair[1] - pair[0];
        if (actual - expected).abs() > tolerance {
            return Err(TelemetryError::NonUniformSampling {
                index: index + 1,
                expected,
                actual,
            });
        }
    }
    Ok(Some(expected))
}
