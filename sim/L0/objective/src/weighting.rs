//! Exponential decay weighting toward the end of a rollout.
//!
//! Samples close to the final time matter most for whether the body ended
//! up standing, so integrals over a rollout are weighted by
//!
//! ```text
//! w_i = exp(−(t_F − t_i) / τ)
//! ```
//!
//! which is exactly 1 at `t_F` and decays toward earlier samples. `τ = 0`
//! degenerates to a one-hot weight on the final sample.

use crate::error::{ObjectiveError, Result, require_aligned};

/// Two sample times closer than this are the same instant.
const SAME_INSTANT: f64 = 1e-12;

/// Per-sample weights aligned 1:1 with a time series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightSequence(Vec<f64>);

impl WeightSequence {
    /// Number of weights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no weights.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Weights as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Iterates over the weights by value.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Fails unless the sequence pairs with a series of `len` samples.
    pub fn check_aligned(&self, len: usize) -> Result<()> {
        require_aligned(len, self.0.len())
    }
}

impl From<Vec<f64>> for WeightSequence {
    fn from(weights: Vec<f64>) -> Self {
        Self(weights)
    }
}

/// Computes exponential decay weights for `times`, anchored at `t_final`.
///
/// # Errors
///
/// Returns [`ObjectiveError::InvalidParameter`] if `tau` is negative or not
/// finite.
///
/// # Example
///
/// ```
/// use sim_objective::decay_weights;
///
/// let w = decay_weights(0.5, &[0.0, 0.5, 1.0], 1.0).unwrap();
/// assert_eq!(w.as_slice()[2], 1.0);
/// assert!((w.as_slice()[1] - (-1.0f64).exp()).abs() < 1e-12);
/// ```
pub fn decay_weights(tau: f64, times: &[f64], t_final: f64) -> Result<WeightSequence> {
    if !(tau.is_finite() && tau >= 0.0) {
        return Err(ObjectiveError::invalid_parameter(format!(
            "decay time constant must be finite and non-negative, got {tau}"
        )));
    }

    let weights = if tau == 0.0 {
        times
            .iter()
            .map(|&t| if (t_final - t).abs() <= SAME_INSTANT { 1.0 } else { 0.0 })
            .collect()
    } else {
        times.iter().map(|&t| (-(t_final - t) / tau).exp()).collect()
    };
    Ok(WeightSequence(weights))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid(n: usize, dt: f64) -> Vec<f64> {
        (0..n).map(|i| i as f64 * dt).collect()
    }

    #[test]
    fn weight_at_final_time_is_one() {
        let times = grid(101, 0.01);
        let t_final = *times.last().unwrap();
        for tau in [1e-3, 0.05, 0.1, 1.0, 100.0] {
            let w = decay_weights(tau, &times, t_final).unwrap();
            assert_eq!(*w.as_slice().last().unwrap(), 1.0);
        }
    }

    #[test]
    fn weights_non_decreasing_and_bounded() {
        let times = grid(50, 0.02);
        let t_final = *times.last().unwrap();
        let w = decay_weights(0.1, &times, t_final).unwrap();
        assert_eq!(w.len(), times.len());
        for pair in w.as_slice().windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert!(w.iter().all(|x| (0.0..=1.0).contains(&x)));
    }

    #[test]
    fn zero_tau_is_one_hot() {
        let times = grid(5, 0.25);
        let w = decay_weights(0.0, &times, 1.0).unwrap();
        assert_eq!(w.as_slice(), &[0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn known_value() {
        let w = decay_weights(0.2, &[0.8], 1.0).unwrap();
        assert_relative_eq!(w.as_slice()[0], (-1.0f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn negative_tau_rejected() {
        let err = decay_weights(-0.1, &[0.0], 0.0).unwrap_err();
        assert!(err.is_invalid_parameter());
        assert!(decay_weights(f64::NAN, &[0.0], 0.0).is_err());
    }

    #[test]
    fn alignment_check() {
        let w = decay_weights(0.1, &[0.0, 0.1], 0.1).unwrap();
        assert!(w.check_aligned(2).is_ok());
        assert_eq!(
            w.check_aligned(3),
            Err(ObjectiveError::inconsistent_length(3, 2))
        );
    }
}
