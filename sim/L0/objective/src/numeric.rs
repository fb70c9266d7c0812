//! Small numeric helpers shared by the term evaluators.

use crate::error::{Result, require_aligned};
use crate::weighting::WeightSequence;

/// Per-sample time steps `Δt_i = t_i − t_{i−1}`.
///
/// The first sample carries the first interval so every sample has a step;
/// a single sample has a step of zero.
#[must_use]
pub fn time_deltas(times: &[f64]) -> Vec<f64> {
    let first = match times {
        [t0, t1, ..] => t1 - t0,
        _ => 0.0,
    };
    std::iter::once(first)
        .take(times.len())
        .chain(times.windows(2).map(|w| w[1] - w[0]))
        .collect()
}

/// `Δt · Σ w_i · f_i`, the weighted rectangle-rule integral.
pub fn weighted_integral(
    values: impl ExactSizeIterator<Item = f64>,
    weights: &WeightSequence,
    dt: f64,
) -> Result<f64> {
    require_aligned(values.len(), weights.len())?;
    let sum: f64 = values.zip(weights.iter()).map(|(f, w)| f * w).sum();
    Ok(sum * dt)
}

/// Arithmetic mean; zero for an empty input.
#[must_use]
pub fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn deltas_uniform() {
        let dt = time_deltas(&[0.0, 0.01, 0.02, 0.03]);
        assert_eq!(dt.len(), 4);
        for d in dt {
            assert_relative_eq!(d, 0.01, epsilon = 1e-12);
        }
    }

    #[test]
    fn deltas_degenerate() {
        assert!(time_deltas(&[]).is_empty());
        assert_eq!(time_deltas(&[0.5]), vec![0.0]);
    }

    #[test]
    fn weighted_integral_checks_length() {
        let weights = WeightSequence::from(vec![1.0, 0.5]);
        let ok = weighted_integral([2.0, 4.0].into_iter(), &weights, 0.1).unwrap();
        assert_relative_eq!(ok, 0.4, epsilon = 1e-12);
        assert!(weighted_integral([1.0].into_iter(), &weights, 0.1).is_err());
    }

    #[test]
    fn mean_of_nothing() {
        assert_eq!(mean(5.0, 0), 0.0);
        assert_eq!(mean(6.0, 3), 2.0);
    }
}
