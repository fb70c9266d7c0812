//! Seat (chair) support-constraint cost.
//!
//! The seat pushes on the pelvis with a tangential component `X` and a
//! normal component `Y`. Two penalties are derived from them:
//!
//! - **Slip**: tangential force in excess of the Coulomb cone,
//!   `max(0, |X_i| − μ·Y_i)`, integrated over the whole rollout.
//! - **Normal force**: `|Σ Y_i · Δt_i · w_i|`, the decay-weighted impulse
//!   the seat still carries late in the rollout.
//!
//! Both components are forces on the body: `Y` is positive while seated.
//! Channels recorded on the ground are converted by the aggregator first.

use crate::error::{ObjectiveError, Result, require_aligned, require_non_empty};
use crate::numeric::time_deltas;
use crate::weighting::WeightSequence;

/// Seat penalties for one rollout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChairCost {
    /// Weighted normal-force impulse.
    pub normal_force: f64,
    /// Integrated friction-cone violation.
    pub slip: f64,
}

/// Amount by which the tangential force exceeds the friction cone.
#[must_use]
pub fn friction_violation(tangential: f64, normal: f64, mu: f64) -> f64 {
    (tangential.abs() - mu * normal).max(0.0)
}

/// Computes the seat penalties from the two in-plane force components.
///
/// # Errors
///
/// - [`ObjectiveError::EmptyData`] if there are no samples
/// - [`ObjectiveError::InconsistentLength`] if the series, times and
///   weights are not aligned
/// - [`ObjectiveError::InvalidParameter`] if `mu` is negative
///
/// # Example
///
/// ```
/// use sim_objective::{chair_cost, WeightSequence};
///
/// let times = [0.0, 0.01, 0.02];
/// let weights = WeightSequence::from(vec![1.0; 3]);
/// let cost = chair_cost(&[5.0, -3.0, 8.0], &[10.0; 3], &times, &weights, 0.5).unwrap();
/// assert!((cost.slip - 0.03).abs() < 1e-12);
/// ```
pub fn chair_cost(
    force_x: &[f64],
    force_y: &[f64],
    times: &[f64],
    weights: &WeightSequence,
    mu: f64,
) -> Result<ChairCost> {
    require_non_empty(times.len(), "seat force record")?;
    require_aligned(times.len(), force_x.len())?;
    require_aligned(times.len(), force_y.len())?;
    weights.check_aligned(times.len())?;
    if !(mu.is_finite() && mu >= 0.0) {
        return Err(ObjectiveError::invalid_parameter(format!(
            "friction coefficient must be non-negative, got {mu}"
        )));
    }

    let dt = time_deltas(times);

    let slip: f64 = force_x
        .iter()
        .zip(force_y)
        .zip(&dt)
        .map(|((&x, &y), &dt)| friction_violation(x, y, mu) * dt)
        .sum();

    let impulse: f64 = force_y
        .iter()
        .zip(&dt)
        .zip(weights.iter())
        .map(|((&y, &dt), w)| y * dt * w)
        .sum();

    Ok(ChairCost {
        normal_force: impulse.abs(),
        slip,
    })
}
