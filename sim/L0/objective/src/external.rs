//! Terms whose numerics are owned by the model side.
//!
//! Joint-limit torque, the heel/toe contact penalty and the assistance
//! term depend on how the musculoskeletal model defines its limit forces,
//! contact geometry and assistive device. The aggregator only consumes
//! their results through [`ExternalTerms`]. [`DefaultExternalTerms`] covers
//! the standard sit-to-stand model.

use nalgebra::Vector3;
use sim_telemetry::{ChannelIndex, RolloutTelemetry};

use crate::channels::ResolvedChannels;
use crate::error::{ObjectiveError, Result, require_non_empty};
use crate::numeric::{mean, time_deltas};

/// Below this vertical force (N) the foot is treated as unloaded and has no
/// center of pressure.
const MIN_SUPPORT_FORCE: f64 = 1e-6;

/// What an external term may read.
#[derive(Debug, Clone, Copy)]
pub struct TermInputs<'a> {
    /// The rollout's buffers.
    pub telemetry: &'a RolloutTelemetry,
    /// Channels resolved for this evaluation.
    pub channels: &'a ResolvedChannels,
    /// Final time of the rollout.
    pub t_final: f64,
    /// Reporting interval.
    pub dt: f64,
}

impl TermInputs<'_> {
    /// `Σ_c Σ_i |x_{c,i}| · Δt_i / t_F` over force record channels.
    ///
    /// The force record follows the integrator's steps rather than the
    /// reporting interval, so each row carries its own time step.
    fn force_time_average(&self, channels: &[ChannelIndex]) -> Result<f64> {
        let forces = &self.telemetry.forces;
        require_non_empty(forces.len(), "force record")?;
        if !(self.t_final.is_finite() && self.t_final > 0.0) {
            return Err(ObjectiveError::invalid_parameter(format!(
                "final time must be positive to average over it, got {}",
                self.t_final
            )));
        }
        let dt = time_deltas(forces.times());
        let impulse: f64 = channels
            .iter()
            .flat_map(|&c| forces.column(c).zip(&dt))
            .map(|(f, dt)| f.abs() * dt)
            .sum();
        Ok(impulse / self.t_final)
    }
}

/// Model-defined cost terms.
pub trait ExternalTerms {
    /// Aggregate magnitude of the coordinate limit forces.
    fn limit_torque(&self, inputs: &TermInputs<'_>) -> Result<f64>;

    /// Three-component heel/toe contact penalty.
    fn contact_pair(&self, inputs: &TermInputs<'_>) -> Result<Vector3<f64>>;

    /// Assistance cost, only requested when the term is enabled.
    fn assistance(&self, inputs: &TermInputs<'_>) -> Result<f64>;
}

/// Default model-side terms.
///
/// - Limit torque: time-averaged sum of absolute limit forces.
/// - Contact pair: mean center-of-pressure overshoot past the toe, past the
///   heel, and mean ground pull (negative vertical force).
/// - Assistance: time-averaged absolute assistance force.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExternalTerms;

impl ExternalTerms for DefaultExternalTerms {
    fn limit_torque(&self, inputs: &TermInputs<'_>) -> Result<f64> {
        inputs.force_time_average(&inputs.channels.limit_forces)
    }

    fn contact_pair(&self, inputs: &TermInputs<'_>) -> Result<Vector3<f64>> {
        let wrenches = &inputs.telemetry.foot_wrenches;
        require_non_empty(wrenches.len(), "foot wrench record")?;
        let pair = &inputs.telemetry.contact_pair;

        // Torque is taken about the ground origin, so for a contact on the
        // floor (y = 0) the center of pressure sits at x = τz / Fy.
        let total = wrenches
            .column(inputs.channels.foot_wrench)
            .map(|w| {
                let fy = w.vertical_force();
                let pull = (-fy).max(0.0);
                if fy <= MIN_SUPPORT_FORCE {
                    return Vector3::new(0.0, 0.0, pull);
                }
                let cop = w.torque.z / fy;
                Vector3::new((cop - pair.toe.x).max(0.0), (pair.heel.x - cop).max(0.0), pull)
            })
            .fold(Vector3::zeros(), |acc, v| acc + v);

        let n = wrenches.len();
        Ok(total.map(|c| mean(c, n)))
    }

    fn assistance(&self, inputs: &TermInputs<'_>) -> Result<f64> {
        let channel = inputs
            .channels
            .assistance
            .ok_or_else(|| ObjectiveError::lookup("assistance channel was not resolved"))?;
        inputs.force_time_average(&[channel])
    }
}
