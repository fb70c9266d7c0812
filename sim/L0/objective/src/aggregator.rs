//! Cost aggregation: telemetry of one finished rollout in, cost vector out.
//!
//! # Protocol
//!
//! 1. Check that the reporter-driven buffers are sampled at the configured
//!    reporting interval and that every buffer ends at the final time.
//! 2. Resolve every configured channel (fail fast on a missing name).
//! 3. Detect the [`Phase`] from the final time and the target duration.
//! 4. Compute decay weights and run the term evaluators the layout needs.
//! 5. Fill the layout positions; terms of the inactive phase are zero or
//!    their fixed in-progress value, never omitted.
//! 6. Clear every buffer, whether or not the evaluation succeeded.
//!
//! # Layouts
//!
//! ```text
//! ProgressBlended (p = progress toward the target):
//!   [dF/d0, jointVel·p, feetForce·p, chairNormal·(1−p), effort, effortRate,
//!    limitTorque, contact0·p, contact1·p, (contact2 + slip)·p, assistance?]
//!
//! PhaseBlended:
//!   at boundary  [comVertical, comHorizontal, 0, chairNormal, ...]
//!   in progress  [−1.25,       0,             coordVel, 0,   ...]
//!   shared tail  [effort, effortRate, limitTorque, contact0, contact1,
//!                 contact2 + slip, assistance?]
//! ```

use nalgebra::Vector3;
use sim_telemetry::{ComSample, RolloutTelemetry};
use tracing::debug;

use crate::chair::{ChairCost, chair_cost};
use crate::channels::ResolvedChannels;
use crate::config::{CostVariant, ObjectiveConfig};
use crate::cost::CostVector;
use crate::error::{ObjectiveError, Result};
use crate::external::{DefaultExternalTerms, ExternalTerms, TermInputs};
use crate::terms::{
    ReleaseWindow, TargetDistance, activation_cost, activation_rate_cost, com_horizontal_cost,
    com_vertical_cost, coordinate_velocity_cost, feet_force_cost, joint_velocity_cost,
};
use crate::weighting::decay_weights;

/// Whether a rollout reached its target duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The rollout ended materially before the target duration.
    InProgress,
    /// The rollout ended at or after the target duration.
    AtBoundary,
}

impl Phase {
    /// Classifies a final time against the target duration.
    #[must_use]
    pub fn detect(t_final: f64, target_duration: f64, tolerance: f64) -> Self {
        if t_final < target_duration - tolerance {
            Self::InProgress
        } else {
            Self::AtBoundary
        }
    }
}

/// Terms both layouts share, computed once per evaluation.
struct SharedTerms {
    effort: f64,
    effort_rate: f64,
    limit_torque: f64,
    contact: Vector3<f64>,
    chair: ChairCost,
}

/// Turns rollout telemetry into a [`CostVector`].
///
/// # Example
///
/// ```no_run
/// use sim_objective::{CostAggregator, ObjectiveConfig};
/// # fn rollout() -> sim_telemetry::RolloutTelemetry { unimplemented!() }
///
/// let aggregator = CostAggregator::new(ObjectiveConfig::default()).unwrap();
/// let mut telemetry = rollout();
/// let costs = aggregator.evaluate(&mut telemetry, Some(0.42)).unwrap();
/// assert_eq!(costs.len(), 10);
/// assert!(telemetry.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct CostAggregator<E = DefaultExternalTerms> {
    config: ObjectiveConfig,
    external: E,
}

impl CostAggregator {
    /// Creates an aggregator with the default model-side terms.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectiveError::InvalidParameter`] if the configuration
    /// does not validate.
    pub fn new(config: ObjectiveConfig) -> Result<Self> {
        Self::with_external_terms(config, DefaultExternalTerms)
    }
}

impl<E: ExternalTerms> CostAggregator<E> {
    /// Creates an aggregator with custom model-side terms.
    pub fn with_external_terms(config: ObjectiveConfig, external: E) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, external })
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &ObjectiveConfig {
        &self.config
    }

    /// Evaluates one rollout and clears its buffers.
    ///
    /// `release_time` is the seat release time recorded during the rollout,
    /// if the seat was released.
    ///
    /// # Errors
    ///
    /// Any missing channel, empty required buffer, misaligned sequence or
    /// non-finite term aborts the evaluation; no partial vector is returned.
    /// The buffers are cleared either way.
    pub fn evaluate(
        &self,
        telemetry: &mut RolloutTelemetry,
        release_time: Option<f64>,
    ) -> Result<CostVector> {
        let result = self.compute(telemetry, release_time);
        telemetry.clear();
        result
    }

    fn compute(&self, telemetry: &RolloutTelemetry, release_time: Option<f64>) -> Result<CostVector> {
        let config = &self.config;
        check_sampling(telemetry, config.report_interval, config.sampling_tolerance)?;
        let channels =
            ResolvedChannels::resolve(&config.channels, telemetry, config.assistance_enabled)?;

        let com = &telemetry.center_of_mass;
        let ((_, com_first), (t_final, com_last)) = com
            .first()
            .zip(com.last())
            .ok_or_else(|| ObjectiveError::empty("center-of-mass record"))?;
        check_end_times(telemetry, t_final, config.sampling_tolerance)?;
        let phase = Phase::detect(t_final, config.target_duration, config.phase_tolerance);

        let inputs = TermInputs {
            telemetry,
            channels: &channels,
            t_final,
            dt: config.report_interval,
        };
        let shared = self.shared_terms(&inputs, release_time)?;

        let mut values = match config.variant {
            CostVariant::ProgressBlended => {
                self.progress_blended(&inputs, com_first, com_last, release_time, &shared)?
            }
            CostVariant::PhaseBlended => self.phase_blended(&inputs, phase, &shared)?,
        };
        if config.assistance_enabled {
            values.push(self.external.assistance(&inputs)?);
        }

        let costs = CostVector::new(config.variant, values);
        if let Some((name, value)) = costs.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ObjectiveError::invalid_parameter(format!(
                "cost term {name} is not finite ({value})"
            )));
        }
        debug!(
            ?phase,
            t_final,
            variant = ?config.variant,
            costs = ?costs.as_slice(),
            "evaluated rollout"
        );
        Ok(costs)
    }

    fn shared_terms(&self, inputs: &TermInputs<'_>, release_time: Option<f64>) -> Result<SharedTerms> {
        let config = &self.config;
        let telemetry = inputs.telemetry;

        let forces = &telemetry.forces;
        let seat_x: Vec<f64> = forces.column(inputs.channels.seat_force_x).copied().collect();
        let seat_y: Vec<f64> = forces
            .column(inputs.channels.seat_force_y)
            .map(|&y| config.seat_normal_on_body(y))
            .collect();
        let seat_weights = decay_weights(config.com_tau(), forces.times(), inputs.t_final)?;
        let chair = chair_cost(&seat_x, &seat_y, forces.times(), &seat_weights, config.mu_static)?;

        let effort_from = if config.effort_after_release {
            release_time
        } else {
            None
        };

        Ok(SharedTerms {
            effort: activation_cost(&telemetry.activations, effort_from)?,
            effort_rate: activation_rate_cost(&telemetry.activations, effort_from)?,
            limit_torque: self.external.limit_torque(inputs)?,
            contact: self.external.contact_pair(inputs)?,
            chair,
        })
    }

    fn progress_blended(
        &self,
        inputs: &TermInputs<'_>,
        com_first: &ComSample,
        com_last: &ComSample,
        release_time: Option<f64>,
        shared: &SharedTerms,
    ) -> Result<Vec<f64>> {
        let config = &self.config;
        let telemetry = inputs.telemetry;

        let distance =
            TargetDistance::measure(&com_first.position, &com_last.position, &config.com_target)?;
        let progress = distance.progress();
        debug!(progress, "center-of-mass progress toward target");

        let joint_velocity =
            joint_velocity_cost(&telemetry.coordinates, &inputs.channels.final_speed_coordinates)?;
        let feet_force = feet_force_cost(
            &telemetry.foot_wrenches,
            inputs.channels.foot_wrench,
            config.body_weight,
            ReleaseWindow::new(release_time, inputs.t_final),
            config.release_epsilon,
            config.report_interval,
        )?;

        Ok(vec![
            distance.ratio(),
            progress * joint_velocity,
            progress * feet_force,
            (1.0 - progress) * shared.chair.normal_force,
            shared.effort,
            shared.effort_rate,
            shared.limit_torque,
            progress * shared.contact.x,
            progress * shared.contact.y,
            progress * (shared.contact.z + shared.chair.slip),
        ])
    }

    fn phase_blended(
        &self,
        inputs: &TermInputs<'_>,
        phase: Phase,
        shared: &SharedTerms,
    ) -> Result<Vec<f64>> {
        let config = &self.config;
        let telemetry = inputs.telemetry;
        let dt = config.report_interval;

        let mut values = match phase {
            Phase::AtBoundary => {
                let com = &telemetry.center_of_mass;
                let weights = decay_weights(config.com_tau(), com.times(), inputs.t_final)?;
                let foot_reference = telemetry.contact_pair.midpoint();
                vec![
                    com_vertical_cost(com, &weights, dt)?,
                    com_horizontal_cost(com, &foot_reference, &weights, dt)?,
                    0.0,
                    shared.chair.normal_force,
                ]
            }
            Phase::InProgress => {
                let coordinates = &telemetry.coordinates;
                let weights =
                    decay_weights(config.velocity_tau(), coordinates.times(), inputs.t_final)?;
                vec![
                    config.in_progress_com_vertical,
                    0.0,
                    coordinate_velocity_cost(
                        coordinates,
                        &inputs.channels.relevant_coordinates,
                        &weights,
                        dt,
                    )?,
                    0.0,
                ]
            }
        };
        values.extend([
            shared.effort,
            shared.effort_rate,
            shared.limit_torque,
            shared.contact.x,
            shared.contact.y,
            shared.contact.z + shared.chair.slip,
        ]);
        Ok(values)
    }
}

/// Reporter-driven buffers must be evenly sampled at the reporting interval.
/// The force record follows the integrator's own steps and is exempt.
fn check_sampling(telemetry: &RolloutTelemetry, report_interval: f64, tolerance: f64) -> Result<()> {
    let measured = [
        ("activations", telemetry.activations.validate_uniform(tolerance)?),
        ("coordinates", telemetry.coordinates.validate_uniform(tolerance)?),
        ("center of mass", telemetry.center_of_mass.validate_uniform(tolerance)?),
        ("foot wrenches", telemetry.foot_wrenches.validate_uniform(tolerance)?),
    ];
    for (buffer, interval) in measured {
        if let Some(dt) = interval {
            if (dt - report_interval).abs() > tolerance {
                return Err(ObjectiveError::invalid_parameter(format!(
                    "{buffer} sampled every {dt} s, reporting interval is {report_interval} s"
                )));
            }
        }
    }
    Ok(())
}

/// Every recorded buffer must end at the final time the weights anchor on.
fn check_end_times(telemetry: &RolloutTelemetry, t_final: f64, tolerance: f64) -> Result<()> {
    let ends = [
        ("activations", telemetry.activations.final_time()),
        ("coordinates", telemetry.coordinates.final_time()),
        ("foot wrenches", telemetry.foot_wrenches.final_time()),
        ("forces", telemetry.forces.final_time()),
    ];
    for (buffer, end) in ends {
        if let Some(end) = end {
            if (end - t_final).abs() > tolerance {
                return Err(ObjectiveError::invalid_parameter(format!(
                    "{buffer} end at {end} s, center of mass ends at {t_final} s"
                )));
            }
        }
    }
    Ok(())
}
