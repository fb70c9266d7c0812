//! Configuration for cost evaluation.
//!
//! Everything the aggregator needs besides the telemetry itself: timing,
//! target location, physical constants, decay constants, the cost layout
//! variant and the names of every channel it reads.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ObjectiveError, Result};

/// Standard gravity (m/s²).
const STANDARD_GRAVITY: f64 = 9.806_65;

/// Which cost layout the aggregator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CostVariant {
    /// Terms blended continuously by the progress toward the target.
    #[default]
    ProgressBlended,
    /// Terms switched on and off by whether the rollout reached its target
    /// duration.
    PhaseBlended,
}

/// Names of the channels the objective reads from rollout telemetry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChannelNames {
    /// Ground reaction wrench on the stance foot.
    pub foot_wrench: String,
    /// Tangential seat force component.
    pub seat_force_x: String,
    /// Normal seat force component.
    ///
    /// Read in the frame given by [`ObjectiveConfig::seat_force_on_ground`]:
    /// the default channel reports the force on the ground, which is negative
    /// while the body is seated.
    pub seat_force_y: String,
    /// Coordinates whose final speeds make up the joint-velocity term.
    pub final_speed_coordinates: Vec<String>,
    /// Coordinates integrated by the coordinate-velocity term.
    pub relevant_coordinates: Vec<String>,
    /// Coordinate limit force records.
    pub limit_forces: Vec<String>,
    /// Assistance force record.
    pub assistance: String,
}

impl Default for ChannelNames {
    fn default() -> Self {
        let joints = || {
            ["hip_flexion", "knee_angle", "ankle_angle"]
                .into_iter()
                .map(String::from)
        };
        Self {
            foot_wrench: "/jointset/ground_calcn_r|reaction_on_parent".into(),
            seat_force_x: "seatConstraint_ground_Fx".into(),
            seat_force_y: "seatConstraint_ground_Fy".into(),
            final_speed_coordinates: joints().collect(),
            relevant_coordinates: joints().chain(["lumbar_extension".to_string()]).collect(),
            limit_forces: joints().map(|j| format!("{j}_limit")).collect(),
            assistance: "assistanceForce".into(),
        }
    }
}

/// Configuration of one cost evaluation.
///
/// # Example
///
/// ```
/// use sim_objective::{CostVariant, ObjectiveConfig};
///
/// let config = ObjectiveConfig::default()
///     .with_target_duration(1.5)
///     .with_variant(CostVariant::PhaseBlended)
///     .with_assistance(true);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.cost_len(), 11);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ObjectiveConfig {
    /// Telemetry reporting interval Δt (s).
    pub report_interval: f64,
    /// Duration the rollout is meant to reach (s).
    pub target_duration: f64,
    /// Center-of-mass target location in ground (m).
    pub com_target: Point3<f64>,
    /// Static friction coefficient between pelvis and seat.
    pub mu_static: f64,
    /// Static body weight (N), compared against the vertical foot force.
    pub body_weight: f64,
    /// Decay constant of the center-of-mass and seat weights, as a fraction
    /// of the target duration.
    pub com_decay_fraction: f64,
    /// Decay constant of the coordinate-velocity weights, as a fraction of
    /// the target duration.
    pub velocity_decay_fraction: f64,
    /// A rollout ending earlier than `target_duration − phase_tolerance` is
    /// still in progress.
    pub phase_tolerance: f64,
    /// Minimum time between seat release and the final time for the
    /// foot-force term to apply (s).
    pub release_epsilon: f64,
    /// Allowed deviation between consecutive sampling intervals (s).
    pub sampling_tolerance: f64,
    /// Value of the vertical center-of-mass term while in progress.
    pub in_progress_com_vertical: f64,
    /// Append the assistance term.
    pub assistance_enabled: bool,
    /// Restrict muscle effort terms to samples at or after seat release.
    pub effort_after_release: bool,
    /// The seat force channels carry the force applied to the ground rather
    /// than the reaction on the body; the normal component is negated before
    /// the friction cone is checked.
    pub seat_force_on_ground: bool,
    /// Cost layout.
    pub variant: CostVariant,
    /// Channel names.
    pub channels: ChannelNames,
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        Self {
            report_interval: 0.01,
            target_duration: 1.0,
            com_target: Point3::new(0.2, 0.9, 0.0),
            mu_static: 0.5,
            body_weight: 72.0 * STANDARD_GRAVITY,
            com_decay_fraction: 0.1,
            velocity_decay_fraction: 0.1,
            phase_tolerance: 1e-2,
            release_epsilon: 1e-2,
            sampling_tolerance: 1e-6,
            in_progress_com_vertical: -1.25,
            assistance_enabled: false,
            effort_after_release: false,
            seat_force_on_ground: true,
            variant: CostVariant::ProgressBlended,
            channels: ChannelNames::default(),
        }
    }
}

impl ObjectiveConfig {
    /// Sets the reporting interval.
    #[must_use]
    pub fn with_report_interval(mut self, dt: f64) -> Self {
        self.report_interval = dt;
        self
    }

    /// Sets the target duration.
    #[must_use]
    pub fn with_target_duration(mut self, duration: f64) -> Self {
        self.target_duration = duration;
        self
    }

    /// Sets the center-of-mass target.
    #[must_use]
    pub fn with_com_target(mut self, target: Point3<f64>) -> Self {
        self.com_target = target;
        self
    }

    /// Sets the static friction coefficient.
    #[must_use]
    pub fn with_mu_static(mut self, mu: f64) -> Self {
        self.mu_static = mu;
        self
    }

    /// Sets the static body weight.
    #[must_use]
    pub fn with_body_weight(mut self, weight: f64) -> Self {
        self.body_weight = weight;
        self
    }

    /// Sets both decay fractions.
    #[must_use]
    pub fn with_decay_fractions(mut self, com: f64, velocity: f64) -> Self {
        self.com_decay_fraction = com;
        self.velocity_decay_fraction = velocity;
        self
    }

    /// Enables or disables the assistance term.
    #[must_use]
    pub fn with_assistance(mut self, enabled: bool) -> Self {
        self.assistance_enabled = enabled;
        self
    }

    /// Restricts muscle effort to samples after seat release.
    #[must_use]
    pub fn with_effort_after_release(mut self, enabled: bool) -> Self {
        self.effort_after_release = enabled;
        self
    }

    /// Sets the frame of the seat force channels.
    #[must_use]
    pub fn with_seat_force_on_ground(mut self, on_ground: bool) -> Self {
        self.seat_force_on_ground = on_ground;
        self
    }

    /// Normal force the seat exerts on the body, from a recorded sample.
    #[must_use]
    pub fn seat_normal_on_body(&self, recorded: f64) -> f64 {
        if self.seat_force_on_ground {
            -recorded
        } else {
            recorded
        }
    }

    /// Selects the cost layout.
    #[must_use]
    pub fn with_variant(mut self, variant: CostVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Replaces the channel names.
    #[must_use]
    pub fn with_channels(mut self, channels: ChannelNames) -> Self {
        self.channels = channels;
        self
    }

    /// Decay constant τ for center-of-mass and seat weights (s).
    #[must_use]
    pub fn com_tau(&self) -> f64 {
        self.com_decay_fraction * self.target_duration
    }

    /// Decay constant τ for coordinate-velocity weights (s).
    #[must_use]
    pub fn velocity_tau(&self) -> f64 {
        self.velocity_decay_fraction * self.target_duration
    }

    /// Length of the cost vector this configuration produces.
    #[must_use]
    pub fn cost_len(&self) -> usize {
        if self.assistance_enabled { 11 } else { 10 }
    }

    /// Checks every parameter against its domain.
    pub fn validate(&self) -> Result<()> {
        positive("report interval", self.report_interval)?;
        positive("target duration", self.target_duration)?;
        positive("body weight", self.body_weight)?;
        non_negative("static friction coefficient", self.mu_static)?;
        non_negative("center-of-mass decay fraction", self.com_decay_fraction)?;
        non_negative("velocity decay fraction", self.velocity_decay_fraction)?;
        non_negative("phase tolerance", self.phase_tolerance)?;
        non_negative("release epsilon", self.release_epsilon)?;
        non_negative("sampling tolerance", self.sampling_tolerance)?;
        if !self.in_progress_com_vertical.is_finite() {
            return Err(ObjectiveError::invalid_parameter(
                "in-progress center-of-mass value must be finite",
            ));
        }
        if !self.com_target.coords.iter().all(|c| c.is_finite()) {
            return Err(ObjectiveError::invalid_parameter(
                "center-of-mass target must be finite",
            ));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ObjectiveError::invalid_parameter(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ObjectiveError::invalid_parameter(format!(
            "{name} must be non-negative and finite, got {value}"
        )))
    }
}
