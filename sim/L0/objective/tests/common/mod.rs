//! Synthetic sit-to-stand rollouts shared by the integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use nalgebra::{Point3, Vector3};
use sim_objective::ChannelNames;
use sim_telemetry::{ComSample, ContactPair, CoordinateSample, RolloutTelemetry, Wrench};

pub const DT: f64 = 0.01;

/// Shape of a synthetic rollout.
#[derive(Debug, Clone, Copy)]
pub struct Rollout {
    /// Final time.
    pub duration: f64,
    /// Reporting interval the buffers are sampled at.
    pub interval: f64,
    /// Seat release time.
    pub release: Option<f64>,
    /// Constant activation of every muscle.
    pub activation: f64,
    /// Normal seat force on the body while seated (N). Recorded on the
    /// ground, with the opposite sign.
    pub seat_normal: f64,
    /// Tangential seat force while seated (N).
    pub seat_tangential: f64,
    /// Center-of-mass height gained over the rollout (m).
    pub rise: f64,
    /// Vertical foot force (N).
    pub foot_force: f64,
}

impl Default for Rollout {
    fn default() -> Self {
        Self {
            duration: 1.0,
            interval: DT,
            release: Some(0.298),
            activation: 0.2,
            seat_normal: 300.0,
            seat_tangential: 60.0,
            rise: 0.4,
            foot_force: 700.0,
        }
    }
}

pub fn empty_telemetry(names: &ChannelNames) -> RolloutTelemetry {
    let mut forces = vec![names.seat_force_x.clone(), names.seat_force_y.clone()];
    forces.extend(names.limit_forces.iter().cloned());
    forces.push(names.assistance.clone());
    RolloutTelemetry::new(
        ["glut_max_r", "vasti_r", "soleus_r"],
        names.relevant_coordinates.clone(),
        [names.foot_wrench.clone()],
        forces,
        ContactPair::new(Point3::new(-0.05, 0.0, 0.0), Point3::new(0.15, 0.0, 0.0)),
    )
}

impl Rollout {
    /// Records the rollout into `telemetry`.
    pub fn record_into(&self, telemetry: &mut RolloutTelemetry) {
        let steps = (self.duration / self.interval).round() as usize;
        for i in 0..=steps {
            let t = i as f64 * self.interval;
            let seated = self.release.is_none_or(|r| t < r);
            let fraction = t / self.duration;

            telemetry
                .activations
                .append_row(t, vec![self.activation; 3])
                .unwrap();
            telemetry
                .coordinates
                .append_row(t, vec![CoordinateSample::new(0.0, 0.5); 4])
                .unwrap();
            telemetry
                .center_of_mass
                .push(
                    t,
                    ComSample::at_rest(Point3::new(0.05, 0.5 + self.rise * fraction, 0.0)),
                )
                .unwrap();
            telemetry
                .foot_wrenches
                .append_row(
                    t,
                    vec![Wrench::new(
                        Vector3::new(0.0, self.foot_force, 0.0),
                        Vector3::new(0.0, 0.0, 0.05 * self.foot_force),
                    )],
                )
                .unwrap();
            let (fx, fy) = if seated {
                (self.seat_tangential, -self.seat_normal)
            } else {
                (0.0, 0.0)
            };
            telemetry
                .forces
                .append_row(t, vec![fx, fy, 1.0, -1.0, 0.5, 2.0])
                .unwrap();
        }
    }

    /// Records the rollout into fresh buffers.
    pub fn telemetry(&self, names: &ChannelNames) -> RolloutTelemetry {
        let mut telemetry = empty_telemetry(names);
        self.record_into(&mut telemetry);
        telemetry
    }
}
