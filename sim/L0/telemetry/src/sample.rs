//! Per-sample value types stored in telemetry buffers.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A combined force/torque sample.
///
/// # Units
///
/// - Force: Newtons (N)
/// - Torque: Newton-meters (N⋅m)
///
/// # Example
///
/// ```
/// use sim_telemetry::Wrench;
/// use nalgebra::Vector3;
///
/// let w = Wrench::new(Vector3::new(0.0, 700.0, 0.0), Vector3::zeros());
/// assert!((w.vertical_force() - 700.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wrench {
    /// Force vector `[Fx, Fy, Fz]`.
    pub force: Vector3<f64>,
    /// Torque vector `[Tx, Ty, Tz]`.
    pub torque: Vector3<f64>,
}

impl Wrench {
    /// Creates a wrench from force and torque.
    #[must_use]
    pub const fn new(force: Vector3<f64>, torque: Vector3<f64>) -> Self {
        Self { force, torque }
    }

    /// Creates a zero wrench.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }

    /// Creates a wrench from a spatial vector laid out as
    /// `[Tx, Ty, Tz, Fx, Fy, Fz]` (torque first).
    #[must_use]
    pub fn from_spatial(spatial: [f64; 6]) -> Self {
        Self {
            torque: Vector3::new(spatial[0], spatial[1], spatial[2]),
            force: Vector3::new(spatial[3], spatial[4], spatial[5]),
        }
    }

    /// Returns the wrench as a spatial vector, torque first.
    #[must_use]
    pub fn as_spatial(&self) -> [f64; 6] {
        [
            self.torque.x,
            self.torque.y,
            self.torque.z,
            self.force.x,
            self.force.y,
            self.force.z,
        ]
    }

    /// Vertical (+Y) force component.
    #[must_use]
    pub fn vertical_force(&self) -> f64 {
        self.force.y
    }

    /// Magnitude of the force vector.
    #[must_use]
    pub fn force_magnitude(&self) -> f64 {
        self.force.norm()
    }
}

impl Default for Wrench {
    fn default() -> Self {
        Self::zero()
    }
}

/// Position and speed of one generalized coordinate.
///
/// Rotational coordinates are in radians and rad/s.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoordinateSample {
    /// Coordinate value.
    pub value: f64,
    /// Coordinate time derivative.
    pub speed: f64,
}

impl CoordinateSample {
    /// Creates a coordinate sample.
    #[must_use]
    pub const fn new(value: f64, speed: f64) -> Self {
        Self { value, speed }
    }
}

/// Whole-body center-of-mass state.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComSample {
    /// Center-of-mass position in ground (m).
    pub position: Point3<f64>,
    /// Center-of-mass velocity in ground (m/s).
    pub velocity: Vector3<f64>,
}

impl ComSample {
    /// Creates a center-of-mass sample.
    #[must_use]
    pub const fn new(position: Point3<f64>, velocity: Vector3<f64>) -> Self {
        Self { position, velocity }
    }

    /// Creates a sample at rest.
    #[must_use]
    pub fn at_rest(position: Point3<f64>) -> Self {
        Self::new(position, Vector3::zeros())
    }

    /// Height above ground (+Y).
    #[must_use]
    pub fn height(&self) -> f64 {
        self.position.y
    }
}

/// Heel and toe contact points of the stance foot, in ground, at the first
/// simulated instant.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactPair {
    /// Heel contact frame origin.
    pub heel: Point3<f64>,
    /// Toe contact frame origin.
    pub toe: Point3<f64>,
}

impl ContactPair {
    /// Creates a contact pair.
    #[must_use]
    pub const fn new(heel: Point3<f64>, toe: Point3<f64>) -> Self {
        Self { heel, toe }
    }

    /// Midpoint between heel and toe; the foot reference point.
    #[must_use]
    pub fn midpoint(&self) -> Point3<f64> {
        nalgebra::center(&self.heel, &self.toe)
    }

    /// Heel-to-toe length along X.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.toe.x - self.heel.x
    }
}

impl Default for ContactPair {
    fn default() -> Self {
        Self::new(Point3::new(-0.05, 0.0, 0.0), Point3::new(0.15, 0.0, 0.0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn wrench_spatial_layout() {
        let w = Wrench::from_spatial([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(w.torque, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(w.force, Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(w.vertical_force(), 5.0);
        assert_eq!(w.as_spatial(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn wrench_magnitude() {
        let w = Wrench::new(Vector3::new(3.0, 4.0, 0.0), Vector3::zeros());
        assert_relative_eq!(w.force_magnitude(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(Wrench::default().force_magnitude(), 0.0);
    }

    #[test]
    fn contact_pair_midpoint() {
        let pair = ContactPair::new(Point3::new(0.0, 0.0, 0.1), Point3::new(0.2, 0.0, 0.1));
        let mid = pair.midpoint();
        assert_relative_eq!(mid.x, 0.1, epsilon = 1e-12);
        assert_relative_eq!(mid.z, 0.1, epsilon = 1e-12);
        assert_relative_eq!(pair.length(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn com_height() {
        let com = ComSample::at_rest(Point3::new(0.1, 0.55, 0.0));
        assert_eq!(com.height(), 0.55);
        assert!(com.velocity.norm() < 1e-12);
    }
}
