//! Seat-release event.
//!
//! While seated, a support force element holds the pelvis on the seat. The
//! integrator's root-finder watches the witness
//!
//! ```text
//! g(s) = ‖F_seat(s)‖² − threshold
//! ```
//!
//! and calls the handler when `g` changes sign. The handler switches the
//! support element off and records the release time, which the cost
//! aggregator later uses to gate post-release terms.
//!
//! The transition is one-shot: `Applying → Released`. Crossings reported
//! after release are ignored.

use nalgebra::Vector3;
use tracing::{debug, info};

use crate::error::{ObjectiveError, Result};

/// What the event needs from the simulation state.
pub trait SeatContext {
    /// Current simulation time.
    fn time(&self) -> f64;

    /// Force the support element currently produces.
    fn seat_force(&self) -> Vector3<f64>;

    /// Turns the support element on or off from this instant onward.
    fn set_seat_applies_force(&mut self, applies: bool);
}

/// A discrete event located by the integrator's root-finder.
pub trait TriggeredEvent<S> {
    /// Witness value; a sign change marks the event.
    ///
    /// Must not mutate anything; it may be called many times per step.
    fn witness(&self, state: &S) -> f64;

    /// Reacts to a located crossing.
    fn handle(&mut self, state: &mut S, accuracy: f64) -> EventResponse;
}

/// Handler result reported back to the integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventResponse {
    /// Whether the integrator should stop the rollout.
    pub terminate: bool,
    /// Whether the handler changed the state.
    pub fired: bool,
}

/// Seat support state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeatPhase {
    /// The seat still pushes on the pelvis.
    Applying,
    /// The seat has been released; terminal.
    Released,
}

/// Seat-release state owned by one rollout.
///
/// # Example
///
/// ```
/// use nalgebra::Vector3;
/// use sim_objective::{SeatContext, SeatEventState, SeatPhase, TriggeredEvent};
///
/// struct Sim { t: f64, force: Vector3<f64>, applies: bool }
///
/// impl SeatContext for Sim {
///     fn time(&self) -> f64 { self.t }
///     fn seat_force(&self) -> Vector3<f64> { self.force }
///     fn set_seat_applies_force(&mut self, applies: bool) { self.applies = applies; }
/// }
///
/// let mut seat = SeatEventState::new(100.0).unwrap();
/// let mut sim = Sim { t: 0.3, force: Vector3::new(0.0, 9.0, 0.0), applies: true };
///
/// assert!(seat.witness(&sim) < 0.0);
/// seat.handle(&mut sim, 1e-6);
/// assert_eq!(seat.phase(), SeatPhase::Released);
/// assert_eq!(seat.release_time(), Some(0.3));
/// assert!(!sim.applies);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SeatEventState {
    force_threshold: f64,
    applies_force: bool,
    release_time: Option<f64>,
}

impl SeatEventState {
    /// Creates the state in the `Applying` phase.
    ///
    /// `force_threshold` is compared against the squared force norm (N²).
    ///
    /// # Errors
    ///
    /// Returns [`ObjectiveError::InvalidParameter`] if the threshold is not
    /// positive and finite.
    pub fn new(force_threshold: f64) -> Result<Self> {
        if !(force_threshold.is_finite() && force_threshold > 0.0) {
            return Err(ObjectiveError::invalid_parameter(format!(
                "seat force threshold must be positive, got {force_threshold}"
            )));
        }
        Ok(Self {
            force_threshold,
            applies_force: true,
            release_time: None,
        })
    }

    /// Squared-force threshold.
    #[must_use]
    pub fn force_threshold(&self) -> f64 {
        self.force_threshold
    }

    /// Whether the support element is still on.
    #[must_use]
    pub fn applies_force(&self) -> bool {
        self.applies_force
    }

    /// Release time, once released.
    #[must_use]
    pub fn release_time(&self) -> Option<f64> {
        self.release_time
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SeatPhase {
        if self.applies_force {
            SeatPhase::Applying
        } else {
            SeatPhase::Released
        }
    }
}

impl<S: SeatContext> TriggeredEvent<S> for SeatEventState {
    fn witness(&self, state: &S) -> f64 {
        state.seat_force().norm_squared() - self.force_threshold
    }

    fn handle(&mut self, state: &mut S, _accuracy: f64) -> EventResponse {
        let time = state.time();
        if self.phase() == SeatPhase::Released {
            debug!(time, released_at = ?self.release_time, "ignoring seat crossing after release");
            return EventResponse::default();
        }

        let force = state.seat_force().norm();
        state.set_seat_applies_force(false);
        self.applies_force = false;
        self.release_time = Some(time);
        info!(time, force, "releasing seat constraint");

        EventResponse {
            terminate: false,
            fired: true,
        }
    }
}
