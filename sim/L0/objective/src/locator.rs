//! Root-finding for triggered events in headless rollouts.
//!
//! A full integrator brackets witness sign changes between steps and then
//! narrows the bracket before calling the handler. [`EventLocator`] does the
//! same with bisection; [`drive_events`] walks a fixed step sequence and
//! calls the handler at every located crossing.
//!
//! Root-finding belongs to the integrator. This module only serves headless
//! rollouts and tests that have no integrator to drive the seat event.

use crate::error::{ObjectiveError, Result};
use crate::seat::TriggeredEvent;

/// Bisection-based crossing locator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventLocator {
    accuracy: f64,
    max_iterations: usize,
}

impl Default for EventLocator {
    fn default() -> Self {
        Self {
            accuracy: 1e-6,
            max_iterations: 64,
        }
    }
}

impl EventLocator {
    /// Creates a locator that narrows crossings to `accuracy` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectiveError::InvalidParameter`] if `accuracy` is not
    /// positive and finite.
    pub fn new(accuracy: f64) -> Result<Self> {
        if !(accuracy.is_finite() && accuracy > 0.0) {
            return Err(ObjectiveError::invalid_parameter(format!(
                "event accuracy must be positive, got {accuracy}"
            )));
        }
        Ok(Self {
            accuracy,
            ..Self::default()
        })
    }

    /// Time resolution of located events.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Whether the witness changed sign between two values.
    ///
    /// Positive to non-positive and non-positive to positive both count.
    #[must_use]
    pub fn crossed(before: f64, after: f64) -> bool {
        (before > 0.0) != (after > 0.0)
    }

    /// Locates a sign change of `witness` in `[t0, t1]`.
    ///
    /// Returns the earliest bracketed time after the crossing, within
    /// [`EventLocator::accuracy`], or `None` if the endpoints share a sign.
    pub fn locate(&self, t0: f64, t1: f64, mut witness: impl FnMut(f64) -> f64) -> Option<f64> {
        let (mut lo, mut hi) = (t0, t1);
        let w_lo = witness(lo);
        if !Self::crossed(w_lo, witness(hi)) {
            return None;
        }
        let lo_positive = w_lo > 0.0;
        for _ in 0..self.max_iterations {
            if hi - lo <= self.accuracy {
                break;
            }
            let mid = 0.5 * (lo + hi);
            if (witness(mid) > 0.0) == lo_positive {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some(hi)
    }
}

/// Steps `state` through `times`, firing `event` at each located crossing.
///
/// `advance` places the state at an arbitrary time inside the current step,
/// the way an integrator interpolates within a step. Returns the times at
/// which the handler changed the state. Stops early if the handler asks to
/// terminate.
pub fn drive_events<S, E>(
    state: &mut S,
    event: &mut E,
    times: &[f64],
    locator: &EventLocator,
    mut advance: impl FnMut(&mut S, f64),
) -> Vec<f64>
where
    E: TriggeredEvent<S>,
{
    let mut fired = Vec::new();
    let Some(&start) = times.first() else {
        return fired;
    };
    advance(state, start);

    for step in times.windows(2) {
        let (t0, t1) = (step[0], step[1]);
        let before = event.witness(state);
        advance(state, t1);
        if !EventLocator::crossed(before, event.witness(state)) {
            continue;
        }

        let located = locator.locate(t0, t1, |t| {
            advance(state, t);
            event.witness(state)
        });
        let Some(t_event) = located else {
            continue;
        };
        advance(state, t_event);
        let response = event.handle(state, locator.accuracy());
        if response.fired {
            fired.push(t_event);
        }
        advance(state, t1);
        if response.terminate {
            break;
        }
    }
    fired
}
