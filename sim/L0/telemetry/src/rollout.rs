//! All buffers recorded for one rollout.

use tracing::trace;

use crate::sample::{ComSample, ContactPair, CoordinateSample, Wrench};
use crate::series::TimeSeries;
use crate::table::TimeSeriesTable;

/// The telemetry a simulation rollout hands to the objective.
///
/// Buffers are owned by the rollout. Consumers that reduce them to a cost
/// call [`RolloutTelemetry::clear`] afterwards so the next rollout starts
/// from empty buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct RolloutTelemetry {
    /// Muscle activation per muscle.
    pub activations: TimeSeriesTable<f64>,
    /// Generalized coordinate value/speed per coordinate.
    pub coordinates: TimeSeriesTable<CoordinateSample>,
    /// Whole-body center of mass.
    pub center_of_mass: TimeSeries<ComSample>,
    /// Ground reaction wrenches on the feet.
    pub foot_wrenches: TimeSeriesTable<Wrench>,
    /// Scalar force records: support element components, limit forces,
    /// assistance.
    pub forces: TimeSeriesTable<f64>,
    /// Heel/toe contact points at the first instant.
    pub contact_pair: ContactPair,
}

impl RolloutTelemetry {
    /// Creates empty buffers with the given channel labels.
    #[must_use]
    pub fn new<A, C, F, R>(
        muscles: impl IntoIterator<Item = A>,
        coordinates: impl IntoIterator<Item = C>,
        feet: impl IntoIterator<Item = F>,
        forces: impl IntoIterator<Item = R>,
        contact_pair: ContactPair,
    ) -> Self
    where
        A: Into<String>,
        C: Into<String>,
        F: Into<String>,
        R: Into<String>,
    {
        Self {
            activations: TimeSeriesTable::new("activations", muscles),
            coordinates: TimeSeriesTable::new("coordinates", coordinates),
            center_of_mass: TimeSeries::new(),
            foot_wrenches: TimeSeriesTable::new("foot_wrenches", feet),
            forces: TimeSeriesTable::new("forces", forces),
            contact_pair,
        }
    }

    /// Returns true if every buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activations.is_empty()
            && self.coordinates.is_empty()
            && self.center_of_mass.is_empty()
            && self.foot_wrenches.is_empty()
            && self.forces.is_empty()
    }

    /// Empties every buffer. Channel labels are kept.
    pub fn clear(&mut self) {
        trace!(
            activations = self.activations.len(),
            coordinates = self.coordinates.len(),
            center_of_mass = self.center_of_mass.len(),
            foot_wrenches = self.foot_wrenches.len(),
            forces = self.forces.len(),
            "clearing rollout telemetry"
        );
        self.activations.clear();
        self.coordinates.clear();
        self.center_of_mass.clear();
        self.foot_wrenches.clear();
        self.forces.clear();
    }
}
