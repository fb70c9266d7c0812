//! Channel names resolved to column indices before evaluation.

use sim_telemetry::{ChannelIndex, RolloutTelemetry};

use crate::config::ChannelNames;
use crate::error::Result;

/// Every channel the objective reads, resolved once per evaluation.
///
/// Resolution fails on the first configured name that the telemetry does
/// not carry, before any term touches a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChannels {
    /// Stance-foot wrench in `foot_wrenches`.
    pub foot_wrench: ChannelIndex,
    /// Tangential seat force in `forces`.
    pub seat_force_x: ChannelIndex,
    /// Normal seat force in `forces`.
    pub seat_force_y: ChannelIndex,
    /// Joint-velocity coordinates in `coordinates`.
    pub final_speed_coordinates: Vec<ChannelIndex>,
    /// Coordinate-velocity coordinates in `coordinates`.
    pub relevant_coordinates: Vec<ChannelIndex>,
    /// Limit force records in `forces`.
    pub limit_forces: Vec<ChannelIndex>,
    /// Assistance record in `forces`, when the term is enabled.
    pub assistance: Option<ChannelIndex>,
}

impl ResolvedChannels {
    /// Resolves `names` against `telemetry`.
    pub fn resolve(
        names: &ChannelNames,
        telemetry: &RolloutTelemetry,
        with_assistance: bool,
    ) -> Result<Self> {
        let forces = &telemetry.forces;
        let coordinates = &telemetry.coordinates;
        Ok(Self {
            foot_wrench: telemetry.foot_wrenches.channel(&names.foot_wrench)?,
            seat_force_x: forces.channel(&names.seat_force_x)?,
            seat_force_y: forces.channel(&names.seat_force_y)?,
            final_speed_coordinates: coordinates.channels(&names.final_speed_coordinates)?,
            relevant_coordinates: coordinates.channels(&names.relevant_coordinates)?,
            limit_forces: forces.channels(&names.limit_forces)?,
            assistance: if with_assistance {
                Some(forces.channel(&names.assistance)?)
            } else {
                None
            },
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use sim_telemetry::ContactPair;

    fn telemetry(forces: &[&str]) -> RolloutTelemetry {
        let names = ChannelNames::default();
        RolloutTelemetry::new(
            ["vasti_r"],
            names.relevant_coordinates.clone(),
            [names.foot_wrench.clone()],
            forces.iter().map(|s| (*s).to_string()),
            ContactPair::default(),
        )
    }

    #[test]
    fn resolves_default_layout() {
        let names = ChannelNames::default();
        let mut forces: Vec<&str> = vec![names.seat_force_x.as_str(), names.seat_force_y.as_str()];
        forces.extend(names.limit_forces.iter().map(String::as_str));
        let telemetry = telemetry(&forces);

        let resolved = ResolvedChannels::resolve(&names, &telemetry, false).unwrap();
        assert_eq!(resolved.seat_force_y.get(), 1);
        assert_eq!(resolved.limit_forces.len(), 3);
        assert!(resolved.assistance.is_none());
    }

    #[test]
    fn missing_assistance_is_lookup_error() {
        let names = ChannelNames::default();
        let mut forces: Vec<&str> = vec![names.seat_force_x.as_str(), names.seat_force_y.as_str()];
        forces.extend(names.limit_forces.iter().map(String::as_str));
        let telemetry = telemetry(&forces);

        let err = ResolvedChannels::resolve(&names, &telemetry, true).unwrap_err();
        assert!(err.is_lookup());
        assert!(err.to_string().contains("assistanceForce"));
    }

    #[test]
    fn missing_seat_channel_is_lookup_error() {
        let names = ChannelNames::default();
        let telemetry = telemetry(&["seatConstraint_ground_Fx"]);
        let err = ResolvedChannels::resolve(&names, &telemetry, false).unwrap_err();
        assert!(err.is_lookup());
    }
}
