//! Objective evaluation for sit-to-stand trajectory optimization.
//!
//! An outer optimizer repeatedly runs a musculoskeletal rollout that starts
//! seated and tries to stand. This crate scores each rollout:
//!
//! - [`CostAggregator`] - Reduces a rollout's telemetry to a fixed-length
//!   [`CostVector`] and clears the buffers
//! - [`decay_weights`] - Exponential weighting toward the final time
//! - Term evaluators ([`terms`]) - Target distance, joint speeds, foot
//!   support force, center-of-mass drift, coordinate speeds, muscle effort
//! - [`chair_cost`] - Seat normal-force impulse and friction-cone slip
//! - [`ExternalTerms`] - Model-defined limit torque, contact and assistance
//!   terms
//! - [`SeatEventState`] - The one-shot seat-release event the integrator
//!   triggers during the rollout
//! - [`EventLocator`] / [`drive_events`] - Headless crossing location for
//!   rollouts and tests run without an integrator
//!
//! # Data Flow
//!
//! ```text
//! simulation ──► RolloutTelemetry ──► weights ──► term evaluators
//!      │                                               │
//!      └─ SeatEventState (release time) ──► CostAggregator ──► CostVector
//! ```
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It performs no
//! simulation itself and keeps no state between rollouts.
//!
//! # Example
//!
//! ```
//! use nalgebra::{Point3, Vector3};
//! use sim_objective::{ChannelNames, CostAggregator, ObjectiveConfig};
//! use sim_telemetry::{ComSample, ContactPair, CoordinateSample, RolloutTelemetry, Wrench};
//!
//! let names = ChannelNames::default();
//! let mut forces = vec![names.seat_force_x.clone(), names.seat_force_y.clone()];
//! forces.extend(names.limit_forces.iter().cloned());
//!
//! let mut telemetry = RolloutTelemetry::new(
//!     ["vasti_r"],
//!     names.relevant_coordinates.clone(),
//!     [names.foot_wrench.clone()],
//!     forces,
//!     ContactPair::default(),
//! );
//! for i in 0..=100 {
//!     let t = f64::from(i) * 0.01;
//!     let rise = 0.5 + 0.4 * t;
//!     telemetry.activations.append_row(t, vec![0.2]).unwrap();
//!     telemetry
//!         .coordinates
//!         .append_row(t, vec![CoordinateSample::new(0.0, 0.1); 4])
//!         .unwrap();
//!     telemetry
//!         .center_of_mass
//!         .push(t, ComSample::at_rest(Point3::new(0.05, rise, 0.0)))
//!         .unwrap();
//!     telemetry
//!         .foot_wrenches
//!         .append_row(t, vec![Wrench::new(Vector3::new(0.0, 700.0, 0.0), Vector3::zeros())])
//!         .unwrap();
//!     telemetry.forces.append_row(t, vec![0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
//! }
//!
//! let aggregator = CostAggregator::new(ObjectiveConfig::default()).unwrap();
//! let costs = aggregator.evaluate(&mut telemetry, Some(0.3)).unwrap();
//!
//! assert_eq!(costs.len(), 10);
//! assert!(costs.as_slice().iter().all(|c| c.is_finite()));
//! assert!(telemetry.is_empty());
//! ```

#![doc(html_root_url = "https://docs.rs/sim-objective/0.1.0")]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::suboptimal_flops
)]

mod aggregator;
mod chair;
mod channels;
mod config;
mod cost;
mod error;
mod external;
mod locator;
mod numeric;
mod seat;
pub mod terms;
mod weighting;

pub use aggregator::{CostAggregator, Phase};
pub use chair::{ChairCost, chair_cost, friction_violation};
pub use channels::ResolvedChannels;
pub use config::{ChannelNames, CostVariant, ObjectiveConfig};
pub use cost::{ASSISTANCE_TERM, CostVector, PHASE_BLENDED_TERMS, PROGRESS_BLENDED_TERMS};
pub use error::{ObjectiveError, Result};
pub use external::{DefaultExternalTerms, ExternalTerms, TermInputs};
pub use locator::{EventLocator, drive_events};
pub use numeric::{time_deltas, weighted_integral};
pub use seat::{EventResponse, SeatContext, SeatEventState, SeatPhase, TriggeredEvent};
pub use weighting::{WeightSequence, decay_weights};
