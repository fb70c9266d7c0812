//! Telemetry buffers for simulation rollouts.
//!
//! A rollout records time-indexed samples that are reduced to scalar costs
//! once the rollout finishes:
//!
//! - [`TimeSeries`] - Uniformly sampled series of one value type
//! - [`TimeSeriesTable`] - Series with one value per named channel
//! - [`ChannelIndex`] - A channel resolved once, before per-sample loops
//! - [`RolloutTelemetry`] - Every buffer a sit-to-stand rollout produces
//!
//! Sample types: [`Wrench`], [`CoordinateSample`], [`ComSample`],
//! [`ContactPair`].
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It holds data only;
//! the physics engine fills the buffers and the objective reads them.
//!
//! # Coordinate System
//!
//! Y is up; gravity acts along −Y. Vertical force components are `force.y`.
//!
//! # Example
//!
//! ```
//! use sim_telemetry::{ContactPair, RolloutTelemetry};
//!
//! let mut telemetry = RolloutTelemetry::new(
//!     ["soleus_r"],
//!     ["knee_angle"],
//!     ["/jointset/ground_calcn_r|reaction_on_parent"],
//!     ["seatConstraint_ground_Fx", "seatConstraint_ground_Fy"],
//!     ContactPair::default(),
//! );
//! telemetry.activations.append_row(0.0, vec![0.05]).unwrap();
//! assert!(!telemetry.is_empty());
//!
//! telemetry.clear();
//! assert!(telemetry.is_empty());
//! ```

#![doc(html_root_url = "https://docs.rs/sim-telemetry/0.1.0")]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

mod error;
mod rollout;
mod sample;
mod series;
mod table;

pub use error::{Result, TelemetryError};
pub use rollout::RolloutTelemetry;
pub use sample::{ComSample, ContactPair, CoordinateSample, Wrench};
pub use series::{TimeSeries, nearest_index, validate_uniform};
pub use table::{ChannelIndex, TimeSeriesTable};
