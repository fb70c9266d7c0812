//! The positional cost vector handed to the optimizer.

use crate::config::CostVariant;

/// Term names of the progress-blended layout.
pub const PROGRESS_BLENDED_TERMS: [&str; 10] = [
    "target_distance_ratio",
    "joint_velocity",
    "feet_force",
    "chair_normal",
    "muscle_effort",
    "muscle_effort_rate",
    "limit_torque",
    "contact_toe",
    "contact_heel",
    "contact_pull_and_slip",
];

/// Term names of the phase-blended layout.
pub const PHASE_BLENDED_TERMS: [&str; 10] = [
    "com_vertical",
    "com_horizontal",
    "coordinate_velocity",
    "chair_normal",
    "muscle_effort",
    "muscle_effort_rate",
    "limit_torque",
    "contact_toe",
    "contact_heel",
    "contact_pull_and_slip",
];

/// Name of the optional eleventh term.
pub const ASSISTANCE_TERM: &str = "assistance";

/// Fixed-length, ordered cost terms of one rollout.
///
/// Positions are the contract with the optimizer; names are for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct CostVector {
    variant: CostVariant,
    values: Vec<f64>,
}

impl CostVector {
    pub(crate) fn new(variant: CostVariant, values: Vec<f64>) -> Self {
        Self { variant, values }
    }

    /// Layout this vector follows.
    #[must_use]
    pub fn variant(&self) -> CostVariant {
        self.variant
    }

    /// Number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Terms in positional order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Consumes the vector, returning the terms.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// Term names in positional order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        let base = match self.variant {
            CostVariant::ProgressBlended => PROGRESS_BLENDED_TERMS,
            CostVariant::PhaseBlended => PHASE_BLENDED_TERMS,
        };
        base.into_iter()
            .chain(std::iter::once(ASSISTANCE_TERM))
            .take(self.values.len())
    }

    /// Term by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.names()
            .position(|n| n == name)
            .and_then(|i| self.values.get(i).copied())
    }

    /// `(name, value)` pairs in positional order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.names().zip(self.values.iter().copied())
    }
}

impl std::ops::Index<usize> for CostVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}
