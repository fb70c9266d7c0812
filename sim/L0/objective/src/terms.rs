//! Term evaluators: pure reductions of telemetry to scalar costs.
//!
//! Each evaluator reads one or two buffers (plus a weight sequence where the
//! term is time-weighted) and returns a scalar. Integrals over a window that
//! is empty because of phase or release gating evaluate to zero; an empty
//! buffer that the term needs is an error.

use nalgebra::Point3;
use sim_telemetry::{ChannelIndex, ComSample, CoordinateSample, TimeSeries, TimeSeriesTable, Wrench};

use crate::error::{ObjectiveError, Result, require_non_empty};
use crate::numeric::{mean, weighted_integral};
use crate::weighting::WeightSequence;

/// Center-of-mass distance to the target at the first and last instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetDistance {
    /// Distance at the first instant, `d0`.
    pub initial: f64,
    /// Distance at the final instant, `dF`.
    pub last: f64,
}

impl TargetDistance {
    /// Measures both distances.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectiveError::InvalidParameter`] if the center of mass
    /// starts on the target (`d0 = 0`), which leaves the ratio undefined.
    pub fn measure(
        initial_com: &Point3<f64>,
        final_com: &Point3<f64>,
        target: &Point3<f64>,
    ) -> Result<Self> {
        let initial = nalgebra::distance(initial_com, target);
        let last = nalgebra::distance(final_com, target);
        if !(initial.is_finite() && initial > 0.0) {
            return Err(ObjectiveError::invalid_parameter(format!(
                "initial distance to the center-of-mass target must be positive, got {initial}"
            )));
        }
        Ok(Self { initial, last })
    }

    /// `dF / d0`: 1 if the body did not get closer, 0 on the target.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.last / self.initial
    }

    /// `1 − min(d0, dF) / d0`, in `[0, 1]`.
    ///
    /// Used to blend other terms, not a cost in itself.
    #[must_use]
    pub fn progress(&self) -> f64 {
        (1.0 - self.initial.min(self.last) / self.initial).clamp(0.0, 1.0)
    }
}

/// The interval between seat release and the end of the rollout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseWindow {
    /// Seat release time, if the seat was released.
    pub release_time: Option<f64>,
    /// Final time of the rollout.
    pub t_final: f64,
}

impl ReleaseWindow {
    /// Creates a release window.
    #[must_use]
    pub const fn new(release_time: Option<f64>, t_final: f64) -> Self {
        Self {
            release_time,
            t_final,
        }
    }

    /// `(start, length)` of the window, if it is at least `epsilon` long.
    #[must_use]
    pub fn span(&self, epsilon: f64) -> Option<(f64, f64)> {
        let start = self.release_time?;
        let length = self.t_final - start;
        (length > epsilon).then_some((start, length))
    }
}

/// Sum of the absolute final speeds of `joints`, in degrees per second.
///
/// # Errors
///
/// Returns [`ObjectiveError::EmptyData`] if no coordinates were recorded.
pub fn joint_velocity_cost(
    coordinates: &TimeSeriesTable<CoordinateSample>,
    joints: &[ChannelIndex],
) -> Result<f64> {
    require_non_empty(coordinates.len(), "coordinate record")?;
    let speed: f64 = joints
        .iter()
        .filter_map(|&j| coordinates.last_value(j))
        .map(|c| c.speed.abs())
        .sum();
    Ok(speed.to_degrees())
}

/// Mean absolute deviation of the vertical foot force from body weight,
/// over the window after seat release.
///
/// Starts at the row nearest to the release time and normalizes by the
/// window length. Zero if the seat was not released or the window is
/// shorter than `epsilon`.
///
/// # Errors
///
/// Returns [`ObjectiveError::EmptyData`] if the window is open but no foot
/// wrenches were recorded.
pub fn feet_force_cost(
    wrenches: &TimeSeriesTable<Wrench>,
    foot: ChannelIndex,
    body_weight: f64,
    window: ReleaseWindow,
    epsilon: f64,
    dt: f64,
) -> Result<f64> {
    let Some((start, length)) = window.span(epsilon) else {
        return Ok(0.0);
    };
    let first = wrenches
        .nearest_row_index(start)
        .ok_or_else(|| ObjectiveError::empty("foot wrench record"))?;

    let deviation: f64 = wrenches
        .column(foot)
        .skip(first)
        .map(|w| (w.vertical_force() - body_weight).abs())
        .sum();
    Ok(deviation * dt / length)
}

/// Decay-weighted integral of the center-of-mass height lost since the
/// first instant.
///
/// Signed: a rising center of mass makes the term negative.
pub fn com_vertical_cost(
    com: &TimeSeries<ComSample>,
    weights: &WeightSequence,
    dt: f64,
) -> Result<f64> {
    let (_, first) = com
        .first()
        .ok_or_else(|| ObjectiveError::empty("center-of-mass record"))?;
    let start_height = first.height();
    weighted_integral(
        com.values().iter().map(|c| start_height - c.height()),
        weights,
        dt,
    )
}

/// Decay-weighted integral of the horizontal (XZ) distance between the foot
/// reference point and the center of mass.
pub fn com_horizontal_cost(
    com: &TimeSeries<ComSample>,
    foot_reference: &Point3<f64>,
    weights: &WeightSequence,
    dt: f64,
) -> Result<f64> {
    require_non_empty(com.len(), "center-of-mass record")?;
    weighted_integral(
        com.values().iter().map(|c| {
            let offset = c.position - *foot_reference;
            offset.x.hypot(offset.z)
        }),
        weights,
        dt,
    )
}

/// Sum over `coordinates` of the decay-weighted integral of absolute speed,
/// in degrees.
pub fn coordinate_velocity_cost(
    table: &TimeSeriesTable<CoordinateSample>,
    coordinates: &[ChannelIndex],
    weights: &WeightSequence,
    dt: f64,
) -> Result<f64> {
    require_non_empty(table.len(), "coordinate record")?;
    weights.check_aligned(table.len())?;
    coordinates.iter().try_fold(0.0, |acc, &c| {
        let speeds: Vec<f64> = table.column(c).map(|s| s.speed.abs().to_degrees()).collect();
        Ok(acc + weighted_integral(speeds.into_iter(), weights, dt)?)
    })
}

/// First row at or after `from`, or the first row when unrestricted.
fn first_row_from(times: &[f64], from: Option<f64>) -> usize {
    from.map_or(0, |t| times.partition_point(|&ti| ti < t))
}

/// Mean activation magnitude over every muscle and every sample at or
/// after `from`.
///
/// # Errors
///
/// Returns [`ObjectiveError::EmptyData`] if no activations were recorded
/// or the table has no muscles.
pub fn activation_cost(activations: &TimeSeriesTable<f64>, from: Option<f64>) -> Result<f64> {
    require_non_empty(activations.len(), "activation record")?;
    require_non_empty(activations.num_channels(), "activation channels")?;
    let start = first_row_from(activations.times(), from);
    let (sum, count) = activations
        .rows()
        .skip(start)
        .flatten()
        .fold((0.0, 0_usize), |(s, n), a| (s + a.abs(), n + 1));
    Ok(mean(sum, count))
}

/// Mean absolute sample-to-sample activation change over every muscle,
/// for samples at or after `from`.
pub fn activation_rate_cost(activations: &TimeSeriesTable<f64>, from: Option<f64>) -> Result<f64> {
    require_non_empty(activations.len(), "activation record")?;
    require_non_empty(activations.num_channels(), "activation channels")?;
    let start = first_row_from(activations.times(), from);
    let rows: Vec<&[f64]> = activations.rows().skip(start).collect();
    let (sum, count) = rows
        .windows(2)
        .flat_map(|pair| pair[0].iter().zip(pair[1]).map(|(a, b)| (b - a).abs()))
        .fold((0.0, 0_usize), |(s, n), d| (s + d, n + 1));
    Ok(mean(sum, count))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    const DT: f64 = 0.01;

    fn times(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 * DT).collect()
    }

    fn ones(n: usize) -> WeightSequence {
        WeightSequence::from(vec![1.0; n])
    }

    fn activation_table(rows: &[[f64; 2]]) -> TimeSeriesTable<f64> {
        let mut table = TimeSeriesTable::new("activations", ["soleus", "vasti"]);
        for (t, row) in times(rows.len()).into_iter().zip(rows) {
            table.append_row(t, row.to_vec()).unwrap();
        }
        table
    }

    #[test]
    fn target_distance_unmoved_and_reached() {
        let target = Point3::new(0.3, 0.9, 0.0);
        let start = Point3::new(0.0, 0.5, 0.0);

        let unmoved = TargetDistance::measure(&start, &start, &target).unwrap();
        assert_relative_eq!(unmoved.ratio(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(unmoved.progress(), 0.0, epsilon = 1e-12);

        let reached = TargetDistance::measure(&start, &target, &target).unwrap();
        assert_eq!(reached.ratio(), 0.0);
        assert_eq!(reached.progress(), 1.0);
    }

    #[test]
    fn progress_clamped_when_moving_away() {
        let target = Point3::origin();
        let d = TargetDistance::measure(&Point3::new(1.0, 0.0, 0.0), &Point3::new(2.0, 0.0, 0.0), &target)
            .unwrap();
        assert_relative_eq!(d.ratio(), 2.0, epsilon = 1e-12);
        assert_eq!(d.progress(), 0.0);
    }

    #[test]
    fn target_distance_undefined_on_target() {
        let p = Point3::new(0.1, 0.2, 0.3);
        assert!(TargetDistance::measure(&p, &p, &p).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn joint_velocity_uses_final_row_only() {
        let mut table = TimeSeriesTable::new("coordinates", ["hip", "knee", "ankle", "lumbar"]);
        table
            .append_row(0.0, vec![CoordinateSample::new(0.0, 100.0); 4])
            .unwrap();
        table
            .append_row(
                DT,
                vec![
                    CoordinateSample::new(0.0, 1.0),
                    CoordinateSample::new(0.0, -0.5),
                    CoordinateSample::new(0.0, 0.25),
                    CoordinateSample::new(0.0, 9.0),
                ],
            )
            .unwrap();
        let joints = table.channels(&["hip", "knee", "ankle"]).unwrap();
        let cost = joint_velocity_cost(&table, &joints).unwrap();
        assert_relative_eq!(cost, 1.75_f64.to_degrees(), epsilon = 1e-9);
    }

    #[test]
    fn joint_velocity_requires_data() {
        let table: TimeSeriesTable<CoordinateSample> = TimeSeriesTable::new("coordinates", ["hip"]);
        assert!(joint_velocity_cost(&table, &[]).unwrap_err().is_empty_data());
    }

    #[test]
    fn release_window_gating() {
        assert!(ReleaseWindow::new(None, 1.0).span(1e-2).is_none());
        assert!(ReleaseWindow::new(Some(0.995), 1.0).span(1e-2).is_none());
        let (start, len) = ReleaseWindow::new(Some(0.4), 1.0).span(1e-2).unwrap();
        assert_eq!(start, 0.4);
        assert_relative_eq!(len, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn feet_force_after_release() {
        let mut table = TimeSeriesTable::new("feet", ["right"]);
        for (i, t) in times(11).into_iter().enumerate() {
            let fy = if i < 5 { 0.0 } else { 710.0 };
            table
                .append_row(t, vec![Wrench::new(Vector3::new(0.0, fy, 0.0), Vector3::zeros())])
                .unwrap();
        }
        let foot = table.channel("right").unwrap();
        // Rows 5..=10 deviate by 10 N; window is 0.05 s long.
        let cost = feet_force_cost(&table, foot, 700.0, ReleaseWindow::new(Some(0.05), 0.1), 1e-2, DT)
            .unwrap();
        assert_relative_eq!(cost, 6.0 * 10.0 * DT / 0.05, epsilon = 1e-9);
    }

    #[test]
    fn feet_force_zero_without_release() {
        let table: TimeSeriesTable<Wrench> = TimeSeriesTable::new("feet", ["right"]);
        let foot = table.channel("right").unwrap();
        let cost = feet_force_cost(&table, foot, 700.0, ReleaseWindow::new(None, 1.0), 1e-2, DT).unwrap();
        assert_eq!(cost, 0.0);

        let err = feet_force_cost(&table, foot, 700.0, ReleaseWindow::new(Some(0.2), 1.0), 1e-2, DT)
            .unwrap_err();
        assert!(err.is_empty_data());
    }

    #[test]
    fn com_vertical_signed_drop() {
        let heights = [0.5, 0.45, 0.4];
        let com = TimeSeries::from_samples(
            times(3)
                .into_iter()
                .zip(heights)
                .map(|(t, h)| (t, ComSample::at_rest(Point3::new(0.0, h, 0.0)))),
        )
        .unwrap();
        let cost = com_vertical_cost(&com, &ones(3), DT).unwrap();
        assert_relative_eq!(cost, (0.0 + 0.05 + 0.1) * DT, epsilon = 1e-12);

        let rising = TimeSeries::from_samples(
            times(2)
                .into_iter()
                .zip([0.5, 0.7])
                .map(|(t, h)| (t, ComSample::at_rest(Point3::new(0.0, h, 0.0)))),
        )
        .unwrap();
        assert!(com_vertical_cost(&rising, &ones(2), DT).unwrap() < 0.0);
    }

    #[test]
    fn com_horizontal_offset() {
        let com = TimeSeries::from_samples([
            (0.0, ComSample::at_rest(Point3::new(0.3, 0.5, 0.4))),
            (DT, ComSample::at_rest(Point3::new(0.0, 0.9, 0.0))),
        ])
        .unwrap();
        let weights = WeightSequence::from(vec![0.5, 1.0]);
        let cost = com_horizontal_cost(&com, &Point3::origin(), &weights, DT).unwrap();
        assert_relative_eq!(cost, 0.5 * 0.5 * DT, epsilon = 1e-12);

        assert!(com_horizontal_cost(&com, &Point3::origin(), &ones(3), DT).is_err());
    }

    #[test]
    fn coordinate_velocity_sums_channels() {
        let mut table = TimeSeriesTable::new("coordinates", ["hip", "knee"]);
        table
            .append_row(0.0, vec![CoordinateSample::new(0.0, 1.0), CoordinateSample::new(0.0, -2.0)])
            .unwrap();
        table
            .append_row(DT, vec![CoordinateSample::new(0.0, 1.0), CoordinateSample::new(0.0, -2.0)])
            .unwrap();
        let channels = table.channels(&["hip", "knee"]).unwrap();
        let weights = WeightSequence::from(vec![0.0, 1.0]);
        let cost = coordinate_velocity_cost(&table, &channels, &weights, DT).unwrap();
        assert_relative_eq!(cost, 3.0_f64.to_degrees() * DT, epsilon = 1e-9);
    }

    #[test]
    fn activation_terms_zero_for_silent_muscles() {
        let table = activation_table(&[[0.0, 0.0]; 6]);
        for from in [None, Some(0.0), Some(0.03), Some(10.0)] {
            assert_eq!(activation_cost(&table, from).unwrap(), 0.0);
            assert_eq!(activation_rate_cost(&table, from).unwrap(), 0.0);
        }
    }

    #[test]
    fn activation_mean_and_rate() {
        let table = activation_table(&[[0.1, 0.3], [0.3, 0.3], [0.2, 0.5]]);
        assert_relative_eq!(activation_cost(&table, None).unwrap(), 1.7 / 6.0, epsilon = 1e-12);
        // Changes: 0.2, 0.0, 0.1, 0.2
        assert_relative_eq!(activation_rate_cost(&table, None).unwrap(), 0.5 / 4.0, epsilon = 1e-12);
        // From the second sample: values 0.3, 0.3, 0.2, 0.5; changes 0.1, 0.2.
        assert_relative_eq!(activation_cost(&table, Some(DT)).unwrap(), 1.3 / 4.0, epsilon = 1e-12);
        assert_relative_eq!(activation_rate_cost(&table, Some(DT)).unwrap(), 0.15, epsilon = 1e-12);
    }

    #[test]
    fn activation_requires_data() {
        let table: TimeSeriesTable<f64> = TimeSeriesTable::new("activations", ["soleus"]);
        assert!(activation_cost(&table, None).unwrap_err().is_empty_data());
        assert!(activation_rate_cost(&table, None).unwrap_err().is_empty_data());
    }
}
