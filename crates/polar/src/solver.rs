//! Optimal-angle solving.
//!
//! For each direction the solver first tries the certificate's direct
//! optimum series; when those are absent it estimates the VMG-maximizing
//! angle from the reaching channels, refining between adjacent sampled
//! angles. One direction failing does not fail the request — it is
//! reported through `notes` — but a polar that supports neither
//! direction is an error.

use common::{DirectionTarget, Error, OptimalResult};
use tracing::debug;

use crate::interpolate::interp_at;
use crate::model::PolarModel;
use crate::reaching::build_reaching;
use crate::units::{round1, round2};

/// Interior fractions evaluated between adjacent candidate angles.
const REFINE_FRACTIONS: [f64; 3] = [0.25, 0.5, 0.75];

/// Sailing direction being solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Upwind,
    Downwind,
}

impl Direction {
    /// Plausible true-wind-angle window for estimation, degrees.
    fn angle_range(self) -> (f64, f64) {
        match self {
            Direction::Upwind => (35.0, 75.0),
            Direction::Downwind => (135.0, 179.0),
        }
    }

    /// Projection factor of boat speed onto the wind axis at `angle`.
    ///
    /// Downwind measures from dead run, so the projection mirrors the
    /// angle around 180°.
    fn projection(self, angle: f64) -> f64 {
        match self {
            Direction::Upwind => angle.to_radians().cos(),
            Direction::Downwind => (180.0 - angle).to_radians().cos(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Direction::Upwind => "upwind",
            Direction::Downwind => "downwind",
        }
    }
}

/// How a direction was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectionSolution {
    /// Read from the certificate's direct angle/VMG series.
    Direct(DirectionTarget),
    /// Estimated by scanning the reaching channels.
    Estimated(DirectionTarget),
    /// No candidate produced a finite positive VMG.
    Unavailable,
}

/// Compute the full answer for one model at one wind speed.
pub fn compute_targets(model: &PolarModel, wind_speed: f64) -> Result<OptimalResult, Error> {
    let mut notes = Vec::new();

    let upwind = resolve(
        solve_direction(model, wind_speed, Direction::Upwind)?,
        Direction::Upwind,
        &mut notes,
    );
    let downwind = resolve(
        solve_direction(model, wind_speed, Direction::Downwind)?,
        Direction::Downwind,
        &mut notes,
    );

    if upwind.is_none() && downwind.is_none() {
        return Err(Error::InsufficientPolarData);
    }

    let reaching = build_reaching(model, wind_speed)?;

    Ok(OptimalResult {
        wind_speed,
        upwind,
        downwind,
        reaching,
        notes,
    })
}

fn resolve(
    solution: DirectionSolution,
    direction: Direction,
    notes: &mut Vec<String>,
) -> Option<DirectionTarget> {
    match solution {
        DirectionSolution::Direct(target) => Some(target),
        DirectionSolution::Estimated(target) => {
            notes.push(format!(
                "{} angle estimated from reaching allowances",
                direction.label()
            ));
            Some(target)
        }
        DirectionSolution::Unavailable => {
            notes.push(format!("{} targets unavailable for this polar", direction.label()));
            None
        }
    }
}

/// Solve one direction at one wind speed.
pub fn solve_direction(
    model: &PolarModel,
    wind_speed: f64,
    direction: Direction,
) -> Result<DirectionSolution, Error> {
    // 1. Direct path: certificate carries the optimum already.
    let direct = match direction {
        Direction::Upwind => &model.upwind,
        Direction::Downwind => &model.downwind,
    };
    if let Some(series) = direct {
        let angle = interp_at(&series.angles, &model.wind_steps, wind_speed)?;
        let vmg = interp_at(&series.vmg, &model.wind_steps, wind_speed)?;
        if vmg.is_finite() && vmg > 0.0 && angle.is_finite() {
            return Ok(DirectionSolution::Direct(make_target(direction, angle, vmg)));
        }
        debug!(
            "{} direct series unusable at {} kt, falling back to estimation",
            direction.label(),
            wind_speed
        );
    }

    // 2. Estimated path: scan the sampled angles in the plausible window.
    let (lo, hi) = direction.angle_range();
    let mut candidates: Vec<(f64, f64)> = Vec::new();
    for (&deg, series) in &model.angle_speed {
        let angle = f64::from(deg);
        if angle < lo || angle > hi {
            continue;
        }
        let speed = interp_at(series, &model.wind_steps, wind_speed)?;
        if speed.is_finite() && speed > 0.0 {
            candidates.push((angle, speed));
        }
    }
    // Map iteration is ascending, so candidates arrive sorted by angle.

    let mut best: Option<(f64, f64)> = None; // (angle, vmg)
    for &(angle, speed) in &candidates {
        consider(&mut best, angle, speed * direction.projection(angle));
    }

    // 3. Refinement: the true optimum usually sits between two sampled
    // angles; probe interior points on the linearized speed curve.
    for pair in candidates.windows(2) {
        let (angle_a, speed_a) = pair[0];
        let (angle_b, speed_b) = pair[1];
        for fraction in REFINE_FRACTIONS {
            let angle = angle_a + (angle_b - angle_a) * fraction;
            let speed = speed_a + (speed_b - speed_a) * fraction;
            consider(&mut best, angle, speed * direction.projection(angle));
        }
    }

    match best {
        Some((angle, vmg)) => Ok(DirectionSolution::Estimated(make_target(
            direction, angle, vmg,
        ))),
        None => Ok(DirectionSolution::Unavailable),
    }
}

fn consider(best: &mut Option<(f64, f64)>, angle: f64, vmg: f64) {
    if !vmg.is_finite() || vmg <= 0.0 {
        return;
    }
    if best.map_or(true, |(_, best_vmg)| vmg > best_vmg) {
        *best = Some((angle, vmg));
    }
}

/// Assemble the reported target for a winning angle/VMG pair.
///
/// Target boat speed is derived back from the VMG through the inverse
/// projection rather than read off the speed table, so the reported
/// speed and VMG stay consistent even for refined angles.
fn make_target(direction: Direction, angle: f64, vmg: f64) -> DirectionTarget {
    let target_speed = vmg / direction.projection(angle);
    DirectionTarget {
        angle: round1(angle),
        vmg: round2(vmg),
        target_speed: round2(target_speed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DirectSeries;
    use std::collections::BTreeMap;

    fn empty_model(wind_steps: Vec<f64>) -> PolarModel {
        PolarModel {
            wind_steps,
            upwind: None,
            downwind: None,
            angle_speed: BTreeMap::new(),
        }
    }

    /// Scenario A: direct upwind series, query at the axis midpoint.
    #[test]
    fn test_direct_upwind_interpolates_midpoint() {
        let mut model = empty_model(vec![10.0, 16.0]);
        model.upwind = Some(DirectSeries {
            angles: vec![40.0, 42.0],
            vmg: vec![5.0, 6.0], // normalized from 720 and 600 s/NM
        });

        let result = compute_targets(&model, 13.0).unwrap();
        let upwind = result.upwind.unwrap();

        assert_eq!(upwind.angle, 41.0);
        assert_eq!(upwind.vmg, 5.5);
        let expected = (5.5 / 41.0_f64.to_radians().cos() * 100.0).round() / 100.0;
        assert_eq!(upwind.target_speed, expected);
        assert!(result.notes.iter().all(|n| !n.contains("upwind")));
    }

    /// Scenario B: no direct series, estimation from two sampled angles.
    #[test]
    fn test_estimated_upwind_lands_between_samples() {
        let mut model = empty_model(vec![10.0, 16.0]);
        // 50° beats 40° on VMG, but the cosine falloff puts the true
        // optimum inside the interval, where refinement finds it.
        model.angle_speed.insert(40, vec![6.0, 6.5]);
        model.angle_speed.insert(50, vec![7.3, 7.9]);

        let result = compute_targets(&model, 10.0).unwrap();
        let upwind = result.upwind.unwrap();

        let vmg_40 = 6.0 * 40.0_f64.to_radians().cos();
        let vmg_50 = 7.3 * 50.0_f64.to_radians().cos();
        assert!(vmg_50 > vmg_40 + 0.05, "premise: 50° should win on raw VMG");

        assert!(
            upwind.angle > 40.0 && upwind.angle < 50.0,
            "angle {} should be refined into the open interval",
            upwind.angle
        );
        assert!(upwind.vmg >= ((vmg_50 * 100.0).round() / 100.0));
        assert!(result
            .notes
            .iter()
            .any(|n| n.contains("upwind") && n.contains("estimated")));
    }

    /// Refinement never reports a worse VMG than any raw sample.
    #[test]
    fn test_refined_vmg_dominates_raw_samples() {
        let mut model = empty_model(vec![8.0, 12.0, 16.0]);
        model.angle_speed.insert(38, vec![4.8, 5.6, 6.0]);
        model.angle_speed.insert(45, vec![5.4, 6.2, 6.7]);
        model.angle_speed.insert(52, vec![5.9, 6.8, 7.2]);
        model.angle_speed.insert(60, vec![6.1, 7.0, 7.5]);

        let wind = 11.0;
        let solution = solve_direction(&model, wind, Direction::Upwind).unwrap();
        let DirectionSolution::Estimated(target) = solution else {
            panic!("expected an estimated solution");
        };

        for (&deg, series) in &model.angle_speed {
            let angle = f64::from(deg);
            let speed = interp_at(series, &model.wind_steps, wind).unwrap();
            let sample_vmg = speed * angle.to_radians().cos();
            assert!(
                target.vmg >= (sample_vmg * 100.0).round() / 100.0 - 0.01,
                "refined vmg {} must not lose to sampled vmg {} at {}°",
                target.vmg,
                sample_vmg,
                deg
            );
        }
    }

    /// Scenario C: nothing usable upwind, downwind still solvable.
    #[test]
    fn test_one_direction_degrades_with_note() {
        let mut model = empty_model(vec![10.0, 16.0]);
        model.angle_speed.insert(150, vec![6.0, 7.5]);

        let result = compute_targets(&model, 12.0).unwrap();
        assert!(result.upwind.is_none());
        assert!(result.downwind.is_some());
        assert!(result
            .notes
            .iter()
            .any(|n| n.contains("upwind") && n.contains("unavailable")));
    }

    /// Scenario C, both directions empty: the request fails.
    #[test]
    fn test_both_directions_unavailable_is_an_error() {
        let mut model = empty_model(vec![10.0, 16.0]);
        // 90° is outside both estimation windows.
        model.angle_speed.insert(90, vec![6.0, 7.0]);

        let err = compute_targets(&model, 12.0).unwrap_err();
        assert!(matches!(err, Error::InsufficientPolarData));
    }

    #[test]
    fn test_downwind_projection_mirrors_angle() {
        let mut model = empty_model(vec![10.0, 16.0]);
        model.downwind = Some(DirectSeries {
            angles: vec![170.0, 174.0],
            vmg: vec![4.0, 5.0],
        });

        let result = compute_targets(&model, 10.0).unwrap();
        let downwind = result.downwind.unwrap();
        assert_eq!(downwind.angle, 170.0);
        assert_eq!(downwind.vmg, 4.0);
        let expected = (4.0 / 10.0_f64.to_radians().cos() * 100.0).round() / 100.0;
        assert_eq!(downwind.target_speed, expected);
    }

    #[test]
    fn test_zeroed_direct_series_falls_back_to_estimation() {
        let mut model = empty_model(vec![10.0, 16.0]);
        model.upwind = Some(DirectSeries {
            angles: vec![42.0, 42.0],
            vmg: vec![0.0, 0.0], // zeroed allowances normalize to 0
        });
        model.angle_speed.insert(45, vec![6.0, 7.0]);

        let solution = solve_direction(&model, 12.0, Direction::Upwind).unwrap();
        assert!(matches!(solution, DirectionSolution::Estimated(_)));
    }

    #[test]
    fn test_candidates_outside_window_ignored() {
        let mut model = empty_model(vec![10.0, 16.0]);
        model.angle_speed.insert(30, vec![9.0, 9.5]); // too tight to be a beat angle
        model.angle_speed.insert(110, vec![8.0, 8.5]); // reaching, not upwind

        let solution = solve_direction(&model, 12.0, Direction::Upwind).unwrap();
        assert_eq!(solution, DirectionSolution::Unavailable);
    }
}
