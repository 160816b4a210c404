//! Reaching target table.
//!
//! Reports target speed at each of the fixed certificate angles. Angles
//! are independent: a channel the certificate doesn't carry, or one
//! that interpolates to a non-positive speed, is left out of the table
//! without affecting the others.

use std::collections::BTreeMap;

use common::{Error, ReachingTarget};

use crate::interpolate::interp_at;
use crate::model::{PolarModel, REACHING_ANGLES};
use crate::units::round2;

/// Build the reaching table for one model at one wind speed.
///
/// VMG uses the upwind projection `speed * cos(angle)` at every angle,
/// matching the certificate convention; beyond 90° this goes negative
/// rather than switching to the downwind formula.
pub fn build_reaching(
    model: &PolarModel,
    wind_speed: f64,
) -> Result<BTreeMap<u32, ReachingTarget>, Error> {
    let mut table = BTreeMap::new();

    for &deg in &REACHING_ANGLES {
        let Some(series) = model.angle_speed.get(&deg) else {
            continue;
        };
        if series.len() != model.wind_steps.len() {
            continue;
        }

        let speed = interp_at(series, &model.wind_steps, wind_speed)?;
        if !speed.is_finite() || speed <= 0.0 {
            continue;
        }

        let angle = f64::from(deg);
        let vmg = speed * angle.to_radians().cos();
        table.insert(
            deg,
            ReachingTarget {
                angle,
                target_speed: round2(speed),
                vmg: round2(vmg),
            },
        );
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with(entries: &[(u32, Vec<f64>)]) -> PolarModel {
        let mut angle_speed = BTreeMap::new();
        for (deg, series) in entries {
            angle_speed.insert(*deg, series.clone());
        }
        PolarModel {
            wind_steps: vec![8.0, 12.0],
            upwind: None,
            downwind: None,
            angle_speed,
        }
    }

    #[test]
    fn test_missing_channel_omits_key() {
        let model = model_with(&[(52, vec![5.0, 6.0]), (110, vec![7.0, 8.0])]);
        let table = build_reaching(&model, 10.0).unwrap();

        assert!(table.contains_key(&52));
        assert!(table.contains_key(&110));
        assert!(!table.contains_key(&90));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_speed_interpolated_and_rounded() {
        let model = model_with(&[(90, vec![6.0, 7.0])]);
        let table = build_reaching(&model, 10.0).unwrap();
        let target = &table[&90];

        assert_eq!(target.angle, 90.0);
        assert_eq!(target.target_speed, 6.5);
        // cos(90°) projects the whole speed away.
        assert_eq!(target.vmg, 0.0);
    }

    #[test]
    fn test_vmg_keeps_upwind_projection_past_90_degrees() {
        let model = model_with(&[(120, vec![8.0, 8.0])]);
        let table = build_reaching(&model, 10.0).unwrap();

        // cos(120°) = -0.5: convention keeps the sign, no downwind flip.
        assert_eq!(table[&120].vmg, -4.0);
        assert_eq!(table[&120].target_speed, 8.0);
    }

    #[test]
    fn test_zero_speed_channel_is_skipped() {
        let model = model_with(&[(60, vec![0.0, 0.0]), (75, vec![6.0, 6.4])]);
        let table = build_reaching(&model, 10.0).unwrap();

        assert!(!table.contains_key(&60));
        assert!(table.contains_key(&75));
    }

    #[test]
    fn test_non_certificate_angle_not_reported() {
        // 100° can exist in the model but is not a reaching channel.
        let model = model_with(&[(100, vec![7.0, 7.5])]);
        let table = build_reaching(&model, 10.0).unwrap();
        assert!(table.is_empty());
    }
}
