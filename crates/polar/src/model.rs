//! Normalized polar model construction.
//!
//! Maps a raw RMS allowance table into a `PolarModel`: one wind-speed
//! axis, optional direct beat/run series, and a table of per-angle
//! speed series for the fixed reaching channels. Partial payloads are
//! tolerated — a series of the wrong length is simply dropped — and
//! only a payload with no usable data at all is rejected.

use std::collections::BTreeMap;

use common::Error;
use orc_client::{PolarAllowances, RmsRecord};
use tracing::debug;

use crate::units::{normalize_series, SeriesUnit};

/// Wind steps assumed when the payload carries no axis, in knots.
/// These are the standard ORC certificate columns.
pub const DEFAULT_WIND_STEPS: [f64; 7] = [6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 20.0];

/// The fixed reaching angles reported on every certificate, degrees.
pub const REACHING_ANGLES: [u32; 8] = [52, 60, 75, 90, 110, 120, 135, 150];

/// A direct optimum series: best angle and resulting VMG per wind step.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectSeries {
    /// Optimal true wind angle per wind step, degrees.
    pub angles: Vec<f64>,
    /// VMG at that angle per wind step, knots.
    pub vmg: Vec<f64>,
}

/// Normalized performance table for one boat.
///
/// Immutable once built; every series it holds is exactly as long as
/// `wind_steps`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarModel {
    /// Strictly increasing wind-speed sampling axis, knots.
    pub wind_steps: Vec<f64>,
    /// Direct beat optimum, when the certificate carries one.
    pub upwind: Option<DirectSeries>,
    /// Direct run optimum, when the certificate carries one.
    pub downwind: Option<DirectSeries>,
    /// Boat speed series keyed by true wind angle in whole degrees.
    pub angle_speed: BTreeMap<u32, Vec<f64>>,
}

impl PolarModel {
    /// Build a model from an RMS record, requiring an allowance table.
    pub fn from_record(record: &RmsRecord) -> Result<Self, Error> {
        let allowances = record.allowances.as_ref().ok_or_else(|| {
            Error::MalformedPayload("RMS record carries no allowance table".into())
        })?;
        Self::from_allowances(allowances)
    }

    /// Build a model from a raw allowance table.
    pub fn from_allowances(allowances: &PolarAllowances) -> Result<Self, Error> {
        let wind_steps = if allowances.wind_speeds.is_empty() {
            debug!("payload has no wind axis, assuming default ORC steps");
            DEFAULT_WIND_STEPS.to_vec()
        } else {
            allowances.wind_speeds.clone()
        };

        if !wind_steps.windows(2).all(|pair| pair[1] > pair[0]) {
            return Err(Error::MalformedPayload(
                "wind-speed axis is not strictly increasing".into(),
            ));
        }

        let unit = SeriesUnit::from_tag(allowances.units.as_deref());
        let n = wind_steps.len();

        let upwind = direct_series(&allowances.beat_angle, &allowances.beat, n, unit);
        let downwind = direct_series(&allowances.gybe_angle, &allowances.run, n, unit);

        let mut angle_speed = BTreeMap::new();
        for (angle, raw) in reaching_channels(allowances) {
            if raw.len() == n {
                angle_speed.insert(angle, normalize_series(raw, unit));
            } else if !raw.is_empty() {
                debug!(
                    "dropping R{} series: {} values against {} wind steps",
                    angle,
                    raw.len(),
                    n
                );
            }
        }

        if upwind.is_none() && downwind.is_none() && angle_speed.is_empty() {
            return Err(Error::MalformedPayload(
                "no usable speed series in payload".into(),
            ));
        }

        Ok(Self {
            wind_steps,
            upwind,
            downwind,
            angle_speed,
        })
    }
}

/// Pair an angle series with its normalized allowance series.
///
/// Both must match the axis length; otherwise the direction has no
/// direct optimum and the solver falls back to estimation.
fn direct_series(
    angles: &[f64],
    raw_vmg: &[f64],
    axis_len: usize,
    unit: SeriesUnit,
) -> Option<DirectSeries> {
    if angles.len() != axis_len || raw_vmg.len() != axis_len {
        return None;
    }
    Some(DirectSeries {
        angles: angles.to_vec(),
        vmg: normalize_series(raw_vmg, unit),
    })
}

fn reaching_channels(allowances: &PolarAllowances) -> [(u32, &Vec<f64>); 8] {
    [
        (52, &allowances.r52),
        (60, &allowances.r60),
        (75, &allowances.r75),
        (90, &allowances.r90),
        (110, &allowances.r110),
        (120, &allowances.r120),
        (135, &allowances.r135),
        (150, &allowances.r150),
    ]
}
