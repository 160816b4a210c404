//! Linear interpolation along the wind-speed axis.

use common::Error;

/// Interpolate `series` (parallel to `steps`) at `wind`.
///
/// The query is clamped to the axis: below the first step returns the
/// first value, above the last step returns the last value — no slope
/// is extrapolated. Interior queries interpolate linearly between the
/// bracketing steps. A plain scan is enough here; polar tables carry at
/// most a few dozen steps.
pub fn interp_at(series: &[f64], steps: &[f64], wind: f64) -> Result<f64, Error> {
    if series.len() != steps.len() || steps.is_empty() {
        return Err(Error::AxisMismatch {
            series: series.len(),
            axis: steps.len(),
        });
    }

    let last = steps.len() - 1;
    if wind <= steps[0] {
        return Ok(series[0]);
    }
    if wind >= steps[last] {
        return Ok(series[last]);
    }

    for i in 0..last {
        if wind >= steps[i] && wind <= steps[i + 1] {
            let t = (wind - steps[i]) / (steps[i + 1] - steps[i]);
            return Ok(series[i] + (series[i + 1] - series[i]) * t);
        }
    }

    // A strictly increasing axis always brackets an interior query.
    Ok(series[last])
}
