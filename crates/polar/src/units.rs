//! Allowance unit normalization.
//!
//! ORC publishes performance series as time allowances (seconds per
//! nautical mile), but some mirrors resolve series to boat speed in
//! knots before serving them. When the payload carries no unit tag the
//! representation is detected from the series itself: allowances sit in
//! the hundreds while realistic boat speeds stay well below 100 kt.

/// Seconds in one hour; converts s/NM allowances to knots.
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Series whose mean exceeds this are treated as time allowances.
const DURATION_MEAN_THRESHOLD: f64 = 100.0;

/// How a raw performance series is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesUnit {
    /// No tag supplied; detect from the series mean.
    Auto,
    /// Time allowance in seconds per nautical mile.
    SecondsPerNm,
    /// Already boat speed in knots.
    Knots,
}

impl SeriesUnit {
    /// Map an upstream unit tag to a known representation.
    ///
    /// Unrecognised or absent tags fall back to `Auto`, keeping the
    /// heuristic as the default rather than rejecting the payload.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("s/nm") | Some("sec/nm") | Some("secs/nm") => SeriesUnit::SecondsPerNm,
            Some("kt") | Some("kts") | Some("knots") => SeriesUnit::Knots,
            _ => SeriesUnit::Auto,
        }
    }
}

/// Round to one decimal place (angles).
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places (speeds and VMG).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert a raw series into boat speed in knots, two decimals.
///
/// Non-positive elements map to 0.0 so a zeroed allowance never turns
/// into an infinite speed.
pub fn normalize_series(raw: &[f64], unit: SeriesUnit) -> Vec<f64> {
    let unit = match unit {
        SeriesUnit::Auto => detect_unit(raw),
        tagged => tagged,
    };

    raw.iter()
        .map(|&value| {
            if value <= 0.0 {
                return 0.0;
            }
            match unit {
                SeriesUnit::SecondsPerNm => round2(SECONDS_PER_HOUR / value),
                _ => round2(value),
            }
        })
        .collect()
}

fn detect_unit(raw: &[f64]) -> SeriesUnit {
    if raw.is_empty() {
        return SeriesUnit::Knots;
    }
    let mean = raw.iter().sum::<f64>() / raw.len() as f64;
    if mean > DURATION_MEAN_THRESHOLD {
        SeriesUnit::SecondsPerNm
    } else {
        SeriesUnit::Knots
    }
}
