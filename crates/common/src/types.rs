//! Domain types shared across the service.

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ── Request Types ─────────────────────────────────────────────────────

/// A request for optimal performance targets for one boat at one wind speed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetRequest {
    /// True wind speed in knots (2–50).
    pub wind_speed: f64,
    /// ORC reference number, the strongest identity field.
    #[serde(default)]
    pub ref_no: Option<String>,
    /// Sail number (meaningful together with `country_id`).
    #[serde(default)]
    pub sail_no: Option<String>,
    /// Yacht name; requires `country_id` to disambiguate.
    #[serde(default)]
    pub yacht_name: Option<String>,
    /// ISO country code of the certificate authority.
    #[serde(default)]
    pub country_id: Option<String>,
}

const MIN_WIND_KT: f64 = 2.0;
const MAX_WIND_KT: f64 = 50.0;

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl TargetRequest {
    /// Validate the request against the input contract.
    ///
    /// Wind speed must be within [2, 50] kt and at least one identity
    /// field must be present; a yacht name alone is not enough — it must
    /// be paired with a country code.
    pub fn validate(&self) -> Result<(), Error> {
        self.validate_wind_speed()?;

        let has_ref = non_blank(&self.ref_no).is_some();
        let has_sail = non_blank(&self.sail_no).is_some();
        let has_name = non_blank(&self.yacht_name).is_some();
        let has_country = non_blank(&self.country_id).is_some();

        if !has_ref && !has_sail && !has_name {
            return Err(Error::InvalidRequest(
                "at least one of ref_no, sail_no, yacht_name is required".into(),
            ));
        }
        if has_name && !has_ref && !has_sail && !has_country {
            return Err(Error::InvalidRequest(
                "yacht_name lookup requires country_id".into(),
            ));
        }

        Ok(())
    }

    /// Check only the wind-speed bound, for callers that already have a
    /// polar in hand and need no boat identity.
    pub fn validate_wind_speed(&self) -> Result<(), Error> {
        if !self.wind_speed.is_finite()
            || self.wind_speed < MIN_WIND_KT
            || self.wind_speed > MAX_WIND_KT
        {
            return Err(Error::InvalidRequest(format!(
                "wind_speed must be between {} and {} kt, got {}",
                MIN_WIND_KT, MAX_WIND_KT, self.wind_speed
            )));
        }
        Ok(())
    }

    /// Derive the cache key for this boat, if any identity field allows it.
    ///
    /// Priority: ref-no, then country+sail-no, then yacht name. All keys
    /// are trimmed and case-folded so that "ITA 16000" and "ita 16000"
    /// share an entry. `None` means the cache must be bypassed.
    pub fn cache_key(&self) -> Option<String> {
        if let Some(ref_no) = non_blank(&self.ref_no) {
            return Some(format!("ref:{}", ref_no.to_lowercase()));
        }
        if let (Some(country), Some(sail)) =
            (non_blank(&self.country_id), non_blank(&self.sail_no))
        {
            return Some(format!(
                "sail:{}/{}",
                country.to_lowercase(),
                sail.to_lowercase()
            ));
        }
        if let Some(name) = non_blank(&self.yacht_name) {
            return Some(format!("name:{}", name.to_lowercase()));
        }
        None
    }

    /// Short human-readable identity for logs and error messages.
    pub fn identity_label(&self) -> String {
        if let Some(ref_no) = non_blank(&self.ref_no) {
            return format!("ref_no={}", ref_no);
        }
        if let Some(sail) = non_blank(&self.sail_no) {
            return format!(
                "sail_no={}{}",
                non_blank(&self.country_id).map(|c| format!("{} ", c)).unwrap_or_default(),
                sail
            );
        }
        if let Some(name) = non_blank(&self.yacht_name) {
            return format!("yacht_name={}", name);
        }
        "<unidentified>".to_string()
    }
}

// ── Result Types ──────────────────────────────────────────────────────

/// Solved target for one sailing direction (upwind or downwind).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionTarget {
    /// True wind angle in degrees, one decimal.
    pub angle: f64,
    /// Velocity made good in knots, two decimals.
    pub vmg: f64,
    /// Boat speed through the water in knots, two decimals.
    pub target_speed: f64,
}

/// Target at one fixed reaching angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachingTarget {
    /// True wind angle in degrees.
    pub angle: f64,
    /// Boat speed through the water in knots, two decimals.
    pub target_speed: f64,
    /// Wind-axis projection of the target speed, two decimals.
    pub vmg: f64,
}

/// The full computed answer for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalResult {
    /// True wind speed the targets were computed for.
    pub wind_speed: f64,
    /// Best upwind target, if solvable.
    pub upwind: Option<DirectionTarget>,
    /// Best downwind target, if solvable.
    pub downwind: Option<DirectionTarget>,
    /// Targets at the fixed reaching angles, keyed by whole degrees.
    pub reaching: std::collections::BTreeMap<u32, ReachingTarget>,
    /// Provenance flags: which fields were estimated or unavailable.
    pub notes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> TargetRequest {
        TargetRequest {
            wind_speed: 12.0,
            ref_no: Some("0440123ABC".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_accepts_ref_no_alone() {
        assert!(base_request().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_wind() {
        for wind in [0.0, 1.9, 50.1, f64::NAN] {
            let req = TargetRequest {
                wind_speed: wind,
                ..base_request()
            };
            assert!(req.validate().is_err(), "wind={} should be rejected", wind);
        }
    }

    #[test]
    fn test_validate_rejects_no_identity() {
        let req = TargetRequest {
            wind_speed: 10.0,
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_validate_requires_country_for_name_only() {
        let req = TargetRequest {
            wind_speed: 10.0,
            yacht_name: Some("Rambler".into()),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = TargetRequest {
            country_id: Some("USA".into()),
            ..req
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_cache_key_prefers_ref_no() {
        let req = TargetRequest {
            wind_speed: 10.0,
            ref_no: Some("  ABC123 ".into()),
            sail_no: Some("16000".into()),
            country_id: Some("ITA".into()),
            yacht_name: Some("Luna".into()),
        };
        assert_eq!(req.cache_key().as_deref(), Some("ref:abc123"));
    }

    #[test]
    fn test_cache_key_sail_requires_country() {
        let req = TargetRequest {
            wind_speed: 10.0,
            sail_no: Some("ITA 16000".into()),
            ..Default::default()
        };
        // Sail number without a country falls through; no name either.
        assert_eq!(req.cache_key(), None);

        let req = TargetRequest {
            country_id: Some("ITA".into()),
            ..req
        };
        assert_eq!(req.cache_key().as_deref(), Some("sail:ita/ita 16000"));
    }

    #[test]
    fn test_cache_key_case_folds_name() {
        let req = TargetRequest {
            wind_speed: 10.0,
            yacht_name: Some("  Wild Oats XI ".into()),
            country_id: Some("AUS".into()),
            ..Default::default()
        };
        assert_eq!(req.cache_key().as_deref(), Some("name:wild oats xi"));
    }
}
