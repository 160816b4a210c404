//! ORC scoring-database client.
//!
//! Fetches RMS (rating management system) records from the public ORC
//! endpoint and hands the embedded allowance table to the polar core.
//! The endpoint is a slow CGI-style service, which is why callers cache
//! the result per boat rather than re-fetching per request.

use common::{Error, TargetRequest};
use serde::Deserialize;
use tracing::{debug, warn};

/// ORC API client with connection pooling and a per-request timeout.
#[derive(Debug, Clone)]
pub struct OrcClient {
    client: reqwest::Client,
    base_url: String,
}

// ── RMS response types ────────────────────────────────────────────────

/// Response envelope from the RMS download endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RmsResponse {
    #[serde(default)]
    pub rms: Vec<RmsRecord>,
}

/// One scored boat record as returned by the ORC database.
///
/// Only the fields this service reads are mapped; the upstream record
/// carries dozens more.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RmsRecord {
    #[serde(rename = "RefNo", default)]
    pub ref_no: Option<String>,
    #[serde(rename = "YachtName", default)]
    pub yacht_name: Option<String>,
    #[serde(rename = "SailNo", default)]
    pub sail_no: Option<String>,
    #[serde(rename = "CountryId", default)]
    pub country_id: Option<String>,
    #[serde(rename = "Allowances", default)]
    pub allowances: Option<PolarAllowances>,
}

/// The per-angle allowance table of an RMS record.
///
/// Series are parallel to `wind_speeds`; upstream publishes them as
/// seconds per nautical mile, but older mirrors resolve some series to
/// knots, so each series goes through unit detection before use. A
/// series of the wrong length is treated as absent, not an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolarAllowances {
    /// The wind-speed sampling axis in knots.
    #[serde(rename = "WindSpeeds", default)]
    pub wind_speeds: Vec<f64>,

    /// Optimal beat (upwind) angle per wind step, degrees.
    #[serde(rename = "BeatAngle", default)]
    pub beat_angle: Vec<f64>,
    /// Beat VMG allowance per wind step.
    #[serde(rename = "Beat", default)]
    pub beat: Vec<f64>,

    /// Optimal gybe (downwind) angle per wind step, degrees.
    #[serde(rename = "GybeAngle", default)]
    pub gybe_angle: Vec<f64>,
    /// Run VMG allowance per wind step.
    #[serde(rename = "Run", default)]
    pub run: Vec<f64>,

    // Fixed reaching channels at the standard ORC true wind angles.
    #[serde(rename = "R52", default)]
    pub r52: Vec<f64>,
    #[serde(rename = "R60", default)]
    pub r60: Vec<f64>,
    #[serde(rename = "R75", default)]
    pub r75: Vec<f64>,
    #[serde(rename = "R90", default)]
    pub r90: Vec<f64>,
    #[serde(rename = "R110", default)]
    pub r110: Vec<f64>,
    #[serde(rename = "R120", default)]
    pub r120: Vec<f64>,
    #[serde(rename = "R135", default)]
    pub r135: Vec<f64>,
    #[serde(rename = "R150", default)]
    pub r150: Vec<f64>,

    /// Optional unit tag ("s/NM" or "kts"); absent on most mirrors.
    #[serde(rename = "Units", default)]
    pub units: Option<String>,
}

// ── Client ────────────────────────────────────────────────────────────

impl OrcClient {
    pub fn new(base_url: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("polar-targets/0.1 (sailing performance service)")
            .pool_max_idle_per_host(4)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build ORC HTTP client");

        Self { client, base_url }
    }

    /// Fetch the RMS record for the boat identified by `request`.
    ///
    /// Query precedence follows the identity fields: a reference number
    /// addresses exactly one certificate; sail number and yacht name are
    /// search terms that may match several, in which case the first
    /// returned record wins.
    pub async fn fetch_rms(&self, request: &TargetRequest) -> Result<RmsRecord, Error> {
        let mut query: Vec<(&str, String)> = vec![
            ("action", "DownBoatRMS".to_string()),
            ("ext", "json".to_string()),
        ];

        if let Some(ref_no) = request.ref_no.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("RefNo", ref_no.to_string()));
        } else {
            if let Some(sail) = request.sail_no.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                query.push(("SailNo", sail.to_string()));
            }
            if let Some(name) = request.yacht_name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                query.push(("YachtName", name.to_string()));
            }
            if let Some(country) = request.country_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                query.push(("CountryId", country.to_string()));
            }
        }

        debug!("Fetching RMS record: {} ({})", self.base_url, request.identity_label());

        let resp = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::Http(format!("RMS request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("RMS fetch failed: status={} body={}", status, body);
            return Err(Error::Upstream {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: RmsResponse = resp
            .json()
            .await
            .map_err(|e| Error::Http(format!("RMS response decode failed: {e}")))?;

        let record = parsed
            .rms
            .into_iter()
            .next()
            .ok_or_else(|| Error::BoatNotFound(request.identity_label()))?;

        if record.allowances.is_none() {
            warn!(
                "RMS record for {} carries no allowance table",
                request.identity_label()
            );
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowances_deserialize_partial_payload() {
        let raw = r#"{
            "WindSpeeds": [6, 8, 10],
            "Beat": [650.2, 560.1, 500.0],
            "BeatAngle": [44.5, 43.0, 42.0],
            "R90": [420.0, 380.0, 350.0]
        }"#;
        let allowances: PolarAllowances = serde_json::from_str(raw).unwrap();
        assert_eq!(allowances.wind_speeds, vec![6.0, 8.0, 10.0]);
        assert_eq!(allowances.beat_angle.len(), 3);
        assert!(allowances.run.is_empty());
        assert!(allowances.units.is_none());
    }

    #[test]
    fn test_rms_envelope_takes_first_record() {
        let raw = r#"{"rms": [
            {"RefNo": "A1", "YachtName": "First"},
            {"RefNo": "A2", "YachtName": "Second"}
        ]}"#;
        let parsed: RmsResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.rms.len(), 2);
        assert_eq!(parsed.rms[0].ref_no.as_deref(), Some("A1"));
        assert!(parsed.rms[0].allowances.is_none());
    }

    #[test]
    fn test_rms_envelope_tolerates_missing_rms_field() {
        let parsed: RmsResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.rms.is_empty());
    }
}
