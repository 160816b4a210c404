//! Unified error type for polar-targets.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("ORC API error (status={status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("No boat found for {0}")]
    BoatNotFound(String),

    #[error("Malformed polar payload: {0}")]
    MalformedPayload(String),

    #[error("Series length {series} does not match wind axis length {axis}")]
    AxisMismatch { series: usize, axis: usize },

    #[error("Polar data insufficient to solve either upwind or downwind targets")]
    InsufficientPolarData,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
