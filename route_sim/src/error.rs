//! Top-level simulator error.

use thiserror::Error;

use route_planner::error::RouteError;

use crate::config::ConfigError;
use crate::track::TrackError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The planner rejected its parameters (`BAD_PARAM`).
    #[error("route error: {0}")]
    Route(#[from] RouteError),

    #[error("tracking failed: {0}")]
    Track(#[from] TrackError),

    #[error("trace output failed: {0}")]
    Output(#[from] std::io::Error),

    #[error("trace encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),
}
