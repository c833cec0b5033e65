// Error taxonomy for the simulation core and the NEO data client

use thiserror::Error;

/// Errors produced by the numerical core. Kepler non-convergence is
/// deliberately NOT here: the solver returns its best estimate with a
/// `converged` flag instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unknown body: {0}")]
    UnknownBody(String),
}

/// Errors produced by the NEO data client. Callers decide whether to
/// substitute demo data; the client itself never does.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("asteroid {0} has no usable orbital data")]
    MissingOrbitalData(String),
}
