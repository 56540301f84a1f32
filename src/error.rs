//! Error types

use thiserror::Error;

/// Error raised while constructing a quantile estimator
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum QuantileError {
    /// Target quantile outside the open interval (0, 1), or NaN
    #[error("target quantile must lie in (0, 1), got {0}")]
    InvalidTarget(f64),
}

/// Validate a target quantile, rejecting anything outside (0, 1).
pub(crate) fn check_target(target: f64) -> Result<f64, QuantileError> {
    // NaN fails both comparisons
    if target > 0.0 && target < 1.0 {
        Ok(target)
    } else {
        tracing::debug!(target_quantile = target, "rejecting target quantile");
        Err(QuantileError::InvalidTarget(target))
    }
}
