//! CLI error type
//!
//! Wraps pricing, configuration and output errors behind one `Result` alias.

use pricer_core::types::PricingError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced to the user by the `crr` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input rejected by the pricing layers
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Configuration could not be loaded or validated
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// File or stream I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialisation failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialisation failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used by every command.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_core::types::ModelViolation;

    #[test]
    fn test_pricing_error_is_transparent() {
        let err = CliError::from(PricingError::from(ModelViolation::ZeroSteps { steps: 0 }));
        assert_eq!(
            err.to_string(),
            "Invalid model: number of steps must be at least 1: N = 0"
        );
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err = CliError::from(ConfigError::InvalidPrecision(40));
        assert_eq!(err.to_string(), "Invalid precision: 40. Must be at most 12");
    }
}
