//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: Errors surfaced by lattice construction, valuation and
//!   convergence analysis
//! - `ModelViolation`: The specific model constraint behind an `InvalidModel` error

use thiserror::Error;

/// Model constraint that was violated.
///
/// Carried by [`PricingError::InvalidModel`] so callers can tell which input
/// was rejected without parsing the message.
///
/// # Examples
/// ```
/// use pricer_core::types::ModelViolation;
///
/// let violation = ModelViolation::NonPositiveSpot { spot: -1.0 };
/// assert_eq!(format!("{}", violation), "spot must be positive: S = -1");
/// ```
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum ModelViolation {
    /// Spot price is not strictly positive (or not a number).
    #[error("spot must be positive: S = {spot}")]
    NonPositiveSpot {
        /// The rejected spot price
        spot: f64,
    },

    /// Strike price is not strictly positive (or not a number).
    #[error("strike must be positive: K = {strike}")]
    NonPositiveStrike {
        /// The rejected strike price
        strike: f64,
    },

    /// Volatility is not strictly positive (or not a number).
    #[error("volatility must be positive: σ = {volatility}")]
    NonPositiveVolatility {
        /// The rejected volatility
        volatility: f64,
    },

    /// Time to maturity is not strictly positive (or not a number).
    #[error("time to maturity must be positive: T = {expiry}")]
    NonPositiveExpiry {
        /// The rejected time to maturity
        expiry: f64,
    },

    /// Risk-free rate is NaN or infinite.
    #[error("risk-free rate must be finite: r = {rate}")]
    NonFiniteRate {
        /// The rejected rate
        rate: f64,
    },

    /// Spot, strike, volatility or maturity is infinite.
    #[error("{name} must be finite")]
    NonFinite {
        /// Name of the offending parameter
        name: &'static str,
    },

    /// Lattice requested with zero time steps.
    #[error("number of steps must be at least 1: N = {steps}")]
    ZeroSteps {
        /// The rejected step count
        steps: usize,
    },

    /// Risk-neutral probability outside the open interval (0, 1).
    #[error("risk-neutral probability outside (0, 1): p = {probability} (arbitrage-free condition broken)")]
    ArbitrageViolation {
        /// The computed probability
        probability: f64,
    },
}

/// Categorised pricing errors.
///
/// All errors are returned to the caller immediately; nothing is retried or
/// logged inside the pricing layers.
///
/// # Variants
/// - `InvalidModel`: Market parameters or lattice configuration rejected
/// - `InvalidRange`: Malformed step range for a convergence study
/// - `LatticeMismatch`: Price lattice shape disagrees with its configuration
///
/// # Examples
/// ```
/// use pricer_core::types::{ModelViolation, PricingError};
///
/// let err = PricingError::InvalidModel(ModelViolation::ZeroSteps { steps: 0 });
/// assert_eq!(
///     format!("{}", err),
///     "Invalid model: number of steps must be at least 1: N = 0"
/// );
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PricingError {
    /// Invalid market parameters or lattice configuration
    #[error("Invalid model: {0}")]
    InvalidModel(#[from] ModelViolation),

    /// Malformed step range for a convergence study
    #[error("Invalid step range: {reason}")]
    InvalidRange {
        /// Description of what is wrong with the range
        reason: String,
    },

    /// Price lattice does not have the number of steps its configuration declares
    #[error("Lattice mismatch: configuration has {expected} steps, lattice has {found}")]
    LatticeMismatch {
        /// Step count declared by the lattice configuration
        expected: usize,
        /// Step count of the supplied price lattice
        found: usize,
    },
}

impl PricingError {
    /// Shorthand for an `InvalidRange` error.
    pub fn invalid_range(reason: impl Into<String>) -> Self {
        PricingError::InvalidRange {
            reason: reason.into(),
        }
    }

    /// Returns the model violation if this is an `InvalidModel` error.
    pub fn violation(&self) -> Option<&ModelViolation> {
        match self {
            PricingError::InvalidModel(violation) => Some(violation),
            _ => None,
        }
    }
}
