//! Core financial types.
//!
//! This module provides:
//! - `option_type`: The call/put tag and its intrinsic payoff
//! - `error`: Structured error types for lattice construction, valuation and convergence analysis
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`OptionType`], [`ParseOptionTypeError`] from `option_type`
//! - [`PricingError`], [`ModelViolation`] from `error`

pub mod error;
pub mod option_type;

// Re-export commonly used types at module level
pub use error::{ModelViolation, PricingError};
pub use option_type::{OptionType, ParseOptionTypeError};
