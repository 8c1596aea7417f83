//! # pricer_core: Foundation Types for the CRR Lattice Pricer
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Validated market inputs: `MarketParameters` (`market_data`)
//! - Option payoff tag: `OptionType` (`types::option_type`)
//! - Error taxonomy: `PricingError`, `ModelViolation` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-traits: Generic payoff evaluation
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::market_data::MarketParameters;
//! use pricer_core::types::{OptionType, PricingError};
//!
//! let params = MarketParameters::new(100.0, 100.0, 0.05, 0.2, 1.0, OptionType::Call).unwrap();
//! assert_eq!(params.spot(), 100.0);
//! assert_eq!(params.option_type().payoff(110.0_f64, 100.0), 10.0);
//!
//! // Construction fails fast on invalid inputs
//! let err = MarketParameters::new(-1.0, 100.0, 0.05, 0.2, 1.0, OptionType::Call).unwrap_err();
//! assert!(matches!(err, PricingError::InvalidModel(_)));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for `MarketParameters` and `OptionType`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod types;
