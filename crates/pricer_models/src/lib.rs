//! # Pricer Models (L2: Business Logic)
//!
//! Cox-Ross-Rubinstein lattice pricing for European options, with a
//! Black-Scholes reference for convergence studies.
//!
//! This crate provides:
//! - `lattice`: lattice parameters, asset-price lattice construction and
//!   backward-induction valuation
//! - `convergence`: CRR price against a reference price over increasing step counts
//! - `analytical`: closed-form Black-Scholes prices used as the reference
//!
//! ## Design Principles
//!
//! - **Pure functions**: no component keeps state between calls
//! - **Flat triangular storage**: lattices are indexed by (step, node), not linked nodes
//! - **Fail fast**: invalid inputs return `PricingError` before any lattice is allocated
//!
//! ## Example
//!
//! ```
//! use pricer_core::market_data::MarketParameters;
//! use pricer_core::types::OptionType;
//! use pricer_models::analytical::BlackScholes;
//! use pricer_models::lattice::{build_lattice, price_european};
//!
//! let params = MarketParameters::new(100.0, 100.0, 0.05, 0.2, 1.0, OptionType::Call).unwrap();
//! let (config, prices) = build_lattice(&params, 200).unwrap();
//! let valuation = price_european(&params, &config, &prices).unwrap();
//!
//! let reference = BlackScholes::reference_price(&params);
//! assert!((valuation.root_price() - reference).abs() < 0.05);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod convergence;
pub mod lattice;
