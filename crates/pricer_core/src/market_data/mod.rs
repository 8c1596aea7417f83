//! Market data inputs.
//!
//! This module provides:
//! - [`MarketParameters`]: validated spot, strike, rate, volatility, maturity
//!   and option type for a single European option

pub mod params;

pub use params::MarketParameters;
