//! Analytical pricing formulas for European options.
//!
//! This module provides the closed-form reference for lattice convergence studies:
//! - Black-Scholes call and put prices, delta and gamma
//! - Standard normal CDF and PDF
//!
//! ## Design Principles
//!
//! - **Generic over `T: Float`**: Supports both `f64` and `f32`
//! - **Put via parity**: P = C + K·e^(-rT) - S

pub mod black_scholes;
pub mod distributions;

// Re-export main types at module level
pub use black_scholes::BlackScholes;
pub use distributions::{norm_cdf, norm_pdf};
