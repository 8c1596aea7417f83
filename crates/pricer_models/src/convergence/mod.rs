//! Convergence of CRR prices towards a reference price.
//!
//! This module provides:
//! - [`StepRange`]: validated ascending step counts
//! - [`ConvergenceAnalyzer`]: lazy, restartable study with sequential and rayon-parallel collection
//! - [`ConvergenceSeries`]: `(N, price, |price - reference|)` rows in ascending `N`
//!
//! CRR errors shrink roughly like 1/N but alternate between even and odd `N`,
//! so neighbouring points are not guaranteed to improve monotonically.

pub mod analyzer;
pub mod range;

pub use analyzer::{
    analyze, ConvergenceAnalyzer, ConvergenceIter, ConvergencePoint, ConvergenceSeries,
};
pub use range::{StepRange, DEFAULT_LADDER_STRIDE};
