//! Cox-Ross-Rubinstein binomial lattice.
//!
//! This module provides:
//! - [`LatticeConfig`]: Δt, u, d, p and the one-step discount factor
//! - [`build_lattice`]: asset-price lattice for `N` steps
//! - [`price_european`]: backward-induction valuation with delta/gamma/theta diagnostics
//! - [`TriangularGrid`]: the flat `(step, node)` storage both lattices share
//!
//! Lattices are plain data: build, value, read the root, and drop them.

pub mod builder;
pub mod config;
pub mod triangle;
pub mod valuator;

pub use builder::{build_lattice, PriceLattice};
pub use config::LatticeConfig;
pub use triangle::{LatticeNode, TriangularGrid};
pub use valuator::{price_european, price_option, LatticeDiagnostics, Valuation, ValueLattice};
