//! European option valuation by backward induction.
//!
//! ## Recursion
//!
//! - Terminal step: V(N, j) = payoff(S(N, j))
//! - Interior: V(i, j) = e^(-rΔt)·[p·V(i+1, j+1) + (1-p)·V(i+1, j)]
//!
//! Interior nodes are never compared with intrinsic value; that comparison
//! would turn this into an American valuation.

use std::ops::Deref;

use pricer_core::market_data::MarketParameters;
use pricer_core::types::PricingError;

use super::builder::{build_lattice, PriceLattice};
use super::config::LatticeConfig;
use super::triangle::TriangularGrid;

/// Option values on the same triangle as the [`PriceLattice`] they came from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValueLattice(TriangularGrid);

impl ValueLattice {
    /// Returns the underlying grid.
    #[inline]
    pub fn grid(&self) -> &TriangularGrid {
        &self.0
    }
}

impl Deref for ValueLattice {
    type Target = TriangularGrid;

    fn deref(&self) -> &TriangularGrid {
        &self.0
    }
}

/// Finite-difference sensitivities read off the first lattice steps.
///
/// - Delta uses the two step-1 nodes.
/// - Gamma and theta use the three step-2 nodes and are `None` for a
///   one-step lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LatticeDiagnostics {
    /// (V(1,1) - V(1,0)) / (S(1,1) - S(1,0))
    pub delta: f64,
    /// Change in step-2 deltas per unit of spot
    pub gamma: Option<f64>,
    /// (V(2,1) - V(0,0)) / 2Δt, per year
    pub theta: Option<f64>,
}

impl LatticeDiagnostics {
    fn from_lattices(prices: &TriangularGrid, values: &TriangularGrid, dt: f64) -> Self {
        let delta = (values[(1, 1)] - values[(1, 0)]) / (prices[(1, 1)] - prices[(1, 0)]);

        let (gamma, theta) = if values.steps() >= 2 {
            let delta_up = (values[(2, 2)] - values[(2, 1)]) / (prices[(2, 2)] - prices[(2, 1)]);
            let delta_down =
                (values[(2, 1)] - values[(2, 0)]) / (prices[(2, 1)] - prices[(2, 0)]);
            let half_spread = 0.5 * (prices[(2, 2)] - prices[(2, 0)]);
            let theta = (values[(2, 1)] - values[(0, 0)]) / (2.0 * dt);
            (Some((delta_up - delta_down) / half_spread), Some(theta))
        } else {
            (None, None)
        };

        Self {
            delta,
            gamma,
            theta,
        }
    }
}

/// Result of a lattice valuation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Valuation {
    root_price: f64,
    values: ValueLattice,
    diagnostics: LatticeDiagnostics,
}

impl Valuation {
    /// Option value at the root node, V(0, 0).
    #[inline]
    pub fn root_price(&self) -> f64 {
        self.root_price
    }

    /// Full option-value lattice.
    #[inline]
    pub fn values(&self) -> &ValueLattice {
        &self.values
    }

    /// Delta, gamma and theta estimated from the lattice.
    #[inline]
    pub fn diagnostics(&self) -> &LatticeDiagnostics {
        &self.diagnostics
    }

    /// Consumes the valuation, keeping only the value lattice.
    pub fn into_values(self) -> ValueLattice {
        self.values
    }
}

/// Values a European option over a price lattice by backward induction.
///
/// # Arguments
/// * `params` - Market inputs; supplies the strike and option type
/// * `config` - Lattice parameters the price lattice was built with
/// * `prices` - Asset-price lattice from [`build_lattice`]
///
/// # Errors
/// `PricingError::LatticeMismatch` if `prices` does not have `config.steps()` steps.
///
/// # Examples
/// ```
/// use pricer_core::market_data::MarketParameters;
/// use pricer_core::types::OptionType;
/// use pricer_models::lattice::{build_lattice, price_european};
///
/// let params = MarketParameters::new(36.0, 40.0, 0.06, 0.2, 1.0, OptionType::Put).unwrap();
/// let (config, prices) = build_lattice(&params, 10).unwrap();
/// let valuation = price_european(&params, &config, &prices).unwrap();
///
/// assert!(valuation.root_price() > 3.5 && valuation.root_price() < 4.2);
/// assert!(valuation.diagnostics().delta < 0.0);
/// ```
pub fn price_european(
    params: &MarketParameters,
    config: &LatticeConfig,
    prices: &PriceLattice,
) -> Result<Valuation, PricingError> {
    let steps = config.steps();
    if prices.steps() != steps {
        return Err(PricingError::LatticeMismatch {
            expected: steps,
            found: prices.steps(),
        });
    }

    let mut values = TriangularGrid::zeros(steps);
    for (node, slot) in values.row_mut(steps).iter_mut().enumerate() {
        *slot = params.payoff(prices[(steps, node)]);
    }

    let discount = config.discount();
    let p = config.probability();
    let q = 1.0 - p;

    for step in (0..steps).rev() {
        let (current, next) = values.adjacent_rows_mut(step);
        for (j, slot) in current.iter_mut().enumerate() {
            *slot = discount * (p * next[j + 1] + q * next[j]);
        }
    }

    let diagnostics = LatticeDiagnostics::from_lattices(prices.grid(), &values, config.dt());
    Ok(Valuation {
        root_price: values[(0, 0)],
        values: ValueLattice(values),
        diagnostics,
    })
}

/// Builds the lattice for `steps` steps and values the option on it.
///
/// Returns the price lattice alongside the valuation for callers that
/// display both trees.
///
/// # Errors
/// Any error from [`build_lattice`].
pub fn price_option(
    params: &MarketParameters,
    steps: usize,
) -> Result<(PriceLattice, Valuation), PricingError> {
    let (config, prices) = build_lattice(params, steps)?;
    let valuation = price_european(params, &config, &prices)?;
    Ok((prices, valuation))
}
