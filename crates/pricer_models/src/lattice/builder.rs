//! Asset-price lattice construction.
//!
//! Node `(i, j)` holds S·uʲ·d^(i-j): the price after `j` up-moves and
//! `i - j` down-moves. Each row is derived from the previous one with a
//! single multiplication per node, so no node evaluates a power.

use std::ops::Deref;

use pricer_core::market_data::MarketParameters;
use pricer_core::types::PricingError;

use super::config::LatticeConfig;
use super::triangle::TriangularGrid;

/// Underlying asset prices on a recombining CRR lattice.
///
/// Read-only once built. Dereferences to [`TriangularGrid`] for indexing and
/// enumeration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PriceLattice(TriangularGrid);

impl PriceLattice {
    /// Fills the lattice for `config.steps()` steps starting from `spot`.
    fn build(spot: f64, config: &LatticeConfig) -> Self {
        let steps = config.steps();
        let (up, down) = (config.up(), config.down());
        let mut grid = TriangularGrid::zeros(steps);
        grid.row_mut(0)[0] = spot;

        for step in 0..steps {
            let (previous, current) = grid.adjacent_rows_mut(step);
            current[0] = previous[0] * down;
            for (slot, &parent) in current[1..].iter_mut().zip(previous.iter()) {
                *slot = parent * up;
            }
        }

        Self(grid)
    }

    /// Returns the underlying grid.
    #[inline]
    pub fn grid(&self) -> &TriangularGrid {
        &self.0
    }
}

impl Deref for PriceLattice {
    type Target = TriangularGrid;

    fn deref(&self) -> &TriangularGrid {
        &self.0
    }
}

/// Derives the CRR parameters and builds the asset-price lattice.
///
/// # Errors
/// `PricingError::InvalidModel` if `steps == 0` or the risk-neutral
/// probability falls outside (0, 1). No lattice is allocated on failure.
///
/// # Examples
/// ```
/// use pricer_core::market_data::MarketParameters;
/// use pricer_core::types::OptionType;
/// use pricer_models::lattice::build_lattice;
///
/// let params = MarketParameters::new(100.0, 100.0, 0.05, 0.2, 1.0, OptionType::Call).unwrap();
/// let (config, prices) = build_lattice(&params, 3).unwrap();
///
/// assert_eq!(prices.steps(), 3);
/// assert_eq!(prices[(0, 0)], 100.0);
/// assert_eq!(prices[(1, 1)], 100.0 * config.up());
/// ```
pub fn build_lattice(
    params: &MarketParameters,
    steps: usize,
) -> Result<(LatticeConfig, PriceLattice), PricingError> {
    let config = LatticeConfig::new(params, steps)?;
    let prices = PriceLattice::build(params.spot(), &config);
    Ok((config, prices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::types::{ModelViolation, OptionType};

    fn atm_call() -> MarketParameters {
        MarketParameters::new(100.0, 100.0, 0.05, 0.2, 1.0, OptionType::Call).unwrap()
    }

    #[test]
    fn test_shape() {
        let (config, prices) = build_lattice(&atm_call(), 5).unwrap();
        assert_eq!(config.steps(), 5);
        assert_eq!(prices.steps(), 5);
        assert_eq!(prices.as_slice().len(), TriangularGrid::node_count(5));
    }

    #[test]
    fn test_node_prices_match_closed_form() {
        let params = atm_call();
        let (config, prices) = build_lattice(&params, 60).unwrap();
        let (u, d) = (config.up(), config.down());

        for node in prices.nodes() {
            let expected =
                params.spot() * u.powi(node.node as i32) * d.powi((node.step - node.node) as i32);
            assert_relative_eq!(node.value, expected, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_one_step_prices_exact() {
        let (config, prices) = build_lattice(&atm_call(), 1).unwrap();
        assert_eq!(prices.row(1), Some(&[100.0 * config.down(), 100.0 * config.up()][..]));
    }

    #[test]
    fn test_recombination() {
        // An up-move followed by a down-move returns close to spot
        let (_, prices) = build_lattice(&atm_call(), 2).unwrap();
        assert_relative_eq!(prices[(2, 1)], 100.0, max_relative = 1e-12);
    }

    #[test]
    fn test_rows_are_increasing_in_node() {
        let (_, prices) = build_lattice(&atm_call(), 20).unwrap();
        for row in prices.rows() {
            assert!(row.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn test_zero_steps_rejected() {
        let result = build_lattice(&atm_call(), 0);
        assert!(matches!(
            result,
            Err(PricingError::InvalidModel(ModelViolation::ZeroSteps { .. }))
        ));
    }

    #[test]
    fn test_build_is_deterministic() {
        let (config_a, prices_a) = build_lattice(&atm_call(), 100).unwrap();
        let (config_b, prices_b) = build_lattice(&atm_call(), 100).unwrap();
        assert_eq!(config_a, config_b);
        assert_eq!(prices_a.as_slice(), prices_b.as_slice());
    }
}
