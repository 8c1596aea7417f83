//! Per-step CRR lattice parameters.
//!
//! ## Formulas
//!
//! - Δt = T / N
//! - u = exp(σ√Δt), d = 1/u
//! - p = (exp(rΔt) - d) / (u - d)
//!
//! The lattice is arbitrage-free only when 0 < p < 1, which holds whenever
//! |r|·√Δt < σ.

use pricer_core::market_data::MarketParameters;
use pricer_core::types::{ModelViolation, PricingError};

/// Derived Cox-Ross-Rubinstein parameters for an `N`-step lattice.
///
/// # Examples
/// ```
/// use pricer_core::market_data::MarketParameters;
/// use pricer_core::types::OptionType;
/// use pricer_models::lattice::LatticeConfig;
///
/// let params = MarketParameters::new(36.0, 40.0, 0.06, 0.2, 1.0, OptionType::Put).unwrap();
/// let config = LatticeConfig::new(&params, 10).unwrap();
///
/// assert_eq!(config.steps(), 10);
/// assert!((config.up() * config.down() - 1.0).abs() < 1e-15);
/// assert!(config.probability() > 0.0 && config.probability() < 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LatticeConfig {
    steps: usize,
    dt: f64,
    up: f64,
    down: f64,
    probability: f64,
    discount: f64,
}

impl LatticeConfig {
    /// Derives the lattice parameters for `steps` time steps.
    ///
    /// # Errors
    /// - `ModelViolation::ZeroSteps` if `steps == 0`
    /// - `ModelViolation::ArbitrageViolation` if p falls outside (0, 1)
    pub fn new(params: &MarketParameters, steps: usize) -> Result<Self, PricingError> {
        if steps == 0 {
            return Err(ModelViolation::ZeroSteps { steps }.into());
        }

        let dt = params.expiry() / steps as f64;
        let up = (params.volatility() * dt.sqrt()).exp();
        let down = 1.0 / up;
        let probability = ((params.rate() * dt).exp() - down) / (up - down);

        // NaN (u == d after underflow) fails this check too
        if !(probability > 0.0 && probability < 1.0) {
            return Err(ModelViolation::ArbitrageViolation { probability }.into());
        }

        Ok(Self {
            steps,
            dt,
            up,
            down,
            probability,
            discount: (-params.rate() * dt).exp(),
        })
    }

    /// Number of time steps (N).
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Step length Δt = T / N.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Up factor u = exp(σ√Δt).
    #[inline]
    pub fn up(&self) -> f64 {
        self.up
    }

    /// Down factor d = 1/u.
    #[inline]
    pub fn down(&self) -> f64 {
        self.down
    }

    /// Risk-neutral probability of an up-move.
    #[inline]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// One-step discount factor exp(-rΔt).
    #[inline]
    pub fn discount(&self) -> f64 {
        self.discount
    }
}
