//! Black-Scholes pricing model for European options.
//!
//! Serves as the continuous-time reference the CRR lattice converges to.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = C + K·e^(-rT) - S (put-call parity)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T

use num_traits::Float;
use pricer_core::market_data::MarketParameters;
use pricer_core::types::{ModelViolation, OptionType, PricingError};

use super::distributions::{norm_cdf, norm_pdf};

/// Black-Scholes model for European option pricing.
///
/// # Type Parameters
/// * `T` - Floating-point type implementing `Float` (e.g., `f64`, `f32`)
///
/// # Examples
/// ```
/// use pricer_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0_f64, 0.05, 0.2).unwrap();
/// let call_price = bs.price_call(100.0, 1.0);
/// let put_price = bs.price_put(100.0, 1.0);
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call_price - put_price - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BlackScholes<T: Float> {
    spot: T,
    rate: T,
    volatility: T,
}

impl<T: Float> BlackScholes<T> {
    /// Creates a new Black-Scholes model.
    ///
    /// # Arguments
    /// * `spot` - Current spot price (must be positive)
    /// * `rate` - Risk-free interest rate (annualised, continuously compounded)
    /// * `volatility` - Volatility (must be positive)
    ///
    /// # Errors
    /// `PricingError::InvalidModel` if spot or volatility is not positive.
    pub fn new(spot: T, rate: T, volatility: T) -> Result<Self, PricingError> {
        let zero = T::zero();

        if !(spot > zero) {
            return Err(ModelViolation::NonPositiveSpot {
                spot: spot.to_f64().unwrap_or(f64::NAN),
            }
            .into());
        }

        if !(volatility > zero) {
            return Err(ModelViolation::NonPositiveVolatility {
                volatility: volatility.to_f64().unwrap_or(f64::NAN),
            }
            .into());
        }

        Ok(Self {
            spot,
            rate,
            volatility,
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> T {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> T {
        self.volatility
    }

    /// d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
    #[inline]
    pub fn d1(&self, strike: T, expiry: T) -> T {
        let half = T::from(0.5).unwrap_or_else(T::nan);
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let drift = (self.rate + half * self.volatility * self.volatility) * expiry;

        ((self.spot / strike).ln() + drift) / vol_sqrt_t
    }

    /// d₂ = d₁ - σ√T
    #[inline]
    pub fn d2(&self, strike: T, expiry: T) -> T {
        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    /// Computes the European call price.
    ///
    /// At or past expiry (T <= 0) the intrinsic value is returned.
    pub fn price_call(&self, strike: T, expiry: T) -> T {
        if expiry <= T::zero() {
            return OptionType::Call.payoff(self.spot, strike);
        }

        let discount = (-self.rate * expiry).exp();
        self.spot * norm_cdf(self.d1(strike, expiry))
            - strike * discount * norm_cdf(self.d2(strike, expiry))
    }

    /// Computes the European put price from the call via put-call parity.
    ///
    /// At or past expiry (T <= 0) the intrinsic value is returned.
    pub fn price_put(&self, strike: T, expiry: T) -> T {
        if expiry <= T::zero() {
            return OptionType::Put.payoff(self.spot, strike);
        }

        let discount = (-self.rate * expiry).exp();
        self.price_call(strike, expiry) + strike * discount - self.spot
    }

    /// Prices a call or put.
    #[inline]
    pub fn price(&self, option_type: OptionType, strike: T, expiry: T) -> T {
        match option_type {
            OptionType::Call => self.price_call(strike, expiry),
            OptionType::Put => self.price_put(strike, expiry),
        }
    }

    /// Delta (∂V/∂S): N(d₁) for calls, N(d₁) - 1 for puts.
    pub fn delta(&self, option_type: OptionType, strike: T, expiry: T) -> T {
        let call_delta = norm_cdf(self.d1(strike, expiry));
        match option_type {
            OptionType::Call => call_delta,
            OptionType::Put => call_delta - T::one(),
        }
    }

    /// Gamma (∂²V/∂S²), identical for calls and puts.
    pub fn gamma(&self, strike: T, expiry: T) -> T {
        norm_pdf(self.d1(strike, expiry)) / (self.spot * self.volatility * expiry.sqrt())
    }
}

impl BlackScholes<f64> {
    /// Builds the model from validated market parameters.
    pub fn from_params(params: &MarketParameters) -> Self {
        Self {
            spot: params.spot(),
            rate: params.rate(),
            volatility: params.volatility(),
        }
    }

    /// Closed-form price of the option described by `params`.
    ///
    /// This is the reference a convergence study compares lattice prices to.
    ///
    /// # Examples
    /// ```
    /// use pricer_core::market_data::MarketParameters;
    /// use pricer_core::types::OptionType;
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// let params = MarketParameters::new(100.0, 100.0, 0.05, 0.2, 1.0, OptionType::Call).unwrap();
    /// assert!((BlackScholes::reference_price(&params) - 10.4506).abs() < 1e-3);
    /// ```
    pub fn reference_price(params: &MarketParameters) -> f64 {
        Self::from_params(params).price(params.option_type(), params.strike(), params.expiry())
    }
}
