//! Validated market inputs for a single European option.

use crate::types::{ModelViolation, OptionType, PricingError};

/// Market and contract inputs for pricing one European option.
///
/// Immutable once constructed. Construction enforces every positivity
/// constraint and rejects non-finite values, so a `MarketParameters` value
/// is always usable by the lattice and analytical pricers.
///
/// # Examples
/// ```
/// use pricer_core::market_data::MarketParameters;
/// use pricer_core::types::OptionType;
///
/// let params = MarketParameters::new(36.0, 40.0, 0.06, 0.2, 1.0, OptionType::Put).unwrap();
/// assert_eq!(params.strike(), 40.0);
/// assert_eq!(params.option_type(), OptionType::Put);
///
/// // Non-positive volatility is rejected
/// assert!(MarketParameters::new(36.0, 40.0, 0.06, 0.0, 1.0, OptionType::Put).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMarketParameters"))]
pub struct MarketParameters {
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    expiry: f64,
    option_type: OptionType,
}

/// Unvalidated wire form; deserialization goes through [`MarketParameters::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMarketParameters {
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    expiry: f64,
    option_type: OptionType,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMarketParameters> for MarketParameters {
    type Error = PricingError;

    fn try_from(raw: RawMarketParameters) -> Result<Self, Self::Error> {
        Self::new(
            raw.spot,
            raw.strike,
            raw.rate,
            raw.volatility,
            raw.expiry,
            raw.option_type,
        )
    }
}

impl MarketParameters {
    /// Creates validated market parameters.
    ///
    /// # Arguments
    /// * `spot` - Current price of the underlying (S > 0)
    /// * `strike` - Strike price (K > 0)
    /// * `rate` - Continuously compounded risk-free rate (finite, may be negative)
    /// * `volatility` - Annualised volatility (σ > 0)
    /// * `expiry` - Time to maturity in years (T > 0)
    /// * `option_type` - Call or put
    ///
    /// # Errors
    /// `PricingError::InvalidModel` naming the first violated constraint.
    pub fn new(
        spot: f64,
        strike: f64,
        rate: f64,
        volatility: f64,
        expiry: f64,
        option_type: OptionType,
    ) -> Result<Self, PricingError> {
        // `!(x > 0.0)` also rejects NaN
        if !(spot > 0.0) {
            return Err(ModelViolation::NonPositiveSpot { spot }.into());
        }
        if !(strike > 0.0) {
            return Err(ModelViolation::NonPositiveStrike { strike }.into());
        }
        if !rate.is_finite() {
            return Err(ModelViolation::NonFiniteRate { rate }.into());
        }
        if !(volatility > 0.0) {
            return Err(ModelViolation::NonPositiveVolatility { volatility }.into());
        }
        if !(expiry > 0.0) {
            return Err(ModelViolation::NonPositiveExpiry { expiry }.into());
        }

        for (name, value) in [
            ("spot", spot),
            ("strike", strike),
            ("volatility", volatility),
            ("time to maturity", expiry),
        ] {
            if value.is_infinite() {
                return Err(ModelViolation::NonFinite { name }.into());
            }
        }

        Ok(Self {
            spot,
            strike,
            rate,
            volatility,
            expiry,
            option_type,
        })
    }

    /// Returns the spot price (S).
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the strike price (K).
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Returns the continuously compounded risk-free rate (r).
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the volatility (σ).
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Returns the time to maturity in years (T).
    #[inline]
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// Returns the option type.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Returns a copy with a different option type.
    ///
    /// All other inputs are already validated, so this cannot fail.
    pub fn with_option_type(&self, option_type: OptionType) -> Self {
        Self {
            option_type,
            ..*self
        }
    }

    /// Discount factor to maturity, exp(-rT).
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.expiry).exp()
    }

    /// Intrinsic value of the option for a given underlying price.
    #[inline]
    pub fn payoff(&self, spot: f64) -> f64 {
        self.option_type.payoff(spot, self.strike)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn atm_call() -> MarketParameters {
        MarketParameters::new(100.0, 100.0, 0.05, 0.2, 1.0, OptionType::Call).unwrap()
    }

    #[test]
    fn test_new_valid_params() {
        let params = atm_call();
        assert_eq!(params.spot(), 100.0);
        assert_eq!(params.strike(), 100.0);
        assert_eq!(params.rate(), 0.05);
        assert_eq!(params.volatility(), 0.2);
        assert_eq!(params.expiry(), 1.0);
        assert_eq!(params.option_type(), OptionType::Call);
    }

    #[test]
    fn test_negative_rate_allowed() {
        let params = MarketParameters::new(100.0, 100.0, -0.01, 0.2, 1.0, OptionType::Put);
        assert!(params.is_ok());
    }

    #[test]
    fn test_invalid_spot_negative() {
        let result = MarketParameters::new(-1.0, 100.0, 0.05, 0.2, 1.0, OptionType::Call);
        match result {
            Err(PricingError::InvalidModel(ModelViolation::NonPositiveSpot { spot })) => {
                assert_eq!(spot, -1.0);
            }
            _ => panic!("Expected NonPositiveSpot error"),
        }
    }

    #[test]
    fn test_invalid_spot_nan() {
        let result = MarketParameters::new(f64::NAN, 100.0, 0.05, 0.2, 1.0, OptionType::Call);
        assert!(matches!(
            result,
            Err(PricingError::InvalidModel(ModelViolation::NonPositiveSpot { .. }))
        ));
    }

    #[test]
    fn test_invalid_strike_zero() {
        let result = MarketParameters::new(100.0, 0.0, 0.05, 0.2, 1.0, OptionType::Call);
        assert!(matches!(
            result,
            Err(PricingError::InvalidModel(ModelViolation::NonPositiveStrike { .. }))
        ));
    }

    #[test]
    fn test_invalid_rate_infinite() {
        let result =
            MarketParameters::new(100.0, 100.0, f64::INFINITY, 0.2, 1.0, OptionType::Call);
        assert!(matches!(
            result,
            Err(PricingError::InvalidModel(ModelViolation::NonFiniteRate { .. }))
        ));
    }

    #[test]
    fn test_invalid_volatility_zero() {
        let result = MarketParameters::new(100.0, 100.0, 0.05, 0.0, 1.0, OptionType::Call);
        assert!(matches!(
            result,
            Err(PricingError::InvalidModel(ModelViolation::NonPositiveVolatility { .. }))
        ));
    }

    #[test]
    fn test_invalid_expiry_negative() {
        let result = MarketParameters::new(100.0, 100.0, 0.05, 0.2, -0.5, OptionType::Call);
        assert!(matches!(
            result,
            Err(PricingError::InvalidModel(ModelViolation::NonPositiveExpiry { .. }))
        ));
    }

    #[test]
    fn test_infinite_spot_rejected() {
        let result =
            MarketParameters::new(f64::INFINITY, 100.0, 0.05, 0.2, 1.0, OptionType::Call);
        assert_eq!(
            result.unwrap_err(),
            PricingError::InvalidModel(ModelViolation::NonFinite { name: "spot" })
        );
    }

    #[test]
    fn test_with_option_type() {
        let call = atm_call();
        let put = call.with_option_type(OptionType::Put);
        assert_eq!(put.option_type(), OptionType::Put);
        assert_eq!(put.spot(), call.spot());
        assert_eq!(put.strike(), call.strike());
    }

    #[test]
    fn test_discount_factor() {
        assert_relative_eq!(atm_call().discount_factor(), (-0.05_f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn test_payoff_uses_strike() {
        let params = atm_call();
        assert_eq!(params.payoff(120.0), 20.0);
        assert_eq!(params.payoff(80.0), 0.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_valid() {
        let json = r#"{"spot":100.0,"strike":100.0,"rate":0.05,"volatility":0.2,"expiry":1.0,"option_type":"call"}"#;
        let params: MarketParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params, atm_call());

        let round_trip: MarketParameters =
            serde_json::from_str(&serde_json::to_string(&params).unwrap()).unwrap();
        assert_eq!(round_trip, params);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_runs_validation() {
        let negative_spot = r#"{"spot":-1.0,"strike":100.0,"rate":0.05,"volatility":0.2,"expiry":1.0,"option_type":"call"}"#;
        let err = serde_json::from_str::<MarketParameters>(negative_spot).unwrap_err();
        assert!(err.to_string().contains("spot must be positive"));

        let zero_vol = r#"{"spot":100.0,"strike":100.0,"rate":0.05,"volatility":0.0,"expiry":1.0,"option_type":"put"}"#;
        assert!(serde_json::from_str::<MarketParameters>(zero_vol).is_err());
    }
}
