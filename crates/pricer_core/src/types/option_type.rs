//! Option type tag with its intrinsic payoff.

use std::fmt;
use std::str::FromStr;

use num_traits::Float;

/// European option type.
///
/// A closed two-way variant: the payoff is a pure function of the tag, so
/// there is no dispatch hierarchy behind it.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
///
/// assert_eq!(OptionType::Call.payoff(110.0_f64, 100.0), 10.0);
/// assert_eq!(OptionType::Put.payoff(110.0_f64, 100.0), 0.0);
/// assert_eq!("put".parse::<OptionType>().unwrap(), OptionType::Put);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionType {
    /// Call option: max(S - K, 0)
    Call,
    /// Put option: max(K - S, 0)
    Put,
}

impl OptionType {
    /// Intrinsic value at expiry for the given spot and strike.
    ///
    /// Never negative.
    #[inline]
    pub fn payoff<T: Float>(&self, spot: T, strike: T) -> T {
        let intrinsic = match self {
            OptionType::Call => spot - strike,
            OptionType::Put => strike - spot,
        };
        intrinsic.max(T::zero())
    }

    /// Returns `true` for calls.
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self, OptionType::Call)
    }

    /// Returns `true` for puts.
    #[inline]
    pub fn is_put(&self) -> bool {
        matches!(self, OptionType::Put)
    }

    /// Returns the opposite option type.
    #[inline]
    pub fn opposite(&self) -> Self {
        match self {
            OptionType::Call => OptionType::Put,
            OptionType::Put => OptionType::Call,
        }
    }

    /// Lowercase label used in reports and config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown option type label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown option type: {0} (expected call or put)")]
pub struct ParseOptionTypeError(pub String);

impl FromStr for OptionType {
    type Err = ParseOptionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            _ => Err(ParseOptionTypeError(s.to_string())),
        }
    }
}
