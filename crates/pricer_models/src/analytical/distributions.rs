//! Standard normal distribution functions.
//!
//! Generic over `T: Float` so the reference pricer works for `f32` and `f64` alike.

use num_traits::Float;

/// 1 / sqrt(2π)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Chebyshev coefficients for erfc, constant term first (Numerical Recipes `erfcc`).
const ERFC_COEFFS: [f64; 10] = [
    -1.265_512_23,
    1.000_023_68,
    0.374_091_96,
    0.096_784_18,
    -0.186_288_06,
    0.278_868_07,
    -1.135_203_98,
    1.488_515_87,
    -0.822_152_23,
    0.170_872_77,
];

#[inline]
fn lit<T: Float>(x: f64) -> T {
    T::from(x).unwrap_or_else(T::nan)
}

/// Complementary error function, fractional error below 1.2e-7 everywhere.
fn erfc<T: Float>(x: T) -> T {
    let one = T::one();
    let z = x.abs();
    let t = one / (one + lit::<T>(0.5) * z);

    let poly = ERFC_COEFFS
        .iter()
        .rev()
        .fold(T::zero(), |acc, &c| lit::<T>(c) + t * acc);
    let tail = t * (-z * z + poly).exp();

    if x >= T::zero() {
        tail
    } else {
        lit::<T>(2.0) - tail
    }
}

/// Standard normal cumulative distribution function.
///
/// Φ(x) = erfc(-x / √2) / 2
///
/// # Examples
/// ```
/// use pricer_models::analytical::norm_cdf;
///
/// assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-7);
/// assert!((norm_cdf(1.96_f64) - 0.975).abs() < 1e-4);
/// ```
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    let half = lit::<T>(0.5);
    half * erfc(-x / lit::<T>(std::f64::consts::SQRT_2))
}

/// Standard normal probability density function.
///
/// φ(x) = exp(-x²/2) / √(2π)
#[inline]
pub fn norm_pdf<T: Float>(x: T) -> T {
    lit::<T>(FRAC_1_SQRT_2PI) * (-lit::<T>(0.5) * x * x).exp()
}
