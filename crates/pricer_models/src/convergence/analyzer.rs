//! CRR prices against a reference price over increasing step counts.

use rayon::prelude::*;

use pricer_core::market_data::MarketParameters;
use pricer_core::types::PricingError;

use super::range::StepRange;
use crate::lattice::{build_lattice, price_european};

/// One entry of a convergence study.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConvergencePoint {
    /// Number of lattice steps N
    pub steps: usize,
    /// CRR root price with N steps
    pub price: f64,
    /// |price - reference|
    pub abs_error: f64,
}

/// Convergence results in ascending step order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConvergenceSeries {
    reference_price: f64,
    points: Vec<ConvergencePoint>,
}

impl ConvergenceSeries {
    /// Reference price every point was compared against.
    #[inline]
    pub fn reference_price(&self) -> f64 {
        self.reference_price
    }

    /// All points, ascending in `steps`.
    #[inline]
    pub fn points(&self) -> &[ConvergencePoint] {
        &self.points
    }

    /// Iterates over the points in ascending step order.
    pub fn iter(&self) -> std::slice::Iter<'_, ConvergencePoint> {
        self.points.iter()
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the series has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point with the largest step count.
    pub fn last(&self) -> Option<&ConvergencePoint> {
        self.points.last()
    }

    /// Point with the smallest absolute error.
    pub fn best(&self) -> Option<&ConvergencePoint> {
        self.points
            .iter()
            .min_by(|a, b| a.abs_error.total_cmp(&b.abs_error))
    }
}

impl<'a> IntoIterator for &'a ConvergenceSeries {
    type Item = &'a ConvergencePoint;
    type IntoIter = std::slice::Iter<'a, ConvergencePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Runs build + price for every step count in a [`StepRange`].
///
/// The analyzer holds only its immutable inputs. [`iter`](Self::iter) can be
/// called any number of times; each call starts a fresh lazy sequence, and
/// each step count gets freshly allocated lattices.
///
/// # Examples
/// ```
/// use pricer_core::market_data::MarketParameters;
/// use pricer_core::types::OptionType;
/// use pricer_models::analytical::BlackScholes;
/// use pricer_models::convergence::{ConvergenceAnalyzer, StepRange};
///
/// let params = MarketParameters::new(100.0, 100.0, 0.05, 0.2, 1.0, OptionType::Call).unwrap();
/// let reference = BlackScholes::reference_price(&params);
/// let analyzer =
///     ConvergenceAnalyzer::new(params, StepRange::new(vec![10, 500]).unwrap(), reference).unwrap();
///
/// let series = analyzer.analyze().unwrap();
/// assert!(series.points()[1].abs_error < series.points()[0].abs_error);
/// ```
#[derive(Debug, Clone)]
pub struct ConvergenceAnalyzer {
    params: MarketParameters,
    steps: StepRange,
    reference_price: f64,
}

impl ConvergenceAnalyzer {
    /// Creates an analyzer.
    ///
    /// # Arguments
    /// * `params` - Market inputs shared by every lattice
    /// * `steps` - Step counts to evaluate
    /// * `reference_price` - Externally computed benchmark price
    ///
    /// # Errors
    /// `PricingError::InvalidRange` if `reference_price` is not finite.
    pub fn new(
        params: MarketParameters,
        steps: StepRange,
        reference_price: f64,
    ) -> Result<Self, PricingError> {
        if !reference_price.is_finite() {
            return Err(PricingError::invalid_range(format!(
                "reference price must be finite, got {reference_price}"
            )));
        }
        Ok(Self {
            params,
            steps,
            reference_price,
        })
    }

    /// Market inputs.
    #[inline]
    pub fn params(&self) -> &MarketParameters {
        &self.params
    }

    /// Step counts evaluated.
    #[inline]
    pub fn steps(&self) -> &StepRange {
        &self.steps
    }

    /// Benchmark price.
    #[inline]
    pub fn reference_price(&self) -> f64 {
        self.reference_price
    }

    /// Prices the option on a lattice with `steps` steps and compares it to the reference.
    pub fn evaluate(&self, steps: usize) -> Result<ConvergencePoint, PricingError> {
        let (config, prices) = build_lattice(&self.params, steps)?;
        let price = price_european(&self.params, &config, &prices)?.root_price();
        Ok(ConvergencePoint {
            steps,
            price,
            abs_error: (price - self.reference_price).abs(),
        })
    }

    /// Lazy sequence of points in ascending step order.
    ///
    /// Stops after the first error.
    pub fn iter(&self) -> ConvergenceIter<'_> {
        ConvergenceIter {
            analyzer: self,
            position: 0,
            failed: false,
        }
    }

    /// Evaluates every step count sequentially.
    ///
    /// # Errors
    /// The first error from any lattice; no partial series is returned.
    pub fn analyze(&self) -> Result<ConvergenceSeries, PricingError> {
        let points = self.iter().collect::<Result<Vec<_>, _>>()?;
        Ok(self.series(points))
    }

    /// Evaluates the step counts on the rayon thread pool.
    ///
    /// Produces the same series as [`analyze`](Self::analyze), in ascending step order.
    ///
    /// # Errors
    /// An error from one of the lattices; no partial series is returned.
    pub fn analyze_parallel(&self) -> Result<ConvergenceSeries, PricingError> {
        let points = self
            .steps
            .as_slice()
            .par_iter()
            .map(|&steps| self.evaluate(steps))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.series(points))
    }

    fn series(&self, points: Vec<ConvergencePoint>) -> ConvergenceSeries {
        ConvergenceSeries {
            reference_price: self.reference_price,
            points,
        }
    }
}

impl<'a> IntoIterator for &'a ConvergenceAnalyzer {
    type Item = Result<ConvergencePoint, PricingError>;
    type IntoIter = ConvergenceIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator returned by [`ConvergenceAnalyzer::iter`].
#[derive(Debug, Clone)]
pub struct ConvergenceIter<'a> {
    analyzer: &'a ConvergenceAnalyzer,
    position: usize,
    failed: bool,
}

impl Iterator for ConvergenceIter<'_> {
    type Item = Result<ConvergencePoint, PricingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let steps = *self.analyzer.steps.as_slice().get(self.position)?;
        self.position += 1;

        let point = self.analyzer.evaluate(steps);
        self.failed = point.is_err();
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = self.analyzer.steps.len() - self.position;
        (0, Some(remaining))
    }
}

impl std::iter::FusedIterator for ConvergenceIter<'_> {}

/// Validates `steps` and runs a sequential convergence study.
///
/// # Errors
/// - `PricingError::InvalidRange` for a malformed step sequence or reference price
/// - Any lattice error, aborting the study
pub fn analyze(
    params: &MarketParameters,
    steps: &[usize],
    reference_price: f64,
) -> Result<ConvergenceSeries, PricingError> {
    let range = StepRange::new(steps.to_vec())?;
    ConvergenceAnalyzer::new(*params, range, reference_price)?.analyze()
}
