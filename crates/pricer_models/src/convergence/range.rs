//! Validated step-count sequences for convergence studies.

use pricer_core::types::PricingError;

/// Stride of the default display ladder (10, 20, 30, ...).
pub const DEFAULT_LADDER_STRIDE: usize = 10;

/// Strictly increasing, non-empty sequence of positive step counts.
///
/// # Examples
/// ```
/// use pricer_models::convergence::StepRange;
///
/// let range = StepRange::new(vec![10, 50, 100]).unwrap();
/// assert_eq!(range.as_slice(), &[10, 50, 100]);
///
/// assert!(StepRange::new(vec![10, 10]).is_err());
/// assert!(StepRange::new(vec![0, 10]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StepRange(Vec<usize>);

impl StepRange {
    /// Validates an explicit list of step counts.
    ///
    /// # Errors
    /// `PricingError::InvalidRange` if the list is empty, contains zero, or is
    /// not strictly increasing.
    pub fn new(steps: Vec<usize>) -> Result<Self, PricingError> {
        if steps.is_empty() {
            return Err(PricingError::invalid_range("no step counts given"));
        }
        if steps[0] == 0 {
            return Err(PricingError::invalid_range("step counts must be positive"));
        }
        if let Some(pair) = steps.windows(2).find(|pair| pair[1] <= pair[0]) {
            return Err(PricingError::invalid_range(format!(
                "step counts must be strictly increasing ({} followed by {})",
                pair[0], pair[1]
            )));
        }
        Ok(Self(steps))
    }

    /// `start, start + stride, ...` up to and including `max` when it falls on the grid.
    ///
    /// # Errors
    /// `PricingError::InvalidRange` if `start` or `stride` is zero, or `start > max`.
    pub fn arithmetic(start: usize, stride: usize, max: usize) -> Result<Self, PricingError> {
        if stride == 0 {
            return Err(PricingError::invalid_range("stride must be positive"));
        }
        if start > max {
            return Err(PricingError::invalid_range(format!(
                "start {start} exceeds maximum {max}"
            )));
        }
        Self::new((start..=max).step_by(stride).collect())
    }

    /// Ladder 10, 20, ... ending at the first multiple of 10 that reaches `steps`.
    ///
    /// Never shorter than a single rung at 10 steps.
    ///
    /// # Errors
    /// `PricingError::InvalidRange` if the top rung does not fit in `usize`.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::convergence::StepRange;
    ///
    /// assert_eq!(StepRange::ladder(25).unwrap().as_slice(), &[10, 20, 30]);
    /// assert_eq!(StepRange::ladder(3).unwrap().as_slice(), &[10]);
    /// ```
    pub fn ladder(steps: usize) -> Result<Self, PricingError> {
        let stride = DEFAULT_LADDER_STRIDE;
        let top = steps
            .max(stride)
            .div_ceil(stride)
            .checked_mul(stride)
            .ok_or_else(|| {
                PricingError::invalid_range(format!("ladder to {steps} steps overflows"))
            })?;
        Ok(Self((stride..=top).step_by(stride).collect()))
    }

    /// Step counts in ascending order.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of step counts.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: a validated range has at least one entry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest step count in the range.
    #[inline]
    pub fn max_steps(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    /// Iterates over the step counts in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl TryFrom<Vec<usize>> for StepRange {
    type Error = PricingError;

    fn try_from(steps: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(steps)
    }
}
