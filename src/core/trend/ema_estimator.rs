use crate::core::error::{DetectError, DetectResult};

/// Exponentially weighted moving average of a numeric sequence.
///
/// The first accepted value seeds the estimate; every later value `x` moves it
/// to `alpha * x + (1 - alpha) * current`. Until seeded, [`current`] is
/// `None`, so a legitimate zero is never confused with "no value yet".
///
/// [`current`]: EmaEstimator::current
#[derive(Debug, Clone, PartialEq)]
pub struct EmaEstimator {
    alpha: f64,
    current: Option<f64>,
}

impl EmaEstimator {
    /// `alpha` must be strictly within `(0, 1)`. Higher values follow the
    /// input faster.
    pub fn new(alpha: f64) -> DetectResult<Self> {
        if !alpha.is_finite() || alpha <= 0.0 || alpha >= 1.0 {
            return Err(DetectError::parameter(
                "ema_alpha",
                format!("must be within (0, 1) exclusive, got {alpha}"),
            ));
        }
        Ok(Self {
            alpha,
            current: None,
        })
    }

    /// Folds `x` into the estimate and returns the new value.
    ///
    /// Non-finite inputs are rejected before any state changes.
    pub fn update(&mut self, x: f64) -> DetectResult<f64> {
        if !x.is_finite() {
            return Err(DetectError::non_finite(x));
        }
        let next = match self.current {
            None => x,
            Some(prev) => self.alpha * x + (1.0 - self.alpha) * prev,
        };
        self.current = Some(next);
        Ok(next)
    }

    #[inline]
    pub fn current(&self) -> Option<f64> {
        self.current
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}
