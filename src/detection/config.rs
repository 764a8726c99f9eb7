use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::core::error::{DetectError, DetectResult};

/// Which window contents the band's dispersion is computed over.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DispersionBasis {
    /// The last `window_size` observations including the one being scored.
    #[default]
    Inclusive,
    /// The `window_size` observations preceding the one being scored.
    Trailing,
}

/// Validated construction parameters of an [`AnomalyScorer`].
///
/// [`AnomalyScorer`]: crate::detection::AnomalyScorer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorerConfig {
    pub ema_alpha: f64,
    pub window_size: usize,
    pub threshold_multiplier: f64,
    pub dispersion_basis: DispersionBasis,
}

impl ScorerConfig {
    pub fn new(ema_alpha: f64, window_size: usize, threshold_multiplier: f64) -> Self {
        Self {
            ema_alpha,
            window_size,
            threshold_multiplier,
            dispersion_basis: DispersionBasis::default(),
        }
    }

    pub fn with_dispersion_basis(mut self, basis: DispersionBasis) -> Self {
        self.dispersion_basis = basis;
        self
    }

    /// Checks the multiplier; alpha and window size are checked by the
    /// estimator and the window themselves.
    pub(crate) fn validate_multiplier(&self) -> DetectResult<()> {
        let k = self.threshold_multiplier;
        if !k.is_finite() || k <= 0.0 {
            return Err(DetectError::parameter(
                "threshold_multiplier",
                format!("must be a positive number, got {k}"),
            ));
        }
        Ok(())
    }
}

impl Default for ScorerConfig {
    /// Parameters of the reference live demo.
    fn default() -> Self {
        Self::new(0.2, 10, 2.2)
    }
}
