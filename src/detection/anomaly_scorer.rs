use log::trace;

use crate::core::error::DetectResult;
use crate::core::{BoundedWindow, EmaEstimator, Observation};
use crate::detection::config::{DispersionBasis, ScorerConfig};
use crate::detection::score_result::{Band, ScoreResult};

/// Sequential anomaly scorer: an EMA trend plus a band of
/// `threshold_multiplier` window standard deviations on either side.
///
/// No result carries a band until the window has filled, and a result
/// without a band is never anomalous. The scorer holds no randomness:
/// replaying the same observations through a fresh scorer with the same
/// config reproduces the same results.
#[derive(Debug, Clone)]
pub struct AnomalyScorer {
    config: ScorerConfig,
    trend: EmaEstimator,
    window: BoundedWindow,
    seen: u64,
}

impl AnomalyScorer {
    pub fn new(ema_alpha: f64, window_size: usize, threshold_multiplier: f64) -> DetectResult<Self> {
        Self::from_config(ScorerConfig::new(ema_alpha, window_size, threshold_multiplier))
    }

    pub fn from_config(config: ScorerConfig) -> DetectResult<Self> {
        let trend = EmaEstimator::new(config.ema_alpha)?;
        let window = BoundedWindow::new(config.window_size)?;
        config.validate_multiplier()?;
        Ok(Self {
            config,
            trend,
            window,
            seen: 0,
        })
    }

    /// Scores `x` and folds it into the detector state.
    ///
    /// A non-finite `x` is returned as `InvalidInput` and changes nothing.
    pub fn score(&mut self, x: f64) -> DetectResult<ScoreResult> {
        let trend = self.trend.update(x)?;
        self.seen += 1;

        let sigma = match self.config.dispersion_basis {
            DispersionBasis::Inclusive => {
                self.window.push(x);
                self.window.dispersion()
            }
            DispersionBasis::Trailing => {
                let sigma = self.window.dispersion();
                self.window.push(x);
                sigma
            }
        };

        let result = match sigma {
            None => ScoreResult::warming_up(x, trend),
            Some(sigma) => ScoreResult::banded(
                x,
                trend,
                Band::around(trend, sigma, self.config.threshold_multiplier),
            ),
        };
        trace!("scored #{}: {}", self.seen, result);
        Ok(result)
    }

    pub fn score_observation(&mut self, observation: &Observation) -> DetectResult<ScoreResult> {
        let x = observation.numeric()?;
        self.score(x)
    }

    /// Number of observations accepted since construction or the last reset.
    #[inline]
    pub fn observations_seen(&self) -> u64 {
        self.seen
    }

    /// Whether the next accepted observation will be scored against a band.
    pub fn is_warmed_up(&self) -> bool {
        match self.config.dispersion_basis {
            DispersionBasis::Inclusive => self.window.len() + 1 >= self.window.capacity(),
            DispersionBasis::Trailing => self.window.is_full(),
        }
    }

    #[inline]
    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    #[inline]
    pub fn trend(&self) -> Option<f64> {
        self.trend.current()
    }

    #[inline]
    pub fn window(&self) -> &BoundedWindow {
        &self.window
    }

    pub fn reset(&mut self) {
        self.trend.reset();
        self.window.clear();
        self.seen = 0;
    }
}
