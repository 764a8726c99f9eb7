use serde::Serialize;
use std::fmt::{Display, Formatter, Result};

use crate::utils::math::two_sided_tail;

/// Symmetric acceptance band around the trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub lower: f64,
    pub upper: f64,
    /// Dispersion the band was built from, before scaling by the multiplier.
    pub sigma: f64,
}

impl Band {
    pub fn around(center: f64, sigma: f64, multiplier: f64) -> Self {
        Self {
            lower: center - multiplier * sigma,
            upper: center + multiplier * sigma,
            sigma,
        }
    }

    /// Strictly outside: a value sitting exactly on a bound is not flagged.
    #[inline]
    pub fn excludes(&self, x: f64) -> bool {
        x > self.upper || x < self.lower
    }
}

/// Verdict for one observation. `band` is `None` during warm-up, when
/// `is_anomaly` is always `false`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    pub is_anomaly: bool,
    pub value: f64,
    pub trend: f64,
    pub band: Option<Band>,
}

impl ScoreResult {
    pub(crate) fn warming_up(value: f64, trend: f64) -> Self {
        Self {
            is_anomaly: false,
            value,
            trend,
            band: None,
        }
    }

    pub(crate) fn banded(value: f64, trend: f64, band: Band) -> Self {
        Self {
            is_anomaly: band.excludes(value),
            value,
            trend,
            band: Some(band),
        }
    }

    #[inline]
    pub fn upper_bound(&self) -> Option<f64> {
        self.band.map(|b| b.upper)
    }

    #[inline]
    pub fn lower_bound(&self) -> Option<f64> {
        self.band.map(|b| b.lower)
    }

    #[inline]
    pub fn is_warm_up(&self) -> bool {
        self.band.is_none()
    }

    /// Distance from the trend in units of window dispersion.
    /// `None` in warm-up or when the window is flat.
    pub fn z_score(&self) -> Option<f64> {
        let band = self.band?;
        if band.sigma > 0.0 {
            Some((self.value - self.trend) / band.sigma)
        } else {
            None
        }
    }

    /// Two-sided gaussian tail probability of [`z_score`](Self::z_score).
    pub fn tail_probability(&self) -> Option<f64> {
        self.z_score().map(two_sided_tail)
    }
}

impl Display for ScoreResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.band {
            None => write!(
                f,
                "value={:.6}, trend={:.6}, band=warming-up",
                self.value, self.trend
            ),
            Some(b) => write!(
                f,
                "value={:.6}, trend={:.6}, band=[{:.6}, {:.6}], anomaly={}",
                self.value, self.trend, b.lower, b.upper, self.is_anomaly
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_bounds_are_strict() {
        let band = Band::around(10.0, 2.0, 1.5);
        assert_eq!(band.lower, 7.0);
        assert_eq!(band.upper, 13.0);
        assert!(!band.excludes(13.0));
        assert!(!band.excludes(7.0));
        assert!(band.excludes(13.000_001));
        assert!(band.excludes(6.999_999));
    }

    #[test]
    fn zero_width_band_flags_any_deviation() {
        let band = Band::around(10.0, 0.0, 3.0);
        assert!(!band.excludes(10.0));
        assert!(band.excludes(10.000_000_1));
        assert!(band.excludes(9.999_999_9));
    }

    #[test]
    fn warm_up_result_has_no_bounds() {
        let r = ScoreResult::warming_up(4.0, 3.0);
        assert!(!r.is_anomaly);
        assert!(r.is_warm_up());
        assert_eq!(r.upper_bound(), None);
        assert_eq!(r.lower_bound(), None);
        assert_eq!(r.z_score(), None);
        assert_eq!(r.to_string(), "value=4.000000, trend=3.000000, band=warming-up");
    }

    #[test]
    fn z_score_and_tail() {
        let r = ScoreResult::banded(16.0, 10.0, Band::around(10.0, 2.0, 2.0));
        assert!(r.is_anomaly);
        assert_eq!(r.z_score(), Some(3.0));
        let p = r.tail_probability().unwrap();
        assert!(p > 0.002 && p < 0.003, "p={p}");
    }

    #[test]
    fn flat_band_has_no_z_score() {
        let r = ScoreResult::banded(10.0, 10.0, Band::around(10.0, 0.0, 2.0));
        assert!(!r.is_anomaly);
        assert_eq!(r.z_score(), None);
        assert_eq!(r.tail_probability(), None);
    }
}
