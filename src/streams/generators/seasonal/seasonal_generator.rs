use std::f64::consts::TAU;
use std::io::{Error, ErrorKind};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::core::Observation;
use crate::streams::stream::ObservationStream;

/// Synthetic seasonal signal with noise, injected spikes and gaps.
///
/// The value at step `t` is `amplitude * sin(2πt / period) + N(0, noise_std)`.
/// With probability `anomaly_probability` that value is then multiplied by a
/// factor drawn uniformly from `[min_factor, max_factor]`, and with
/// probability `gap_probability` the step yields [`Observation::Missing`]
/// instead of a value.
///
/// Key properties:
/// - Deterministic: fully reproducible given the seed.
/// - Unbounded unless `max_observations` is set.
/// - Steps advance on gaps too, so the seasonal phase never drifts.
#[derive(Debug)]
pub struct SeasonalGenerator {
    /// RNG seed used to (re)initialize the pseudo-random sequence.
    seed: u64,
    /// Pseudo-random generator; reseeded by [`ObservationStream::restart`].
    rng: StdRng,
    period: f64,
    amplitude: f64,
    noise: Normal<f64>,
    anomaly_probability: f64,
    min_factor: f64,
    max_factor: f64,
    gap_probability: f64,
    max_observations: Option<usize>,
    /// Steps produced since last restart; doubles as the time index.
    produced: usize,
}

impl SeasonalGenerator {
    pub const DEFAULT_ANOMALY_PROBABILITY: f64 = 0.5;
    pub const DEFAULT_MIN_FACTOR: f64 = 2.0;
    pub const DEFAULT_MAX_FACTOR: f64 = 4.0;

    /// Creates a generator with the default spike injection (one step in two
    /// scaled by 2x to 4x) and no gaps.
    ///
    /// Returns an error if `period` is not positive or `noise_std` is
    /// negative, or either is not finite.
    pub fn new(
        period: f64,
        amplitude: f64,
        noise_std: f64,
        max_observations: Option<usize>,
        seed: u64,
    ) -> Result<Self, Error> {
        if !period.is_finite() || period <= 0.0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "period must be a positive number",
            ));
        }
        if !amplitude.is_finite() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "amplitude must be finite",
            ));
        }
        if !noise_std.is_finite() || noise_std < 0.0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "noise_std must be a non-negative number",
            ));
        }
        let noise = Normal::new(0.0, noise_std)
            .map_err(|e| Error::new(ErrorKind::InvalidInput, e.to_string()))?;

        Ok(Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            period,
            amplitude,
            noise,
            anomaly_probability: Self::DEFAULT_ANOMALY_PROBABILITY,
            min_factor: Self::DEFAULT_MIN_FACTOR,
            max_factor: Self::DEFAULT_MAX_FACTOR,
            gap_probability: 0.0,
            max_observations,
            produced: 0,
        })
    }

    /// Overrides spike injection. `probability` must be in `[0, 1]` and the
    /// factors must be finite with `min_factor <= max_factor`.
    pub fn with_anomalies(
        mut self,
        probability: f64,
        min_factor: f64,
        max_factor: f64,
    ) -> Result<Self, Error> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "anomaly_probability must be in 0.0..=1.0",
            ));
        }
        if !min_factor.is_finite() || !max_factor.is_finite() || min_factor > max_factor {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "anomaly factors must be finite with min_factor <= max_factor",
            ));
        }
        self.anomaly_probability = probability;
        self.min_factor = min_factor;
        self.max_factor = max_factor;
        Ok(self)
    }

    /// Emits [`Observation::Missing`] with the given probability per step.
    pub fn with_gaps(mut self, probability: f64) -> Result<Self, Error> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "gap_probability must be in 0.0..=1.0",
            ));
        }
        self.gap_probability = probability;
        Ok(self)
    }

    /// Noise-free seasonal component at step `t`.
    #[inline]
    pub fn seasonal_component(&self, t: usize) -> f64 {
        self.amplitude * (TAU * t as f64 / self.period).sin()
    }

    #[inline]
    fn roll(&mut self, probability: f64) -> bool {
        probability > 0.0 && self.rng.random::<f64>() < probability
    }
}

impl ObservationStream for SeasonalGenerator {
    fn has_more_observations(&self) -> bool {
        self.max_observations.map_or(true, |max| self.produced < max)
    }

    fn next_observation(&mut self) -> Option<Observation> {
        if !self.has_more_observations() {
            return None;
        }
        let t = self.produced;
        self.produced += 1;

        if self.roll(self.gap_probability) {
            return Some(Observation::Missing);
        }

        let mut value = self.seasonal_component(t) + self.noise.sample(&mut self.rng);
        if self.roll(self.anomaly_probability) {
            value *= self.rng.random_range(self.min_factor..=self.max_factor);
        }
        Some(Observation::Value(value))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.produced = 0;
        Ok(())
    }

    fn name(&self) -> &str {
        "seasonal-generator"
    }
}
