mod ema_estimator;

pub use ema_estimator::EmaEstimator;
