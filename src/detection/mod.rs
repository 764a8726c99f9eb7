mod anomaly_scorer;
mod config;
mod score_result;

pub use crate::core::error::{DetectError, DetectResult};
pub use anomaly_scorer::AnomalyScorer;
pub use config::{DispersionBasis, ScorerConfig};
pub use score_result::{Band, ScoreResult};
