use crate::detection::{AnomalyScorer, ScorerConfig};
use crate::ui::types::build::BuildError;
use crate::ui::types::choices::{DetectorChoice, EmaBandParameters};

impl TryFrom<EmaBandParameters> for AnomalyScorer {
    type Error = BuildError;

    fn try_from(p: EmaBandParameters) -> Result<Self, Self::Error> {
        let config = ScorerConfig::new(p.ema_alpha, p.window_size, p.threshold_multiplier)
            .with_dispersion_basis(p.dispersion_basis);
        Ok(AnomalyScorer::from_config(config)?)
    }
}

pub fn build_detector(choice: DetectorChoice) -> Result<AnomalyScorer, BuildError> {
    match choice {
        DetectorChoice::EmaBand(p) => AnomalyScorer::try_from(p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::DispersionBasis;

    #[test]
    fn carries_every_parameter_into_the_scorer() {
        let scorer = build_detector(DetectorChoice::EmaBand(EmaBandParameters {
            ema_alpha: 0.5,
            window_size: 4,
            threshold_multiplier: 3.0,
            dispersion_basis: DispersionBasis::Trailing,
        }))
        .unwrap();
        let cfg = scorer.config();
        assert_eq!(cfg.ema_alpha, 0.5);
        assert_eq!(cfg.window_size, 4);
        assert_eq!(cfg.threshold_multiplier, 3.0);
        assert_eq!(cfg.dispersion_basis, DispersionBasis::Trailing);
    }

    #[test]
    fn rejects_zero_window() {
        let p = EmaBandParameters {
            window_size: 0,
            ..EmaBandParameters::default()
        };
        let err = AnomalyScorer::try_from(p).unwrap_err();
        assert!(matches!(err, BuildError::Detect(_)), "{err}");
        assert!(err.to_string().contains("window_size"), "{err}");
    }

    #[test]
    fn rejects_alpha_out_of_range() {
        let p = EmaBandParameters {
            ema_alpha: 1.5,
            ..EmaBandParameters::default()
        };
        assert!(AnomalyScorer::try_from(p).is_err());
    }
}
