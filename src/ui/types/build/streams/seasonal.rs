use crate::streams::SeasonalGenerator;
use crate::ui::types::{build::BuildError, choices::SeasonalParameters};

impl TryFrom<SeasonalParameters> for SeasonalGenerator {
    type Error = BuildError;

    fn try_from(p: SeasonalParameters) -> Result<Self, Self::Error> {
        let max_observations = p
            .max_observations
            .map(|v| {
                usize::try_from(v).map_err(|_| {
                    BuildError::InvalidParameter("max_observations too large for usize".into())
                })
            })
            .transpose()?;

        let generator = SeasonalGenerator::new(
            p.period,
            p.amplitude,
            p.noise_std,
            max_observations,
            p.seed,
        )?
        .with_anomalies(p.anomaly_probability, p.min_factor, p.max_factor)?
        .with_gaps(p.gap_probability)?;
        Ok(generator)
    }
}
