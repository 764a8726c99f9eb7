use std::time::Duration;

use crate::tasks::StreamDriver;
use crate::ui::types::build::{BuildError, build_detector, build_stream};
use crate::ui::types::choices::{DetectionParams, TaskChoice};

impl TryFrom<DetectionParams> for StreamDriver {
    type Error = BuildError;

    fn try_from(p: DetectionParams) -> Result<Self, Self::Error> {
        let scorer = build_detector(p.detector)?;
        let stream = build_stream(p.stream)?;
        let retention = usize::try_from(p.series_retention).map_err(|_| {
            BuildError::InvalidParameter("series_retention too large for usize".into())
        })?;
        if retention == 0 {
            return Err(BuildError::InvalidParameter(
                "series_retention must be > 0".into(),
            ));
        }

        let driver = StreamDriver::new(
            scorer,
            stream,
            p.max_observations,
            p.max_seconds,
            p.report_frequency,
        )?
        .with_pacing(Duration::from_millis(p.tick_delay_ms))
        .with_series_retention(retention);
        Ok(driver)
    }
}

pub fn build_task(choice: TaskChoice) -> Result<StreamDriver, BuildError> {
    match choice {
        TaskChoice::DetectAnomalies(p) => StreamDriver::try_from(p),
    }
}
