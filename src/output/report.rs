use chrono::{DateTime, Local};
use std::fmt::{Display, Formatter, Result};

/// Running counters of a [`StreamDriver`](crate::tasks::StreamDriver).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DriverReport {
    pub started_at: DateTime<Local>,
    /// Ticks that pulled something from the producer (end-of-stream excluded).
    pub ticks: u64,
    pub scored: u64,
    pub skipped: u64,
    pub failed: u64,
    pub anomalies: u64,
    pub seconds: f64,
}

impl DriverReport {
    pub fn new(started_at: DateTime<Local>) -> Self {
        Self {
            started_at,
            ticks: 0,
            scored: 0,
            skipped: 0,
            failed: 0,
            anomalies: 0,
            seconds: 0.0,
        }
    }

    /// Share of scored observations that were flagged; NaN before any score.
    pub fn anomaly_rate(&self) -> f64 {
        if self.scored == 0 {
            f64::NAN
        } else {
            self.anomalies as f64 / self.scored as f64
        }
    }
}

impl Display for DriverReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "ticks={}, scored={}, skipped={}, failed={}, anomalies={} ({:.2}%), t={:.3}s",
            self.ticks,
            self.scored,
            self.skipped,
            self.failed,
            self.anomalies,
            self.anomaly_rate() * 100.0,
            self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_rate() {
        let mut r = DriverReport::new(Local::now());
        assert!(r.anomaly_rate().is_nan());
        r.ticks = 12;
        r.scored = 10;
        r.skipped = 2;
        r.anomalies = 1;
        r.seconds = 1.5;
        assert_eq!(r.anomaly_rate(), 0.1);
        assert_eq!(
            r.to_string(),
            "ticks=12, scored=10, skipped=2, failed=0, anomalies=1 (10.00%), t=1.500s"
        );
    }
}
