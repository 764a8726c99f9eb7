use std::io::Result;

use crate::core::DetectError;
use crate::detection::ScoreResult;
use crate::output::DriverReport;

/// Consumer of per-tick detector output.
///
/// `tick` is the zero-based index of the pull that produced the result, so a
/// consumer can place skipped ticks as gaps in its series. An error returned
/// here fails only the current tick; the driver keeps going.
pub trait ScoreSink {
    fn on_score(&mut self, tick: u64, result: &ScoreResult) -> Result<()>;

    /// The observation pulled at `tick` was rejected.
    fn on_gap(&mut self, _tick: u64, _reason: &DetectError) -> Result<()> {
        Ok(())
    }

    /// The driver stopped; `report` holds the final counters.
    fn on_end(&mut self, _report: &DriverReport) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
