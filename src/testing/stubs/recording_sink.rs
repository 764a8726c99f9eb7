use std::cell::RefCell;
use std::io::{Error, Result};
use std::rc::Rc;

use crate::core::DetectError;
use crate::detection::ScoreResult;
use crate::output::{DriverReport, ScoreSink};

#[derive(Default)]
struct Recorded {
    scores: Vec<(u64, ScoreResult)>,
    gaps: Vec<u64>,
    ended: Option<DriverReport>,
}

/// Sink that remembers everything it was handed; read it back through the
/// [`RecordingHandle`] after the driver took ownership of the sink.
pub struct RecordingSink {
    inner: Rc<RefCell<Recorded>>,
    fail_on: Vec<u64>,
}

#[derive(Clone)]
pub struct RecordingHandle(Rc<RefCell<Recorded>>);

impl RecordingSink {
    pub fn new() -> (Self, RecordingHandle) {
        Self::failing_on(Vec::new())
    }

    /// Records like [`new`](Self::new) but returns an error for the listed
    /// ticks (after recording them).
    pub fn failing_on(fail_on: Vec<u64>) -> (Self, RecordingHandle) {
        let inner = Rc::new(RefCell::new(Recorded::default()));
        (
            Self {
                inner: Rc::clone(&inner),
                fail_on,
            },
            RecordingHandle(inner),
        )
    }

    fn maybe_fail(&self, tick: u64) -> Result<()> {
        if self.fail_on.contains(&tick) {
            Err(Error::other(format!("refusing tick {tick}")))
        } else {
            Ok(())
        }
    }
}

impl ScoreSink for RecordingSink {
    fn on_score(&mut self, tick: u64, result: &ScoreResult) -> Result<()> {
        self.inner.borrow_mut().scores.push((tick, *result));
        self.maybe_fail(tick)
    }

    fn on_gap(&mut self, tick: u64, _reason: &DetectError) -> Result<()> {
        self.inner.borrow_mut().gaps.push(tick);
        self.maybe_fail(tick)
    }

    fn on_end(&mut self, report: &DriverReport) -> Result<()> {
        self.inner.borrow_mut().ended = Some(*report);
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

impl RecordingHandle {
    pub fn scores(&self) -> Vec<(u64, ScoreResult)> {
        self.0.borrow().scores.clone()
    }

    pub fn results(&self) -> Vec<ScoreResult> {
        self.0.borrow().scores.iter().map(|(_, r)| *r).collect()
    }

    pub fn gaps(&self) -> Vec<u64> {
        self.0.borrow().gaps.clone()
    }

    pub fn ended(&self) -> Option<DriverReport> {
        self.0.borrow().ended
    }
}
