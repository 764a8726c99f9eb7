use chrono::Local;
use log::{debug, error, info, warn};
use std::io;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::core::error::{DetectError, DetectResult};
use crate::detection::{AnomalyScorer, ScoreResult};
use crate::output::{DriverReport, ScoreSeries, ScoreSink};
use crate::streams::ObservationStream;

/// A tick that went wrong for a reason other than its observation.
#[derive(Debug, Error)]
pub enum TickFailure {
    #[error("sink `{sink}` failed on tick {tick}: {source}")]
    Sink {
        sink: String,
        tick: u64,
        #[source]
        source: io::Error,
    },
}

/// What a single pull from the producer amounted to.
#[derive(Debug)]
pub enum TickOutcome {
    Scored(ScoreResult),
    /// The observation was not numeric; the tick is a gap.
    Skipped(DetectError),
    /// Detector state is intact; only delivery of this tick failed.
    Failed(TickFailure),
    /// The producer is exhausted.
    Ended,
}

/// Pulls observations one at a time, scores them and hands the results to
/// the consumers.
///
/// A bad observation or a failing consumer costs one tick, never the loop.
pub struct StreamDriver {
    scorer: AnomalyScorer,
    stream: Box<dyn ObservationStream>,
    sinks: Vec<Box<dyn ScoreSink>>,
    series: ScoreSeries,

    max_observations: Option<u64>,
    max_seconds: Option<u64>,
    report_frequency: u64,
    pacing: Duration,

    report: DriverReport,
    last_reported: Option<u64>,
    start_time: Instant,
    ended: bool,

    progress_tx: Option<Sender<DriverReport>>,
}

impl StreamDriver {
    /// Points the owned series keeps unless [`with_series_retention`] says
    /// otherwise.
    ///
    /// [`with_series_retention`]: StreamDriver::with_series_retention
    pub const DEFAULT_SERIES_RETENTION: usize = 10_000;

    pub fn new(
        scorer: AnomalyScorer,
        stream: Box<dyn ObservationStream>,
        max_observations: Option<u64>,
        max_seconds: Option<u64>,
        report_frequency: u64,
    ) -> DetectResult<Self> {
        if report_frequency == 0 {
            return Err(DetectError::parameter("report_frequency", "must be > 0"));
        }

        Ok(Self {
            scorer,
            stream,
            sinks: Vec::new(),
            series: ScoreSeries::with_retention(Self::DEFAULT_SERIES_RETENTION),
            max_observations,
            max_seconds,
            report_frequency,
            pacing: Duration::ZERO,
            report: DriverReport::new(Local::now()),
            last_reported: None,
            start_time: Instant::now(),
            ended: false,
            progress_tx: None,
        })
    }
}

impl StreamDriver {
    pub fn with_sink(mut self, sink: Box<dyn ScoreSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Sleep between ticks to mimic real-time arrival. Zero disables it.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_progress(mut self, tx: Sender<DriverReport>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn with_series_retention(mut self, limit: usize) -> Self {
        self.series = ScoreSeries::with_retention(limit);
        self
    }

    /// Processes exactly one pull from the producer.
    pub fn tick(&mut self) -> TickOutcome {
        if self.ended {
            return TickOutcome::Ended;
        }
        let Some(observation) = self.stream.next_observation() else {
            self.ended = true;
            info!("stream `{}` has ended", self.stream.name());
            return TickOutcome::Ended;
        };

        let tick = self.report.ticks;
        self.report.ticks += 1;

        match self.scorer.score_observation(&observation) {
            Err(reason) => {
                self.report.skipped += 1;
                warn!("tick {tick}: skipping {observation}: {reason}");
                let _ = self.series.on_gap(tick, &reason);
                match self.dispatch(tick, |sink| sink.on_gap(tick, &reason)) {
                    Some(failure) => TickOutcome::Failed(failure),
                    None => TickOutcome::Skipped(reason),
                }
            }
            Ok(result) => {
                self.report.scored += 1;
                if result.is_anomaly {
                    self.report.anomalies += 1;
                    debug!("tick {tick}: anomaly {result}");
                } else {
                    debug!("tick {tick}: {result}");
                }
                let _ = self.series.on_score(tick, &result);
                match self.dispatch(tick, |sink| sink.on_score(tick, &result)) {
                    Some(failure) => TickOutcome::Failed(failure),
                    None => TickOutcome::Scored(result),
                }
            }
        }
    }

    /// Drives the stream until it ends or a run limit is hit, then returns
    /// the final report. Counters carry over from ticks taken before the run.
    pub fn run(&mut self) -> DriverReport {
        self.start_time = Instant::now();
        info!(
            "driving `{}` with {:?}",
            self.stream.name(),
            self.scorer.config()
        );

        loop {
            if let Some(n) = self.max_observations {
                if self.report.ticks >= n {
                    info!("reached max_observations={n}");
                    break;
                }
            }
            if let Some(s) = self.max_seconds {
                if self.start_time.elapsed().as_secs() >= s {
                    info!("reached max_seconds={s}");
                    break;
                }
            }

            if let TickOutcome::Ended = self.tick() {
                break;
            }

            if self.report.ticks % self.report_frequency == 0 {
                self.push_report();
            }
            if !self.pacing.is_zero() {
                thread::sleep(self.pacing);
            }
        }

        if self.last_reported != Some(self.report.ticks) {
            self.push_report();
        }
        let report = self.report;
        for sink in self.sinks.iter_mut() {
            if let Err(e) = sink.on_end(&report) {
                error!("sink `{}` failed to finish: {e}", sink.name());
            }
        }
        info!("run finished: {report}");
        report
    }

    pub fn series(&self) -> &ScoreSeries {
        &self.series
    }

    pub fn report(&self) -> DriverReport {
        self.report
    }

    pub fn scorer(&self) -> &AnomalyScorer {
        &self.scorer
    }

    fn dispatch<F>(&mut self, tick: u64, mut deliver: F) -> Option<TickFailure>
    where
        F: FnMut(&mut dyn ScoreSink) -> io::Result<()>,
    {
        let mut failure = None;
        for sink in self.sinks.iter_mut() {
            if let Err(source) = deliver(sink.as_mut()) {
                let err = TickFailure::Sink {
                    sink: sink.name().to_string(),
                    tick,
                    source,
                };
                error!("{err}");
                failure.get_or_insert(err);
            }
        }
        if failure.is_some() {
            self.report.failed += 1;
        }
        failure
    }

    fn push_report(&mut self) {
        self.report.seconds = self.start_time.elapsed().as_secs_f64();
        self.last_reported = Some(self.report.ticks);
        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(self.report);
        }
    }
}
