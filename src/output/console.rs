use std::io::{Result, Stdout, Write, stdout};

use crate::core::DetectError;
use crate::detection::ScoreResult;
use crate::output::{DriverReport, ScoreSink};

const DIM: &str = "\x1b[2m";
const BOLD_RED: &str = "\x1b[1m\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Live terminal view: one line per tick.
pub struct ConsoleRenderer<W: Write> {
    out: W,
    color: bool,
    anomalies_only: bool,
}

impl ConsoleRenderer<Stdout> {
    pub fn stdout() -> Self {
        Self::new(stdout(), true)
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            anomalies_only: false,
        }
    }

    /// Only print flagged ticks and gaps.
    pub fn anomalies_only(mut self, yes: bool) -> Self {
        self.anomalies_only = yes;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, style: &str, text: String) -> String {
        if self.color {
            format!("{style}{text}{RESET}")
        } else {
            text
        }
    }
}

impl<W: Write> ScoreSink for ConsoleRenderer<W> {
    fn on_score(&mut self, tick: u64, result: &ScoreResult) -> Result<()> {
        if self.anomalies_only && !result.is_anomaly {
            return Ok(());
        }
        let head = format!(
            "#{tick:>6}  value={:>12.4}  trend={:>12.4}",
            result.value, result.trend
        );
        let line = match result.band {
            None => format!("{head}  {}", self.paint(DIM, "(warming up)".into())),
            Some(b) if result.is_anomaly => {
                let z = result
                    .z_score()
                    .map(|z| format!(" z={z:+.2}"))
                    .unwrap_or_default();
                format!(
                    "{head}  band=[{:>10.4}, {:>10.4}]  {}",
                    b.lower,
                    b.upper,
                    self.paint(BOLD_RED, format!("ANOMALY{z}"))
                )
            }
            Some(b) => format!("{head}  band=[{:>10.4}, {:>10.4}]", b.lower, b.upper),
        };
        writeln!(self.out, "{line}")
    }

    fn on_gap(&mut self, tick: u64, reason: &DetectError) -> Result<()> {
        let text = self.paint(DIM, format!("gap ({reason})"));
        writeln!(self.out, "#{tick:>6}  {text}")
    }

    fn on_end(&mut self, report: &DriverReport) -> Result<()> {
        writeln!(self.out, "stream ended: {report}")?;
        self.out.flush()
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::AnomalyScorer;
    use chrono::Local;

    fn render(color: bool, anomalies_only: bool) -> String {
        let mut scorer = AnomalyScorer::new(0.5, 2, 1.0).unwrap();
        let mut sink = ConsoleRenderer::new(Vec::new(), color).anomalies_only(anomalies_only);
        sink.on_score(0, &scorer.score(2.0).unwrap()).unwrap();
        sink.on_gap(1, &DetectError::InvalidInput("producer signalled a missing value".into()))
            .unwrap();
        sink.on_score(2, &scorer.score(4.0).unwrap()).unwrap();
        sink.on_score(3, &scorer.score(3.0).unwrap()).unwrap();
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn plain_lines_per_tick() {
        let got = render(false, false);
        let lines: Vec<&str> = got.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "#     0  value=      2.0000  trend=      2.0000  (warming up)"
        );
        assert_eq!(
            lines[1],
            "#     1  gap (invalid input: producer signalled a missing value)"
        );
        assert_eq!(
            lines[2],
            "#     2  value=      4.0000  trend=      3.0000  band=[    2.0000,     4.0000]"
        );
        assert!(!got.contains("ANOMALY"));
        assert!(!got.contains('\x1b'));
    }

    #[test]
    fn anomaly_is_highlighted() {
        let mut scorer = AnomalyScorer::new(0.5, 2, 0.5).unwrap();
        scorer.score(0.0).unwrap();
        let r = scorer.score(10.0).unwrap();
        assert!(r.is_anomaly);

        let mut sink = ConsoleRenderer::new(Vec::new(), true);
        sink.on_score(7, &r).unwrap();
        let got = String::from_utf8(sink.into_inner()).unwrap();
        assert!(got.contains("\x1b[1m\x1b[31mANOMALY z=+1.00"), "{got}");
    }

    #[test]
    fn anomalies_only_keeps_gaps() {
        let got = render(false, true);
        assert_eq!(got.lines().count(), 1);
        assert!(got.starts_with("#     1  gap"));
    }

    #[test]
    fn end_prints_report() {
        let mut sink = ConsoleRenderer::new(Vec::new(), false);
        let report = DriverReport::new(Local::now());
        sink.on_end(&report).unwrap();
        let got = String::from_utf8(sink.into_inner()).unwrap();
        assert!(got.starts_with("stream ended: ticks=0, scored=0"));
    }
}
