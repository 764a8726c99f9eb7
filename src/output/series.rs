use serde::Serialize;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Error, ErrorKind, Result, Write};
use std::path::Path;
use std::str::FromStr;

use crate::core::DetectError;
use crate::detection::ScoreResult;
use crate::output::ScoreSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesFormat {
    Csv,
    Tsv,
    Json,
}

impl FromStr for SeriesFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(SeriesFormat::Csv),
            "tsv" => Ok(SeriesFormat::Tsv),
            "json" => Ok(SeriesFormat::Json),
            other => Err(Error::new(
                ErrorKind::InvalidInput,
                format!("unknown series format `{other}`"),
            )),
        }
    }
}

/// One tick as plotted: a gap has no value and no trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub tick: u64,
    pub value: Option<f64>,
    pub trend: Option<f64>,
    pub upper_bound: Option<f64>,
    pub lower_bound: Option<f64>,
    pub is_anomaly: bool,
}

impl SeriesPoint {
    pub fn scored(tick: u64, r: &ScoreResult) -> Self {
        Self {
            tick,
            value: Some(r.value),
            trend: Some(r.trend),
            upper_bound: r.upper_bound(),
            lower_bound: r.lower_bound(),
            is_anomaly: r.is_anomaly,
        }
    }

    pub fn gap(tick: u64) -> Self {
        Self {
            tick,
            value: None,
            trend: None,
            upper_bound: None,
            lower_bound: None,
            is_anomaly: false,
        }
    }

    #[inline]
    pub fn is_gap(&self) -> bool {
        self.value.is_none()
    }
}

/// Recorded series for rendering and export.
///
/// Keeps at most `retention` most recent points when a limit is set, so an
/// unbounded stream does not grow it forever.
#[derive(Debug, Clone)]
pub struct ScoreSeries {
    points: VecDeque<SeriesPoint>,
    retention: Option<usize>,
}

impl ScoreSeries {
    pub fn with_retention(limit: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(limit.min(4096)),
            retention: Some(limit.max(1)),
        }
    }

    pub fn push(&mut self, point: SeriesPoint) {
        if let Some(limit) = self.retention {
            while self.points.len() >= limit {
                self.points.pop_front();
            }
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<SeriesPoint> {
        self.points.back().copied()
    }

    pub fn points(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter()
    }

    pub fn anomalies(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter().filter(|p| p.is_anomaly)
    }

    pub fn gaps(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter().filter(|p| p.is_gap())
    }

    pub fn export<P: AsRef<Path>>(&self, path: P, fmt: SeriesFormat) -> Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        match fmt {
            SeriesFormat::Csv => self.write_delimited(&mut w, ',')?,
            SeriesFormat::Tsv => self.write_delimited(&mut w, '\t')?,
            SeriesFormat::Json => self.write_json(&mut w)?,
        }
        w.flush()
    }

    fn write_delimited<W: Write>(&self, w: &mut W, delimiter: char) -> Result<()> {
        writeln!(
            w,
            "tick{d}value{d}trend{d}upper_bound{d}lower_bound{d}is_anomaly",
            d = delimiter
        )?;
        for p in &self.points {
            writeln!(
                w,
                "{}{d}{}{d}{}{d}{}{d}{}{d}{}",
                p.tick,
                cell(p.value),
                cell(p.trend),
                cell(p.upper_bound),
                cell(p.lower_bound),
                p.is_anomaly,
                d = delimiter
            )?;
        }
        Ok(())
    }

    fn write_json<W: Write>(&self, w: &mut W) -> Result<()> {
        writeln!(w, "[")?;
        for (i, p) in self.points.iter().enumerate() {
            let row = serde_json::to_string(p)?;
            let sep = if i + 1 == self.points.len() { "" } else { "," };
            writeln!(w, "  {row}{sep}")?;
        }
        writeln!(w, "]")?;
        Ok(())
    }
}

fn cell(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.6}")).unwrap_or_default()
}

impl Default for ScoreSeries {
    fn default() -> Self {
        Self {
            points: VecDeque::new(),
            retention: None,
        }
    }
}

impl ScoreSink for ScoreSeries {
    fn on_score(&mut self, tick: u64, result: &ScoreResult) -> Result<()> {
        self.push(SeriesPoint::scored(tick, result));
        Ok(())
    }

    fn on_gap(&mut self, tick: u64, _reason: &DetectError) -> Result<()> {
        self.push(SeriesPoint::gap(tick));
        Ok(())
    }

    fn name(&self) -> &str {
        "series"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::AnomalyScorer;
    use std::fs;
    use tempfile::NamedTempFile;

    fn sample_series() -> ScoreSeries {
        let mut scorer = AnomalyScorer::new(0.5, 2, 1.0).unwrap();
        let mut series = ScoreSeries::default();
        series.on_score(0, &scorer.score(2.0).unwrap()).unwrap();
        series
            .on_gap(1, &DetectError::InvalidInput("missing".into()))
            .unwrap();
        // trend 3, window [2, 4], sigma 1, band [2, 4]
        series.on_score(2, &scorer.score(4.0).unwrap()).unwrap();
        series
    }

    #[test]
    fn default_is_empty_and_latest_none() {
        let s = ScoreSeries::default();
        assert_eq!(s.len(), 0);
        assert!(s.latest().is_none());
    }

    #[test]
    fn records_scores_and_gaps_in_order() {
        let s = sample_series();
        assert_eq!(s.len(), 3);
        let ticks: Vec<u64> = s.points().map(|p| p.tick).collect();
        assert_eq!(ticks, vec![0, 1, 2]);
        assert_eq!(s.gaps().count(), 1);
        assert_eq!(s.anomalies().count(), 0);
        let last = s.latest().unwrap();
        assert_eq!(last.upper_bound, Some(4.0));
        assert_eq!(last.lower_bound, Some(2.0));
    }

    #[test]
    fn retention_drops_oldest() {
        let mut s = ScoreSeries::with_retention(3);
        for t in 0..10 {
            s.push(SeriesPoint::gap(t));
        }
        assert_eq!(s.len(), 3);
        let ticks: Vec<u64> = s.points().map(|p| p.tick).collect();
        assert_eq!(ticks, vec![7, 8, 9]);
    }

    #[test]
    fn export_csv() {
        let s = sample_series();
        let tf = NamedTempFile::new().unwrap();
        s.export(tf.path(), SeriesFormat::Csv).unwrap();

        let got = fs::read_to_string(tf.path()).unwrap();
        let exp = "\
tick,value,trend,upper_bound,lower_bound,is_anomaly
0,2.000000,2.000000,,,false
1,,,,,false
2,4.000000,3.000000,4.000000,2.000000,false
";
        assert_eq!(got, exp);
    }

    #[test]
    fn export_tsv() {
        let s = sample_series();
        let tf = NamedTempFile::new().unwrap();
        s.export(tf.path(), SeriesFormat::Tsv).unwrap();

        let got = fs::read_to_string(tf.path()).unwrap();
        let exp = "\
tick\tvalue\ttrend\tupper_bound\tlower_bound\tis_anomaly
0\t2.000000\t2.000000\t\t\tfalse
1\t\t\t\t\tfalse
2\t4.000000\t3.000000\t4.000000\t2.000000\tfalse
";
        assert_eq!(got, exp);
    }

    #[test]
    fn export_json() {
        let s = sample_series();
        let tf = NamedTempFile::new().unwrap();
        s.export(tf.path(), SeriesFormat::Json).unwrap();

        let got = fs::read_to_string(tf.path()).unwrap();
        let exp = "\
[
  {\"tick\":0,\"value\":2.0,\"trend\":2.0,\"upper_bound\":null,\"lower_bound\":null,\"is_anomaly\":false},
  {\"tick\":1,\"value\":null,\"trend\":null,\"upper_bound\":null,\"lower_bound\":null,\"is_anomaly\":false},
  {\"tick\":2,\"value\":4.0,\"trend\":3.0,\"upper_bound\":4.0,\"lower_bound\":2.0,\"is_anomaly\":false}
]
";
        assert_eq!(got, exp);
    }

    #[test]
    fn export_empty() {
        let s = ScoreSeries::default();
        let tf = NamedTempFile::new().unwrap();
        s.export(tf.path(), SeriesFormat::Csv).unwrap();
        assert_eq!(
            fs::read_to_string(tf.path()).unwrap(),
            "tick,value,trend,upper_bound,lower_bound,is_anomaly\n"
        );

        s.export(tf.path(), SeriesFormat::Json).unwrap();
        assert_eq!(fs::read_to_string(tf.path()).unwrap(), "[\n]\n");
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("CSV".parse::<SeriesFormat>().unwrap(), SeriesFormat::Csv);
        assert_eq!("json".parse::<SeriesFormat>().unwrap(), SeriesFormat::Json);
        assert_eq!(
            "xml".parse::<SeriesFormat>().unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }
}
