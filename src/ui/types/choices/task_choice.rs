use crate::tasks::StreamDriver;
use crate::ui::cli::drivers::PromptDriver;
use crate::ui::cli::wizard::prompt_choice;
use crate::ui::types::choices::{DetectorChoice, StreamChoice, UIChoice};
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_tick_delay_ms() -> u64 {
    50
}

fn default_report_frequency() -> u64 {
    100
}

fn default_series_retention() -> u64 {
    StreamDriver::DEFAULT_SERIES_RETENTION as u64
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DetectionParams {
    #[serde(default)]
    #[schemars(skip)]
    pub detector: DetectorChoice,
    #[schemars(skip)]
    pub stream: StreamChoice,

    #[serde(default)]
    #[schemars(
        title = "Max Observations",
        description = "Stop after this many ticks (None = until the stream ends)"
    )]
    pub max_observations: Option<u64>,

    #[serde(default)]
    #[schemars(
        title = "Max Seconds",
        description = "Stop after this many seconds (None = unlimited)"
    )]
    pub max_seconds: Option<u64>,

    #[serde(default = "default_tick_delay_ms")]
    #[schemars(
        title = "Tick Delay (ms)",
        description = "Pause between observations to mimic live arrival; 0 = as fast as possible"
    )]
    pub tick_delay_ms: u64,

    #[serde(default = "default_report_frequency")]
    #[schemars(
        title = "Report Frequency",
        description = "Emit a progress report every N ticks",
        range(min = 1)
    )]
    pub report_frequency: u64,

    #[serde(default = "default_series_retention")]
    #[schemars(
        title = "Series Retention",
        description = "Most recent points kept for rendering and export",
        range(min = 1)
    )]
    pub series_retention: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(TaskKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum TaskChoice {
    #[strum_discriminants(strum(
        message = "Detect Anomalies",
        detailed_message = "Score a stream live and flag points outside the dynamic band."
    ))]
    DetectAnomalies(DetectionParams),
}

impl UIChoice for TaskChoice {
    type Kind = TaskKind;

    fn schema() -> Schema {
        schema_for!(TaskChoice)
    }

    fn prompt_label() -> &'static str {
        "Choose a task:"
    }
    fn default_params(kind: Self::Kind) -> Value {
        match kind {
            TaskKind::DetectAnomalies => json!({
                "max_observations": null,
                "max_seconds": null,
                "tick_delay_ms": default_tick_delay_ms(),
                "report_frequency": default_report_frequency(),
                "series_retention": default_series_retention(),
            }),
        }
    }

    fn subprompts<D: PromptDriver>(
        driver: &D,
        kind: Self::Kind,
    ) -> anyhow::Result<Option<Map<String, Value>>> {
        match kind {
            TaskKind::DetectAnomalies => {
                let detector = prompt_choice::<DetectorChoice, _>(driver)?;
                let stream = prompt_choice::<StreamChoice, _>(driver)?;

                let mut m = Map::new();
                m.insert("detector".into(), serde_json::to_value(detector)?);
                m.insert("stream".into(), serde_json::to_value(stream)?);
                Ok(Some(m))
            }
        }
    }

    fn from_parts(kind: Self::Kind, params: Value) -> anyhow::Result<Self> {
        match kind {
            TaskKind::DetectAnomalies => {
                let p: DetectionParams = serde_json::from_value(params)?;
                Ok(TaskChoice::DetectAnomalies(p))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_file_parses() {
        let task: TaskChoice = serde_json::from_str(
            r#"{
                "type": "detect-anomalies",
                "params": {
                    "stream": { "type": "seasonal-generator", "params": { "seed": 7 } }
                }
            }"#,
        )
        .unwrap();
        let TaskChoice::DetectAnomalies(p) = task;
        assert_eq!(p.tick_delay_ms, 50);
        assert_eq!(p.report_frequency, 100);
        assert!(matches!(p.detector, DetectorChoice::EmaBand(_)));
        assert!(matches!(p.stream, StreamChoice::SeasonalGenerator(ref s) if s.seed == 7));
    }

    #[test]
    fn stream_is_required() {
        let err = serde_json::from_str::<TaskChoice>(r#"{"type":"detect-anomalies","params":{}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("stream"), "{err}");
    }
}
