use crate::ui::types::choices::UIChoice;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::PathBuf;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

const DEFAULT_SEED: u64 = 42;
fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_period() -> f64 {
    100.0
}

fn default_amplitude() -> f64 {
    10.0
}

fn default_noise_std() -> f64 {
    2.0
}

fn default_anomaly_probability() -> f64 {
    0.5
}

fn default_min_factor() -> f64 {
    2.0
}

fn default_max_factor() -> f64 {
    4.0
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SeasonalParameters {
    #[serde(default = "default_period")]
    #[schemars(
        title = "Period",
        description = "Steps per full seasonal cycle",
        range(min = 0.0)
    )]
    pub period: f64,

    #[serde(default = "default_amplitude")]
    #[schemars(title = "Amplitude", description = "Peak of the seasonal component")]
    pub amplitude: f64,

    #[serde(default = "default_noise_std")]
    #[schemars(
        title = "Noise Std",
        description = "Standard deviation of the gaussian noise",
        range(min = 0.0)
    )]
    pub noise_std: f64,

    #[serde(default = "default_anomaly_probability")]
    #[schemars(
        title = "Anomaly Probability",
        description = "Chance (0.0–1.0) that a step is scaled into a spike",
        range(min = 0.0, max = 1.0)
    )]
    pub anomaly_probability: f64,

    #[serde(default = "default_min_factor")]
    #[schemars(title = "Min Spike Factor", description = "Smallest spike multiplier")]
    pub min_factor: f64,

    #[serde(default = "default_max_factor")]
    #[schemars(title = "Max Spike Factor", description = "Largest spike multiplier")]
    pub max_factor: f64,

    #[serde(default)]
    #[schemars(
        title = "Gap Probability",
        description = "Chance (0.0–1.0) that a step yields no value",
        range(min = 0.0, max = 1.0)
    )]
    pub gap_probability: f64,

    #[serde(default)]
    #[schemars(
        title = "Max Observations",
        description = "Upper bound on observations; empty = infinite"
    )]
    pub max_observations: Option<u64>,

    #[serde(default = "default_seed")]
    #[schemars(title = "Seed", description = "PRNG seed")]
    pub seed: u64,
}

impl Default for SeasonalParameters {
    fn default() -> Self {
        Self {
            period: default_period(),
            amplitude: default_amplitude(),
            noise_std: default_noise_std(),
            anomaly_probability: default_anomaly_probability(),
            min_factor: default_min_factor(),
            max_factor: default_max_factor(),
            gap_probability: 0.0,
            max_observations: None,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
pub struct TextFileParameters {
    #[schemars(
        with = "String",
        title = "File Path",
        description = "Text file with one observation per line, or a delimited file",
        extend(
            "format" = "path",
            "x-file" = true,
            "x-must-exist" = true,
            "x-extensions" = ["txt", "csv", "tsv", "dat"]
        )
    )]
    pub path: PathBuf,

    #[serde(default)]
    #[schemars(
        title = "Delimiter",
        description = "Single column separator; empty = whole line is the value"
    )]
    pub delimiter: Option<String>,

    #[serde(default)]
    #[schemars(
        title = "Column",
        description = "Zero-based column holding the value",
        range(min = 0)
    )]
    pub column: usize,

    #[serde(default)]
    #[schemars(title = "Skip Header", description = "Ignore the first line?")]
    pub skip_header: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(StreamKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum StreamChoice {
    #[strum_discriminants(strum(
        message = "Seasonal Generator",
        detailed_message = "Sine wave with gaussian noise, injected spikes and optional gaps."
    ))]
    SeasonalGenerator(SeasonalParameters),

    #[strum_discriminants(strum(
        message = "Text File Stream",
        detailed_message = "Observations read line by line from a text or CSV file."
    ))]
    TextFile(TextFileParameters),
}

impl UIChoice for StreamChoice {
    type Kind = StreamKind;

    fn schema() -> Schema {
        schema_for!(StreamChoice)
    }

    fn prompt_label() -> &'static str {
        "Choose a stream:"
    }

    fn default_params(kind: Self::Kind) -> Value {
        match kind {
            StreamKind::SeasonalGenerator => json!({
                "period": default_period(),
                "amplitude": default_amplitude(),
                "noise_std": default_noise_std(),
                "anomaly_probability": default_anomaly_probability(),
                "min_factor": default_min_factor(),
                "max_factor": default_max_factor(),
                "gap_probability": 0.0,
                "max_observations": null,
                "seed": DEFAULT_SEED,
            }),
            StreamKind::TextFile => json!({
                "path": "",
                "delimiter": null,
                "column": 0,
                "skip_header": false,
            }),
        }
    }
}
