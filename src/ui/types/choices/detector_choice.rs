use crate::detection::DispersionBasis;
use crate::ui::types::choices::UIChoice;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_alpha() -> f64 {
    0.2
}

fn default_window_size() -> usize {
    10
}

fn default_threshold_multiplier() -> f64 {
    2.2
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EmaBandParameters {
    #[serde(default = "default_alpha")]
    #[schemars(
        title = "EMA Alpha",
        description = "Trend smoothing factor strictly between 0 and 1; higher reacts faster",
        extend("exclusiveMinimum" = 0.0, "exclusiveMaximum" = 1.0)
    )]
    pub ema_alpha: f64,

    #[serde(default = "default_window_size")]
    #[schemars(
        title = "Window Size",
        description = "Observations kept for the dispersion estimate; also the warm-up length",
        range(min = 1)
    )]
    pub window_size: usize,

    #[serde(default = "default_threshold_multiplier")]
    #[schemars(
        title = "Threshold Multiplier",
        description = "Band half-width in standard deviations; higher flags fewer points",
        extend("exclusiveMinimum" = 0.0)
    )]
    pub threshold_multiplier: f64,

    #[serde(default)]
    #[schemars(
        title = "Dispersion Basis",
        description = "Compute the band from a window including the scored point, or the one before it"
    )]
    pub dispersion_basis: DispersionBasis,
}

impl Default for EmaBandParameters {
    fn default() -> Self {
        Self {
            ema_alpha: default_alpha(),
            window_size: default_window_size(),
            threshold_multiplier: default_threshold_multiplier(),
            dispersion_basis: DispersionBasis::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(DetectorKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum DetectorChoice {
    #[strum_discriminants(strum(
        message = "EMA Band",
        detailed_message = "EMA trend with a k-sigma band from a sliding window."
    ))]
    EmaBand(EmaBandParameters),
}

impl Default for DetectorChoice {
    fn default() -> Self {
        DetectorChoice::EmaBand(EmaBandParameters::default())
    }
}

impl UIChoice for DetectorChoice {
    type Kind = DetectorKind;

    fn schema() -> Schema {
        schema_for!(DetectorChoice)
    }

    fn prompt_label() -> &'static str {
        "Choose a detector:"
    }

    fn default_params(kind: Self::Kind) -> Value {
        match kind {
            DetectorKind::EmaBand => json!({
                "ema_alpha": default_alpha(),
                "window_size": default_window_size(),
                "threshold_multiplier": default_threshold_multiplier(),
                "dispersion_basis": DispersionBasis::default().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_params_fall_back_to_defaults() {
        let choice: DetectorChoice =
            serde_json::from_str(r#"{"type":"ema-band","params":{"window_size":5}}"#).unwrap();
        let DetectorChoice::EmaBand(p) = choice;
        assert_eq!(p.ema_alpha, 0.2);
        assert_eq!(p.window_size, 5);
        assert_eq!(p.threshold_multiplier, 2.2);
        assert_eq!(p.dispersion_basis, DispersionBasis::Inclusive);
    }

    #[test]
    fn basis_uses_kebab_case() {
        let choice: DetectorChoice = serde_json::from_str(
            r#"{"type":"ema-band","params":{"dispersion_basis":"trailing"}}"#,
        )
        .unwrap();
        let DetectorChoice::EmaBand(p) = choice;
        assert_eq!(p.dispersion_basis, DispersionBasis::Trailing);
    }

    #[test]
    fn default_params_round_trip_through_from_parts() {
        let params = DetectorChoice::default_params(DetectorKind::EmaBand);
        let DetectorChoice::EmaBand(p) =
            DetectorChoice::from_parts(DetectorKind::EmaBand, params).unwrap();
        assert_eq!(p.window_size, 10);
    }
}
