use std::fmt::{Display, Formatter, Result};

use crate::core::error::{DetectError, DetectResult};

/// One pull from a producer.
///
/// Producers never decide whether a reading is usable; they hand over what
/// they got and the scorer rejects anything that is not a finite number.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    Value(f64),
    /// The producer explicitly had nothing for this tick.
    Missing,
    /// Raw text that could not be read as a number.
    Malformed(String),
}

impl Observation {
    /// Returns the finite value carried by this observation.
    pub fn numeric(&self) -> DetectResult<f64> {
        match self {
            Observation::Value(v) if v.is_finite() => Ok(*v),
            Observation::Value(v) => Err(DetectError::non_finite(*v)),
            Observation::Missing => Err(DetectError::InvalidInput(
                "producer signalled a missing value".into(),
            )),
            Observation::Malformed(raw) => Err(DetectError::InvalidInput(format!(
                "`{raw}` is not a number"
            ))),
        }
    }
}

impl From<f64> for Observation {
    fn from(value: f64) -> Self {
        Observation::Value(value)
    }
}

impl From<Option<f64>> for Observation {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Observation::Missing, Observation::Value)
    }
}

impl Display for Observation {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Observation::Value(v) => write!(f, "{v}"),
            Observation::Missing => write!(f, "<missing>"),
            Observation::Malformed(raw) => write!(f, "<malformed: {raw}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_values_pass_through() {
        assert_eq!(Observation::Value(-3.5).numeric(), Ok(-3.5));
        assert_eq!(Observation::from(0.0).numeric(), Ok(0.0));
    }

    #[test]
    fn non_numeric_observations_are_invalid_input() {
        for obs in [
            Observation::Missing,
            Observation::Malformed("abc".into()),
            Observation::Value(f64::NAN),
            Observation::Value(f64::INFINITY),
            Observation::Value(f64::NEG_INFINITY),
        ] {
            let err = obs.numeric().unwrap_err();
            assert!(err.is_invalid_input(), "{obs} should be rejected");
        }
    }

    #[test]
    fn none_maps_to_missing() {
        assert_eq!(Observation::from(None), Observation::Missing);
        assert_eq!(Observation::from(Some(1.5)), Observation::Value(1.5));
    }
}
