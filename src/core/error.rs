use thiserror::Error;

/// Failures raised by the scoring core.
///
/// `InvalidParameter` only ever comes out of constructors; `InvalidInput`
/// comes out of a single scoring call and leaves the detector untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl DetectError {
    pub(crate) fn parameter<R: Into<String>>(name: &'static str, reason: R) -> Self {
        DetectError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn non_finite(value: f64) -> Self {
        DetectError::InvalidInput(format!("{value} is not a finite number"))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, DetectError::InvalidInput(_))
    }
}

pub type DetectResult<T> = Result<T, DetectError>;
