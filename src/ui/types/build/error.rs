use crate::core::DetectError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Detect(#[from] DetectError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
