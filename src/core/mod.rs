pub mod error;
pub mod observation;
pub mod trend;
pub mod window;

pub use error::{DetectError, DetectResult};
pub use observation::Observation;
pub use trend::EmaEstimator;
pub use window::BoundedWindow;
