mod detector;
mod error;
mod streams;
mod tasks;

pub use detector::build_detector;
pub use error::BuildError;
pub use streams::build_stream;
pub use tasks::build_task;
