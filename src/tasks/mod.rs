mod stream_driver;

pub use stream_driver::{StreamDriver, TickFailure, TickOutcome};
