pub mod core;
pub mod detection;
pub mod output;
pub mod streams;
pub mod tasks;
pub mod ui;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
