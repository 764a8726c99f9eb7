pub mod stubs;

pub use stubs::{RecordingHandle, RecordingSink, ScriptedDriver, VecStream};
