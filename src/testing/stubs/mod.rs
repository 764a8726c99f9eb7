pub mod recording_sink;
pub mod scripted_driver;
pub mod vec_stream;

pub use recording_sink::{RecordingHandle, RecordingSink};
pub use scripted_driver::ScriptedDriver;
pub use vec_stream::VecStream;
