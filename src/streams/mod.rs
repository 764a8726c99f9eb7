pub mod file;
pub mod generators;
mod stream;

pub use file::TextFileStream;
pub use generators::SeasonalGenerator;
pub use stream::ObservationStream;
