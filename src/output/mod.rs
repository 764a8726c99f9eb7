mod console;
mod report;
mod series;
mod sink;

pub use console::ConsoleRenderer;
pub use report::DriverReport;
pub use series::{ScoreSeries, SeriesFormat, SeriesPoint};
pub use sink::ScoreSink;
