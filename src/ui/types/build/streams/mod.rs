use crate::streams::{ObservationStream, SeasonalGenerator, TextFileStream};
use crate::ui::types::build::BuildError;
use crate::ui::types::choices::StreamChoice;

mod seasonal;
mod text_file;

pub fn build_stream(choice: StreamChoice) -> Result<Box<dyn ObservationStream>, BuildError> {
    match choice {
        StreamChoice::SeasonalGenerator(p) => {
            let s = SeasonalGenerator::try_from(p)?;
            Ok(Box::new(s))
        }
        StreamChoice::TextFile(p) => {
            let s = TextFileStream::try_from(p)?;
            Ok(Box::new(s))
        }
    }
}
