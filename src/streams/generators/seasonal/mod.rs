mod seasonal_generator;

pub use seasonal_generator::SeasonalGenerator;
