mod seasonal;

pub use seasonal::SeasonalGenerator;
