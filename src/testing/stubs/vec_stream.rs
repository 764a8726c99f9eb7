use crate::core::Observation;
use crate::streams::ObservationStream;
use std::io::Error;

pub struct VecStream {
    pub observations: Vec<Observation>,
    idx: usize,
}

impl VecStream {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self {
            observations,
            idx: 0,
        }
    }

    pub fn from_values(values: &[f64]) -> Self {
        Self::new(values.iter().copied().map(Observation::Value).collect())
    }
}

impl ObservationStream for VecStream {
    fn has_more_observations(&self) -> bool {
        self.idx < self.observations.len()
    }

    fn next_observation(&mut self) -> Option<Observation> {
        let obs = self.observations.get(self.idx).cloned()?;
        self.idx += 1;
        Some(obs)
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.idx = 0;
        Ok(())
    }

    fn name(&self) -> &str {
        "vec"
    }
}
