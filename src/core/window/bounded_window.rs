use crate::core::error::{DetectError, DetectResult};

/// Fixed-capacity FIFO of the most recent observations.
///
/// Storage is allocated once at construction and used as a ring: `head`
/// points at the oldest element and pushes past capacity overwrite it.
#[derive(Debug, Clone)]
pub struct BoundedWindow {
    slots: Box<[f64]>,
    head: usize,
    len: usize,
}

impl BoundedWindow {
    pub fn new(capacity: usize) -> DetectResult<Self> {
        if capacity == 0 {
            return Err(DetectError::parameter(
                "window_size",
                "must be a positive integer",
            ));
        }
        Ok(Self {
            slots: vec![0.0; capacity].into_boxed_slice(),
            head: 0,
            len: 0,
        })
    }

    /// Appends `x`, evicting the oldest element once the window is full.
    pub fn push(&mut self, x: f64) {
        let cap = self.capacity();
        if self.len < cap {
            self.slots[(self.head + self.len) % cap] = x;
            self.len += 1;
        } else {
            self.slots[self.head] = x;
            self.head = (self.head + 1) % cap;
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Elements from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let cap = self.capacity();
        (0..self.len).map(move |i| self.slots[(self.head + i) % cap])
    }

    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.iter().sum::<f64>() / self.len as f64)
    }

    /// Population standard deviation of the contents.
    ///
    /// `None` until the window is full: a partial window is not a dispersion
    /// estimate the scorer is allowed to use.
    pub fn dispersion(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        let mean = self.mean()?;
        let sum_sq: f64 = self.iter().map(|x| (x - mean) * (x - mean)).sum();
        Some((sum_sq / self.len as f64).sqrt())
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}
