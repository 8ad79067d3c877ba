//! Bounded FIFO sample window with a contents-derived average
//!
//! The window is the unit of forecast calibration: one instance holds the
//! recent bias (or absolute-error) samples for a single weekday slot. The
//! reported average is always the arithmetic mean of the current contents,
//! never a separately tracked value.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Default number of samples retained per window (roughly one quarter of
/// weekly evaluations).
pub const DEFAULT_WINDOW_CAPACITY: usize = 12;

/// Decimal places the reported average is rounded to.
const AVERAGE_DECIMALS: i32 = 2;

/// Capacity-bounded FIFO sequence of samples.
///
/// Pushing beyond capacity evicts the single oldest sample; after a push
/// the length therefore never exceeds the capacity, and the contents are
/// exactly the last `capacity` values in insertion order.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    samples: VecDeque<f64>,
}

impl RollingWindow {
    /// Create an empty window with the given capacity.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(MathError::InvalidInput(
                "Window capacity must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        })
    }

    /// Create a window with the given capacity, pre-seeded with `samples`.
    ///
    /// Only the most recent `capacity` values are retained.
    pub fn from_samples(capacity: usize, samples: &[f64]) -> Result<Self> {
        let mut window = Self::new(capacity)?;
        for &value in samples {
            window.push(value);
        }
        Ok(window)
    }

    /// Append a sample, evicting the oldest one if the window is full.
    ///
    /// Returns the average of the resulting contents, rounded to two
    /// decimal places.
    pub fn push(&mut self, value: f64) -> f64 {
        self.samples.push_back(value);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        self.average()
    }

    /// Arithmetic mean of the current contents, rounded to two decimal
    /// places. An empty window averages to zero.
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mean = self.samples.iter().sum::<f64>() / self.samples.len() as f64;
        round_to(mean, AVERAGE_DECIMALS)
    }

    /// Current samples in insertion order (oldest first).
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
