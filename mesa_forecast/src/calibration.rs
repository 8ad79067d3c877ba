//! Per-weekday calibration windows for forecast bias and MAE
//!
//! Two snapshots exist side by side, one for signed bias percentages and
//! one for absolute errors, both keyed by weekday slot. Each slot holds a
//! capacity-bounded FIFO of recent samples; the average reported for a
//! slot is always the mean of the retained samples. The serialized form
//! carries the average array only as a fallback for slots with no
//! samples — on parse, any slot with samples gets its average re-derived
//! from them, so a stale or tampered average can never drift away from
//! the data backing it.

use crate::calendar::WEEKDAYS;
use revenue_math::window::RollingWindow;
use serde_json::{json, Map, Value};
use tracing::warn;

/// Which calibration quantity a snapshot tracks. Selects the serialized
/// key of the average array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    /// Signed relative error percentage, (actual − predicted) / predicted × 100
    Bias,
    /// Absolute error in euros
    Mae,
}

impl WindowKind {
    fn avg_key(self) -> &'static str {
        match self {
            WindowKind::Bias => "avg",
            WindowKind::Mae => "avg_mae",
        }
    }
}

fn recent_key(slot: usize) -> String {
    format!("recent_{slot}")
}

/// Calibration state for one quantity across the seven weekday slots.
#[derive(Debug, Clone)]
pub struct CalibrationSnapshot {
    kind: WindowKind,
    averages: [f64; WEEKDAYS],
    recent: [Vec<f64>; WEEKDAYS],
}

impl CalibrationSnapshot {
    /// Empty state: zero averages, no samples.
    pub fn empty(kind: WindowKind) -> Self {
        Self {
            kind,
            averages: [0.0; WEEKDAYS],
            recent: Default::default(),
        }
    }

    /// Parse a persisted snapshot.
    ///
    /// An empty, absent or malformed document resets to the empty state
    /// rather than surfacing a parse error. Averages are re-derived from
    /// each slot's sample list whenever that list is non-empty; the
    /// stored average array only covers slots with no samples.
    pub fn parse(kind: WindowKind, serialized: Option<&str>) -> Self {
        let mut snapshot = Self::empty(kind);
        let Some(text) = serialized else {
            return snapshot;
        };
        if text.trim().is_empty() {
            return snapshot;
        }
        let root: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "malformed calibration snapshot, resetting to empty state");
                return snapshot;
            }
        };

        if let Some(stored) = root.get(kind.avg_key()).and_then(Value::as_array) {
            for (slot, value) in stored.iter().take(WEEKDAYS).enumerate() {
                if let Some(avg) = value.as_f64() {
                    snapshot.averages[slot] = avg;
                }
            }
        }
        for slot in 0..WEEKDAYS {
            if let Some(samples) = root.get(recent_key(slot)).and_then(Value::as_array) {
                snapshot.recent[slot] = samples.iter().filter_map(Value::as_f64).collect();
                if !snapshot.recent[slot].is_empty() {
                    snapshot.averages[slot] = mean_rounded(&snapshot.recent[slot]);
                }
            }
        }
        snapshot
    }

    /// Serialize to the compact keyed form: the average array under the
    /// kind's key plus one `recent_<slot>` list per weekday.
    pub fn serialize(&self) -> String {
        let mut root = Map::new();
        root.insert(self.kind.avg_key().to_string(), json!(self.averages));
        for slot in 0..WEEKDAYS {
            root.insert(recent_key(slot), json!(self.recent[slot]));
        }
        Value::Object(root).to_string()
    }

    /// Append a sample to a weekday's window, evicting the oldest sample
    /// once over `capacity`. Returns the slot's new average.
    pub fn update(&mut self, weekday: usize, sample: f64, capacity: usize) -> f64 {
        debug_assert!(weekday < WEEKDAYS);
        let mut window = RollingWindow::from_samples(capacity, &self.recent[weekday])
            .expect("capacity validated by settings");
        let average = window.push(sample);
        self.recent[weekday] = window.values();
        self.averages[weekday] = average;
        average
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    /// Per-weekday averages, Monday first.
    pub fn averages(&self) -> &[f64; WEEKDAYS] {
        &self.averages
    }

    pub fn average_for(&self, weekday: usize) -> f64 {
        self.averages[weekday]
    }

    /// Retained samples for a weekday, oldest first.
    pub fn samples_for(&self, weekday: usize) -> &[f64] {
        &self.recent[weekday]
    }
}

fn mean_rounded(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    (mean * 100.0).round() / 100.0
}
