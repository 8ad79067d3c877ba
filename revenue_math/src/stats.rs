//! Descriptive statistics over revenue samples

/// Arithmetic mean of a slice. Empty input yields zero, matching the
/// "no data yet" policy of the forecasting engine.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation. Zero for fewer than two samples.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg) * (v - avg)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Median of integer counts (staff headcounts). Empty input yields the
/// provided default; even-length inputs take the mean of the middle pair.
pub fn median_count(values: &mut [u32], default: u32) -> u32 {
    if values.is_empty() {
        return default;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2
    }
}

/// Round to two decimal places, the display precision used throughout the
/// engine for monetary values.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
