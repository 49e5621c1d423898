//! Descriptive statistics over a sequence of samples.
//!
//! Percentiles use the nearest-rank rule: sort ascending and take the value
//! at index `floor(n * p / 100)`, clamped to the last element. No
//! interpolation.

/// Summary figures for one finalized sequence of samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Nearest-rank percentile of `values`. Returns 0 for an empty slice.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted(values);
    percentile_of_sorted(&sorted, p)
}

/// Compute [`Stats`] for `values`, or `None` when there are no samples.
pub fn stats(values: &[f64]) -> Option<Stats> {
    if values.is_empty() {
        return None;
    }

    let sorted = sorted(values);
    let n = sorted.len();
    let sum: f64 = sorted.iter().sum();

    Some(Stats {
        count: n,
        min: sorted[0],
        max: sorted[n - 1],
        avg: sum / n as f64,
        median: median_of_sorted(&sorted),
        p90: percentile_of_sorted(&sorted, 90.0),
        p95: percentile_of_sorted(&sorted, 95.0),
        p99: percentile_of_sorted(&sorted, 99.0),
    })
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    let index = (n as f64 * p / 100.0).floor() as usize;
    sorted[index.min(n - 1)]
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}
