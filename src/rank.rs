use std::cmp::Ordering;

use itertools::Itertools;
use serde::Serialize;

/// The percentile grid reported for the field scoring distribution.
pub const FIELD_PERCENTILES: [f64; 5] = [0.10, 0.25, 0.50, 0.75, 0.90];

fn total_cmp(a: &f64, b: &f64) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Top-n items by `key`, largest first. Items whose key is absent are
/// skipped, and ties keep the input's insertion order so repeated runs over
/// the same snapshot are reproducible.
pub fn nlargest<T, F>(items: &[T], n: usize, key: F) -> Vec<&T>
where
    F: Fn(&T) -> Option<f64>,
{
    items
        .iter()
        .filter_map(|item| key(item).map(|k| (k, item)))
        .sorted_by(|a, b| total_cmp(&b.0, &a.0))
        .take(n)
        .map(|(_, item)| item)
        .collect_vec()
}

/// Bottom-n items by `key`, smallest first. Same skip and tie-break rules as
/// [`nlargest`].
pub fn nsmallest<T, F>(items: &[T], n: usize, key: F) -> Vec<&T>
where
    F: Fn(&T) -> Option<f64>,
{
    items
        .iter()
        .filter_map(|item| key(item).map(|k| (k, item)))
        .sorted_by(|a, b| total_cmp(&a.0, &b.0))
        .take(n)
        .map(|(_, item)| item)
        .collect_vec()
}

/// Quantile by linear interpolation between order statistics: for sorted
/// values x and h = (n-1)p, returns x[floor(h)] + (x[ceil(h)] - x[floor(h)])
/// * (h - floor(h)). `None` on an empty input or p outside [0, 1].
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let sorted = values.iter().copied().sorted_by(total_cmp).collect_vec();
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (h - lo as f64))
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PercentileRow {
    pub percentile: f64,
    pub value: f64,
}

/// The [`FIELD_PERCENTILES`] grid over `values`; empty when `values` is.
pub fn percentile_table(values: &[f64]) -> Vec<PercentileRow> {
    FIELD_PERCENTILES
        .iter()
        .filter_map(|&percentile| {
            quantile(values, percentile).map(|value| PercentileRow { percentile, value })
        })
        .collect_vec()
}

/// Descriptive statistics over one numeric field. The standard deviation is
/// the sample deviation (n - 1 denominator) and is absent for a single
/// observation rather than zero.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

pub fn describe(values: &[f64]) -> Option<SummaryStats> {
    if values.is_empty() {
        return None;
    }
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std_dev = (count > 1).then(|| {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    });
    Some(SummaryStats {
        count,
        mean,
        std_dev,
        min: values.iter().copied().min_by(total_cmp)?,
        q1: quantile(values, 0.25)?,
        median: quantile(values, 0.5)?,
        q3: quantile(values, 0.75)?,
        max: values.iter().copied().max_by(total_cmp)?,
    })
}
