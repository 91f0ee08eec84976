//! Pure data preparation for the chart panels.

use std::ops::Range;

/// Trailing mean over `window` consecutive values.
///
/// An output slot is `Some` only when its window is complete and holds no
/// nulls, so gaps in the input show up as gaps in the average.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0_f64;
    let mut nulls = 0usize;

    for (i, v) in values.iter().enumerate() {
        match v {
            Some(x) => sum += x,
            None => nulls += 1,
        }
        if i >= window {
            match values[i - window] {
                Some(x) => sum -= x,
                None => nulls -= 1,
            }
        }
        out.push((i + 1 >= window && nulls == 0).then(|| sum / window as f64));
    }
    out
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    pub fn bins(&self) -> impl Iterator<Item = (Range<f64>, u64)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, &count)| (edge[0]..edge[1], count))
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Buckets `values` into `bins` equal-width bins. `None` without values.
///
/// A single distinct value is centred in a unit-wide range.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let bins = bins.max(1);
    let (mut lo, mut hi) = min_max(values)?;
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0u64; bins];
    for v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some(Histogram { edges, counts })
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Value range with a 5% margin on each side, never degenerate.
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let values: Vec<f64> = values.into_iter().collect();
    match min_max(&values) {
        None => 0.0..1.0,
        Some((lo, hi)) if lo == hi => lo - 1.0..hi + 1.0,
        Some((lo, hi)) => {
            let pad = (hi - lo) * 0.05;
            lo - pad..hi + pad
        }
    }
}

/// Splits a nullable series into runs of consecutive defined points.
pub fn contiguous_runs<X: Copy>(
    points: impl IntoIterator<Item = (X, Option<f64>)>,
) -> Vec<Vec<(X, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (x, y) in points {
        match y {
            Some(y) => current.push((x, y)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}
