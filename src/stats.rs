//! Decade binning, trend smoothing, rate-of-change, and summary statistics.
//!
//! The smoothing here is a centered moving average over decade bins: a
//! low-frequency trend overlay, not a fitted regression, despite what the
//! legend toggle calls it.

use crate::models::{Dataset, DecadeBin, RateBin, Region, Sample, Scenario};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Moving-average window (in bins) for the trend overlay. Capped to the
/// sequence length; smaller values follow the data more closely.
pub const TREND_WINDOW: usize = 14;

/// Group samples into 10-year buckets and reduce each bucket to its mean.
///
/// An optional inclusive `[start, end]` year clip is applied before binning.
/// Empty buckets are never emitted; output is sorted ascending by center year.
pub fn bin_by_decade(samples: &[Sample], clip: Option<(i32, i32)>) -> Vec<DecadeBin> {
    let mut buckets: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for s in samples {
        if let Some((start, end)) = clip {
            if s.year < start || s.year > end {
                continue;
            }
        }
        let bin_start = (s.year as f64 / 10.0).floor() as i32 * 10;
        let entry = buckets.entry(bin_start).or_insert((0.0, 0));
        entry.0 += s.value;
        entry.1 += 1;
    }
    buckets
        .into_iter()
        .map(|(bin_start, (sum, count))| DecadeBin {
            year: bin_start + 5,
            value: sum / count as f64,
            bin_start,
            bin_end: bin_start + 9,
            count,
        })
        .collect()
}

/// Bridge a future bin sequence to the last historical bin so the rendered
/// line reads continuously across the historical/future boundary.
///
/// Gap: a connector bin carrying the historical value is prepended. Same
/// center year: the future bin's value is overwritten with the historical one
/// (binning may have averaged historical and future samples into it).
pub fn stitch_to_historical(future: &mut Vec<DecadeBin>, last_hist: &DecadeBin) {
    let Some(first) = future.first_mut() else {
        return;
    };
    if first.year == last_hist.year {
        first.value = last_hist.value;
    } else if first.year > last_hist.year {
        future.insert(0, *last_hist);
    }
}

/// Centered moving average over decade bins.
///
/// The window shrinks at both ends (boundary-clamped, not zero-padded), so a
/// short sequence still gets a defined value at every index.
pub fn trend_curve(bins: &[DecadeBin], window: usize) -> Vec<Sample> {
    if bins.len() < 2 {
        return Vec::new();
    }
    let window = window.min(bins.len()).max(1);
    let half = window / 2;
    (0..bins.len())
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half).min(bins.len() - 1);
            let slice = &bins[start..=end];
            let mean = slice.iter().map(|b| b.value).sum::<f64>() / slice.len() as f64;
            Sample {
                year: bins[i].year,
                value: mean,
            }
        })
        .collect()
}

/// Force a future trend curve to start where the historical trend curve ends.
pub fn stitch_trend(future: &mut Vec<Sample>, last_hist: Sample) {
    let Some(first) = future.first_mut() else {
        return;
    };
    if first.year == last_hist.year {
        first.value = last_hist.value;
    } else if first.year > last_hist.year {
        future.insert(0, last_hist);
    }
}

/// Differentiate consecutive decade bins into per-decade deltas.
///
/// The delta is normalized to "per 10 years" regardless of the actual spacing
/// between bin centers. Fewer than two bins yields an empty output; the caller
/// shows an explicit insufficient-data message rather than an empty chart.
pub fn rate_of_change(bins: &[DecadeBin]) -> Vec<RateBin> {
    bins.windows(2)
        .filter(|pair| pair[1].year != pair[0].year)
        .map(|pair| {
            let (prev, curr) = (&pair[0], &pair[1]);
            let years_between = (curr.year - prev.year) as f64;
            RateBin {
                year: (prev.year + curr.year) as f64 / 2.0,
                value: (curr.value - prev.value) / (years_between / 10.0),
                from_year: prev.year,
                to_year: curr.year,
                span_start: prev.bin_start,
                span_end: curr.bin_end,
            }
        })
        .collect()
}

/// Bridge a future rate sequence to the historical sequence's final point,
/// mirroring [`stitch_to_historical`].
pub fn stitch_rate(future: &mut Vec<RateBin>, last_hist: &RateBin) {
    let Some(first) = future.first_mut() else {
        return;
    };
    if first.year == last_hist.year {
        first.value = last_hist.value;
    } else if first.year > last_hist.year {
        future.insert(0, *last_hist);
    }
}

/// Arithmetic mean of a series, `None` when empty.
pub fn mean(samples: &[Sample]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().map(|s| s.value).sum::<f64>() / samples.len() as f64)
}

/// Summary statistics for one (region, scenario) series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub region: Region,
    pub scenario: Scenario,
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute per-(region, scenario) summaries across the whole dataset.
pub fn dataset_summary(dataset: &Dataset) -> Vec<Summary> {
    let mut out = Vec::new();
    for region in Region::ALL {
        for scenario in Scenario::ALL {
            let series = dataset.region(region).scenario(scenario);
            let mut vals: Vec<f64> = series.iter().map(|s| s.value).collect();
            vals.sort_by(|a, b| a.total_cmp(b));
            let count = vals.len();
            let median = if count == 0 {
                None
            } else if count % 2 == 1 {
                Some(vals[count / 2])
            } else {
                Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
            };
            out.push(Summary {
                region,
                scenario,
                count,
                min: vals.first().copied(),
                max: vals.last().copied(),
                mean: mean(series),
                median,
            });
        }
    }
    out
}
