//! Illustrative regional exposure estimates.
//!
//! Scales static per-region exposure baselines by the historical→future
//! precipitation delta. The baselines and the scaling are presentation
//! parameters chosen for the narrative, not physical projections, and the
//! numbers must be presented as illustrative.

use crate::models::{ExposureBaseline, Region, RegionSeries, Sample, Scenario};
use crate::stats::mean;
use serde::{Deserialize, Serialize};

/// Tunable knobs of the estimator. All values are presentation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactParams {
    /// Restrict the future mean to the final N years of the horizon.
    pub tail_years: i32,
    /// Fall back to the full future series below this many tail samples.
    pub min_tail_samples: usize,
    /// mm/day delta that maps to a scaling factor of 1.0.
    pub delta_full_scale: f64,
    /// Upper bound on the scaling factor.
    pub max_factor: f64,
}

impl Default for ImpactParams {
    fn default() -> Self {
        Self {
            tail_years: 30,
            min_tail_samples: 10,
            delta_full_scale: 2.0,
            max_factor: 2.0,
        }
    }
}

/// Keeps the high-emission figure strictly above the low one when data noise
/// would invert them.
const HIGH_FLOOR_EPSILON: f64 = 1e-6;

/// Static exposure baselines. Illustrative constants, swappable via
/// [`compute_impacts_with_baseline`].
pub fn exposure_baseline(region: Region) -> ExposureBaseline {
    match region {
        Region::Northeast => ExposureBaseline {
            farms: 21_000,
            people: 1_350_000,
            damage_per_year_usd: 120_000_000.0,
        },
        Region::Midwest => ExposureBaseline {
            farms: 48_000,
            people: 900_000,
            damage_per_year_usd: 260_000_000.0,
        },
        Region::South => ExposureBaseline {
            farms: 62_000,
            people: 2_100_000,
            damage_per_year_usd: 480_000_000.0,
        },
        Region::Northwest => ExposureBaseline {
            farms: 15_500,
            people: 600_000,
            damage_per_year_usd: 95_000_000.0,
        },
    }
}

/// Exposure figures scaled for one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactFigures {
    pub farms: f64,
    pub people: f64,
    pub damage_usd: f64,
}

/// Low/high scenario impact figures for one region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionImpacts {
    pub region: Region,
    pub low: ImpactFigures,
    pub high: ImpactFigures,
}

/// Precipitation increase of a future scenario over the historical mean.
///
/// The historical mean spans the full record. The future mean is restricted
/// to the final `tail_years` of the horizon to emphasize end-of-century
/// effects, falling back to the whole future series when fewer than
/// `min_tail_samples` years qualify. Negative deltas clamp to zero.
pub fn scenario_delta(series: &RegionSeries, scenario: Scenario, params: &ImpactParams) -> f64 {
    let future = series.scenario(scenario);
    let Some(hist_mean) = mean(&series.historical) else {
        return 0.0;
    };
    let Some(&Sample { year: end, .. }) = future.last() else {
        return 0.0;
    };
    let tail: Vec<Sample> = future
        .iter()
        .copied()
        .filter(|s| s.year > end - params.tail_years)
        .collect();
    let future_mean = if tail.len() >= params.min_tail_samples {
        mean(&tail)
    } else {
        mean(future)
    };
    match future_mean {
        Some(m) => (m - hist_mean).max(0.0),
        None => 0.0,
    }
}

fn scale(baseline: ExposureBaseline, delta: f64, params: &ImpactParams) -> ImpactFigures {
    let factor = (delta / params.delta_full_scale).clamp(0.0, params.max_factor);
    ImpactFigures {
        farms: baseline.farms as f64 * factor,
        people: baseline.people as f64 * factor,
        damage_usd: baseline.damage_per_year_usd * factor,
    }
}

/// Compute low/high impact figures for a region using the built-in baselines.
///
/// Invariant: each high-emission figure is strictly greater than its
/// low-emission counterpart; a noisy inversion is floored to `low + epsilon`.
pub fn compute_impacts(
    region: Region,
    series: &RegionSeries,
    params: &ImpactParams,
) -> RegionImpacts {
    compute_impacts_with_baseline(region, series, params, exposure_baseline(region))
}

/// Same as [`compute_impacts`] but with a caller-supplied baseline.
pub fn compute_impacts_with_baseline(
    region: Region,
    series: &RegionSeries,
    params: &ImpactParams,
    baseline: ExposureBaseline,
) -> RegionImpacts {
    let low = scale(
        baseline,
        scenario_delta(series, Scenario::LowEmission, params),
        params,
    );
    let mut high = scale(
        baseline,
        scenario_delta(series, Scenario::HighEmission, params),
        params,
    );
    if high.farms <= low.farms {
        high.farms = low.farms + HIGH_FLOOR_EPSILON;
    }
    if high.people <= low.people {
        high.people = low.people + HIGH_FLOOR_EPSILON;
    }
    if high.damage_usd <= low.damage_usd {
        high.damage_usd = low.damage_usd + HIGH_FLOOR_EPSILON;
    }
    RegionImpacts { region, low, high }
}
