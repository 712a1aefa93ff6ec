use precip_trends::impact::{
    ImpactParams, compute_impacts, exposure_baseline, scenario_delta,
};
use precip_trends::models::{Region, RegionSeries, Sample, Scenario};

fn series(years: std::ops::RangeInclusive<i32>, value: f64) -> Vec<Sample> {
    years.map(|year| Sample { year, value }).collect()
}

fn region_series(hist: f64, low: f64, high: f64) -> RegionSeries {
    RegionSeries {
        historical: series(1950..=2014, hist),
        low: series(2015..=2095, low),
        high: series(2015..=2095, high),
    }
}

#[test]
fn delta_is_future_tail_mean_minus_historical_mean() {
    let series = region_series(2.0, 3.0, 4.5);
    let params = ImpactParams::default();
    assert!((scenario_delta(&series, Scenario::LowEmission, &params) - 1.0).abs() < 1e-9);
    assert!((scenario_delta(&series, Scenario::HighEmission, &params) - 2.5).abs() < 1e-9);
}

#[test]
fn delta_uses_the_end_of_horizon_tail() {
    // Early future years are dry, the final 30 are wet. Only the tail counts.
    let mut low = series(2015..=2065, 0.0);
    low.extend(series(2066..=2095, 3.0));
    let series = RegionSeries {
        historical: self::series(1950..=2014, 2.0),
        low,
        high: self::series(2015..=2095, 4.0),
    };
    let params = ImpactParams::default();
    let delta = scenario_delta(&series, Scenario::LowEmission, &params);
    assert!((delta - 1.0).abs() < 1e-9);
}

#[test]
fn short_futures_fall_back_to_the_full_series() {
    let series = RegionSeries {
        historical: self::series(1950..=2014, 2.0),
        low: self::series(2090..=2095, 2.8),
        high: self::series(2090..=2095, 3.0),
    };
    let params = ImpactParams::default();
    // Six samples are below min_tail_samples; the full-series mean applies.
    assert!((scenario_delta(&series, Scenario::LowEmission, &params) - 0.8).abs() < 1e-9);
}

#[test]
fn drier_futures_clamp_to_zero_delta() {
    let series = region_series(3.0, 2.0, 2.5);
    let params = ImpactParams::default();
    assert_eq!(scenario_delta(&series, Scenario::LowEmission, &params), 0.0);
}

#[test]
fn figures_scale_linearly_with_the_delta() {
    // Low delta 1.0 with full scale 2.0 halves the baseline.
    let series = region_series(2.0, 3.0, 4.0);
    let impacts = compute_impacts(Region::Midwest, &series, &ImpactParams::default());
    let baseline = exposure_baseline(Region::Midwest);
    assert!((impacts.low.farms - baseline.farms as f64 * 0.5).abs() < 1e-6);
    assert!((impacts.low.people - baseline.people as f64 * 0.5).abs() < 1e-6);
    assert!((impacts.low.damage_usd - baseline.damage_per_year_usd * 0.5).abs() < 1e-3);
    // High delta 2.0 reaches factor 1.0.
    assert!((impacts.high.farms - baseline.farms as f64).abs() < 1e-6);
}

#[test]
fn scaling_factor_is_capped() {
    // Enormous delta: the factor clamps at max_factor.
    let series = region_series(2.0, 2.0, 50.0);
    let params = ImpactParams::default();
    let impacts = compute_impacts(Region::South, &series, &params);
    let baseline = exposure_baseline(Region::South);
    assert!((impacts.high.farms - baseline.farms as f64 * params.max_factor).abs() < 1e-6);
}

#[test]
fn high_figures_stay_strictly_above_low() {
    // Both scenarios identical: high must still be floored above low.
    let series = region_series(2.0, 3.0, 3.0);
    let impacts = compute_impacts(Region::Northwest, &series, &ImpactParams::default());
    assert!(impacts.high.farms > impacts.low.farms);
    assert!(impacts.high.people > impacts.low.people);
    assert!(impacts.high.damage_usd > impacts.low.damage_usd);
}

#[test]
fn every_region_has_a_baseline() {
    for region in Region::ALL {
        let b = exposure_baseline(region);
        assert!(b.farms > 0);
        assert!(b.people > 0);
        assert!(b.damage_per_year_usd > 0.0);
    }
}
