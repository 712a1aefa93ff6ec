use precip_trends::chart::hit::{VERTEX_SNAP_PX, hit_test, legend_hover};
use precip_trends::chart::layout::ChartLayout;
use precip_trends::chart::ChartState;
use precip_trends::models::{Dataset, Region, RegionSeries, Sample, Scenario};

const W: u32 = 900;
const H: u32 = 520;

fn series(years: std::ops::RangeInclusive<i32>, value: f64) -> Vec<Sample> {
    years.map(|year| Sample { year, value }).collect()
}

fn layout() -> ChartLayout {
    let mut data = Dataset::default();
    data.northeast = RegionSeries {
        historical: series(1950..=2014, 2.0),
        low: series(2015..=2095, 3.0),
        high: series(2015..=2095, 4.0),
    };
    ChartLayout::compute(&ChartState::default(), &data, W, H)
}

#[test]
fn pointer_outside_the_plot_hits_nothing() {
    let layout = layout();
    assert!(hit_test(&layout, 5.0, 5.0).is_none());
    assert!(hit_test(&layout, layout.plot.right + 50.0, layout.plot.top + 50.0).is_none());
}

#[test]
fn pointer_far_from_every_line_hits_nothing() {
    let layout = layout();
    // Midway between the low (3.0) and high (4.0) lines, away from both.
    let low = layout.path(Scenario::LowEmission).unwrap();
    let high = layout.path(Scenario::HighEmission).unwrap();
    let x = (layout.plot.left + layout.plot.right) / 2.0;
    let y = (low.points[5].1 + high.points[5].1) / 2.0;
    assert!(hit_test(&layout, x, y).is_none());
}

#[test]
fn vertex_hover_reports_the_exact_bin() {
    let layout = layout();
    let low = layout.path(Scenario::LowEmission).unwrap();
    // Pick an interior future vertex, past the stitched connector.
    let idx = 3;
    let (vx, vy) = low.points[idx];
    let bin = &low.bins[idx];

    let hover = hit_test(&layout, vx + VERTEX_SNAP_PX * 0.5, vy).unwrap();
    assert_eq!(hover.scenario, Scenario::LowEmission);
    assert_eq!(hover.tooltip.region, Region::Northeast);
    assert_eq!(hover.marker, (vx, vy));
    assert_eq!(hover.tooltip.count, Some(bin.count));
    assert_eq!(
        hover.tooltip.years,
        format!("{}–{}", bin.bin_start, bin.bin_end)
    );
    assert!((hover.tooltip.value - bin.value).abs() < 1e-9);
}

#[test]
fn between_vertices_the_tooltip_interpolates() {
    let layout = layout();
    let hist = layout.path(Scenario::Historical).unwrap();
    let (x0, y0) = hist.points[2];
    let (x1, _) = hist.points[3];
    let px = (x0 + x1) / 2.0;

    let hover = hit_test(&layout, px, y0).unwrap();
    assert_eq!(hover.scenario, Scenario::Historical);
    assert_eq!(hover.tooltip.count, None);
    // Constant series: the interpolated value equals the bin value.
    assert!((hover.tooltip.value - hist.bins[2].value).abs() < 1e-9);
    // Marker snaps to the cursor x on the line.
    assert!((hover.marker.0 - px).abs() < 1e-9);
}

#[test]
fn nearest_line_wins() {
    let layout = layout();
    let low = layout.path(Scenario::LowEmission).unwrap();
    let high = layout.path(Scenario::HighEmission).unwrap();
    // Slightly above the low line, toward the high one.
    let x = low.points[5].0;
    let y = low.points[5].1 - (low.points[5].1 - high.points[5].1) * 0.05;
    let hover = hit_test(&layout, x, y).unwrap();
    assert_eq!(hover.scenario, Scenario::LowEmission);
}

#[test]
fn legend_hover_dims_the_other_lines() {
    let layout = layout();
    let highlight = legend_hover(&layout, Scenario::HighEmission);
    assert_eq!(highlight.focus, Scenario::HighEmission);
    assert_eq!(
        highlight.dimmed,
        vec![Scenario::Historical, Scenario::LowEmission]
    );
}
