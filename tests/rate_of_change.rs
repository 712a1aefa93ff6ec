use precip_trends::models::DecadeBin;
use precip_trends::stats::{rate_of_change, stitch_rate};

fn bin(year: i32, value: f64) -> DecadeBin {
    DecadeBin {
        year,
        value,
        bin_start: year - 5,
        bin_end: year + 4,
        count: 10,
    }
}

#[test]
fn adjacent_decades_give_the_raw_delta() {
    let rates = rate_of_change(&[bin(1985, 2.0), bin(1995, 2.5)]);
    assert_eq!(rates.len(), 1);
    let r = &rates[0];
    assert!((r.value - 0.5).abs() < 1e-9);
    assert!((r.year - 1990.0).abs() < 1e-9);
    assert_eq!(r.from_year, 1985);
    assert_eq!(r.to_year, 1995);
    assert_eq!(r.span_start, 1980);
    assert_eq!(r.span_end, 1999);
}

#[test]
fn gaps_normalize_to_per_decade() {
    // 0.4 over twenty years is 0.2 per decade.
    let rates = rate_of_change(&[bin(1985, 2.0), bin(2005, 2.4)]);
    assert_eq!(rates.len(), 1);
    assert!((rates[0].value - 0.2).abs() < 1e-9);
    assert!((rates[0].year - 1995.0).abs() < 1e-9);
}

#[test]
fn fewer_than_two_bins_yields_empty() {
    assert!(rate_of_change(&[]).is_empty());
    assert!(rate_of_change(&[bin(1985, 2.0)]).is_empty());
}

#[test]
fn coincident_centers_are_skipped() {
    // A stitched connector can share a center year with the first real bin;
    // that pair must not produce a division by zero.
    let rates = rate_of_change(&[bin(2015, 2.0), bin(2015, 2.5), bin(2025, 3.0)]);
    assert_eq!(rates.len(), 1);
    assert_eq!(rates[0].from_year, 2015);
    assert_eq!(rates[0].to_year, 2025);
    assert!((rates[0].value - 0.5).abs() < 1e-9);
}

#[test]
fn deltas_telescope_back_to_the_endpoint_difference() {
    // Adjacent decades: summing the per-decade deltas reconstructs
    // last.value - first.value.
    let bins: Vec<DecadeBin> = [2.0, 2.3, 2.1, 2.8, 3.4]
        .iter()
        .enumerate()
        .map(|(i, v)| bin(1955 + i as i32 * 10, *v))
        .collect();
    let total: f64 = rate_of_change(&bins).iter().map(|r| r.value).sum();
    assert!((total - (3.4 - 2.0)).abs() < 1e-9);
}

#[test]
fn stitch_rate_bridges_and_overwrites_like_the_bin_stitch() {
    let hist = rate_of_change(&[bin(1995, 2.0), bin(2005, 2.2), bin(2015, 2.4)]);
    let last = *hist.last().unwrap();

    // Gap: connector prepended.
    let mut future = rate_of_change(&[bin(2025, 2.5), bin(2035, 2.9)]);
    stitch_rate(&mut future, &last);
    assert_eq!(future.len(), 2);
    assert_eq!(future[0].year, last.year);
    assert_eq!(future[0].value, last.value);

    // Coincident midpoint: value overwritten in place.
    let mut coincident = rate_of_change(&[bin(2005, 9.0), bin(2015, 9.5), bin(2025, 9.9)]);
    assert_eq!(coincident[0].year, last.year);
    stitch_rate(&mut coincident, &last);
    assert_eq!(coincident.len(), 2);
    assert_eq!(coincident[0].value, last.value);
}
