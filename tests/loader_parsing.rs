use precip_trends::loader::{DataSource, LoadError, Loader, historical_file, future_file};
use precip_trends::models::Region;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Write a minimal valid fixture set: one historical and one merged future
/// table per region.
fn write_fixtures(dir: &Path) {
    for region in Region::ALL {
        fs::write(
            dir.join(historical_file(region)),
            "year,pr\n2000,2.0e-5\n2001,2.5e-5\n",
        )
        .unwrap();
        fs::write(
            dir.join(future_file(region)),
            "year,low_emissions_pr,high_emissions_pr\n2020,3.0e-5,4.0e-5\n2021,3.1e-5,4.1e-5\n",
        )
        .unwrap();
    }
}

fn dir_loader(dir: &Path) -> Loader {
    Loader::new(DataSource::Dir(dir.to_path_buf()))
}

#[test]
fn load_converts_flux_to_mm_per_day() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());
    let data = dir_loader(dir.path()).load().unwrap();

    let ne = &data.northeast;
    assert_eq!(ne.historical.len(), 2);
    // 2.0e-5 kg/m²/s × 86400 s/day = 1.728 mm/day.
    assert!((ne.historical[0].value - 1.728).abs() < 1e-9);
    assert!((ne.low[0].value - 2.592).abs() < 1e-9);
    assert!((ne.high[1].value - 3.54240).abs() < 1e-9);
}

#[test]
fn series_come_back_sorted_by_year() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());
    fs::write(
        dir.path().join(historical_file(Region::South)),
        "year,pr\n2003,3.0e-5\n2001,1.0e-5\n2002,2.0e-5\n",
    )
    .unwrap();
    let data = dir_loader(dir.path()).load().unwrap();
    let years: Vec<i32> = data.south.historical.iter().map(|s| s.year).collect();
    assert_eq!(years, vec![2001, 2002, 2003]);
}

#[test]
fn unparsable_rows_are_dropped_not_fatal() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());
    fs::write(
        dir.path().join(historical_file(Region::Midwest)),
        "year,pr\n2000,2.0e-5\nnot-a-year,2.0e-5\n2002,\n2003,nan\n2004,3.0e-5\n",
    )
    .unwrap();
    let data = dir_loader(dir.path()).load().unwrap();
    let years: Vec<i32> = data.midwest.historical.iter().map(|s| s.year).collect();
    assert_eq!(years, vec![2000, 2004]);
}

#[test]
fn future_cells_drop_independently() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());
    // Row 2021 has a bad high cell; its low cell must survive.
    fs::write(
        dir.path().join(future_file(Region::Northwest)),
        "year,low_emissions_pr,high_emissions_pr\n2020,3.0e-5,4.0e-5\n2021,3.1e-5,x\n",
    )
    .unwrap();
    let data = dir_loader(dir.path()).load().unwrap();
    assert_eq!(data.northwest.low.len(), 2);
    assert_eq!(data.northwest.high.len(), 1);
}

#[test]
fn missing_column_fails_the_whole_load() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());
    fs::write(
        dir.path().join(historical_file(Region::Northeast)),
        "year,precip\n2000,2.0e-5\n",
    )
    .unwrap();
    let err = dir_loader(dir.path()).load().unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn { column: "pr", .. }));
}

#[test]
fn header_only_table_fails_as_empty() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());
    fs::write(dir.path().join(future_file(Region::South)), "year,low_emissions_pr,high_emissions_pr\n")
        .unwrap();
    let err = dir_loader(dir.path()).load().unwrap_err();
    assert!(matches!(err, LoadError::EmptyTable { .. }));
}

#[test]
fn one_missing_file_fails_the_whole_load() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());
    fs::remove_file(dir.path().join(future_file(Region::Midwest))).unwrap();
    let err = dir_loader(dir.path()).load().unwrap_err();
    assert!(matches!(err, LoadError::Transport { .. }));
    let msg = err.to_string();
    assert!(msg.contains("midwest_futures_merged.csv"));
}
