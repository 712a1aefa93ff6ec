//! precip_trends
//!
//! A library for loading, aggregating, and charting regional precipitation
//! time series across historical records and low/high emission futures.
//! Pairs with the `precip` CLI.
//!
//! ### Features
//! - Load per-region historical and merged future CSV tables from a local
//!   directory or an HTTP base URL (flux converted to mm/day on parse)
//! - Decade binning with boundary stitching, moving-average trend overlays,
//!   and per-decade rate-of-change transforms
//! - SVG/PNG trend and rate charts with endpoint labels and a marked
//!   historical/future boundary
//! - Illustrative regional impact estimates scaled by the precipitation delta
//!
//! ### Example
//! ```no_run
//! use precip_trends::chart::{ChartState, render_chart};
//! use precip_trends::loader::{DataSource, Loader};
//! use std::path::Path;
//!
//! let loader = Loader::new(DataSource::from_arg("./data"));
//! let data = loader.load()?;
//! let state = ChartState::default();
//! render_chart(&state, &data, Path::new("northeast.svg"), 900, 520)?;
//! let summaries = precip_trends::stats::dataset_summary(&data);
//! println!("{:#?}", summaries);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod chart;
pub mod impact;
pub mod loader;
pub mod models;
pub mod stats;
pub mod storage;

pub use chart::{ChartInstance, ChartState, ScenarioSet, YearWindow};
pub use loader::{DataSource, LoadError, Loader};
pub use models::{Dataset, DecadeBin, RateBin, Region, RegionSeries, Sample, Scenario};
