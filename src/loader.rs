//! Dataset loading: fetch and parse the per-region precipitation tables.
//!
//! One historical file per region (`year,pr`) and one merged future file per
//! region (`year,low_emissions_pr,high_emissions_pr`). Values arrive as flux
//! in kg/m²/s and are converted to mm/day on parse. Loading is all-or-nothing:
//! every region's historical and future table must parse to at least one row,
//! otherwise the whole load fails and the caller renders an explicit error
//! state instead of a partial chart.
//!
//! Rows whose year or value cells are non-numeric are dropped silently (logged
//! at debug level). This leniency is deliberate; the upstream tables carry the
//! occasional blank cell.

use crate::models::{Dataset, FLUX_TO_MM_PER_DAY, Region, Sample};
use log::{debug, warn};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Errors that make the whole dataset load fail.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch {file}: {reason}")]
    Transport { file: String, reason: String },
    #[error("{file}: missing required column `{column}`")]
    MissingColumn { file: String, column: &'static str },
    #[error("{file}: no usable rows after parsing")]
    EmptyTable { file: String },
}

/// Where the eight CSV files live.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Local directory containing the files.
    Dir(PathBuf),
    /// HTTP(S) base URL the file names are appended to.
    Url(String),
}

impl DataSource {
    /// Interpret a CLI argument: anything starting with `http(s)://` is a
    /// base URL, everything else a local directory.
    pub fn from_arg(arg: &str) -> DataSource {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            DataSource::Url(arg.trim_end_matches('/').to_string())
        } else {
            DataSource::Dir(PathBuf::from(arg))
        }
    }
}

/// File name of a region's historical table.
pub fn historical_file(region: Region) -> String {
    format!("{}_historical_precipitation.csv", region.key())
}

/// File name of a region's merged future table.
pub fn future_file(region: Region) -> String {
    format!("{}_futures_merged.csv", region.key())
}

/// Loads the full dataset from a [`DataSource`].
#[derive(Debug, Clone)]
pub struct Loader {
    source: DataSource,
    http: HttpClient,
}

impl Loader {
    pub fn new(source: DataSource) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("precip_trends/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client build");
        Self { source, http }
    }

    /// Load every region's historical and future table.
    ///
    /// All eight fetches are issued together and joined before parsing; the
    /// first failure aborts the whole load.
    pub fn load(&self) -> Result<Dataset, LoadError> {
        let result = self.load_all();
        if let Err(e) = &result {
            warn!("dataset load failed, no partial data kept: {e}");
        }
        result
    }

    fn load_all(&self) -> Result<Dataset, LoadError> {
        let files: Vec<String> = Region::ALL
            .iter()
            .flat_map(|r| [historical_file(*r), future_file(*r)])
            .collect();

        let mut fetched: Vec<Result<Vec<u8>, LoadError>> = Vec::with_capacity(files.len());
        thread::scope(|scope| {
            let handles: Vec<_> = files
                .iter()
                .map(|name| scope.spawn(move || self.fetch_bytes(name)))
                .collect();
            for handle in handles {
                // A panicking fetch thread is a bug, not a load failure.
                fetched.push(handle.join().expect("fetch thread panicked"));
            }
        });

        let mut dataset = Dataset::default();
        let mut iter = fetched.into_iter().zip(files);
        for region in Region::ALL {
            let (hist_bytes, hist_name) = iter.next().expect("fetch result per file");
            let (future_bytes, future_name) = iter.next().expect("fetch result per file");
            let series = dataset.region_mut(region);
            series.historical = parse_historical(&hist_bytes?, &hist_name)?;
            let (low, high) = parse_future(&future_bytes?, &future_name)?;
            series.low = low;
            series.high = high;
        }
        Ok(dataset)
    }

    fn fetch_bytes(&self, name: &str) -> Result<Vec<u8>, LoadError> {
        match &self.source {
            DataSource::Dir(dir) => {
                std::fs::read(dir.join(name)).map_err(|e| LoadError::Transport {
                    file: name.to_string(),
                    reason: e.to_string(),
                })
            }
            DataSource::Url(base) => {
                let url = format!("{}/{}", base, name);
                // Small retry for transient failures (5xx / network errors)
                let mut last_err = String::from("unreachable");
                for backoff_ms in [100u64, 300, 700] {
                    match self.http.get(&url).send() {
                        Ok(r) if r.status().is_success() => {
                            return r.bytes().map(|b| b.to_vec()).map_err(|e| {
                                LoadError::Transport {
                                    file: name.to_string(),
                                    reason: e.to_string(),
                                }
                            });
                        }
                        Ok(r) if r.status().is_server_error() => {
                            last_err = format!("HTTP {}", r.status());
                        }
                        Ok(r) => {
                            return Err(LoadError::Transport {
                                file: name.to_string(),
                                reason: format!("HTTP {}", r.status()),
                            });
                        }
                        Err(e) => last_err = e.to_string(),
                    }
                    thread::sleep(Duration::from_millis(backoff_ms));
                }
                Err(LoadError::Transport {
                    file: name.to_string(),
                    reason: last_err,
                })
            }
        }
    }
}

fn column_index(
    headers: &csv::StringRecord,
    column: &'static str,
    file: &str,
) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(column))
        .ok_or_else(|| LoadError::MissingColumn {
            file: file.to_string(),
            column,
        })
}

fn parse_cell(record: &csv::StringRecord, idx: usize) -> Option<f64> {
    record
        .get(idx)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Parse a `year,pr` table into mm/day samples, dropping unparsable rows.
pub fn parse_historical(bytes: &[u8], file: &str) -> Result<Vec<Sample>, LoadError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|e| LoadError::Transport {
            file: file.to_string(),
            reason: e.to_string(),
        })?
        .clone();
    let year_idx = column_index(&headers, "year", file)?;
    let pr_idx = column_index(&headers, "pr", file)?;

    let mut out = Vec::new();
    for record in reader.records().flatten() {
        let year = parse_cell(&record, year_idx).map(|y| y as i32);
        let flux = parse_cell(&record, pr_idx);
        match (year, flux) {
            (Some(year), Some(flux)) => out.push(Sample {
                year,
                value: flux * FLUX_TO_MM_PER_DAY,
            }),
            _ => debug!("{file}: dropping unparsable row {record:?}"),
        }
    }
    if out.is_empty() {
        return Err(LoadError::EmptyTable {
            file: file.to_string(),
        });
    }
    out.sort_by_key(|s| s.year);
    Ok(out)
}

/// Parse a merged future table into (low, high) mm/day samples.
///
/// Each scenario cell is dropped independently; a row with a good low value
/// and a bad high value still contributes to the low series.
pub fn parse_future(bytes: &[u8], file: &str) -> Result<(Vec<Sample>, Vec<Sample>), LoadError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|e| LoadError::Transport {
            file: file.to_string(),
            reason: e.to_string(),
        })?
        .clone();
    let year_idx = column_index(&headers, "year", file)?;
    let low_idx = column_index(&headers, "low_emissions_pr", file)?;
    let high_idx = column_index(&headers, "high_emissions_pr", file)?;

    let mut low = Vec::new();
    let mut high = Vec::new();
    for record in reader.records().flatten() {
        let Some(year) = parse_cell(&record, year_idx).map(|y| y as i32) else {
            debug!("{file}: dropping row with unparsable year {record:?}");
            continue;
        };
        match parse_cell(&record, low_idx) {
            Some(flux) => low.push(Sample {
                year,
                value: flux * FLUX_TO_MM_PER_DAY,
            }),
            None => debug!("{file}: dropping low-emission cell in row {record:?}"),
        }
        match parse_cell(&record, high_idx) {
            Some(flux) => high.push(Sample {
                year,
                value: flux * FLUX_TO_MM_PER_DAY,
            }),
            None => debug!("{file}: dropping high-emission cell in row {record:?}"),
        }
    }
    if low.is_empty() || high.is_empty() {
        return Err(LoadError::EmptyTable {
            file: file.to_string(),
        });
    }
    low.sort_by_key(|s| s.year);
    high.sort_by_key(|s| s.year);
    Ok((low, high))
}
