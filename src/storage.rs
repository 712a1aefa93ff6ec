use crate::models::{DecadeBin, RateBin};
use crate::stats::Summary;
use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save decade bins as CSV with header.
pub fn save_bins_csv<P: AsRef<Path>>(bins: &[DecadeBin], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("year", "value", "bin_start", "bin_end", "count"))?;
    for b in bins {
        wtr.serialize((b.year, b.value, b.bin_start, b.bin_end, b.count))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save rate-of-change bins as CSV with header.
pub fn save_rates_csv<P: AsRef<Path>>(rates: &[RateBin], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("year", "value", "from_year", "to_year", "span_start", "span_end"))?;
    for r in rates {
        wtr.serialize((r.year, r.value, r.from_year, r.to_year, r.span_start, r.span_end))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save per-series summaries as CSV with header.
pub fn save_summaries_csv<P: AsRef<Path>>(summaries: &[Summary], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("region", "scenario", "count", "min", "max", "mean", "median"))?;
    for s in summaries {
        wtr.serialize((
            s.region.key(),
            s.scenario.key(),
            s.count,
            s.min,
            s.max,
            s.mean,
            s.median,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save any serializable value as a pretty JSON document.
pub fn save_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("bins.csv");
        let jsonp = dir.path().join("bins.json");
        let bins = vec![DecadeBin {
            year: 1985,
            value: 2.31,
            bin_start: 1980,
            bin_end: 1989,
            count: 10,
        }];
        save_bins_csv(&bins, &csvp).unwrap();
        save_json(&bins, &jsonp).unwrap();
        assert!(csvp.exists());
        let text = std::fs::read_to_string(&jsonp).unwrap();
        assert!(text.contains("\"bin_start\": 1980"));
    }

    #[test]
    fn write_rates_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rates.csv");
        let rates = vec![RateBin {
            year: 1990.0,
            value: 0.5,
            from_year: 1985,
            to_year: 1995,
            span_start: 1980,
            span_end: 1999,
        }];
        save_rates_csv(&rates, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("year,value,from_year,to_year"));
        assert!(text.contains("1990.0,0.5,1985,1995,1980,1999"));
    }
}
