use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use precip_trends::chart::{self, ChartState, ScenarioSet, YearWindow};
use precip_trends::impact::{ImpactParams, compute_impacts};
use precip_trends::loader::{DataSource, Loader};
use precip_trends::models::{Region, Scenario};
use precip_trends::{stats, storage};

#[derive(Parser, Debug)]
#[command(
    name = "precip",
    version,
    about = "Chart, transform & summarize regional precipitation scenarios"
)]
struct Cli {
    /// Data location: a local directory or an HTTP(S) base URL holding the
    /// per-region CSV tables.
    #[arg(long, global = true, default_value = "./data")]
    data: String,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the decade precipitation chart for a region.
    Render(RenderArgs),
    /// Render the decade rate-of-change chart for a region.
    Rate(RateArgs),
    /// Print illustrative impact estimates for one or all regions.
    Impact(ImpactArgs),
    /// Print per-series summary statistics (optionally save them).
    Summary(SummaryArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Region key (northeast, midwest, south, northwest).
    #[arg(short, long)]
    region: String,
    /// Scenarios separated by comma or semicolon (historical,low,high).
    /// Omitted means all three.
    #[arg(short, long)]
    scenarios: Option<String>,
    /// Year window as YYYY:YYYY; either side may be empty for "open".
    #[arg(long)]
    window: Option<String>,
    /// Disable the dashed trend overlays.
    #[arg(long, default_value_t = false)]
    no_trend: bool,
    /// Output path (.svg or .png).
    #[arg(long)]
    out: PathBuf,
    /// Width of the plot (default 900).
    #[arg(long, default_value_t = 900)]
    width: u32,
    /// Height of the plot (default 520).
    #[arg(long, default_value_t = 520)]
    height: u32,
}

#[derive(Args, Debug)]
struct RateArgs {
    /// Region key (northeast, midwest, south, northwest).
    #[arg(short, long)]
    region: String,
    /// Scenarios separated by comma or semicolon. Omitted means all three.
    #[arg(short, long)]
    scenarios: Option<String>,
    /// Output path (.svg or .png).
    #[arg(long)]
    out: PathBuf,
    /// Width of the plot (default 900).
    #[arg(long, default_value_t = 900)]
    width: u32,
    /// Height of the plot (default 520).
    #[arg(long, default_value_t = 520)]
    height: u32,
}

#[derive(Args, Debug)]
struct ImpactArgs {
    /// Region key; omitted means every region.
    #[arg(short, long)]
    region: Option<String>,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// Save summaries to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

fn parse_region(s: &str) -> Result<Region> {
    Region::from_key(s.trim())
        .ok_or_else(|| anyhow::anyhow!("unknown region `{}`, expected one of northeast, midwest, south, northwest", s))
}

fn parse_scenarios(s: Option<&str>) -> Result<ScenarioSet> {
    let Some(s) = s else {
        return Ok(ScenarioSet::ALL);
    };
    let mut set = ScenarioSet::EMPTY;
    for part in s.split([',', ';']).map(str::trim).filter(|p| !p.is_empty()) {
        let scenario = Scenario::from_key(part).ok_or_else(|| {
            anyhow::anyhow!("unknown scenario `{}`, expected historical, low, or high", part)
        })?;
        set.insert(scenario);
    }
    Ok(set)
}

/// `YYYY:YYYY` with either side optional, e.g. `1980:2060`, `:2014`, `2000:`.
fn parse_window(s: &str) -> Result<YearWindow> {
    let (a, b) = s
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("invalid --window, expected YYYY:YYYY"))?;
    let parse_side = |side: &str| -> Result<Option<i32>> {
        let side = side.trim();
        if side.is_empty() {
            return Ok(None);
        }
        side.parse::<i32>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("invalid year `{}` in --window", side))
    };
    Ok(YearWindow {
        start: parse_side(a)?,
        end: parse_side(b)?,
    })
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let loader = Loader::new(DataSource::from_arg(&cli.data));
    match cli.cmd {
        Command::Render(args) => cmd_render(&loader, args),
        Command::Rate(args) => cmd_rate(&loader, args),
        Command::Impact(args) => cmd_impact(&loader, args),
        Command::Summary(args) => cmd_summary(&loader, args),
    }
}

fn cmd_render(loader: &Loader, args: RenderArgs) -> Result<()> {
    let state = ChartState {
        region: parse_region(&args.region)?,
        active: parse_scenarios(args.scenarios.as_deref())?,
        window: match &args.window {
            Some(w) => parse_window(w)?,
            None => YearWindow::FULL,
        },
        show_regression: !args.no_trend,
    };
    let data = loader.load()?;
    chart::render_chart(&state, &data, &args.out, args.width, args.height)?;
    eprintln!("Wrote chart to {}", args.out.display());
    Ok(())
}

fn cmd_rate(loader: &Loader, args: RateArgs) -> Result<()> {
    let state = ChartState {
        region: parse_region(&args.region)?,
        active: parse_scenarios(args.scenarios.as_deref())?,
        ..ChartState::default()
    };
    let data = loader.load()?;
    chart::render_rate_chart(&state, &data, &args.out, args.width, args.height)?;
    eprintln!("Wrote chart to {}", args.out.display());
    Ok(())
}

fn cmd_impact(loader: &Loader, args: ImpactArgs) -> Result<()> {
    let data = loader.load()?;
    let regions: Vec<Region> = match &args.region {
        Some(key) => vec![parse_region(key)?],
        None => Region::ALL.to_vec(),
    };
    let params = ImpactParams::default();
    println!("Illustrative estimates; not physical projections.");
    for region in regions {
        let impacts = compute_impacts(region, data.region(region), &params);
        println!(
            "{}: low  farms={:.0} people={:.0} damage=${:.0}",
            region.name(),
            impacts.low.farms,
            impacts.low.people,
            impacts.low.damage_usd
        );
        println!(
            "{}: high farms={:.0} people={:.0} damage=${:.0}",
            region.name(),
            impacts.high.farms,
            impacts.high.people,
            impacts.high.damage_usd
        );
    }
    Ok(())
}

fn cmd_summary(loader: &Loader, args: SummaryArgs) -> Result<()> {
    let data = loader.load()?;
    let summaries = stats::dataset_summary(&data);
    for s in &summaries {
        println!(
            "{} • {}  count={}  min={} max={} mean={} median={}",
            s.region.key(),
            s.scenario.key(),
            s.count,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median)
        );
    }
    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_summaries_csv(&summaries, path)?,
            "json" => storage::save_json(&summaries, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", summaries.len(), path.display());
    }
    Ok(())
}
