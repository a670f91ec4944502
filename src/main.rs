use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use deformwatch::data::timestamp::{parse_timestamp, parse_window_end};
use deformwatch::types::TemporalRange;
use deformwatch::{
    AlarmBasis, ExportDocument, FileSource, ImportSource, MonitoringContext, PointReport,
    Reloader, SensorReport, Settings, StaticFilter,
};

#[derive(Parser, Debug)]
#[command(name = "deformwatch")]
#[command(about = "Evaluate deformation monitoring data against alarm thresholds")]
struct Args {
    /// Path to the JSON import document
    #[arg(short, long, default_value = "monitoring.json")]
    file: PathBuf,

    /// Start of the analysis window (e.g. "2024-01-01" or "2024-01-01T06:00:00")
    #[arg(long)]
    from: Option<String>,

    /// End of the analysis window; a bare date includes the whole day
    #[arg(long)]
    to: Option<String>,

    /// Settings file (TOML); defaults to ./deformwatch.toml if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rolling baseline policy: "off", a period such as "30d", or "5obs"
    #[arg(long)]
    rolling: Option<String>,

    /// Delta used for alarm evaluation: zero, first or rolling
    #[arg(long)]
    alarm_basis: Option<AlarmBasis>,

    /// Only include points of this category (repeatable)
    #[arg(long)]
    category: Vec<String>,

    /// Only include points of this group (repeatable)
    #[arg(long)]
    group: Vec<String>,

    /// Only include points with this status (repeatable)
    #[arg(long)]
    status: Vec<String>,

    /// Only include points of this origin (repeatable)
    #[arg(long)]
    origin: Vec<String>,

    /// Case-insensitive search on point name and group
    #[arg(short, long)]
    search: Option<String>,

    /// Export derived state to a JSON file and exit
    #[arg(short, long, conflicts_with = "watch")]
    export: Option<PathBuf>,

    /// Keep polling the import file and re-evaluate on change
    #[arg(short, long)]
    watch: bool,

    /// Poll interval in seconds (only used with --watch)
    #[arg(short, long, default_value = "5")]
    refresh: u64,

    /// Log filter directive; overrides the settings file, not RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn window(&self) -> Result<Option<TemporalRange>> {
        if self.from.is_none() && self.to.is_none() {
            return Ok(None);
        }
        let mut window = TemporalRange::unbounded();
        if let Some(ref from) = self.from {
            window.low = parse_timestamp(from).context("invalid --from")?;
        }
        if let Some(ref to) = self.to {
            window.high = parse_window_end(to).context("invalid --to")?;
        }
        if window.is_inverted() {
            warn!(low = %window.low, high = %window.high, "window is inverted and selects nothing");
        }
        Ok(Some(window))
    }

    fn filter(&self) -> StaticFilter {
        let mut filter = StaticFilter::new().text(self.search.clone().unwrap_or_default());
        filter.categories.extend(self.category.iter().cloned());
        filter.groups.extend(self.group.iter().cloned());
        filter.statuses.extend(self.status.iter().cloned());
        filter.origins.extend(self.origin.iter().cloned());
        filter
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref()).context("failed to load settings")?;
    if let Some(ref rolling) = args.rolling {
        settings.rolling = rolling.clone();
    }
    if let Some(basis) = args.alarm_basis {
        settings.alarm_basis = basis;
    }
    if let Some(ref level) = args.log_level {
        settings.log_level = level.clone();
    }

    init_tracing(&settings.log_level)?;

    let evaluation = settings.evaluation().context("invalid evaluation settings")?;
    let window = args.window()?;
    let filter = args.filter();

    let mut reloader =
        Reloader::new(Box::new(FileSource::new(&args.file)), evaluation).with_window(window);
    if !filter.is_empty() {
        reloader = reloader.with_filter(Arc::new(filter));
    }

    reloader.poll();
    let context = reloader
        .context()
        .ok_or_else(|| anyhow!(reloader.source().error().unwrap_or("no data").to_string()))
        .with_context(|| format!("failed to import {}", args.file.display()))?;

    if let Some(export_path) = args.export {
        return export_to_file(context, &export_path);
    }

    print_summary(context, evaluation.alarm_basis);

    if args.watch {
        run_watch(&mut reloader, evaluation.alarm_basis, Duration::from_secs(args.refresh));
    }

    Ok(())
}

fn init_tracing(default_directive: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)
            .with_context(|| format!("invalid log level '{}'", default_directive))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Poll the import source until interrupted.
fn run_watch(reloader: &mut Reloader, basis: AlarmBasis, refresh: Duration) {
    info!(source = %reloader.source().description(), interval = ?refresh, "watching for changes");
    loop {
        std::thread::sleep(refresh);
        if reloader.poll() {
            if let Some(context) = reloader.context() {
                println!();
                print_summary(context, basis);
            }
        } else if let Some(error) = reloader.source().error() {
            warn!(error = %error, "keeping previous evaluation");
        }
    }
}

fn print_summary(context: &MonitoringContext, basis: AlarmBasis) {
    let export = ExportDocument::from_context(context);
    for report in export.sensors.iter().filter(|r| r.load.points > 0) {
        print_sensor(report, basis);
    }
}

fn print_sensor(report: &SensorReport, basis: AlarmBasis) {
    let s = &report.summary;
    println!(
        "{} - {} points: {} ok, {} warning, {} alarm, {} unknown",
        report.sensor, s.total, s.nominal, s.warning, s.alarm, s.unknown
    );
    if report.load.dropped() > 0 {
        println!(
            "  ({} observations dropped at load: {} undated, {} unknown point)",
            report.load.dropped(),
            report.load.dropped_undated,
            report.load.dropped_orphaned
        );
    }

    if report.load.outside_validity > 0 {
        println!(
            "  ({} observations outside their point's validity period)",
            report.load.outside_validity
        );
    }

    let legend = report
        .components
        .iter()
        .map(|c| format!("{} = {}", c.key, c.label))
        .collect::<Vec<_>>()
        .join(", ");
    println!("  {}", legend);
    println!(
        "  {:<20} {:<6} {:>6}  {:<19}  delta ({})",
        "POINT", "LEVEL", "%", "LAST", basis
    );
    for point in report.points.iter().filter(|p| p.time_filtered) {
        println!(
            "  {:<20} {:<6} {:>6}  {:<19}  {}",
            point.name,
            point.alarm_level.symbol(),
            point
                .alarm_percent
                .map(|p| format!("{:.0}", p))
                .unwrap_or_else(|| "-".to_string()),
            point
                .last
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
            format_delta(point, basis)
        );
    }
}

fn format_delta(point: &PointReport, basis: AlarmBasis) -> String {
    let delta = match basis {
        AlarmBasis::Zero => &point.delta_zero,
        AlarmBasis::First => &point.delta_first,
        AlarmBasis::Rolling => &point.delta_rolling,
    };
    match delta {
        Some(components) => components
            .iter()
            .map(|c| format!("{}={:+.4}", c.key, c.value))
            .collect::<Vec<_>>()
            .join(" "),
        None => "-".to_string(),
    }
}

fn export_to_file(context: &MonitoringContext, export_path: &Path) -> Result<()> {
    let json = ExportDocument::from_context(context).to_json_pretty()?;
    std::fs::write(export_path, json)
        .with_context(|| format!("failed to write {}", export_path.display()))?;

    println!("Exported derived state to: {}", export_path.display());
    Ok(())
}
