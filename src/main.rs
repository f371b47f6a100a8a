use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use vertmeta::{
    config::{Config, RowErrorPolicy},
    process::{self, date_parser},
    report,
    schema::Dataset,
    template::PlaceholderStyle,
};

#[derive(Parser, Debug)]
#[command(
    name = "vertmeta",
    version,
    about = "Generate range and habitat map metadata XML from ScienceBase CSV tables"
)]
struct Cli {
    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the CSV tables and templates
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Root directory for the rng/ and hab/ outputs
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Only run one dataset (range or habitat)
    #[arg(long, value_parser = parse_dataset)]
    only: Option<Dataset>,

    /// Date written into str_Date, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse_date)]
    run_date: Option<NaiveDate>,

    #[arg(long, value_enum)]
    placeholder_style: Option<PlaceholderStyle>,

    /// Fail the run on the first bad row instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Write a JSON run report here
    #[arg(long)]
    report: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn parse_dataset(s: &str) -> Result<Dataset, String> {
    Dataset::from_str(s).ok_or_else(|| format!("unknown dataset `{}` (range, habitat)", s))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    date_parser::parse_run_date(s).ok_or_else(|| format!("expected YYYY-MM-DD, got `{}`", s))
}

impl Cli {
    fn into_config(self) -> Result<(Config, Option<Dataset>, Option<PathBuf>)> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(dir) = self.base_dir {
            config.base_dir = dir;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = Some(dir);
        }
        if let Some(date) = self.run_date {
            config.run_date = Some(date);
        }
        if let Some(style) = self.placeholder_style {
            config.placeholder_style = style;
        }
        if self.strict {
            config.on_row_error = RowErrorPolicy::Abort;
        }
        // asking for a dataset by name runs it even if the config disabled it
        if let Some(only) = self.only {
            config.dataset_mut(only).enabled = true;
        }
        Ok((config, self.only, self.report))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    let default_filter = if cli.verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    // ─── 2) resolve configuration ────────────────────────────────────
    let (config, only, report_path) = cli.into_config()?;
    let run_date = config.run_date.unwrap_or_else(date_parser::today);
    info!(
        base_dir = %config.base_dir.display(),
        run_date = %date_parser::format_run_date(run_date),
        policy = ?config.on_row_error,
        "startup"
    );

    // ─── 3) run pipelines ────────────────────────────────────────────
    let reports = process::run_all(&config, only, run_date)?;

    // ─── 4) report ───────────────────────────────────────────────────
    if let Some(path) = report_path {
        report::write_reports(&path, &reports)
            .with_context(|| format!("writing report {}", path.display()))?;
        info!(path = %path.display(), "wrote run report");
    }

    let written: usize = reports.iter().map(|r| r.written.len()).sum();
    let failed: usize = reports.iter().map(|r| r.failures.len()).sum();
    info!(written, failed, "all done");
    Ok(())
}
