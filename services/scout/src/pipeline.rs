use crate::infra::{parse_date, InMemoryCandidateRepository};
use chrono::{Local, NaiveDate, Utc};
use clap::Args;
use deal_scout::config::{load_criteria_or_standard, AppConfig, PathsConfig};
use deal_scout::error::AppError;
use deal_scout::telemetry;
use deal_scout::workflows::acquisition::domain::ScoreCategory;
use deal_scout::workflows::acquisition::{
    render_markdown, summary_line, CriteriaConfig, CsvCandidateStore, DailyReport, RunOptions,
    RunOutcome, RunState, ScoutService,
};
use deal_scout::workflows::intake::{FileListingSource, ListingSource};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RunArgs {
    /// Exported listings (.json array or .csv)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Score every listing again, including ones seen on earlier runs
    #[arg(long)]
    pub(crate) rescore: bool,
    /// Criteria TOML file (defaults to SCOUT_CRITERIA_PATH or the built-in criteria)
    #[arg(long)]
    pub(crate) criteria: Option<PathBuf>,
    /// Date printed on the daily report (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Exported listings (.json array or .csv)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Criteria TOML file (defaults to SCOUT_CRITERIA_PATH or the built-in criteria)
    #[arg(long)]
    pub(crate) criteria: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CriteriaArgs {
    /// Criteria TOML file (defaults to SCOUT_CRITERIA_PATH or the built-in criteria)
    #[arg(long)]
    pub(crate) criteria: Option<PathBuf>,
}

pub(crate) fn run_pipeline(args: RunArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let criteria = resolve_criteria(args.criteria.as_deref(), &config)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let options = RunOptions {
        rescore: args.rescore,
    };

    let outcome = execute_run(&args.input, &config.paths, criteria, options, today)?;
    println!(
        "{}",
        summary_line(outcome.fetched, outcome.new, &outcome.counts)
    );
    println!("Report: {}", config.paths.report_file().display());
    Ok(())
}

/// Load, score, persist, and report one listing export against the given paths.
pub(crate) fn execute_run(
    input: &Path,
    paths: &PathsConfig,
    criteria: CriteriaConfig,
    options: RunOptions,
    today: NaiveDate,
) -> Result<RunOutcome, AppError> {
    let raw = FileListingSource::new(input)?.load()?;

    let state_path = paths.state_file();
    let mut state = RunState::load(&state_path)?;
    let store = Arc::new(CsvCandidateStore::new(paths.candidates_file()));
    let service = ScoutService::new(store, criteria);

    let outcome = service.process(raw, &mut state, options, Utc::now())?;
    state.save(&state_path)?;

    let report = DailyReport::build(&outcome.records, today);
    write_report(&paths.report_file(), &render_markdown(&report))?;
    Ok(outcome)
}

pub(crate) fn score_listings(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let criteria = resolve_criteria(args.criteria.as_deref(), &config)?;
    let raw = FileListingSource::new(&args.input)?.load()?;

    let service = ScoutService::new(Arc::new(InMemoryCandidateRepository::default()), criteria);
    let scored = service.score_batch(raw);

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &scored).map_err(std::io::Error::from)?;
    writeln!(stdout)?;
    Ok(())
}

pub(crate) fn check_criteria(args: CriteriaArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let criteria = resolve_criteria(args.criteria.as_deref(), &config)?;
    for line in describe_criteria(&criteria) {
        println!("{line}");
    }
    Ok(())
}

fn resolve_criteria(cli: Option<&Path>, config: &AppConfig) -> Result<CriteriaConfig, AppError> {
    let path = cli.or(config.paths.criteria_path.as_deref());
    Ok(load_criteria_or_standard(path)?)
}

fn write_report(path: &Path, markdown: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, markdown)?;
    tracing::info!(path = %path.display(), "daily report written");
    Ok(())
}

pub(crate) fn describe_criteria(criteria: &CriteriaConfig) -> Vec<String> {
    let mut lines = vec![
        format!("Criteria version {} is valid", criteria.version),
        format!(
            "Region: {} | Budget: ${:.0} to ${:.0} | Minimum DSCR: {:.2}",
            criteria.region.name,
            criteria.budget.min_asking_price,
            criteria.budget.max_asking_price,
            criteria.targets.min_dscr
        ),
        format!(
            "Shortlist at {} points (review threshold {})",
            criteria.thresholds.shortlist, criteria.thresholds.review
        ),
    ];
    for category in ScoreCategory::ordered() {
        lines.push(format!(
            "  {:<24} {:>3}",
            category.label(),
            criteria.weights.cap(category)
        ));
    }
    lines
}
