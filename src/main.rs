use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use orphanscan::config::{AnalysisMode, Config};
use orphanscan::report::{self, ReportFormat, Reporter};
use orphanscan::OrphanDetector;

/// orphanscan - Find orphaned endpoints and functions in CI
#[derive(Parser, Debug)]
#[command(name = "orphanscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Workspace root to analyze
    #[arg(env = "GITHUB_WORKSPACE", default_value = ".")]
    path: PathBuf,

    /// Analysis mode: static cross-reference (pr) or telemetry join (full)
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated directory names to skip
    #[arg(long, value_name = "DIRS")]
    exclude_paths: Option<String>,

    /// Minimum confidence (0-1) for a finding to be reported
    #[arg(long, value_name = "SCORE")]
    confidence_threshold: Option<f64>,

    /// Write the full JSON result to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: OutputFormat,

    /// Datadog API key (full mode)
    #[arg(long, env = "DD_API_KEY", hide_env_values = true)]
    datadog_api_key: Option<String>,

    /// Datadog application key (full mode)
    #[arg(long, env = "DD_APP_KEY", hide_env_values = true)]
    datadog_app_key: Option<String>,

    /// Datadog site, e.g. datadoghq.eu
    #[arg(long)]
    datadog_site: Option<String>,

    /// Service whose traces are queried (full mode)
    #[arg(long)]
    service_name: Option<String>,

    /// Telemetry window such as 12h, 7d, 2w or 1M
    #[arg(long)]
    time_range: Option<String>,

    /// Honour .gitignore files while walking
    #[arg(long)]
    respect_gitignore: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Full,
    Pr,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Markdown,
    Github,
    Sarif,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Markdown => ReportFormat::Markdown,
            OutputFormat::Github => ReportFormat::Github,
            OutputFormat::Sarif => ReportFormat::Sarif,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("orphanscan v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;

    run_analysis(config, &cli)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(&cli.path)?
    };

    // Override with CLI arguments
    if let Some(mode) = cli.mode {
        config.mode = match mode {
            ModeArg::Full => AnalysisMode::Full,
            ModeArg::Pr => AnalysisMode::Pr,
        };
    }
    if let Some(list) = &cli.exclude_paths {
        config.exclude.extend(Config::parse_exclude_list(list));
    }
    if let Some(threshold) = cli.confidence_threshold {
        config.confidence_threshold = threshold;
    }
    if cli.output.is_some() {
        config.output = cli.output.clone();
    }
    if cli.respect_gitignore {
        config.respect_gitignore = true;
    }

    let telemetry = &mut config.telemetry;
    if cli.datadog_api_key.is_some() {
        telemetry.api_key = cli.datadog_api_key.clone();
    }
    if cli.datadog_app_key.is_some() {
        telemetry.app_key = cli.datadog_app_key.clone();
    }
    if let Some(site) = &cli.datadog_site {
        telemetry.site = site.clone();
    }
    if cli.service_name.is_some() {
        telemetry.service_name = cli.service_name.clone();
    }
    if let Some(range) = &cli.time_range {
        telemetry.time_range = range.clone();
    }

    Ok(config)
}

fn run_analysis(config: Config, cli: &Cli) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting orphaned code detection in {} mode", config.mode);
    info!("Analyzing workspace: {}", cli.path.display());
    info!("Confidence threshold: {}", config.confidence_threshold);
    if config.mode == AnalysisMode::Full {
        info!(
            "Datadog integration enabled for service: {}",
            config.telemetry.service_name.as_deref().unwrap_or_default()
        );
        info!("Time range: {}", config.telemetry.time_range);
    }

    let output_path = config.output.clone();
    let limits = config.report.clone();

    let mut detector = OrphanDetector::new(config);
    if !cli.quiet && matches!(cli.format, OutputFormat::Terminal) {
        detector = detector.with_progress(progress_bar());
    }

    let result = detector
        .run(&cli.path)
        .into_diagnostic()
        .wrap_err("Orphaned code detection failed")?;

    if let Some(path) = &output_path {
        report::write_result_file(path, &result)?;
        info!("Detailed results saved to: {}", display_absolute(path));
    }

    let reporter = Reporter::new(cli.format.into(), cli.path.clone(), limits).with_step_files(
        std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from),
        std::env::var_os("GITHUB_STEP_SUMMARY").map(PathBuf::from),
    );
    reporter.report(&result)?;

    let elapsed = start_time.elapsed();
    if !cli.quiet && matches!(cli.format, OutputFormat::Terminal) {
        println!(
            "{}",
            format!("⏱  Analyzed in {:.2}s", elapsed.as_secs_f64()).dimmed()
        );
    }
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn display_absolute(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
