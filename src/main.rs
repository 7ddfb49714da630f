mod analyzer;
mod config;
mod error;
mod parser;
mod reader;
mod report;

use analyzer::AnalysisResults;
use clap::Parser;
use config::{AnalyzerConfig, DEFAULT_CSV_PATH, DEFAULT_FAILED_LOGIN_THRESHOLD, DEFAULT_LOG_PATH};
use std::io::{self, Write};
use std::path::PathBuf;

/// Summarize a web server access log and flag IPs with repeated failed logins
#[derive(Parser, Debug)]
#[command(
    name = "access_log_analyzer",
    author,
    version,
    about = "Counts requests per IP, finds the busiest endpoint and flags failed-login bursts"
)]
struct Args {
    /// Path to the access log to analyze
    #[arg(value_name = "LOG_FILE", default_value = DEFAULT_LOG_PATH)]
    file: PathBuf,

    /// Where to write the CSV report (overwritten if present)
    #[arg(short = 'o', long = "output", default_value = DEFAULT_CSV_PATH, value_name = "CSV_FILE")]
    csv_output: PathBuf,

    /// IPs with more failed logins than this are reported as suspicious
    #[arg(
        short = 't',
        long = "threshold",
        default_value_t = DEFAULT_FAILED_LOGIN_THRESHOLD,
        value_name = "COUNT"
    )]
    threshold: usize,

    /// Also export results as JSON to the specified file path
    #[arg(short = 'j', long = "json-output", value_name = "OUTPUT_FILE")]
    json_output: Option<PathBuf>,

    /// Log extraction and aggregation details to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl From<Args> for AnalyzerConfig {
    fn from(args: Args) -> Self {
        AnalyzerConfig {
            log_path: args.file,
            csv_path: args.csv_output,
            failed_login_threshold: args.threshold,
            json_path: args.json_output,
        }
    }
}

/// Read, extract, aggregate, then write every requested report.
fn run(config: &AnalyzerConfig) -> error::Result<AnalysisResults> {
    let stdout = io::stdout();
    let mut console = stdout.lock();
    run_with_console(config, &mut console)
}

/// The pipeline with the console report going to `console`.
///
/// A console that stops accepting output (closed pipe, full disk) is logged
/// and skipped; the CSV report is still written.
fn run_with_console<W: Write>(
    config: &AnalyzerConfig,
    console: &mut W,
) -> error::Result<AnalysisResults> {
    let lines = reader::read_lines(&config.log_path);
    let extraction = parser::extract(&lines);
    let results = analyzer::analyze(&extraction, lines.len(), config.failed_login_threshold);

    if let Err(e) = report::write_report(&results, &config.log_path, console) {
        log::warn!("console report not shown: {}", e);
    }

    report::write_csv(&results, &config.csv_path)?;
    notify(
        console,
        &format!("✓ CSV report saved to '{}'", config.csv_path.display()),
    );

    if let Some(json_path) = &config.json_path {
        report::export_json(&results, &config.log_path, json_path)?;
        notify(
            console,
            &format!("✓ JSON report saved to '{}'", json_path.display()),
        );
    }

    Ok(results)
}

fn notify<W: Write>(console: &mut W, message: &str) {
    if let Err(e) = writeln!(console, "{}", message) {
        log::warn!("{} (console unavailable: {})", message, e);
    }
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    let config = AnalyzerConfig::from(args);
    log::debug!("running with {:?}", config);

    if let Err(e) = run(&config) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
