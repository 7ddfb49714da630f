use std::path::PathBuf;

pub const DEFAULT_LOG_PATH: &str = "access.log";
pub const DEFAULT_CSV_PATH: &str = "log_analysis_results.csv";

/// IPs with strictly more failed logins than this are reported as suspicious
pub const DEFAULT_FAILED_LOGIN_THRESHOLD: usize = 10;

/// Everything the pipeline needs to know about where to read and write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub log_path: PathBuf,
    pub csv_path: PathBuf,
    pub failed_login_threshold: usize,
    /// Optional JSON export alongside the CSV report
    pub json_path: Option<PathBuf>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            failed_login_threshold: DEFAULT_FAILED_LOGIN_THRESHOLD,
            json_path: None,
        }
    }
}
