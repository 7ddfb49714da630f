use crate::analyzer::AnalysisResults;
use crate::error::{AnalyzerError, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

const SEPARATOR: &str =
    "════════════════════════════════════════════════════════════════════";
const THIN_SEP: &str =
    "────────────────────────────────────────────────────────────────────";

const NO_DATA: &str = "No data available";

/// Width of the IP column in the console tables
const IP_WIDTH: usize = 20;

/// Write the human-readable report: requests per IP (busiest first), the
/// most accessed endpoint, then IPs over the failed-login threshold.
pub fn write_report<W: Write>(
    results: &AnalysisResults,
    source_file: &Path,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "\n{}", SEPARATOR.cyan().bold())?;
    writeln!(out, "{}", "  ACCESS LOG ANALYSIS REPORT".white().bold())?;
    writeln!(out, "{}", SEPARATOR.cyan().bold())?;
    writeln!(out, "  Source : {}", source_file.display().to_string().yellow())?;
    writeln!(out, "  Lines  : {}", results.total_lines)?;
    writeln!(out)?;

    // ── Requests per IP ───────────────────────────────────────────────────────
    section_header(out, "Requests per IP")?;
    if results.requests_per_ip.is_empty() {
        writeln!(out, "  {}", NO_DATA.dimmed())?;
    } else {
        writeln!(out, "  {:<width$} {}", "IP Address", "Request Count", width = IP_WIDTH)?;
        for (ip, count) in results.requests_per_ip.sorted_by_count_desc() {
            writeln!(out, "  {:<width$} {}", ip.cyan(), count, width = IP_WIDTH)?;
        }
    }
    writeln!(out)?;

    // ── Most accessed endpoint ────────────────────────────────────────────────
    section_header(out, "Most Frequently Accessed Endpoint")?;
    let hit = &results.most_accessed_endpoint;
    if hit.is_empty() {
        writeln!(out, "  {}", NO_DATA.dimmed())?;
    } else {
        writeln!(
            out,
            "  {} (Accessed {} times)",
            hit.endpoint.cyan().bold(),
            hit.count
        )?;
    }
    writeln!(out)?;

    // ── Suspicious activity ───────────────────────────────────────────────────
    section_header(out, "Suspicious Activity Detected")?;
    if results.suspicious_activity.is_empty() {
        writeln!(out, "  {}", NO_DATA.dimmed())?;
    } else {
        writeln!(
            out,
            "  {:<width$} {}",
            "IP Address",
            "Failed Login Attempts",
            width = IP_WIDTH
        )?;
        for (ip, count) in results.suspicious_activity.iter() {
            writeln!(
                out,
                "  {:<width$} {}",
                ip.red().bold(),
                count.to_string().red(),
                width = IP_WIDTH
            )?;
        }
    }

    writeln!(out, "\n{}\n", SEPARATOR.cyan())
}

/// Write the three CSV sections to `out`.
///
/// Empty sections get a single `No data available` row in place of their
/// column header. Sections are separated by one blank line, with none after
/// the last.
pub fn render_csv<W: Write>(results: &AnalysisResults, mut out: W) -> csv::Result<()> {
    write_section(
        &mut out,
        "Requests per IP",
        ["IP Address", "Request Count"],
        &results.requests_per_ip.sorted_by_count_desc(),
    )?;
    out.write_all(b"\n")?;

    let hit = &results.most_accessed_endpoint;
    let endpoint_rows = if hit.is_empty() {
        Vec::new()
    } else {
        vec![(hit.endpoint.as_str(), hit.count)]
    };
    write_section(
        &mut out,
        "Most Accessed Endpoint",
        ["Endpoint", "Access Count"],
        &endpoint_rows,
    )?;
    out.write_all(b"\n")?;

    let suspicious_rows: Vec<(&str, usize)> = results.suspicious_activity.iter().collect();
    write_section(
        &mut out,
        "Suspicious Activity",
        ["IP Address", "Failed Login Count"],
        &suspicious_rows,
    )?;

    out.flush()?;
    Ok(())
}

/// Write the CSV report to `path`, replacing any existing file
pub fn write_csv(results: &AnalysisResults, path: &Path) -> Result<()> {
    let to_write_error = |source: csv::Error| AnalyzerError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|e| to_write_error(e.into()))?;
    render_csv(results, file).map_err(to_write_error)
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    source: String,
    #[serde(flatten)]
    results: &'a AnalysisResults,
}

/// Export the analysis results as JSON to the given path
pub fn export_json(results: &AnalysisResults, source_file: &Path, path: &Path) -> Result<()> {
    let report = JsonReport {
        generated_at: Utc::now(),
        source: source_file.display().to_string(),
        results,
    };
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(path, json)?;
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn section_header<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "  {} {}", "▶".cyan(), title.white().bold())?;
    writeln!(out, "  {}", THIN_SEP)
}

/// One titled block. The csv writer only lives for the block, so the blank
/// line between blocks can go straight to `out` instead of becoming a `""`
/// record.
fn write_section<W: Write>(
    out: &mut W,
    title: &str,
    columns: [&str; 2],
    rows: &[(&str, usize)],
) -> csv::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record([title])?;
    if rows.is_empty() {
        writer.write_record([NO_DATA])?;
    } else {
        writer.write_record(columns)?;
        for (key, count) in rows {
            writer.write_record([*key, count.to_string().as_str()])?;
        }
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::parser::Extraction;
    use tempfile::tempdir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample_results() -> AnalysisResults {
        let mut failed = vec!["10.0.0.9".to_string(); 11];
        failed.extend(vec!["10.0.0.2".to_string(); 3]);
        let extraction = Extraction {
            ips: strings(&["10.0.0.2", "10.0.0.9", "10.0.0.9", "10.0.0.3"]),
            endpoints: strings(&["/login", "/home", "/login"]),
            failed_logins: failed,
        };
        analyze(&extraction, 4, 10)
    }

    fn csv_string(results: &AnalysisResults) -> String {
        let mut buf = Vec::new();
        render_csv(results, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn csv_has_three_sections_in_order() {
        let expected = "\
Requests per IP
IP Address,Request Count
10.0.0.9,2
10.0.0.2,1
10.0.0.3,1

Most Accessed Endpoint
Endpoint,Access Count
/login,2

Suspicious Activity
IP Address,Failed Login Count
10.0.0.9,11
";
        assert_eq!(csv_string(&sample_results()), expected);
    }

    #[test]
    fn csv_empty_sections_say_no_data() {
        let extraction = Extraction {
            ips: strings(&["1.1.1.1", "1.1.1.1"]),
            ..Extraction::default()
        };
        let csv = csv_string(&analyze(&extraction, 2, 10));

        let expected = "\
Requests per IP
IP Address,Request Count
1.1.1.1,2

Most Accessed Endpoint
No data available

Suspicious Activity
No data available
";
        assert_eq!(csv, expected);
        assert!(!csv.contains("Endpoint,Access Count"));
        assert!(!csv.contains("Failed Login Count"));
    }

    #[test]
    fn csv_all_empty_has_no_trailing_blank_row() {
        let csv = csv_string(&analyze(&Extraction::default(), 0, 10));
        assert_eq!(csv.matches(NO_DATA).count(), 3);
        assert!(csv.ends_with("Suspicious Activity\nNo data available\n"));
    }

    #[test]
    fn csv_separators_are_empty_lines_not_quoted_fields() {
        let csv = csv_string(&analyze(&Extraction::default(), 0, 10));
        assert!(!csv.contains("\"\""));
        assert_eq!(csv.matches("\n\n").count(), 2);
        assert!(csv.contains("No data available\n\nMost Accessed Endpoint\n"));
        assert!(csv.contains("No data available\n\nSuspicious Activity\n"));
    }

    #[test]
    fn csv_quotes_endpoints_with_commas() {
        let extraction = Extraction {
            endpoints: strings(&["/search?q=a,b"]),
            ..Extraction::default()
        };
        let csv = csv_string(&analyze(&extraction, 1, 10));
        assert!(csv.contains("\"/search?q=a,b\",1\n"));
    }

    #[test]
    fn write_csv_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        std::fs::write(&path, "stale contents that should disappear").unwrap();

        write_csv(&sample_results(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Requests per IP\n"));
        assert!(!written.contains("stale"));
    }

    #[test]
    fn write_csv_reports_unwritable_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("results.csv");
        let err = write_csv(&sample_results(), &path).unwrap_err();
        assert!(matches!(err, AnalyzerError::Write { .. }));
        assert!(err.to_string().contains("results.csv"));
    }

    #[test]
    fn console_report_sections_and_sorting() {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        write_report(&sample_results(), Path::new("access.log"), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let requests = text.find("Requests per IP").unwrap();
        let endpoint = text.find("Most Frequently Accessed Endpoint").unwrap();
        let suspicious = text.find("Suspicious Activity Detected").unwrap();
        assert!(requests < endpoint && endpoint < suspicious);

        let busiest = text.find(&format!("  {:<20} 2", "10.0.0.9")).unwrap();
        let quieter = text.find(&format!("  {:<20} 1", "10.0.0.2")).unwrap();
        assert!(busiest < quieter);
        assert!(text.contains("/login (Accessed 2 times)"));
        assert!(text.contains(&format!("  {:<20} 11", "10.0.0.9")));
    }

    #[test]
    fn console_report_handles_empty_results() {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        let results = analyze(&Extraction::default(), 0, 10);
        write_report(&results, Path::new("missing.log"), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.matches(NO_DATA).count(), 3);
        assert!(!text.contains("Failed Login Attempts"));
    }

    #[test]
    fn json_export_includes_results() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        export_json(&sample_results(), Path::new("access.log"), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["source"], "access.log");
        assert_eq!(value["requests_per_ip"]["10.0.0.9"], 2);
        assert_eq!(value["most_accessed_endpoint"]["endpoint"], "/login");
        assert_eq!(value["suspicious_activity"]["10.0.0.9"], 11);
        assert!(value["generated_at"].is_string());
    }
}
