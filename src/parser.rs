use regex::Regex;
use std::sync::OnceLock;

/// Substrings that mark a line as a failed login attempt
const FAILED_LOGIN_MARKERS: [&str; 2] = ["401", "Invalid credentials"];

/// What a single log line contributed, borrowed from the line itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineMatch<'a> {
    pub ip: Option<&'a str>,
    pub endpoint: Option<&'a str>,
    pub failed_login: bool,
}

/// The three sequences pulled out of a log.
///
/// They grow independently and are not aligned with each other: a line
/// without a request still adds its IP, and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extraction {
    pub ips: Vec<String>,
    pub endpoints: Vec<String>,
    pub failed_logins: Vec<String>,
}

/// Leading dotted quad, e.g.
///   192.168.1.10 - - [10/Oct/2024:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 512
static IP_REGEX: OnceLock<Regex> = OnceLock::new();

/// Quoted request line, capturing the path: `"POST /login HTTP/1.1"`
static ENDPOINT_REGEX: OnceLock<Regex> = OnceLock::new();

fn ip_regex() -> &'static Regex {
    IP_REGEX.get_or_init(|| {
        Regex::new(r"^(?P<ip>\d{1,3}(?:\.\d{1,3}){3})")
            .expect("hard-coded regex should always compile")
    })
}

fn endpoint_regex() -> &'static Regex {
    ENDPOINT_REGEX.get_or_init(|| {
        // Uppercase method only; `"get /x HTTP/1.1"` or `"M1 /x HTTP/1.1"` is not a request.
        Regex::new(r#""[A-Z]+ (?P<endpoint>\S+) HTTP/"#)
            .expect("hard-coded regex should always compile")
    })
}

/// Run all three matchers against one line.
///
/// `failed_login` is only set when the line also starts with an IP, since a
/// failure nobody can be blamed for is not counted.
pub fn extract_line(line: &str) -> LineMatch<'_> {
    let ip = ip_regex()
        .captures(line)
        .and_then(|caps| caps.name("ip"))
        .map(|m| m.as_str());

    let endpoint = endpoint_regex()
        .captures(line)
        .and_then(|caps| caps.name("endpoint"))
        .map(|m| m.as_str());

    let failed_login =
        ip.is_some() && FAILED_LOGIN_MARKERS.iter().any(|marker| line.contains(marker));

    LineMatch {
        ip,
        endpoint,
        failed_login,
    }
}

/// Extract IPs, endpoints and failed-login IPs from every line.
pub fn extract<S: AsRef<str>>(lines: &[S]) -> Extraction {
    let mut out = Extraction::default();

    for line in lines {
        let found = extract_line(line.as_ref());

        if let Some(ip) = found.ip {
            out.ips.push(ip.to_string());
            if found.failed_login {
                out.failed_logins.push(ip.to_string());
            }
        }
        if let Some(endpoint) = found.endpoint {
            out.endpoints.push(endpoint.to_string());
        }
    }

    log::debug!(
        "extracted {} IP(s), {} endpoint(s), {} failed login(s) from {} line(s)",
        out.ips.len(),
        out.endpoints.len(),
        out.failed_logins.len(),
        lines.len()
    );
    out
}

// ─── Unit Tests ──────────────────────────────────────────────────────────────
