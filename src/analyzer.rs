use crate::parser::Extraction;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Occurrence counter that remembers the order keys were first seen.
///
/// Tie-breaks in this crate are "first seen wins", so iteration order is
/// part of the contract and a plain `HashMap` is not enough.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every item, in order.
    pub fn from_items<S: AsRef<str>>(items: &[S]) -> Self {
        let mut table = Self::new();
        for item in items {
            table.increment(item.as_ref());
        }
        table
    }

    pub fn increment(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.index.get(key).map(|&slot| self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries by descending count; equal counts keep first-seen order.
    pub fn sorted_by_count_desc(&self) -> Vec<(&str, usize)> {
        let mut sorted: Vec<(&str, usize)> = self.iter().collect();
        // stable sort
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }

    /// Keep only the entries matching `keep`, preserving order.
    pub fn retain<F: FnMut(&str, usize) -> bool>(&mut self, mut keep: F) {
        self.entries.retain(|(k, v)| keep(k.as_str(), *v));
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(slot, (k, _))| (k.clone(), slot))
            .collect();
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

/// The most requested endpoint and how often it was hit.
///
/// An empty `endpoint` with a zero count means no request lines were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EndpointHit {
    pub endpoint: String,
    pub count: usize,
}

impl EndpointHit {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// The complete analysis output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResults {
    pub total_lines: usize,
    pub requests_per_ip: FrequencyTable,
    pub most_accessed_endpoint: EndpointHit,
    pub suspicious_activity: FrequencyTable,
    pub failed_login_threshold: usize,
}

/// How many times each IP appears, in first-seen order.
pub fn count_requests_per_ip<S: AsRef<str>>(ips: &[S]) -> FrequencyTable {
    FrequencyTable::from_items(ips)
}

/// The endpoint with the highest count. On a tie the endpoint seen first
/// wins. Returns the empty [`EndpointHit`] when there are no endpoints.
pub fn find_most_accessed_endpoint<S: AsRef<str>>(endpoints: &[S]) -> EndpointHit {
    let counts = FrequencyTable::from_items(endpoints);

    let mut best: Option<(&str, usize)> = None;
    for (endpoint, count) in counts.iter() {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((endpoint, count));
        }
    }

    best.map(|(endpoint, count)| EndpointHit {
        endpoint: endpoint.to_string(),
        count,
    })
    .unwrap_or_default()
}

/// Failed-login counts per IP, keeping only IPs strictly above `threshold`.
pub fn detect_suspicious_activity<S: AsRef<str>>(
    failed_logins: &[S],
    threshold: usize,
) -> FrequencyTable {
    let mut table = FrequencyTable::from_items(failed_logins);
    table.retain(|_, count| count > threshold);
    table
}

/// Run all three aggregations over an extraction.
pub fn analyze(extraction: &Extraction, total_lines: usize, threshold: usize) -> AnalysisResults {
    let requests_per_ip = count_requests_per_ip(&extraction.ips);
    let most_accessed_endpoint = find_most_accessed_endpoint(&extraction.endpoints);
    let suspicious_activity = detect_suspicious_activity(&extraction.failed_logins, threshold);

    log::debug!(
        "{} distinct IP(s), {} suspicious above threshold {}",
        requests_per_ip.len(),
        suspicious_activity.len(),
        threshold
    );

    AnalysisResults {
        total_lines,
        requests_per_ip,
        most_accessed_endpoint,
        suspicious_activity,
        failed_login_threshold: threshold,
    }
}
