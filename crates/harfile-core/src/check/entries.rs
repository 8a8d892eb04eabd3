use super::{Check, Finding, Severity};
use crate::har::{Entry, Har, Timing};
use url::Url;

/// Per-entry consistency: timing totals, request URLs and post data shape
pub struct EntryCheck;

impl Check for EntryCheck {
    fn check(&self, har: &Har, findings: &mut Vec<Finding>) {
        for (idx, entry) in har.log.entries.iter().enumerate() {
            let path = format!("log.entries[{}]", idx);
            check_timings(&path, entry, findings);
            check_url(&path, entry, findings);
            check_post_data(&path, entry, findings);
        }
    }
}

fn check_timings(path: &str, entry: &Entry, findings: &mut Vec<Finding>) {
    if !entry.timings_consistent() {
        findings.push(Finding::new(
            Severity::Warning,
            format!("{}.time", path),
            format!(
                "time is {} ms but timings add up to {} ms",
                entry.time,
                entry.timings.total()
            ),
        ));
    }

    // ssl is part of connect, so it can never be the larger of the two
    if let (Timing::Millis(ssl), Timing::Millis(connect)) =
        (entry.timings.ssl, entry.timings.connect)
        && ssl > connect
    {
        findings.push(Finding::new(
            Severity::Warning,
            format!("{}.timings.ssl", path),
            format!("ssl ({} ms) exceeds connect ({} ms)", ssl, connect),
        ));
    }
}

fn check_url(path: &str, entry: &Entry, findings: &mut Vec<Finding>) {
    let url_path = format!("{}.request.url", path);
    match Url::parse(&entry.request.url) {
        Ok(url) => {
            if url.fragment().is_some() {
                findings.push(Finding::new(
                    Severity::Warning,
                    url_path,
                    "request URL includes a fragment",
                ));
            }
        }
        Err(e) => {
            tracing::debug!("Failed to parse URL {}: {}", entry.request.url, e);
            findings.push(Finding::new(
                Severity::Warning,
                url_path,
                format!("request URL is not absolute: {}", e),
            ));
        }
    }
}

fn check_post_data(path: &str, entry: &Entry, findings: &mut Vec<Finding>) {
    let Some(post) = &entry.request.post_data else {
        return;
    };

    if post.is_url_encoded() && !post.params.is_empty() && !post.text.is_empty() {
        findings.push(Finding::new(
            Severity::Info,
            format!("{}.request.postData", path),
            "url-encoded body carries both params and text",
        ));
    }
}
