mod entries;
mod pages;

pub use entries::EntryCheck;
pub use pages::PageCheck;

use crate::har::{Har, encodability_problems};
use serde::Serialize;

/// How much a finding matters.
///
/// `Error` findings mean the archive will not survive a re-encode intact or
/// carries data a reader cannot interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A conformance observation about one field of a decoded archive
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub path: String,
    pub message: String,
}

impl Finding {
    pub fn new(severity: Severity, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub pages: usize,
    pub entries: usize,
    pub findings: Vec<Finding>,
}

impl CheckReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    pub fn worst(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }

    pub fn has_errors(&self) -> bool {
        self.worst() == Some(Severity::Error)
    }
}

pub trait Check {
    fn check(&self, har: &Har, findings: &mut Vec<Finding>);
}

/// Start times that were kept as raw strings
pub struct TimestampCheck;

impl Check for TimestampCheck {
    fn check(&self, har: &Har, findings: &mut Vec<Finding>) {
        for issue in har.timestamp_issues() {
            let path = issue.path().unwrap_or_default().to_string();
            findings.push(Finding::new(Severity::Error, path, issue.to_string()));
        }
    }
}

/// Required fields the encoder would refuse
pub struct EncodabilityCheck;

impl Check for EncodabilityCheck {
    fn check(&self, har: &Har, findings: &mut Vec<Finding>) {
        for problem in encodability_problems(har) {
            let path = problem.path().unwrap_or_default().to_string();
            findings.push(Finding::new(Severity::Error, path, problem.to_string()));
        }
    }
}

/// Run every check over a decoded archive
pub fn check_har(har: &Har) -> CheckReport {
    tracing::debug!("Checking HAR conformance");

    let checks: [&dyn Check; 4] = [&TimestampCheck, &EncodabilityCheck, &PageCheck, &EntryCheck];
    let mut findings = Vec::new();
    for check in checks {
        check.check(har, &mut findings);
    }

    let report = CheckReport {
        pages: har.log.pages.len(),
        entries: har.log.entries.len(),
        findings,
    };

    tracing::info!(
        "Conformance check complete: {} errors, {} warnings",
        report.count(Severity::Error),
        report.count(Severity::Warning)
    );

    report
}
