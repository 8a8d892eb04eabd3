use super::types::*;
use super::values::Timing;
use crate::{Error, Result};
use serde::{Serialize, Serializer};

/// Output options for [`encode_with`]
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    /// Indent the output for humans; otherwise emit a single line
    pub pretty: bool,
}

/// Encode a HAR document as compact JSON.
///
/// Fields are written in HAR's documented order, absent optional fields are left
/// out, and `-1` sentinels are written literally. Fails with
/// [`Error::UnencodableValue`] when a required field was never filled in.
pub fn encode(har: &Har) -> Result<Vec<u8>> {
    encode_with(har, EncodeOptions::default())
}

/// Encode a HAR document as indented JSON
pub fn encode_pretty(har: &Har) -> Result<Vec<u8>> {
    encode_with(har, EncodeOptions { pretty: true })
}

pub fn encode_with(har: &Har, options: EncodeOptions) -> Result<Vec<u8>> {
    tracing::debug!(
        "Encoding HAR with {} entries (pretty: {})",
        har.log.entries.len(),
        options.pretty
    );

    if let Some(problem) = encodability_problems(har).into_iter().next() {
        return Err(problem);
    }

    let wire = Wire { log: &har.log };
    let bytes = if options.pretty {
        serde_json::to_vec_pretty(&wire)?
    } else {
        serde_json::to_vec(&wire)?
    };

    tracing::debug!("Encoded HAR into {} bytes", bytes.len());

    Ok(bytes)
}

/// Every required field left in its unset state, as `UnencodableValue` errors.
///
/// Empty means [`encode`] will succeed.
pub fn encodability_problems(har: &Har) -> Vec<Error> {
    let mut problems = Vec::new();
    let log = &har.log;

    if log.creator.name.is_empty() {
        problems.push(Error::unencodable("log.creator.name", "creator name is empty"));
    }

    for (idx, page) in log.pages.iter().enumerate() {
        let path = format!("log.pages[{}]", idx);
        if page.id.is_empty() {
            problems.push(Error::unencodable(format!("{}.id", path), "page id is empty"));
        }
        if page.started_date_time.as_str().is_empty() {
            problems.push(Error::unencodable(
                format!("{}.startedDateTime", path),
                "start time is not set",
            ));
        }
        check_timing(
            &mut problems,
            &format!("{}.pageTimings.onContentLoad", path),
            page.page_timings.on_content_load,
        );
        check_timing(
            &mut problems,
            &format!("{}.pageTimings.onLoad", path),
            page.page_timings.on_load,
        );
    }

    for (idx, entry) in log.entries.iter().enumerate() {
        check_entry(&mut problems, &format!("log.entries[{}]", idx), entry);
    }

    problems
}

fn check_entry(problems: &mut Vec<Error>, path: &str, entry: &Entry) {
    if entry.started_date_time.as_str().is_empty() {
        problems.push(Error::unencodable(
            format!("{}.startedDateTime", path),
            "start time is not set",
        ));
    }
    check_millis(problems, &format!("{}.time", path), entry.time);

    if entry.request.method.is_empty() {
        problems.push(Error::unencodable(
            format!("{}.request.method", path),
            "request method is empty",
        ));
    }
    if entry.request.url.is_empty() {
        problems.push(Error::unencodable(
            format!("{}.request.url", path),
            "request URL is empty",
        ));
    }
    if entry.response.status == 0 {
        problems.push(Error::unencodable(
            format!("{}.response.status", path),
            "response status is not set",
        ));
    }

    let timings = &entry.timings;
    for (name, timing) in [
        ("blocked", timings.blocked),
        ("dns", timings.dns),
        ("connect", timings.connect),
        ("ssl", timings.ssl),
    ] {
        check_timing(problems, &format!("{}.timings.{}", path, name), timing);
    }
    for (name, millis) in [
        ("send", timings.send),
        ("wait", timings.wait),
        ("receive", timings.receive),
    ] {
        check_millis(problems, &format!("{}.timings.{}", path, name), millis);
    }
}

// `Millis(-1.0)` would be written as `-1` and read back as `NotApplicable`
fn check_timing(problems: &mut Vec<Error>, path: &str, timing: Timing) {
    if let Timing::Millis(millis) = timing {
        check_millis(problems, path, millis);
    }
}

fn check_millis(problems: &mut Vec<Error>, path: &str, millis: f64) {
    if !millis.is_finite() {
        problems.push(Error::unencodable(path, "value is not a finite number"));
    } else if millis < 0.0 {
        problems.push(Error::unencodable(path, "duration is negative"));
    }
}

#[derive(Serialize)]
struct Wire<'a> {
    log: &'a Log,
}

impl Serialize for Har {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if let Some(problem) = encodability_problems(self).into_iter().next() {
            return Err(serde::ser::Error::custom(problem));
        }
        Wire { log: &self.log }.serialize(serializer)
    }
}
