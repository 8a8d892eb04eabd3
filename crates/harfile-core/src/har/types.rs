use super::values::{Size, Timestamp, Timing, serialize_millis};
use crate::Error;
use serde::{Serialize, Serializer};

/// Version assumed when a log leaves out `version`
pub const DEFAULT_VERSION: &str = "1.1";

/// Version written by [`Har::new`]
pub const HAR_VERSION: &str = "1.2";

/// Top-level HAR object
///
/// `Serialize` and `Deserialize` go through the codec, so a `Har` embedded in
/// another serde document obeys the same omission and sentinel rules as
/// [`encode`](super::encode) and [`decode`](super::decode).
#[derive(Debug, Clone, PartialEq)]
pub struct Har {
    pub log: Log,
}

impl Har {
    pub fn new(creator: Creator) -> Self {
        Self {
            log: Log {
                version: HAR_VERSION.to_string(),
                creator,
                browser: None,
                pages: Vec::new(),
                entries: Vec::new(),
                comment: None,
            },
        }
    }

    /// Every page or entry whose start time was kept as a raw, unparseable string
    pub fn timestamp_issues(&self) -> Vec<Error> {
        let pages = self
            .log
            .pages
            .iter()
            .enumerate()
            .map(|(idx, page)| {
                (
                    format!("log.pages[{}].startedDateTime", idx),
                    &page.started_date_time,
                )
            });
        let entries = self
            .log
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                (
                    format!("log.entries[{}].startedDateTime", idx),
                    &entry.started_date_time,
                )
            });

        pages
            .chain(entries)
            .filter(|(_, ts)| !ts.is_valid())
            .map(|(path, ts)| Error::InvalidTimestamp {
                path,
                raw: ts.as_str().to_string(),
            })
            .collect()
    }
}

/// Main HAR log object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Log {
    pub version: String,
    pub creator: Creator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<Creator>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<Page>,
    pub entries: Vec<Entry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Creator/Browser information
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Creator {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Creator {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            comment: None,
        }
    }
}

/// Page information
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Page {
    #[serde(rename = "startedDateTime")]
    pub started_date_time: Timestamp,
    /// Referenced by [`Entry::page_ref`]
    pub id: String,
    pub title: String,
    #[serde(rename = "pageTimings")]
    pub page_timings: PageTimings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Page load milestones, in milliseconds since `Page::started_date_time`
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PageTimings {
    #[serde(rename = "onContentLoad", skip_serializing_if = "Timing::is_unmeasured")]
    pub on_content_load: Timing,
    #[serde(rename = "onLoad", skip_serializing_if = "Timing::is_unmeasured")]
    pub on_load: Timing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Individual HTTP transaction entry
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Entry {
    #[serde(rename = "pageref", skip_serializing_if = "Option::is_none")]
    pub page_ref: Option<String>,
    #[serde(rename = "startedDateTime")]
    pub started_date_time: Timestamp,
    /// Total elapsed milliseconds; should equal [`Timings::total`]
    #[serde(serialize_with = "serialize_millis")]
    pub time: f64,
    pub request: Request,
    pub response: Response,
    pub cache: Cache,
    pub timings: Timings,
    #[serde(rename = "serverIPAddress", skip_serializing_if = "Option::is_none")]
    pub server_ip_address: Option<String>,
    /// Opaque connection id (often a port number); not guaranteed unique
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Entry {
    /// Whether `time` matches the sum of the measured timing phases.
    ///
    /// Producers commonly round each phase, so a half-millisecond drift is allowed.
    pub fn timings_consistent(&self) -> bool {
        (self.time - self.timings.total()).abs() <= 0.5
    }
}

/// HTTP request
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Request {
    pub method: String,
    pub url: String,
    #[serde(rename = "httpVersion")]
    pub http_version: String,
    pub cookies: Vec<Cookie>,
    pub headers: Vec<NameValuePair>,
    #[serde(rename = "queryString")]
    pub query_string: Vec<NameValuePair>,
    #[serde(rename = "postData", skip_serializing_if = "Option::is_none")]
    pub post_data: Option<PostData>,
    #[serde(rename = "headersSize")]
    pub headers_size: Size,
    #[serde(rename = "bodySize")]
    pub body_size: Size,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// HTTP response
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Response {
    /// 0 means "not set" and is rejected by the encoder
    pub status: i64,
    #[serde(rename = "statusText")]
    pub status_text: String,
    #[serde(rename = "httpVersion")]
    pub http_version: String,
    pub cookies: Vec<Cookie>,
    pub headers: Vec<NameValuePair>,
    pub content: Content,
    /// Empty when the response is not a redirect
    #[serde(rename = "redirectURL")]
    pub redirect_url: String,
    #[serde(rename = "headersSize")]
    pub headers_size: Size,
    /// `Size::Bytes(0)` marks a response served from the cache (304)
    #[serde(rename = "bodySize")]
    pub body_size: Size,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Cookie
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// ISO 8601 expiry, kept verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    #[serde(rename = "httpOnly")]
    pub http_only: bool,
    pub secure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Name/value pair, used for both headers and query parameters
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NameValuePair {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl NameValuePair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            comment: None,
        }
    }
}

/// POST data
///
/// `params` and `text` are alternative renderings of the same body; either or
/// both may be populated. Both are always written, empty when unused.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PostData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub params: Vec<Param>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// POST parameter
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Param {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "fileName", skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Response content
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Content {
    pub size: i64,
    /// Bytes saved by compression; `None` when not reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<i64>,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Encoding applied to `text`, e.g. "base64"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Cache information
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Cache {
    #[serde(rename = "beforeRequest", skip_serializing_if = "CacheSlot::is_unknown")]
    pub before_request: CacheSlot,
    #[serde(rename = "afterRequest", skip_serializing_if = "CacheSlot::is_unknown")]
    pub after_request: CacheSlot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// State of one side (before/after the request) of a cache entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CacheSlot {
    /// Field absent: no information available
    #[default]
    Unknown,
    /// Field set to `null`: the resource was not in the cache
    NotCached,
    Entry(CacheData),
}

impl CacheSlot {
    pub fn is_unknown(&self) -> bool {
        matches!(self, CacheSlot::Unknown)
    }

    pub fn entry(&self) -> Option<&CacheData> {
        match self {
            CacheSlot::Entry(data) => Some(data),
            _ => None,
        }
    }
}

impl Serialize for CacheSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CacheSlot::Entry(data) => data.serialize(serializer),
            CacheSlot::Unknown | CacheSlot::NotCached => serializer.serialize_none(),
        }
    }
}

/// Cache entry
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CacheData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    #[serde(rename = "lastAccess")]
    pub last_access: String,
    #[serde(rename = "eTag")]
    pub e_tag: String,
    #[serde(rename = "hitCount")]
    pub hit_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Timing information, in milliseconds
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Timings {
    #[serde(skip_serializing_if = "Timing::is_unmeasured")]
    pub blocked: Timing,
    #[serde(skip_serializing_if = "Timing::is_unmeasured")]
    pub dns: Timing,
    #[serde(skip_serializing_if = "Timing::is_unmeasured")]
    pub connect: Timing,
    #[serde(serialize_with = "serialize_millis")]
    pub send: f64,
    #[serde(serialize_with = "serialize_millis")]
    pub wait: f64,
    #[serde(serialize_with = "serialize_millis")]
    pub receive: f64,
    /// Already included in `connect`
    #[serde(skip_serializing_if = "Timing::is_unmeasured")]
    pub ssl: Timing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Timings {
    /// Sum of all phases that carry a duration.
    ///
    /// Unmeasured and not-applicable phases contribute nothing, and `ssl` is
    /// skipped because it is part of `connect`.
    pub fn total(&self) -> f64 {
        let optional: f64 = [self.blocked, self.dns, self.connect]
            .iter()
            .filter_map(|timing| timing.millis())
            .sum();
        optional + self.send + self.wait + self.receive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timings_total_skips_ssl_and_sentinels() {
        let timings = Timings {
            blocked: Timing::NotApplicable,
            dns: Timing::Millis(5.0),
            connect: Timing::Millis(20.0),
            send: 1.0,
            wait: 30.5,
            receive: 3.5,
            ssl: Timing::Millis(12.0),
            ..Default::default()
        };

        assert_eq!(timings.total(), 60.0);
    }

    #[test]
    fn test_entry_timings_consistent() {
        let mut entry = Entry {
            time: 10.0,
            timings: Timings {
                send: 1.0,
                wait: 8.0,
                receive: 1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(entry.timings_consistent());

        entry.time = 25.0;
        assert!(!entry.timings_consistent());
    }

    #[test]
    fn test_cache_slot_serialization() {
        let cache = Cache {
            before_request: CacheSlot::NotCached,
            after_request: CacheSlot::Unknown,
            comment: None,
        };

        let json = serde_json::to_string(&cache).unwrap();
        assert_eq!(json, r#"{"beforeRequest":null}"#);
    }

    #[test]
    fn test_post_data_always_writes_params_and_text() {
        let post = PostData {
            mime_type: "application/json".to_string(),
            text: r#"{"a":1}"#.to_string(),
            ..Default::default()
        };

        let json = serde_json::to_string(&post).unwrap();
        assert_eq!(
            json,
            r#"{"mimeType":"application/json","params":[],"text":"{\"a\":1}"}"#
        );
    }

    #[test]
    fn test_timestamp_issues_lists_paths() {
        let mut har = Har::new(Creator::new("test", "1.0"));
        har.log.entries.push(Entry {
            started_date_time: Timestamp::parse("2020-01-01T00:00:00.000Z"),
            ..Default::default()
        });
        har.log.entries.push(Entry {
            started_date_time: Timestamp::parse("not a date"),
            ..Default::default()
        });

        let issues = har.timestamp_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path(), Some("log.entries[1].startedDateTime"));
    }
}
