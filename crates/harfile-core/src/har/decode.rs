use super::types::*;
use super::values::{Size, Timestamp, Timing};
use crate::{Error, Result};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Decode a HAR document from raw JSON bytes.
///
/// Structural problems abort with [`Error::MalformedInput`] or [`Error::TypeMismatch`].
/// A start time that is not ISO 8601 does not: the raw string is kept on the record and
/// reported by [`Har::timestamp_issues`]. Keys the model does not know are ignored.
pub fn decode(bytes: &[u8]) -> Result<Har> {
    tracing::debug!("Decoding HAR from {} bytes", bytes.len());

    let value: Value = serde_json::from_slice(bytes).map_err(|e| Error::MalformedInput {
        path: "$".to_string(),
        reason: e.to_string(),
    })?;

    decode_value(&value)
}

/// Decode a HAR document from a JSON string
pub fn decode_str(content: &str) -> Result<Har> {
    decode(content.as_bytes())
}

/// Decode a HAR document from an already parsed JSON value
pub fn decode_value(value: &Value) -> Result<Har> {
    let root = value.as_object().ok_or_else(|| Error::MalformedInput {
        path: "$".to_string(),
        reason: format!("expected an object with a `log` key, found {}", describe(value)),
    })?;

    let log = root
        .get("log")
        .ok_or_else(|| Error::missing("log".to_string()))?;
    let log = Object::new(log, "log".to_string())?;

    let har = Har {
        log: decode_log(&log)?,
    };

    let invalid = har.timestamp_issues().len();
    tracing::info!(
        "Decoded HAR with {} pages and {} entries ({} invalid timestamps)",
        har.log.pages.len(),
        har.log.entries.len(),
        invalid
    );

    Ok(har)
}

impl<'de> Deserialize<'de> for Har {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_value(&value).map_err(serde::de::Error::custom)
    }
}

fn decode_log(obj: &Object<'_>) -> Result<Log> {
    Ok(Log {
        version: obj
            .opt_string("version")?
            .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        creator: decode_creator(&obj.object("creator")?)?,
        browser: obj
            .opt_object("browser")?
            .map(|browser| decode_creator(&browser))
            .transpose()?,
        pages: obj.opt_list("pages", decode_page)?,
        entries: obj.list("entries", decode_entry)?,
        comment: obj.opt_string("comment")?,
    })
}

fn decode_creator(obj: &Object<'_>) -> Result<Creator> {
    Ok(Creator {
        name: obj.string("name")?,
        version: obj.string("version")?,
        comment: obj.opt_string("comment")?,
    })
}

fn decode_page(obj: &Object<'_>) -> Result<Page> {
    Ok(Page {
        started_date_time: obj.timestamp("startedDateTime")?,
        id: obj.string("id")?,
        title: obj.string("title")?,
        page_timings: decode_page_timings(&obj.object("pageTimings")?)?,
        comment: obj.opt_string("comment")?,
    })
}

fn decode_page_timings(obj: &Object<'_>) -> Result<PageTimings> {
    Ok(PageTimings {
        on_content_load: obj.timing("onContentLoad")?,
        on_load: obj.timing("onLoad")?,
        comment: obj.opt_string("comment")?,
    })
}

fn decode_entry(obj: &Object<'_>) -> Result<Entry> {
    Ok(Entry {
        page_ref: obj.opt_string("pageref")?,
        started_date_time: obj.timestamp("startedDateTime")?,
        time: obj.millis("time")?,
        request: decode_request(&obj.object("request")?)?,
        response: decode_response(&obj.object("response")?)?,
        cache: decode_cache(&obj.object("cache")?)?,
        timings: decode_timings(&obj.object("timings")?)?,
        server_ip_address: obj.opt_string("serverIPAddress")?,
        connection: obj.opt_string("connection")?,
        comment: obj.opt_string("comment")?,
    })
}

fn decode_request(obj: &Object<'_>) -> Result<Request> {
    Ok(Request {
        method: obj.string("method")?,
        url: obj.string("url")?,
        http_version: obj.string("httpVersion")?,
        cookies: obj.list("cookies", decode_cookie)?,
        headers: obj.list("headers", decode_name_value)?,
        query_string: obj.list("queryString", decode_name_value)?,
        post_data: obj
            .opt_object("postData")?
            .map(|post| decode_post_data(&post))
            .transpose()?,
        headers_size: obj.size("headersSize")?,
        body_size: obj.size("bodySize")?,
        comment: obj.opt_string("comment")?,
    })
}

fn decode_response(obj: &Object<'_>) -> Result<Response> {
    Ok(Response {
        status: obj.integer("status")?,
        status_text: obj.string("statusText")?,
        http_version: obj.string("httpVersion")?,
        cookies: obj.list("cookies", decode_cookie)?,
        headers: obj.list("headers", decode_name_value)?,
        content: decode_content(&obj.object("content")?)?,
        redirect_url: obj.string("redirectURL")?,
        headers_size: obj.size("headersSize")?,
        body_size: obj.size("bodySize")?,
        comment: obj.opt_string("comment")?,
    })
}

fn decode_cookie(obj: &Object<'_>) -> Result<Cookie> {
    Ok(Cookie {
        name: obj.string("name")?,
        value: obj.string("value")?,
        path: obj.opt_string("path")?,
        domain: obj.opt_string("domain")?,
        expires: obj.opt_string("expires")?,
        http_only: obj.flag("httpOnly")?,
        secure: obj.flag("secure")?,
        comment: obj.opt_string("comment")?,
    })
}

fn decode_name_value(obj: &Object<'_>) -> Result<NameValuePair> {
    Ok(NameValuePair {
        name: obj.string("name")?,
        value: obj.string("value")?,
        comment: obj.opt_string("comment")?,
    })
}

fn decode_post_data(obj: &Object<'_>) -> Result<PostData> {
    Ok(PostData {
        mime_type: obj.string("mimeType")?,
        params: obj.opt_list("params", decode_param)?,
        text: obj.opt_string("text")?.unwrap_or_default(),
        comment: obj.opt_string("comment")?,
    })
}

fn decode_param(obj: &Object<'_>) -> Result<Param> {
    Ok(Param {
        name: obj.string("name")?,
        value: obj.opt_string("value")?,
        file_name: obj.opt_string("fileName")?,
        content_type: obj.opt_string("contentType")?,
        comment: obj.opt_string("comment")?,
    })
}

fn decode_content(obj: &Object<'_>) -> Result<Content> {
    Ok(Content {
        size: obj.integer("size")?,
        compression: obj.opt_integer("compression")?,
        mime_type: obj.string("mimeType")?,
        text: obj.opt_string("text")?,
        encoding: obj.opt_string("encoding")?,
        comment: obj.opt_string("comment")?,
    })
}

fn decode_cache(obj: &Object<'_>) -> Result<Cache> {
    Ok(Cache {
        before_request: obj.cache_slot("beforeRequest")?,
        after_request: obj.cache_slot("afterRequest")?,
        comment: obj.opt_string("comment")?,
    })
}

fn decode_cache_data(obj: &Object<'_>) -> Result<CacheData> {
    Ok(CacheData {
        expires: obj.opt_string("expires")?,
        last_access: obj.string("lastAccess")?,
        e_tag: obj.string("eTag")?,
        hit_count: obj.integer("hitCount")?,
        comment: obj.opt_string("comment")?,
    })
}

fn decode_timings(obj: &Object<'_>) -> Result<Timings> {
    Ok(Timings {
        blocked: obj.timing("blocked")?,
        dns: obj.timing("dns")?,
        connect: obj.timing("connect")?,
        send: obj.millis("send")?,
        wait: obj.millis("wait")?,
        receive: obj.millis("receive")?,
        ssl: obj.timing("ssl")?,
        comment: obj.opt_string("comment")?,
    })
}

/// A JSON object together with its path from the document root.
struct Object<'a> {
    path: String,
    fields: &'a Map<String, Value>,
}

impl<'a> Object<'a> {
    fn new(value: &'a Value, path: String) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { path, fields }),
            other => Err(mismatch(path, "object", other)),
        }
    }

    fn field_path(&self, key: &str) -> String {
        format!("{}.{}", self.path, key)
    }

    /// Value of a required field; `null` is passed through so callers report it as a mismatch
    fn required(&self, key: &str) -> Result<&'a Value> {
        self.fields
            .get(key)
            .ok_or_else(|| Error::missing(self.field_path(key)))
    }

    /// Value of an optional field, treating `null` the same as a missing key
    fn optional(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).filter(|value| !value.is_null())
    }

    fn string(&self, key: &str) -> Result<String> {
        as_string(self.required(key)?, self.field_path(key))
    }

    fn opt_string(&self, key: &str) -> Result<Option<String>> {
        self.optional(key)
            .map(|value| as_string(value, self.field_path(key)))
            .transpose()
    }

    /// Cookie flags; producers often leave these out when false
    fn flag(&self, key: &str) -> Result<bool> {
        match self.optional(key) {
            None => Ok(false),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(other) => Err(mismatch(self.field_path(key), "boolean", other)),
        }
    }

    fn integer(&self, key: &str) -> Result<i64> {
        as_integer(self.required(key)?, self.field_path(key))
    }

    fn opt_integer(&self, key: &str) -> Result<Option<i64>> {
        self.optional(key)
            .map(|value| as_integer(value, self.field_path(key)))
            .transpose()
    }

    /// Required, non-negative duration
    fn millis(&self, key: &str) -> Result<f64> {
        let value = self.required(key)?;
        match value.as_f64() {
            Some(millis) if millis >= 0.0 => Ok(millis),
            _ => Err(mismatch(self.field_path(key), "non-negative number", value)),
        }
    }

    fn timing(&self, key: &str) -> Result<Timing> {
        let Some(value) = self.optional(key) else {
            return Ok(Timing::Unmeasured);
        };
        match value.as_f64() {
            Some(millis) if millis == -1.0 => Ok(Timing::NotApplicable),
            Some(millis) if millis >= 0.0 => Ok(Timing::Millis(millis)),
            _ => Err(mismatch(
                self.field_path(key),
                "non-negative number or -1",
                value,
            )),
        }
    }

    fn size(&self, key: &str) -> Result<Size> {
        let value = self.required(key)?;
        match (value.as_i64(), value.as_u64()) {
            (Some(-1), _) => Ok(Size::Unknown),
            (_, Some(count)) => Ok(Size::Bytes(count)),
            _ => Err(mismatch(
                self.field_path(key),
                "non-negative integer or -1",
                value,
            )),
        }
    }

    fn timestamp(&self, key: &str) -> Result<Timestamp> {
        let path = self.field_path(key);
        let ts = Timestamp::parse(as_string(self.required(key)?, path.clone())?);
        if !ts.is_valid() {
            tracing::warn!("Invalid timestamp at {}: {:?}, keeping raw value", path, ts.as_str());
        }
        Ok(ts)
    }

    fn object(&self, key: &str) -> Result<Object<'a>> {
        Object::new(self.required(key)?, self.field_path(key))
    }

    fn opt_object(&self, key: &str) -> Result<Option<Object<'a>>> {
        self.optional(key)
            .map(|value| Object::new(value, self.field_path(key)))
            .transpose()
    }

    fn cache_slot(&self, key: &str) -> Result<CacheSlot> {
        match self.fields.get(key) {
            None => Ok(CacheSlot::Unknown),
            Some(Value::Null) => Ok(CacheSlot::NotCached),
            Some(value) => {
                let data = decode_cache_data(&Object::new(value, self.field_path(key))?)?;
                Ok(CacheSlot::Entry(data))
            }
        }
    }

    fn list<T>(&self, key: &str, decode_item: fn(&Object<'a>) -> Result<T>) -> Result<Vec<T>> {
        self.items(self.required(key)?, key, decode_item)
    }

    /// Like `list`, but a missing array decodes as empty
    fn opt_list<T>(&self, key: &str, decode_item: fn(&Object<'a>) -> Result<T>) -> Result<Vec<T>> {
        match self.optional(key) {
            Some(value) => self.items(value, key, decode_item),
            None => Ok(Vec::new()),
        }
    }

    fn items<T>(
        &self,
        value: &'a Value,
        key: &str,
        decode_item: fn(&Object<'a>) -> Result<T>,
    ) -> Result<Vec<T>> {
        let path = self.field_path(key);
        let items = value
            .as_array()
            .ok_or_else(|| mismatch(path.clone(), "array", value))?;

        items
            .iter()
            .enumerate()
            .map(|(idx, item)| decode_item(&Object::new(item, format!("{}[{}]", path, idx))?))
            .collect()
    }
}

fn as_string(value: &Value, path: String) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(mismatch(path, "string", other)),
    }
}

fn as_integer(value: &Value, path: String) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| mismatch(path, "integer", value))
}

fn mismatch(path: String, expected: &'static str, found: &Value) -> Error {
    Error::TypeMismatch {
        path,
        expected,
        found: describe(found),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(n) => format!("number {}", n),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}
