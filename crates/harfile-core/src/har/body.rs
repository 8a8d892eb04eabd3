use super::types::{Content, PostData};
use crate::{Error, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use mime::Mime;

const BASE64: &str = "base64";

impl Content {
    /// Build content for a captured body.
    ///
    /// UTF-8 bodies are stored as text; anything else is base64 encoded.
    pub fn from_body(body: &[u8], mime_type: impl Into<String>) -> Self {
        let (text, encoding) = match std::str::from_utf8(body) {
            Ok(text) => (text.to_string(), None),
            Err(_) => (STANDARD.encode(body), Some(BASE64.to_string())),
        };

        Content {
            size: body.len() as i64,
            compression: None,
            mime_type: mime_type.into(),
            text: Some(text),
            encoding,
            comment: None,
        }
    }

    /// Raw body bytes, or `None` when the body was not captured
    pub fn decoded_body(&self) -> Result<Option<Vec<u8>>> {
        let Some(text) = &self.text else {
            return Ok(None);
        };

        match self.encoding.as_deref() {
            None => Ok(Some(text.as_bytes().to_vec())),
            Some(encoding) if encoding.eq_ignore_ascii_case(BASE64) => {
                // Some producers wrap base64 output across lines
                let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
                STANDARD
                    .decode(compact)
                    .map(Some)
                    .map_err(|e| Error::ContentEncoding {
                        encoding: encoding.to_string(),
                        reason: e.to_string(),
                    })
            }
            Some(other) => Err(Error::ContentEncoding {
                encoding: other.to_string(),
                reason: "unsupported encoding".to_string(),
            }),
        }
    }

    pub fn mime(&self) -> Option<Mime> {
        self.mime_type.parse().ok()
    }
}

impl PostData {
    pub fn mime(&self) -> Option<Mime> {
        self.mime_type.parse().ok()
    }

    /// Whether the body is `application/x-www-form-urlencoded`, the case where
    /// `params` is the expected representation
    pub fn is_url_encoded(&self) -> bool {
        self.mime().is_some_and(|parsed| {
            parsed.type_() == mime::APPLICATION && parsed.subtype() == mime::WWW_FORM_URLENCODED
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_from_body_keeps_utf8_as_text() {
        let content = Content::from_body(b"hello", "text/plain; charset=utf-8");
        assert_eq!(content.text.as_deref(), Some("hello"));
        assert_eq!(content.encoding, None);
        assert_eq!(content.size, 5);
        assert_eq!(content.mime().unwrap().subtype(), mime::PLAIN);
    }

    #[test]
    fn test_from_body_base64_encodes_binary() {
        let body = [0x89, 0x50, 0x4e, 0x47, 0xff];
        let content = Content::from_body(&body, "image/png");

        assert_eq!(content.encoding.as_deref(), Some("base64"));
        assert_eq!(content.decoded_body().unwrap().unwrap(), body.to_vec());
    }

    #[test]
    fn test_decoded_body_tolerates_wrapped_base64() {
        let content = Content {
            text: Some("aGVs\nbG8=".to_string()),
            encoding: Some("base64".to_string()),
            ..Default::default()
        };
        assert_eq!(content.decoded_body().unwrap().unwrap(), b"hello".to_vec());
    }

    #[test]
    fn test_decoded_body_errors() {
        let bad = Content {
            text: Some("***".to_string()),
            encoding: Some("base64".to_string()),
            ..Default::default()
        };
        assert_eq!(bad.decoded_body().unwrap_err().kind(), ErrorKind::ContentEncoding);

        let unknown = Content {
            text: Some("x".to_string()),
            encoding: Some("gzip".to_string()),
            ..Default::default()
        };
        assert!(unknown.decoded_body().is_err());

        assert_eq!(Content::default().decoded_body().unwrap(), None);
    }

    #[test]
    fn test_post_data_url_encoded() {
        let form = PostData {
            mime_type: "application/x-www-form-urlencoded; charset=UTF-8".to_string(),
            ..Default::default()
        };
        assert!(form.is_url_encoded());

        let json = PostData {
            mime_type: "application/json".to_string(),
            ..Default::default()
        };
        assert!(!json.is_url_encoded());
    }
}
