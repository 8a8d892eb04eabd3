use super::decode;
use super::types::Har;
use crate::Result;
use std::fs;
use std::path::Path;

pub struct HarReader;

impl HarReader {
    /// Read and decode a HAR file from the given path
    pub fn from_file(path: &Path) -> Result<Har> {
        tracing::debug!("Reading HAR file from: {}", path.display());

        let bytes = fs::read(path)?;
        let har = decode::decode(&bytes)?;

        tracing::info!(
            "Successfully parsed HAR file with {} entries",
            har.log.entries.len()
        );

        Ok(har)
    }

    /// Decode a HAR document from a JSON string
    pub fn from_str(content: &str) -> Result<Har> {
        tracing::debug!("Parsing HAR from string");
        decode::decode_str(content)
    }

    /// Decode a HAR document from raw bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Har> {
        decode::decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_har() {
        let har_json = r#"{
            "log": {
                "version": "1.2",
                "creator": {"name": "test", "version": "1.0"},
                "entries": []
            }
        }"#;

        let har = HarReader::from_str(har_json).unwrap();
        assert_eq!(har.log.version, "1.2");
        assert_eq!(har.log.entries.len(), 0);
    }

    #[test]
    fn test_missing_creator_is_malformed() {
        let har_json = r#"{"log": {"version": "1.2", "entries": []}}"#;

        let err = HarReader::from_str(har_json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.path(), Some("log.creator"));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"log": {{"creator": {{"name": "test", "version": "1.0"}}, "entries": []}}}}"#
        )
        .unwrap();

        let har = HarReader::from_file(file.path()).unwrap();
        assert_eq!(har.log.creator.name, "test");
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let err = HarReader::from_file(Path::new("/nonexistent/capture.har")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
