use super::encode::{self, EncodeOptions};
use super::types::Har;
use crate::Result;
use std::fs;
use std::path::Path;

pub struct HarWriter;

impl HarWriter {
    /// Write a HAR structure to a file as indented JSON
    pub fn to_file(har: &Har, path: &Path) -> Result<()> {
        Self::to_file_with(har, path, EncodeOptions { pretty: true })
    }

    pub fn to_file_with(har: &Har, path: &Path, options: EncodeOptions) -> Result<()> {
        tracing::debug!("Writing HAR file to: {}", path.display());

        // Encode fully before touching the file so a rejected archive leaves no partial output
        let mut bytes = encode::encode_with(har, options)?;
        bytes.push(b'\n');
        fs::write(path, bytes)?;

        tracing::info!(
            "Successfully wrote HAR file with {} entries to {}",
            har.log.entries.len(),
            path.display()
        );

        Ok(())
    }

    /// Convert a HAR structure to an indented JSON string
    pub fn to_string(har: &Har) -> Result<String> {
        tracing::debug!("Converting HAR to string");
        Ok(into_string(encode::encode_pretty(har)?))
    }

    /// Convert a HAR structure to a compact JSON string
    pub fn to_string_compact(har: &Har) -> Result<String> {
        tracing::debug!("Converting HAR to compact string");
        Ok(into_string(encode::encode(har)?))
    }
}

fn into_string(bytes: Vec<u8>) -> String {
    // serde_json only ever produces UTF-8
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
