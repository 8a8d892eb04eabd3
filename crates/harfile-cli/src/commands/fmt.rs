use anyhow::{Context, Result};
use harfile_core::har::{self, EncodeOptions, HarReader, HarWriter};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Decode a HAR file and write it back in canonical field order
pub fn execute(file: &Path, output: Option<PathBuf>, compact: bool) -> Result<()> {
    tracing::debug!("Formatting HAR file: {}", file.display());

    let har = HarReader::from_file(file)
        .with_context(|| format!("Failed to decode {}", file.display()))?;

    for issue in har.timestamp_issues() {
        tracing::warn!("{}", issue);
    }

    let options = EncodeOptions { pretty: !compact };

    // Write output (to file or stdout)
    if let Some(output_path) = output {
        tracing::debug!("Writing formatted HAR to: {}", output_path.display());
        HarWriter::to_file_with(&har, &output_path, options)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
    } else {
        tracing::debug!("Writing formatted HAR to stdout");
        let bytes = har::encode_with(&har, options)?;
        io::stdout().write_all(&bytes)?;
        io::stdout().write_all(b"\n")?;
    }

    Ok(())
}
