use crate::OutputFormat;
use anyhow::{Context, Result, bail};
use harfile_core::check::{CheckReport, Severity, check_har};
use harfile_core::har::HarReader;
use std::path::Path;

/// Decode a HAR file and run the conformance checks over it
pub fn check_file(file: &Path) -> Result<CheckReport> {
    tracing::debug!("Reading HAR file: {}", file.display());

    let har = HarReader::from_file(file)
        .with_context(|| format!("Failed to decode {}", file.display()))?;

    Ok(check_har(&har))
}

pub fn execute(file: &Path, strict: bool, format: OutputFormat) -> Result<()> {
    tracing::info!("Checking HAR file: {}", file.display());

    let report = check_file(file)?;

    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Table => print!("{}", render_table(&report)),
        OutputFormat::Pretty => output_pretty(file, &report),
    }

    let errors = report.count(Severity::Error);
    let warnings = report.count(Severity::Warning);
    if errors > 0 {
        bail!("{} has {} conformance error(s)", file.display(), errors);
    }
    if strict && warnings > 0 {
        bail!(
            "{} has {} warning(s) and --strict was given",
            file.display(),
            warnings
        );
    }

    Ok(())
}

fn output_pretty(file: &Path, report: &CheckReport) {
    use console::style;

    println!("\n{}", style("HAR Conformance Report").bold().cyan());
    println!("{}", style("======================").cyan());
    println!("  File:     {}", file.display());
    println!("  Pages:    {}", report.pages);
    println!("  Entries:  {}", report.entries);

    if report.findings.is_empty() {
        println!("\n  {}", style("No findings").green());
        println!();
        return;
    }

    println!("\n{}", style("Findings:").bold());
    for finding in &report.findings {
        let label = style(finding.severity.as_str());
        let label = match finding.severity {
            Severity::Error => label.red().bold(),
            Severity::Warning => label.yellow(),
            Severity::Info => label.dim(),
        };
        println!("  [{}] {}: {}", label, finding.path, finding.message);
    }

    println!(
        "\n  {} error(s), {} warning(s), {} info",
        report.count(Severity::Error),
        report.count(Severity::Warning),
        report.count(Severity::Info)
    );
    println!(); // trailing newline
}

fn output_json(report: &CheckReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

const SEVERITY_HEADER: &str = "SEVERITY";
const PATH_HEADER: &str = "PATH";

/// Render findings as space-padded columns.
///
/// The message is the last column, so whatever it contains (commas, quoted raw
/// values) cannot shift the columns before it.
pub fn render_table(report: &CheckReport) -> String {
    let path_width = report
        .findings
        .iter()
        .map(|finding| finding.path.len())
        .chain([PATH_HEADER.len()])
        .max()
        .unwrap_or_default();
    let severity_width = SEVERITY_HEADER.len();

    let mut table = format!(
        "{:<severity_width$}  {:<path_width$}  MESSAGE\n",
        SEVERITY_HEADER, PATH_HEADER
    );
    for finding in &report.findings {
        table.push_str(&format!(
            "{:<severity_width$}  {:<path_width$}  {}\n",
            finding.severity.as_str(),
            finding.path,
            finding.message
        ));
    }
    table
}
