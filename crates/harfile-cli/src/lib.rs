use clap::ValueEnum;
use std::fmt;

pub mod commands;

/// How `harfile check` renders its report
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Styled summary for a terminal
    #[default]
    Pretty,
    /// The whole report as JSON
    Json,
    /// Aligned columns, one finding per row
    Table,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        };
        f.write_str(name)
    }
}
