use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use harfile_cli::{OutputFormat, commands};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "harfile")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "A CLI tool for checking and canonically re-encoding HTTP Archive (HAR) files",
    long_about = "harfile decodes HAR 1.2 files without losing information, reports conformance \
                  problems, and writes archives back in the documented field order."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a HAR file for decode errors and conformance problems
    Check {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Fail on warnings as well as errors
        #[arg(long)]
        strict: bool,
    },

    /// Re-encode a HAR file in canonical field order
    Fmt {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit a single line instead of indented JSON
        #[arg(long)]
        compact: bool,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for harfile.\n\n\
        SUPPORTED SHELLS:\n  bash, zsh, fish, powershell, elvish\n\n\
        INSTALLATION:\n  \
        bash:  harfile completion --shell bash >> ~/.bashrc\n  \
        zsh:   harfile completion --shell zsh > ~/.zfunc/_harfile   (with fpath+=~/.zfunc in ~/.zshrc)\n  \
        fish:  harfile completion --shell fish > ~/.config/fish/completions/harfile.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);
    tracing::debug!("Output format: {}", cli.format);

    // Execute the command
    match cli.command {
        Commands::Check { file, strict } => commands::check::execute(&file, strict, cli.format),
        Commands::Fmt {
            file,
            output,
            compact,
        } => commands::fmt::execute(&file, output, compact),
        Commands::Completion { shell } => commands::completion::execute(shell, Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose {
        "harfile=debug,harfile_cli=debug,harfile_core=debug"
    } else {
        "harfile=info,harfile_cli=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
