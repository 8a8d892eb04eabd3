use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

pub fn execute(shell: Shell, cmd: Command) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write_completions(shell, cmd, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Generate the completion script for `shell`, named after the command's binary
pub fn write_completions(shell: Shell, mut cmd: Command, out: &mut dyn Write) -> Result<()> {
    let bin_name = cmd.get_name().to_string();
    tracing::debug!(
        "Generating {} completions for {} ({} subcommands)",
        shell,
        bin_name,
        cmd.get_subcommands().count()
    );
    generate(shell, &mut cmd, bin_name, out);
    Ok(())
}
