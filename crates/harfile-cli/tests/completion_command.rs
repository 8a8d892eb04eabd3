use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_harfile_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("harfile")
}

/// Test that the bash script offers both subcommands and their flags
#[test]
fn test_completion_bash_covers_subcommands() {
    let mut cmd = Command::new(get_harfile_bin());
    cmd.arg("completion").arg("--shell").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("complete -F _harfile"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("fmt"))
        .stdout(predicate::str::contains("--strict"))
        .stdout(predicate::str::contains("--compact"));
}

#[test]
fn test_completion_offers_output_formats() {
    let mut cmd = Command::new(get_harfile_bin());
    cmd.arg("completion").arg("--shell").arg("zsh");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("#compdef harfile"))
        .stdout(predicate::str::contains("pretty"))
        .stdout(predicate::str::contains("table"));
}

#[test]
fn test_completion_help_lists_install_steps() {
    let mut cmd = Command::new(get_harfile_bin());
    cmd.arg("completion").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SUPPORTED SHELLS"))
        .stdout(predicate::str::contains("~/.zfunc/_harfile"));
}

#[test]
fn test_completion_rejects_unknown_shell() {
    let mut cmd = Command::new(get_harfile_bin());
    cmd.arg("completion").arg("--shell").arg("tcsh");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
