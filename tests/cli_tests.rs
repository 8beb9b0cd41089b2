//! Integration tests for the `reconcile_times` binary.
mod common;

use std::process::Command;

use common::{SPECIES, family, write_inputs};

fn reconcile_times(args: &[&std::ffi::OsStr]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_reconcile_times"))
        .args(args)
        .output()
        .expect("failed to launch reconcile_times")
}

#[test]
// Purpose
// -------
// Two positionals produce a single-line, five-field `.times` report and
// the console lines of a normal run.
fn writes_times_file_for_two_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let (species, summary) = write_inputs(dir.path(), SPECIES, &family(8, 2));

    let out = reconcile_times(&[species.as_os_str(), summary.as_os_str()]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Read species tree from:"));
    assert!(stdout.contains("Read summary of tree sample for 10 trees from:"));
    assert!(stdout.lines().any(|l| l.trim() == "4 4"));

    let text = std::fs::read_to_string(dir.path().join("fam1.ale.times")).unwrap();
    assert_eq!(text.lines().count(), 1);
    let fields: Vec<&str> = text.trim_end().split('\t').collect();
    assert_eq!(fields.len(), 5);
    assert_eq!(fields[4], summary.display().to_string());
}

#[test]
// Purpose
// -------
// The third positional changes how gene names are cut into prefixes for
// the report, while genes keep mapping onto species with `_`.
//
// Given
// -----
// - Genes A_1, A_2, C_1, D_1: three `_`-prefixes, four full names.
//
// Expect
// ------
// - Default run reports `4 3`; `@` (absent from every name) reports `4 4`.
// - The fourth `.times` field follows the console count.
// - The `@` run can still fit rates, so every gene mapped to a species.
fn separator_argument_changes_prefix_count() {
    let dir = tempfile::tempdir().unwrap();
    let paralogs = family(8, 2).replace("B_1", "A_2");
    let (species, summary) = write_inputs(dir.path(), SPECIES, &paralogs);
    let times = dir.path().join("fam1.ale.times");
    let prefix_field = || {
        let text = std::fs::read_to_string(&times).unwrap();
        text.trim_end().split('\t').nth(3).unwrap().to_string()
    };

    let default_run = reconcile_times(&[species.as_os_str(), summary.as_os_str()]);
    let default_field = prefix_field();
    let at_run = reconcile_times(&[
        species.as_os_str(),
        summary.as_os_str(),
        "@".as_ref(),
        "--optimize".as_ref(),
        "--max-iter".as_ref(),
        "5".as_ref(),
    ]);
    let at_field = prefix_field();

    assert!(default_run.status.success());
    assert!(at_run.status.success(), "stderr: {}", String::from_utf8_lossy(&at_run.stderr));
    assert!(String::from_utf8_lossy(&default_run.stdout).lines().any(|l| l.trim() == "4 3"));
    assert!(String::from_utf8_lossy(&at_run.stdout).lines().any(|l| l.trim() == "4 4"));
    assert_eq!(default_field, "3");
    assert_eq!(at_field, "4");
}

#[test]
// Purpose
// -------
// Fewer than two positionals: usage on stdout, exit code 1, no report.
fn missing_arguments_print_usage_and_fail() {
    let dir = tempfile::tempdir().unwrap();
    let (species, _summary) = write_inputs(dir.path(), SPECIES, &family(8, 2));

    let none = reconcile_times(&[]);
    let one = reconcile_times(&[species.as_os_str()]);

    for out in [&none, &one] {
        assert_eq!(out.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&out.stdout).contains("usage"));
    }
    assert!(!dir.path().join("fam1.ale.times").exists());
}

#[test]
// Purpose
// -------
// An unreadable species file is a one-line diagnostic and exit code 1.
fn missing_species_file_fails_without_report() {
    let dir = tempfile::tempdir().unwrap();
    let (_species, summary) = write_inputs(dir.path(), SPECIES, &family(8, 2));
    let missing = dir.path().join("absent.newick");

    let out = reconcile_times(&[missing.as_os_str(), summary.as_os_str()]);

    assert_eq!(out.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&out.stderr).trim().lines().count(), 1);
    assert!(!dir.path().join("fam1.ale.times").exists());
}

#[test]
// Purpose
// -------
// `--optimize` adds one line with the fitted rates and log-likelihood.
fn optimize_flag_prints_fitted_rates() {
    let dir = tempfile::tempdir().unwrap();
    let (species, summary) = write_inputs(dir.path(), SPECIES, &family(8, 2));

    let out = reconcile_times(&[
        species.as_os_str(),
        summary.as_os_str(),
        "--optimize".as_ref(),
        "--max-iter".as_ref(),
        "20".as_ref(),
    ]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    let fitted = stdout.lines().find(|l| l.starts_with("delta=")).unwrap();
    assert!(fitted.contains("tau=") && fitted.contains("lambda=") && fitted.contains("ll="));
}
