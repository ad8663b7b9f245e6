//! Exit status and console output of the `samplemem` binary.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const BLOCK_SIZE: usize = 512;

fn image(dir: &Path, data: &[u8]) -> PathBuf {
    let path = dir.join("device.img");
    fs::write(&path, data).unwrap();
    path
}

fn samplemem() -> Command {
    let mut cmd = Command::cargo_bin("samplemem").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn clean_device_exits_zero() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = image(dir.path(), &vec![0xAA; 64 * BLOCK_SIZE]);

    samplemem()
        .arg(&path)
        .args(["512", "0xaa", "16"])
        .assert()
        .success()
        .stdout("No bad blocks found.\n");

    Ok(())
}

#[test]
fn bad_blocks_exit_two() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let mut data = vec![0u8; 100 * BLOCK_SIZE];
    data[30 * BLOCK_SIZE] = 1;
    data[70 * BLOCK_SIZE + 100] = 1;
    let path = image(dir.path(), &data);

    samplemem()
        .arg(&path)
        .args(["512", "0", "10", "--quiet"])
        .assert()
        .code(2)
        .stdout("30\n70\nFound 2 bad blocks!\n");

    Ok(())
}

#[test]
fn redirected_status_line_ends_with_newline() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = image(dir.path(), &vec![0u8; 100 * BLOCK_SIZE]);

    samplemem()
        .arg(&path)
        .args(["512", "0", "100"])
        .assert()
        .success()
        .stdout("No bad blocks found.\n")
        .stderr(predicate::str::contains("% done").and(predicate::str::ends_with("\n")));

    Ok(())
}

#[test]
fn missing_device_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("absent.img");

    samplemem()
        .arg(&path)
        .args(["512", "0", "10"])
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Error opening block device"))
        .stderr(predicate::function(|err: &str| err.matches("os error").count() == 1));

    Ok(())
}

#[test]
fn redirected_logs_are_uncoloured() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = image(dir.path(), &vec![0u8; 16 * BLOCK_SIZE]);

    samplemem()
        .arg(&path)
        .args(["512", "0", "4", "--debug", "--quiet"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG"))
        .stderr(predicate::str::contains("\u{1b}[").not());

    Ok(())
}

#[test]
fn unallocatable_block_size_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = image(dir.path(), &vec![0u8; 4 * BLOCK_SIZE]);

    samplemem()
        .arg(&path)
        .args(["0xffffffffffffffff", "0", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error allocating memory"));

    Ok(())
}

#[test]
fn usage_errors_exit_one() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = image(dir.path(), &vec![0u8; 4 * BLOCK_SIZE]);

    for args in [
        &["0", "0", "1"][..],
        &["512", "256", "1"],
        &["512", "0", "0"],
        &["512", "zero", "1"],
        &["512", "0"],
    ] {
        samplemem()
            .arg(&path)
            .args(args)
            .assert()
            .code(1)
            .stdout("")
            .stderr(predicate::str::is_empty().not());
    }

    Ok(())
}

#[test]
fn help_exits_zero() -> Result<(), Box<dyn std::error::Error>> {
    samplemem()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: samplemem"));

    Ok(())
}
