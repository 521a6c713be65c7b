//! Integration tests for the `probe` command.

mod common;

use common::{occupy_port, TestEnv};
use predicates::prelude::*;

#[test]
fn test_probe_skips_taken_port() {
    let env = TestEnv::new();
    let (_listener, taken) = occupy_port();
    if taken == u16::MAX {
        return;
    }

    let output = env
        .command()
        .args(["probe", &taken.to_string(), "--host", "127.0.0.1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let port: u16 = String::from_utf8(output.stdout)
        .unwrap()
        .trim()
        .parse()
        .unwrap();
    assert!(port > taken);
}

#[test]
fn test_probe_exhausted_range() {
    let env = TestEnv::new();
    let (_listener, taken) = occupy_port();
    let taken = taken.to_string();

    env.command()
        .args(["probe", &taken, "--host", "127.0.0.1", "--max-port", &taken])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no free port"));
}
