use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn version_prints_the_crate_version() {
    Command::cargo_bin("runvoy")
        .unwrap()
        .arg("version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn run_without_a_command_is_a_usage_error() {
    Command::cargo_bin("runvoy")
        .unwrap()
        .arg("run")
        .assert()
        .failure();
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    Command::cargo_bin("runvoy")
        .unwrap()
        .arg("not-a-real-subcommand")
        .assert()
        .failure();
}
