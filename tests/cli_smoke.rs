//! End-to-end runs of the `meet-reports` binary using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

const EARLY_BIRD: &str = "\
37th Early Bird Open
Aug 24, 2024
https://www.athletic.net/CrossCountry/meet/235827/results/943367
Skyline opened the season with three runners in the top ten.
Place,Team,Score
1,Ann Arbor Skyline,45
2,Saline,61

Place,Grade,Name,Athlete Link,Time,Team,Team Link,Points
1.,12,Jordan Lee,https://a.net/1,15:41.2,Ann Arbor Skyline,https://a.net/t/1,1
2.,11,Sam Ortiz,https://a.net/2,15:50.9,Saline,https://a.net/t/2,2
3.,12,Max Kim,https://a.net/3,15:58.0,Ann Arbor Skyline,https://a.net/t/1,3
";

fn cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("meet-reports").unwrap();
    cmd.current_dir(dir);
    cmd
}

// ---------------------------------------------------------------------------
// Help and configuration bootstrap
// ---------------------------------------------------------------------------

#[test]
fn help_flag() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--team"));
}

#[test]
fn missing_config_writes_a_template() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Creating default configuration file"));

    let template = fs::read_to_string(dir.path().join("meets.toml")).unwrap();
    assert!(template.contains("output_directory"));
    assert!(template.contains("[[meets]]"));
    assert!(template.contains("max_results = 10"));
}

#[test]
fn broken_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("meets.toml"), "meets = 3\n").unwrap();
    cmd(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration file"));
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn renders_configured_meets() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("early_bird.csv"), EARLY_BIRD).unwrap();
    fs::write(
        dir.path().join("meets.toml"),
        r#"
output_directory = "site"

[report]
max_results = 2

[[meets]]
input = "early_bird.csv"
output = "early-bird.html"

[[meets]]
input = "not_there.csv"
"#,
    )
    .unwrap();

    cmd(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 written, 1 skipped, 0 failed"));

    let page = fs::read_to_string(dir.path().join("site/early-bird.html")).unwrap();
    assert!(page.contains("<title>37th Early Bird Open</title>"));
    assert!(page.contains("Jordan Lee"));
    assert!(page.contains("Sam Ortiz"));
    assert!(!page.contains("Max Kim"));

    let index = fs::read_to_string(dir.path().join("site/index.html")).unwrap();
    assert!(index.contains("href=\"early-bird.html\""));
    assert!(dir.path().join("site/summary.csv").exists());
}

#[test]
fn positional_inputs_with_team_filter() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("early_bird.csv"), EARLY_BIRD).unwrap();

    cmd(dir.path())
        .args(["-o", "out", "--team", "Ann Arbor Skyline", "--no-index", "early_bird.csv"])
        .assert()
        .success();

    let page = fs::read_to_string(dir.path().join("out/early-bird.html")).unwrap();
    assert!(page.contains("Ann Arbor Skyline Results"));
    assert!(page.contains("Max Kim"));
    assert!(!page.contains("Sam Ortiz"));
    assert!(!dir.path().join("out/index.html").exists());
    assert!(!dir.path().join("meets.toml").exists());
}

#[test]
fn reruns_produce_identical_pages() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("early_bird.csv"), EARLY_BIRD).unwrap();

    cmd(dir.path()).arg("early_bird.csv").assert().success();
    let first = fs::read(dir.path().join("meets/early-bird.html")).unwrap();
    cmd(dir.path()).arg("early_bird.csv").assert().success();
    let second = fs::read(dir.path().join("meets/early-bird.html")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn only_missing_inputs_is_not_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .arg("nowhere.csv")
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped nowhere.csv"));
}

#[test]
fn every_meet_failing_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("early_bird.csv"), EARLY_BIRD).unwrap();
    fs::write(
        dir.path().join("meets.toml"),
        r#"
[[meets]]
input = "early_bird.csv"
output = "no/such/dir/page.html"
"#,
    )
    .unwrap();

    cmd(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("0 written, 0 skipped, 1 failed"));
}
