use assert_cmd::Command;
use predicates::prelude::*;

fn tubedigest(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tubedigest").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("YOUTUBE_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn missing_subcommand_prints_usage() {
    let home = tempfile::TempDir::new().unwrap();
    tubedigest(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn steps_without_url_prints_usage() {
    let home = tempfile::TempDir::new().unwrap();
    tubedigest(&home)
        .arg("steps")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<URL>"));
}

#[test]
fn steps_with_invalid_url_exits_cleanly() {
    let home = tempfile::TempDir::new().unwrap();
    tubedigest(&home)
        .args(["--quiet", "steps", "https://youtu.be/dQw4w9WgXcQ"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid YouTube URL."));

    assert!(!home.path().join("export").exists());
}

#[test]
fn search_without_api_key_explains_setup() {
    let home = tempfile::TempDir::new().unwrap();
    tubedigest(&home)
        .args(["search", "knitting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("YOUTUBE_API_KEY"));
}

#[test]
fn steps_with_no_export_never_creates_export_dir() {
    let home = tempfile::TempDir::new().unwrap();
    tubedigest(&home)
        .args([
            "--quiet",
            "steps",
            "--no-export",
            "--export-dir",
            "notes",
            "https://youtu.be/dQw4w9WgXcQ",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid YouTube URL."));

    assert!(!home.path().join("notes").exists());
    assert!(!home.path().join("export").exists());
}

#[test]
fn search_reads_piped_subject() {
    let home = tempfile::TempDir::new().unwrap();
    tubedigest(&home)
        .arg("search")
        .write_stdin("knitting\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Enter the subject to search on YouTube:"))
        .stdout(predicate::str::contains("A search subject is required.").not())
        .stdout(predicate::str::contains("YOUTUBE_API_KEY"));
}

#[test]
fn search_with_blank_piped_subject_is_rejected() {
    let home = tempfile::TempDir::new().unwrap();
    tubedigest(&home)
        .arg("search")
        .write_stdin("   \n")
        .assert()
        .success()
        .stdout(predicate::str::contains("A search subject is required."))
        .stdout(predicate::str::contains("YOUTUBE_API_KEY").not());
}

#[test]
fn config_without_flags_points_at_config_file() {
    let home = tempfile::TempDir::new().unwrap();
    tubedigest(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yaml"));
}

#[test]
fn config_show_reports_defaults() {
    let home = tempfile::TempDir::new().unwrap();
    tubedigest(&home)
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Search Results: 5"))
        .stdout(predicate::str::contains("API Key: not set"));
}
