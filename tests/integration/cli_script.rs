#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use tempfile::TempDir;

const SCRIPT: &str = "\
insert TestArtist<SEP>TestSong
insert TestArtist2<SEP>TestSong2
print artist
print song
print graph
remove artist TestArtist2
remove song Unknown
print graph
bogus
";

fn write_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("commands.txt");
    fs::write(&path, body).expect("write script");
    path
}

/// Points the CLI at a config file inside `dir` so the user's own config is
/// never read.
fn isolated_config(dir: &Path) -> PathBuf {
    dir.join("cli.toml")
}

#[test]
fn run_prints_reference_transcript() {
    let dir = TempDir::new().expect("tempdir");
    let script = write_script(dir.path(), SCRIPT);
    cargo_bin_cmd!("cadenza")
        .env("CADENZA_CONFIG", isolated_config(dir.path()))
        .env_remove("CADENZA_LOG")
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout(
            "|TestArtist| is added to the Artist database.\n\
             |TestSong| is added to the Song database.\n\
             |TestArtist2| is added to the Artist database.\n\
             |TestSong2| is added to the Song database.\n\
             2: |TestArtist|\n\
             3: |TestArtist2|\n\
             total artists: 2\n\
             3: |TestSong|\n\
             4: |TestSong2|\n\
             total songs: 2\n\
             There are 2 connected components\n\
             The largest connected component has 2 elements\n\
             The diameter of the largest component is 1\n\
             |TestArtist2| is removed from the Artist database.\n\
             |Unknown| does not exist in the Song database.\n\
             There are 2 connected components\n\
             The largest connected component has 2 elements\n\
             The diameter of the largest component is 1\n\
             Unrecognized input bogus\n",
        );
}

#[test]
fn json_format_emits_event_stream() {
    let dir = TempDir::new().expect("tempdir");
    let script = write_script(dir.path(), SCRIPT);
    let output = cargo_bin_cmd!("cadenza")
        .env("CADENZA_CONFIG", isolated_config(dir.path()))
        .args(["--format", "json", "run"])
        .arg(&script)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let events: Vec<Value> = String::from_utf8(output)
        .expect("utf8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid json"))
        .collect();
    assert_eq!(events.len(), 11);
    assert_eq!(events[0]["event"], "notice");
    assert_eq!(events[0]["kind"], "added");
    assert_eq!(events[0]["namespace"], "artist");
    assert_eq!(events[4]["event"], "listing");
    assert_eq!(events[4]["total"], 2);
    assert_eq!(events[6]["event"], "report");
    assert_eq!(events[6]["components"], 2);
    assert_eq!(events[10]["event"], "unrecognized");
    assert_eq!(events[10]["input"], "bogus");
}

#[test]
fn config_file_sets_table_capacity() {
    let dir = TempDir::new().expect("tempdir");
    let config = isolated_config(dir.path());
    fs::write(&config, "[store]\ntable_capacity = 2\n").expect("write config");
    let script = write_script(dir.path(), "insert A<SEP>S1\ninsert B<SEP>S2\n");
    let output = cargo_bin_cmd!("cadenza")
        .arg("--config")
        .arg(&config)
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).expect("utf8");
    assert!(
        text.contains("Artist hash table size doubled.\n|B| is added to the Artist database."),
        "{text}"
    );
}

#[test]
fn command_line_overrides_config_file() {
    let dir = TempDir::new().expect("tempdir");
    let config = isolated_config(dir.path());
    fs::write(&config, "[store]\ntable_capacity = 2\n").expect("write config");
    let script = write_script(dir.path(), "insert A<SEP>S1\ninsert B<SEP>S2\n");
    let output = cargo_bin_cmd!("cadenza")
        .arg("--config")
        .arg(&config)
        .args(["run", "--table-size", "10"])
        .arg(&script)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).expect("utf8");
    assert!(!text.contains("doubled"), "{text}");
}

#[test]
fn malformed_script_fails_with_line_number() {
    let dir = TempDir::new().expect("tempdir");
    let script = write_script(dir.path(), "print graph\ninsert nobody\n");
    let output = cargo_bin_cmd!("cadenza")
        .env("CADENZA_CONFIG", isolated_config(dir.path()))
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .code(1)
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8(output).expect("utf8");
    assert!(stderr.starts_with("error: line 2:"), "{stderr}");
}

#[test]
fn missing_script_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    cargo_bin_cmd!("cadenza")
        .env("CADENZA_CONFIG", isolated_config(dir.path()))
        .arg("run")
        .arg(dir.path().join("absent.txt"))
        .assert()
        .failure()
        .code(1);
}

#[test]
fn config_show_reports_effective_values() {
    let dir = TempDir::new().expect("tempdir");
    let config = isolated_config(dir.path());
    fs::write(&config, "[store]\ngraph_capacity = 64\n\n[output]\nformat = \"json\"\n")
        .expect("write config");
    let output = cargo_bin_cmd!("cadenza")
        .env("CADENZA_CONFIG", &config)
        .args(["config", "show"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: Value = serde_json::from_slice(&output).expect("valid json");
    assert_eq!(json["exists"], true);
    assert_eq!(json["store"]["table_capacity"], 10);
    assert_eq!(json["store"]["graph_capacity"], 64);
    assert_eq!(json["format"], "json");
}
