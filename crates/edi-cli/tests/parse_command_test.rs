use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::NamedTempFile;

fn cargo_bin() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_edi") {
        return PathBuf::from(path);
    }

    let target_dir = env::var("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| repo_root().join("target"));
    let executable_name = format!("edi{}", std::env::consts::EXE_SUFFIX);
    let fallback = target_dir.join("debug").join(executable_name);

    if fallback.exists() {
        return fallback;
    }

    panic!(
        "CARGO_BIN_EXE_edi is not set and fallback binary was not found at {}",
        fallback.display()
    );
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn fixture(name: &str) -> PathBuf {
    repo_root()
        .join("crates/edi-energy-parser/tests/fixtures")
        .join(name)
}

fn write_temp_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("edi-cli-")
        .suffix(suffix)
        .tempfile()
        .expect("temporary file should be created");
    file.write_all(content.as_bytes())
        .expect("temporary file should be writable");
    file
}

fn run_edi(args: &[&str]) -> Output {
    Command::new(cargo_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("LOGGING_CONFIG")
        .output()
        .expect("edi should execute")
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON")
}

#[test]
fn test_parse_mscons_sample() {
    let input = fixture("mscons_sample.edi");
    let output = run_edi(&["parse", &path_arg(&input)]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json = stdout_json(&output);
    let files = json.as_array().expect("stdout should be a JSON array");
    assert_eq!(files.len(), 1);
    assert!(
        files[0]["file"]
            .as_str()
            .unwrap()
            .ends_with("mscons_sample.edi")
    );
    let nachrichten = files[0]["interchange"]["nachrichten"].as_array().unwrap();
    assert_eq!(nachrichten.len(), 2);
    assert_eq!(nachrichten[0]["nachrichtentyp"], "MSCONS");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Parse summary: files=1, messages=2, errors=0"));
}

#[test]
fn test_parse_keeps_input_order() {
    let mscons = fixture("mscons_sample.edi");
    let aperak = fixture("aperak_sample.edi");
    let output = run_edi(&["parse", &path_arg(&aperak), &path_arg(&mscons)]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    let files = json.as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert!(files[0]["file"].as_str().unwrap().ends_with("aperak_sample.edi"));
    assert!(files[1]["file"].as_str().unwrap().ends_with("mscons_sample.edi"));
    assert_eq!(
        files[0]["interchange"]["nachrichten"][0]["nachrichtentyp"],
        "APERAK"
    );
}

#[test]
fn test_parse_pretty_output() {
    let input = fixture("aperak_sample.edi");
    let output = run_edi(&["parse", "--pretty", &path_arg(&input)]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().count() > 10);
    let json = stdout_json(&output);
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[test]
fn test_parse_with_line_limit() {
    let input = fixture("mscons_sample.edi");
    let output = run_edi(&["parse", "--max-lines", "2", &path_arg(&input)]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    let interchange = &json[0]["interchange"];
    assert!(interchange["unb_nutzdaten_kopfsegment"].is_object());
    assert!(interchange["nachrichten"].as_array().unwrap().is_empty());
}

#[test]
fn test_parse_reports_broken_file() {
    let good = fixture("aperak_sample.edi");
    let broken = write_temp_file(
        "UNB+UNOC:3+A:500+B:500+200426:1151+R'DTM+137:20200426:102'",
        ".edi",
    );
    let output = run_edi(&["parse", &path_arg(&good), &path_arg(broken.path())]);

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json.as_array().unwrap().len(), 1);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR:"));
    assert!(stderr.contains("Failed to parse"));
    assert!(stderr.contains("errors=1"));
}

#[test]
fn test_parse_missing_file() {
    let output = run_edi(&["parse", "/nonexistent/input.edi"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read"));
}

#[test]
fn test_parse_requires_files() {
    let output = run_edi(&["parse"]);
    assert!(!output.status.success());
}

#[test]
fn test_config_file_applies_limit() {
    let config = write_temp_file("max_lines_to_parse: 2\n", ".yaml");
    let input = fixture("mscons_sample.edi");
    let output = run_edi(&[
        "--config",
        &path_arg(config.path()),
        "parse",
        &path_arg(&input),
    ]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert!(json[0]["interchange"]["nachrichten"].as_array().unwrap().is_empty());
}

#[test]
fn test_invalid_config_is_fatal() {
    let config = write_temp_file("on_conversion_error: retry\n", ".yaml");
    let input = fixture("mscons_sample.edi");
    let output = run_edi(&[
        "--config",
        &path_arg(config.path()),
        "parse",
        &path_arg(&input),
    ]);

    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load configuration"));
}

#[test]
fn test_json_logging_keeps_stdout_clean() {
    let input = fixture("aperak_sample.edi");
    let output = Command::new(cargo_bin())
        .args(["parse", &path_arg(&input)])
        .env("LOGGING_CONFIG", "json")
        .env("RUST_LOG", "debug")
        .output()
        .expect("edi should execute");

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json.as_array().unwrap().len(), 1);

    let stderr = String::from_utf8_lossy(&output.stderr);
    let log_line = stderr
        .lines()
        .find(|line| line.starts_with('{'))
        .expect("stderr should contain JSON log lines");
    let _: Value = serde_json::from_str(log_line).expect("log line should be JSON");
}
