//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables hold `ENV_MUTEX` to avoid
//! interference between tests.

use hl7diff::config::{config_from_env, load_config};
use hl7diff::core::diff::{ExtraSegmentPolicy, MissingFieldPolicy};
use hl7diff::domain::SegmentName;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("HL7DIFF_APPLICATION_LOG_LEVEL");
    std::env::remove_var("HL7DIFF_INPUT_OUTPUT_PATH");
    std::env::remove_var("HL7DIFF_INPUT_EXAMPLE_PATH");
    std::env::remove_var("HL7DIFF_COMPARE_SEGMENTS");
    std::env::remove_var("HL7DIFF_COMPARE_PARALLEL_PAIRS");
    std::env::remove_var("HL7DIFF_REPORT_FORMAT");
    std::env::remove_var("TEST_TRANSCRIPT_DIR");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[input.output]
path = "actual.csv"
format = "csv"

[input.example]
path = "expected.json"
format = "json"

[compare]
segments = ["MSH", "PID", "OBX"]
resegment = false
extra_segments = "report"
missing_fields = "report"
parallel_pairs = 4

[compare.correlation]
segment = "PID"
field = 2

[compare.ignore]
MSH = [7]
OBX = [14, 19]

[report]
format = "json"
output_path = "report.json"
fail_on_mismatch = false
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.input.output.as_ref().unwrap().format, "csv");
    assert_eq!(config.input.example.as_ref().unwrap().path, "expected.json");
    assert!(!config.compare.resegment);
    assert_eq!(config.compare.extra_segments, ExtraSegmentPolicy::Report);
    assert_eq!(config.compare.missing_fields, MissingFieldPolicy::Report);
    assert_eq!(config.compare.parallel_pairs, 4);
    assert_eq!(config.compare.correlation.field, 2);
    assert_eq!(config.report.output_path.as_deref(), Some("report.json"));
    assert!(!config.report.fail_on_mismatch);

    let rules = config.compare.ignore_rules().unwrap();
    let obx = SegmentName::new("OBX").unwrap();
    assert!(rules.is_ignored(&obx, 19));
    assert!(!rules.is_ignored(&obx, 5));
    // An explicit table replaces the defaults
    assert!(!rules.is_ignored(&SegmentName::new("EVN").unwrap(), 2));
}

#[test]
fn test_load_minimal_config_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        "[input.output]\npath = \"out.txt\"\n\n[input.example]\npath = \"ex.txt\"\n",
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.input.output.unwrap().format, "lines");
    assert_eq!(config.compare.correlation.segment, "PID");
    assert_eq!(config.compare.correlation.field, 3);
    assert_eq!(config.compare.ignore["MSH"], vec![7, 10]);
    assert_eq!(config.report.format, "text");
    assert!(config.report.fail_on_mismatch);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_TRANSCRIPT_DIR", "/data/run-42");

    let file = write_config(
        "[input.output]\npath = \"${TEST_TRANSCRIPT_DIR}/out.csv\"\n\n[input.example]\npath = \"${TEST_TRANSCRIPT_DIR}/ex.csv\"\n",
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.input.output.unwrap().path, "/data/run-42/out.csv");

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable_fails() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[input.output]\npath = \"${TEST_TRANSCRIPT_DIR}/out.csv\"\n");
    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("HL7DIFF_INPUT_OUTPUT_PATH", "env-out.csv");
    std::env::set_var("HL7DIFF_INPUT_EXAMPLE_PATH", "env-ex.csv");
    std::env::set_var("HL7DIFF_COMPARE_SEGMENTS", "MSH, PID");
    std::env::set_var("HL7DIFF_COMPARE_PARALLEL_PAIRS", "2");
    std::env::set_var("HL7DIFF_REPORT_FORMAT", "json");

    let config = config_from_env().unwrap();
    assert_eq!(config.input.output.unwrap().path, "env-out.csv");
    assert_eq!(config.input.example.unwrap().path, "env-ex.csv");
    assert_eq!(config.compare.segments, vec!["MSH", "PID"]);
    assert_eq!(config.compare.parallel_pairs, 2);
    assert_eq!(config.report.format, "json");

    cleanup_env_vars();
}

#[test]
fn test_invalid_configs_are_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let inputs = "[input.output]\npath = \"o\"\n\n[input.example]\npath = \"e\"\n";
    let cases = [
        "[compare]\nparallel_pairs = 0\n",
        "[compare]\nsegments = [\"pid\"]\n",
        "[compare.correlation]\nfield = 0\n",
        "[compare.ignore]\nPIDX = [1]\n",
        "[report]\nformat = \"html\"\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
    ];

    for case in cases {
        let file = write_config(&format!("{inputs}\n{case}"));
        assert!(load_config(file.path()).is_err(), "accepted: {case}");
    }

    let file = write_config("[report]\nformat = \"text\"\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("input.output"));
}
