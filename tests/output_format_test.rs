//! Tests for the text and JSON-lines output formats.
//!
//! The JSON field names are read by the host tool and must not change.

use std::path::PathBuf;

use namecheck::check::RunContext;
use namecheck::config::{CliPatterns, Policy};
use namecheck::model::DumpFile;
use namecheck::report::{JsonFinding, JsonReporter, TextReporter};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn function_policy() -> Policy {
    Policy::from(CliPatterns {
        function: Some("[A-Z]".to_string()),
        ..Default::default()
    })
}

#[test]
fn test_text_output() {
    let dump = DumpFile::parse_file(testdata_path().join("skiplist.cpp.dump"))
        .expect("should parse dump");
    let mut ctx = RunContext::new(function_policy(), TextReporter::new(Vec::new()));
    ctx.check_dump(&dump).expect("check should succeed");

    let out = String::from_utf8(ctx.into_reporter().into_inner()).expect("utf-8 output");
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "[skiplist.cpp:200:5] (style) Function main violates naming convention. [A-Z] [naming-functionName]",
            "[skiplist.cpp:118:34] (style) Function _Search violates naming convention. [A-Z] [naming-functionName]",
        ]
    );
}

#[test]
fn test_json_lines_output() {
    let dump = DumpFile::parse_file(testdata_path().join("skiplist.cpp.dump"))
        .expect("should parse dump");
    let mut ctx = RunContext::new(function_policy(), JsonReporter::new(Vec::new()));
    ctx.check_dump(&dump).expect("check should succeed");

    let out = String::from_utf8(ctx.into_reporter().into_inner()).expect("utf-8 output");
    let findings: Vec<JsonFinding> = out
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is a JSON object"))
        .collect();

    assert_eq!(findings.len(), 2);
    assert_eq!(findings[1].file, "skiplist.cpp");
    assert_eq!(findings[1].linenr, 118);
    assert_eq!(findings[1].column, 34);
    assert_eq!(findings[1].error_id, "functionName");
    assert_eq!(findings[1].addon, "naming");
}

#[test]
fn test_json_field_names() {
    let dump = DumpFile::parse_file(testdata_path().join("skiplist.cpp.dump"))
        .expect("should parse dump");
    let mut ctx = RunContext::new(function_policy(), JsonReporter::new(Vec::new()));
    ctx.check_dump(&dump).expect("check should succeed");

    let out = String::from_utf8(ctx.into_reporter().into_inner()).expect("utf-8 output");
    let first = out.lines().next().expect("at least one line");
    let value: serde_json::Value = serde_json::from_str(first).expect("valid JSON");
    let object = value.as_object().expect("JSON object");

    for field in [
        "file", "linenr", "column", "severity", "message", "addon", "errorId", "extra",
    ] {
        assert!(object.contains_key(field), "missing field {field}");
    }
    assert_eq!(object.len(), 8);
}
