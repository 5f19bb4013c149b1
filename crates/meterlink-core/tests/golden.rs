use std::fs;
use std::path::{Path, PathBuf};

use meterlink_core::{Report, decode_uplink_file};

fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

fn load_expected_report(dir: &str) -> Report {
    let expected_path = repo_root().join(dir).join("expected_report.json");

    let expected_json = fs::read_to_string(&expected_path).expect("read expected_report.json");
    serde_json::from_str(&expected_json).expect("parse expected report")
}

fn run_golden(dir: &str) -> Report {
    let input = repo_root().join(dir).join("input.txt");
    let expected = load_expected_report(dir);

    let mut actual = decode_uplink_file(&input).expect("decode uplinks");
    actual.generated_at = expected.generated_at.clone();
    actual.input.source = expected.input.source.clone();

    let actual_value = serde_json::to_value(&actual).expect("serialize actual");
    let expected_value = serde_json::to_value(expected).expect("serialize expected");

    assert_eq!(actual_value, expected_value, "golden mismatch in {dir}");
    actual
}

#[test]
fn golden_meter() {
    run_golden("tests/golden/meter");
}

#[test]
fn golden_short_and_ports() {
    run_golden("tests/golden/short_and_ports");
}

#[test]
fn golden_raw_patterns() {
    run_golden("tests/golden/raw_patterns");
}

#[test]
fn golden_meter_decodes_every_uplink() {
    let report = run_golden("tests/golden/meter");
    assert_eq!(report.summary.uplinks_total, report.summary.uplinks_decoded);
    assert!(report.uplinks.iter().all(|u| u.port == 1));
}

#[test]
fn golden_short_and_ports_keeps_undecoded_uplinks() {
    let report = run_golden("tests/golden/short_and_ports");
    let empty: Vec<u64> = report
        .uplinks
        .iter()
        .filter(|u| u.fields.is_empty())
        .map(|u| u.line)
        .collect();
    assert_eq!(empty, vec![2, 4, 6]);
}

#[test]
fn golden_raw_patterns_are_finite() {
    let report = run_golden("tests/golden/raw_patterns");
    for uplink in &report.uplinks {
        for (field, value) in uplink.fields.iter() {
            assert!(value.is_finite(), "{field} on line {}", uplink.line);
        }
    }
}
