//! TDD-Light tests for report aggregation and output.

use chrono::{DateTime, Utc};
use gg_verify::report::{serialize, summarize, write_report, RECOMMENDATIONS};
use gg_verify::{CheckRunner, Report};

fn fixed_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-10-19T08:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn sample_report(all_pass: bool) -> Report {
    let mut runner = CheckRunner::new();
    runner.log_result("Password Hashing - 'adm***'", true, "Hash: 3f1c2a…");
    runner.log_result("API TLS - auth", true, "TLS 1.2+ enforced");
    runner.log_result("Backup Encryption - config_backup.zip", all_pass, "");
    Report::from_run(&runner.finish(), fixed_time())
}

#[test]
fn serialization_is_byte_identical() {
    let report = sample_report(false);
    let a = serialize(&report.summary, &report.results).unwrap();
    let b = serialize(&report.summary, &report.results).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.last(), Some(&b'\n'));
}

#[test]
fn empty_summary_renders_na() {
    let summary = summarize(&[], fixed_time());
    assert_eq!(summary.pass_rate, None);

    let report = Report::from_run(&CheckRunner::new().finish(), fixed_time());
    let text = report.render_text();
    assert!(text.contains("Pass Rate: N/A (no tests run)"));
    assert!(text.contains("no tests were run"));
    assert!(!text.contains("all encryption tests passed"));
}

#[test]
fn all_pass_prints_all_clear() {
    let report = sample_report(true);
    assert_eq!(report.summary.failed, 0);
    assert!(report.summary.all_passed());

    let text = report.render_text();
    assert!(text.contains("✓ No critical issues found - all encryption tests passed"));
    assert!(text.contains("Pass Rate: 100.0%"));
    for rec in RECOMMENDATIONS {
        assert!(text.contains(rec));
    }
}

#[test]
fn failure_listed_as_critical_finding() {
    let text = sample_report(false).render_text();
    assert!(text.contains("  3. [FAIL] Backup Encryption - config_backup.zip"));
    assert!(text.contains("⚠️  Backup Encryption - config_backup.zip: "));
    assert!(text.contains("Pass Rate: 66.7%"));
}

#[test]
fn write_report_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("encryption_test_report.json");
    std::fs::write(&path, "stale contents that are longer than nothing").unwrap();

    let report = sample_report(true);
    write_report(&path, &report).unwrap();

    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, report.to_json().unwrap());

    let value: serde_json::Value = serde_json::from_slice(&written).unwrap();
    assert_eq!(value["summary"]["total_tests"], 3);
    assert_eq!(value["summary"]["pass_rate"], 100.0);
}

#[test]
fn write_report_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("report.json");
    let err = write_report(&path, &sample_report(true)).unwrap_err();
    assert!(err.is_fatal());
}
