//! Results exporter tests: tabular shape, content determinism, and the
//! timestamped artifact name.

use investlab_core::{
    profile::Condition,
    report::build_report,
    round::{Decision, Outcome},
    session::SessionState,
};

fn completed_state() -> SessionState {
    let mut s = SessionState::new("export-test".into(), 1, 100);
    s.condition = Some(Condition::Sequential);
    s.record_round(Outcome::Gain, Decision::Keep, 10);
    s.record_round(Outcome::Loss, Decision::Keep, -10);
    s.record_round(Outcome::Loss, Decision::Sell, 0);
    s.record_round(Outcome::Gain, Decision::Sell, 0);
    s.record_round(Outcome::Gain, Decision::Keep, 10);
    s
}

#[test]
fn csv_has_header_then_rows_in_round_order() {
    let report = build_report(&completed_state());
    let csv = report.to_csv();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Round,Outcome,Decision,Gain/Loss",
            "1,Gain,Keep,10",
            "2,Loss,Keep,-10",
            "3,Loss,Sell,0",
            "4,Gain,Sell,0",
            "5,Gain,Keep,10",
        ]
    );
}

#[test]
fn identical_history_renders_identical_content() {
    let a = build_report(&completed_state()).to_csv();
    let b = build_report(&completed_state()).to_csv();
    assert_eq!(a, b);
}

#[test]
fn summary_fields_reflect_the_session() {
    let report = build_report(&completed_state());
    assert_eq!(report.final_endowment, 110);
    assert_eq!(report.condition, Some(Condition::Sequential));
    assert_eq!(report.rows.len(), 5);
}

#[test]
fn export_writes_a_timestamped_artifact() {
    let report = build_report(&completed_state());
    let dir = std::env::temp_dir();
    let path = report.export(&dir).expect("export");

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .expect("artifact filename");
    assert!(name.starts_with("results_experience_"), "got {name}");
    assert!(name.ends_with(".csv"), "got {name}");

    // results_experience_YYYYMMDD_HHMMSS.csv
    let stamp = name
        .trim_start_matches("results_experience_")
        .trim_end_matches(".csv");
    assert_eq!(stamp.len(), 15, "timestamp '{stamp}' not second-resolution");
    assert_eq!(stamp.as_bytes()[8], b'_');
    assert!(stamp
        .chars()
        .enumerate()
        .all(|(i, c)| i == 8 || c.is_ascii_digit()));

    let written = std::fs::read_to_string(&path).expect("read artifact");
    assert_eq!(written, report.to_csv());
    let _ = std::fs::remove_file(&path);
}
