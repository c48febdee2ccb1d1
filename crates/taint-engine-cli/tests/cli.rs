use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn check_reports_the_bundled_sql_injection_issue() {
    Command::cargo_bin("taint-engine")
        .unwrap()
        .arg("check")
        .assert()
        .code(1)
        .stdout(contains("[1001]"));
}

#[test]
fn check_json_emits_an_issues_array() {
    Command::cargo_bin("taint-engine")
        .unwrap()
        .args(["check", "--format", "json"])
        .assert()
        .code(1)
        .stdout(contains("\"issues\""));
}

#[test]
fn query_reports_the_bundled_parametric_source_model() {
    Command::cargo_bin("taint-engine")
        .unwrap()
        .arg("query")
        .assert()
        .code(0)
        .stdout(contains("app.handlers.handler"));
}

#[test]
fn query_json_emits_a_models_array() {
    Command::cargo_bin("taint-engine")
        .unwrap()
        .args(["query", "--format", "json"])
        .assert()
        .code(0)
        .stdout(contains("\"models\""));
}
