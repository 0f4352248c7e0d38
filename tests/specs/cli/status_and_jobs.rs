//! `dsync status` / `dsync jobs` against a freshly-created, empty store.
//! These never start `dsyncd`: the CLI opens the shared SQLite file
//! directly and creates it (with schema) on first use (`spec.md` §5, §6).

use crate::support::Project;

#[test]
fn status_on_a_fresh_store_reports_all_zero_counts() {
    Project::empty()
        .cli()
        .args(&["status"])
        .passes()
        .stdout_has("pending:    0")
        .stdout_has("processing: 0")
        .stdout_has("synced:     0")
        .stdout_has("blocked:    0");
}

#[test]
fn status_json_is_a_valid_job_counts_object() {
    let project = Project::empty();
    let out = project.cli().args(&["--format", "json", "status"]).passes();
    let parsed: serde_json::Value = serde_json::from_str(&out.stdout()).expect("valid json");
    assert_eq!(parsed["pending"], 0);
    assert_eq!(parsed["blocked"], 0);
}

#[test]
fn jobs_blocked_on_an_empty_store_reports_none() {
    Project::empty().cli().args(&["jobs", "--blocked"]).passes().stdout_has("no blocked jobs");
}

#[test]
fn jobs_recent_on_an_empty_store_reports_none() {
    Project::empty().cli().args(&["jobs", "--recent"]).passes().stdout_has("no recently synced jobs");
}

#[test]
fn jobs_without_a_selector_fails() {
    Project::empty().cli().args(&["jobs"]).fails().stderr_has("--blocked or --recent");
}

#[test]
fn status_creates_the_state_db_on_first_invocation() {
    let project = Project::empty();
    assert!(!project.state_db_path().exists());
    project.cli().args(&["status"]).passes();
    assert!(project.state_db_path().exists());
}
