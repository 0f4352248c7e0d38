//! `dsync pause|resume|stop|refresh` append a row to the shared `signals`
//! table for the (possibly not-yet-running) daemon to consume. The CLI
//! itself has no daemon connection, so these specs only check that the
//! write succeeds and is acknowledged — consumption is covered by
//! `dsync-daemon`'s own `control_plane` unit tests.

use crate::support::Project;

#[test]
fn pause_signal_is_accepted_and_acknowledged() {
    Project::empty().cli().args(&["pause"]).passes().stdout_has("sent pause-sync");
}

#[test]
fn resume_signal_is_accepted_and_acknowledged() {
    Project::empty().cli().args(&["resume"]).passes().stdout_has("sent resume-sync");
}

#[test]
fn stop_signal_is_accepted_and_acknowledged() {
    Project::empty().cli().args(&["stop"]).passes().stdout_has("sent stop");
}

#[test]
fn refresh_signal_is_accepted_and_acknowledged() {
    Project::empty().cli().args(&["refresh"]).passes().stdout_has("sent refresh-dashboard");
}

#[test]
fn signals_can_be_sent_before_any_daemon_has_ever_run() {
    // The store file doesn't exist yet; sending a signal must create it
    // rather than failing, since an operator may `pause` before `daemon
    // start` to land a scheduled maintenance window preemptively.
    let project = Project::empty();
    assert!(!project.state_db_path().exists());
    project.cli().args(&["pause"]).passes();
    assert!(project.state_db_path().exists());
}
