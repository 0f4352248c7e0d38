//! `dsync --help` / `--version` surface.

use crate::support::Project;

#[test]
fn dsync_no_args_shows_usage_and_exits_nonzero() {
    Project::empty().cli().fails().stderr_has("Usage:");
}

#[test]
fn dsync_help_lists_subcommands() {
    Project::empty()
        .cli()
        .args(&["--help"])
        .passes()
        .stdout_has("pause")
        .stdout_has("resume")
        .stdout_has("status")
        .stdout_has("jobs");
}

#[test]
fn dsync_jobs_help_shows_blocked_and_recent_flags() {
    Project::empty()
        .cli()
        .args(&["jobs", "--help"])
        .passes()
        .stdout_has("--blocked")
        .stdout_has("--recent");
}
