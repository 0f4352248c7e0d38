//! Black-box specs for the `dsync` CLI and `dsyncd` daemon entry point,
//! driven through `assert_cmd` against a throwaway XDG sandbox per test.

#[path = "support.rs"]
mod support;

#[path = "specs/cli/help.rs"]
mod cli_help;
#[path = "specs/cli/status_and_jobs.rs"]
mod cli_status_and_jobs;
#[path = "specs/cli/signals.rs"]
mod cli_signals;
#[path = "specs/daemon/config_errors.rs"]
mod daemon_config_errors;
