//! `dsyncd` fails fast with a readable error when its config is missing or
//! malformed, before it ever tries to reach the change-source service
//! (`spec.md` §6, §9).

use crate::support::Project;

fn dsyncd(project: &Project) -> crate::support::Run {
    project.bin("dsyncd").args(&["--foreground"])
}

#[test]
fn missing_config_file_fails_with_context() {
    let project = Project::empty();
    dsyncd(&project).fails().stderr_has("loading config");
}

#[test]
fn malformed_config_file_fails_with_context() {
    let project = Project::empty();
    project.config_file("config.toml", "not valid toml [[[");
    dsyncd(&project).fails().stderr_has("loading config");
}

#[test]
fn config_naming_a_nonexistent_sync_dir_fails_with_context() {
    let project = Project::empty();
    project.config_file(
        "config.toml",
        r#"
remote_root = "backup"

[[sync_dirs]]
source_path = "/nonexistent/definitely/not/here"
"#,
    );
    dsyncd(&project).fails().stderr_has("resolving configured sync_dirs");
}
