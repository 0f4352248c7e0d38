// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_minimal_config() {
    let cfg = Config::from_str(
        r#"
        remote_root = "my_files"

        [[sync_dirs]]
        source_path = "/home/alice/Documents"

        [[sync_dirs]]
        source_path = "/home/alice/Pictures"
        "#,
    )
    .unwrap();

    assert_eq!(cfg.remote_root, "my_files");
    assert_eq!(cfg.sync_dirs.len(), 2);
    assert_eq!(cfg.sync_dirs[0].source_path, Path::new("/home/alice/Documents"));
}

#[test]
fn remote_root_defaults_to_empty_string() {
    let cfg = Config::from_str(
        r#"
        [[sync_dirs]]
        source_path = "/home/alice/Documents"
        "#,
    )
    .unwrap();

    assert_eq!(cfg.remote_root, "");
}

#[test]
fn rejects_malformed_toml() {
    let err = Config::from_str("not valid toml [[[").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn rejects_missing_sync_dirs() {
    let err = Config::from_str(r#"remote_root = "my_files""#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        remote_root = "my_files"

        [[sync_dirs]]
        source_path = "/home/alice/Documents"
        "#,
    )
    .unwrap();

    let cfg = Config::load(&path).unwrap();
    assert_eq!(cfg.sync_dirs.len(), 1);
}

#[test]
fn load_surfaces_io_error_for_missing_file() {
    let err = Config::load("/nonexistent/path/config.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn watch_roots_fails_on_nonexistent_directory() {
    let cfg = Config::from_str(
        r#"
        [[sync_dirs]]
        source_path = "/nonexistent/does/not/exist"
        "#,
    )
    .unwrap();

    let err = cfg.watch_roots().unwrap_err();
    match err {
        ConfigError::WatchRoot { index, .. } => assert_eq!(index, 0),
        other => panic!("expected WatchRoot error, got {other:?}"),
    }
}

#[test]
fn watch_roots_canonicalizes_existing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::from_str(&format!(
        r#"
        remote_root = "my_files"

        [[sync_dirs]]
        source_path = "{}"
        "#,
        dir.path().display()
    ))
    .unwrap();

    let roots = cfg.watch_roots().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].local_path(), dir.path().canonicalize().unwrap());
}
