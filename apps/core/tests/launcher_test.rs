use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use quicklaunch_core::launcher::{launch_entry, launch_path, validate_launch_path, LaunchError};
use quicklaunch_core::model::AppEntry;

fn unique_temp_path(label: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "quicklaunch-{label}-{}-{unique}.tmp",
        std::process::id()
    ))
}

#[test]
fn rejects_empty_launch_path() {
    assert_eq!(launch_path(""), Err(LaunchError::EmptyPath));
    assert_eq!(launch_path("   "), Err(LaunchError::EmptyPath));
}

#[test]
fn rejects_missing_launch_path() {
    let missing = unique_temp_path("missing-path");
    let missing_str = missing.to_string_lossy().to_string();

    assert_eq!(
        launch_path(&missing_str),
        Err(LaunchError::MissingPath(missing))
    );
}

#[test]
fn launch_entry_uses_entry_path() {
    let missing = unique_temp_path("missing-entry");
    let entry = AppEntry::new("Ghost", missing.to_string_lossy().as_ref());

    assert_eq!(launch_entry(&entry), Err(LaunchError::MissingPath(missing)));
}

#[test]
fn validates_existing_launch_path() {
    let file_path = unique_temp_path("existing-path");
    let file_path_str = file_path.to_string_lossy().to_string();

    fs::write(&file_path, b"ok").expect("should create temp file");
    let result = validate_launch_path(&format!("  {file_path_str}  "));
    fs::remove_file(&file_path).expect("should clean temp file");

    assert_eq!(result, Ok(file_path));
}
