use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use quicklaunch_core::model::AppEntry;
use quicklaunch_core::registry::{
    AppSource, CompositeSource, DirectoryAppSource, FixedAppSource,
};

fn unique_root(label: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "quicklaunch-{label}-{}-{unique}",
        std::process::id()
    ))
}

fn names(source: &dyn AppSource) -> Vec<String> {
    source.scan().iter().map(|e| e.name.clone()).collect()
}

#[cfg(unix)]
fn write_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(path, b"#!/bin/sh\n").unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn fixed_source_fixture_is_deterministic() {
    let source = FixedAppSource::deterministic_fixture();
    let snapshot = source.scan();

    assert_eq!(source.source_name(), "fixed");
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot.entries()[0].path, "/bin/Terminal");
    assert_eq!(snapshot.entries()[2].path, "/bin/Tracker");
}

#[test]
fn directory_source_finds_launchables_in_roots() {
    let root = unique_root("registry-launchables");
    let nested = root.join("Games");
    let bundle = root.join("Mail.app");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::create_dir_all(bundle.join("Contents")).unwrap();

    std::fs::write(root.join("Terminal.desktop"), b"[Desktop Entry]").unwrap();
    std::fs::write(nested.join("Chess.exe"), b"MZ").unwrap();
    std::fs::write(root.join("README.txt"), b"not an app").unwrap();
    std::fs::write(bundle.join("Contents").join("Mail.exe"), b"MZ").unwrap();

    let source = DirectoryAppSource::new(vec![root.clone()], 4, vec![]);
    let found = names(&source);

    assert_eq!(found, vec!["Chess", "Mail", "Terminal"]);
    let snapshot = source.scan();
    let terminal = snapshot.iter().find(|e| e.name == "Terminal").unwrap();
    assert!(terminal.path.ends_with("Terminal.desktop"));
    assert_eq!(terminal.icon.as_str(), terminal.path);

    std::fs::remove_dir_all(&root).unwrap();
}

#[cfg(unix)]
#[test]
fn directory_source_detects_unix_executables() {
    let root = unique_root("registry-exec");
    std::fs::create_dir_all(&root).unwrap();
    write_executable(&root.join("StyledEdit"));
    std::fs::write(root.join("notes"), b"plain").unwrap();

    let source = DirectoryAppSource::new(vec![root.clone()], 2, vec![]);
    assert_eq!(names(&source), vec!["StyledEdit"]);

    std::fs::remove_dir_all(&root).unwrap();
}

#[cfg(unix)]
#[test]
fn broken_links_are_skipped_without_failing_the_scan() {
    let root = unique_root("registry-broken");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("Tracker.desktop"), b"[Desktop Entry]").unwrap();
    std::os::unix::fs::symlink(root.join("gone.desktop"), root.join("Dangling.desktop")).unwrap();

    let source = DirectoryAppSource::new(vec![root.clone()], 2, vec![]);
    assert_eq!(names(&source), vec!["Tracker"]);

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn directory_source_excludes_configured_roots() {
    let root = unique_root("registry-exclude");
    let included = root.join("include");
    let excluded = root.join("exclude");
    std::fs::create_dir_all(&included).unwrap();
    std::fs::create_dir_all(&excluded).unwrap();
    std::fs::write(included.join("Keep.exe"), b"MZ").unwrap();
    std::fs::write(excluded.join("Skip.exe"), b"MZ").unwrap();

    let source = DirectoryAppSource::new(vec![root.clone()], 6, vec![excluded.clone()]);
    assert_eq!(names(&source), vec!["Keep"]);

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn directory_source_respects_max_depth() {
    let root = unique_root("registry-depth");
    let deep = root.join("a").join("b");
    std::fs::create_dir_all(&deep).unwrap();
    std::fs::write(root.join("Top.exe"), b"MZ").unwrap();
    std::fs::write(deep.join("Deep.exe"), b"MZ").unwrap();

    let shallow = DirectoryAppSource::new(vec![root.clone()], 1, vec![]);
    assert_eq!(names(&shallow), vec!["Top"]);

    let full = DirectoryAppSource::new(vec![root.clone()], 3, vec![]);
    assert_eq!(names(&full), vec!["Deep", "Top"]);

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn missing_root_yields_empty_snapshot() {
    let source = DirectoryAppSource::new(vec![unique_root("registry-missing")], 4, vec![]);
    assert!(source.scan().is_empty());
}

#[test]
fn composite_source_merges_and_dedupes_by_path() {
    let source = CompositeSource::new(vec![
        Box::new(FixedAppSource::deterministic_fixture()),
        Box::new(FixedAppSource::from_apps(vec![
            AppEntry::new("Terminal", "/bin/Terminal"),
            AppEntry::new("Mail", "/apps/Mail"),
        ])),
    ]);

    assert_eq!(source.source_name(), "composite");
    assert_eq!(names(&source), vec!["Mail", "Terminal", "TextEditor", "Tracker"]);
}
