use std::path::{Path, PathBuf};
use std::process::Command;

use crate::model::AppEntry;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LaunchError {
    #[error("empty path")]
    EmptyPath,
    #[error("path does not exist: {}", .0.display())]
    MissingPath(PathBuf),
    #[error("launch failed: {message}")]
    LaunchFailed { message: String, code: Option<i32> },
}

pub fn launch_entry(entry: &AppEntry) -> Result<(), LaunchError> {
    launch_path(&entry.path)
}

pub fn launch_path(path: &str) -> Result<(), LaunchError> {
    let target = validate_launch_path(path)?;
    let mut command = opener_command(&target);
    command.spawn().map_err(|error| LaunchError::LaunchFailed {
        message: error.to_string(),
        code: error.raw_os_error(),
    })?;
    tracing::info!(path = %target.display(), "launched application");
    Ok(())
}

pub fn validate_launch_path(path: &str) -> Result<PathBuf, LaunchError> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(LaunchError::EmptyPath);
    }

    let candidate = Path::new(trimmed);
    if !candidate.exists() {
        return Err(LaunchError::MissingPath(candidate.to_path_buf()));
    }

    Ok(candidate.to_path_buf())
}

#[cfg(target_os = "windows")]
fn opener_command(target: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg("start").arg("").arg(target);
    command
}

#[cfg(target_os = "macos")]
fn opener_command(target: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(target);
    command
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn opener_command(target: &Path) -> Command {
    if is_executable_file(target) {
        return Command::new(target);
    }
    let mut command = Command::new("xdg-open");
    command.arg(target);
    command
}

#[cfg(all(unix, not(target_os = "macos")))]
fn is_executable_file(target: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(target)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(any(unix, target_os = "windows")))]
fn is_executable_file(_target: &Path) -> bool {
    false
}
