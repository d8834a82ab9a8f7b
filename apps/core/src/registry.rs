use std::collections::HashSet;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::model::{AppEntry, IconRef};

const SCAN_WARNING_SAMPLE_LIMIT: usize = 5;
const LAUNCHABLE_EXTENSIONS: [&str; 3] = ["exe", "lnk", "desktop"];
const BUNDLE_EXTENSION: &str = "app";

/// Immutable result of one registry scan, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    entries: Vec<AppEntry>,
}

impl RegistrySnapshot {
    /// Drops duplicate paths (first one wins) and sorts by folded name, then path.
    pub fn from_entries(entries: Vec<AppEntry>) -> Self {
        let mut seen = HashSet::with_capacity(entries.len());
        let mut entries: Vec<AppEntry> = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.path.clone()))
            .collect();

        entries.sort_by(|a, b| {
            a.folded_name()
                .cmp(b.folded_name())
                .then_with(|| a.path.cmp(&b.path))
        });

        Self { entries }
    }

    pub fn entries(&self) -> &[AppEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&AppEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AppEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<AppEntry> {
        self.entries
    }
}

/// Enumerates launchable applications. Scanning never fails as a whole:
/// entries that cannot be read are left out of the snapshot.
pub trait AppSource: Send + Sync {
    fn source_name(&self) -> &'static str;
    fn scan(&self) -> RegistrySnapshot;
}

pub struct FixedAppSource {
    apps: Vec<AppEntry>,
}

impl FixedAppSource {
    pub fn from_apps(apps: Vec<AppEntry>) -> Self {
        Self { apps }
    }

    pub fn deterministic_fixture() -> Self {
        Self {
            apps: vec![
                AppEntry::new("Terminal", "/bin/Terminal"),
                AppEntry::new("TextEditor", "/bin/TextEditor"),
                AppEntry::new("Tracker", "/bin/Tracker"),
            ],
        }
    }
}

impl AppSource for FixedAppSource {
    fn source_name(&self) -> &'static str {
        "fixed"
    }

    fn scan(&self) -> RegistrySnapshot {
        RegistrySnapshot::from_entries(self.apps.clone())
    }
}

pub struct DirectoryAppSource {
    roots: Vec<PathBuf>,
    max_depth: usize,
    exclude_roots: Vec<PathBuf>,
}

impl DirectoryAppSource {
    pub fn new(roots: Vec<PathBuf>, max_depth: usize, exclude_roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            max_depth: max_depth.max(1),
            exclude_roots,
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.exclude_roots
            .iter()
            .any(|excluded| path.starts_with(excluded))
    }

    fn scan_root(&self, root: &Path, entries: &mut Vec<AppEntry>, warnings: &mut ScanWarnings) {
        let mut walker = WalkDir::new(root)
            .follow_links(false)
            .max_depth(self.max_depth)
            .into_iter();

        while let Some(next) = walker.next() {
            let dir_entry = match next {
                Ok(dir_entry) => dir_entry,
                Err(error) => {
                    let path = error.path().unwrap_or(root).to_path_buf();
                    warnings.record(ScanWarningKind::Walk, &path);
                    continue;
                }
            };

            let path = dir_entry.path();
            let is_dir = dir_entry.file_type().is_dir();
            if self.is_excluded(path) {
                if is_dir {
                    walker.skip_current_dir();
                }
                continue;
            }
            if dir_entry.depth() == 0 {
                continue;
            }

            if is_dir {
                if has_extension(path, BUNDLE_EXTENSION) {
                    if let Some(entry) = app_entry_for(path) {
                        entries.push(entry);
                    }
                    walker.skip_current_dir();
                }
                continue;
            }

            // Follows symlinks so linked executables resolve to their target.
            let metadata = match std::fs::metadata(path) {
                Ok(metadata) => metadata,
                Err(_) => {
                    warnings.record(ScanWarningKind::Metadata, path);
                    continue;
                }
            };
            if metadata.is_dir() || !is_launchable_file(path, &metadata) {
                continue;
            }
            if let Some(entry) = app_entry_for(path) {
                entries.push(entry);
            }
        }
    }
}

impl AppSource for DirectoryAppSource {
    fn source_name(&self) -> &'static str {
        "directory"
    }

    fn scan(&self) -> RegistrySnapshot {
        let mut entries = Vec::new();
        let mut warnings = ScanWarnings::default();

        for root in &self.roots {
            if !root.exists() {
                tracing::debug!(root = %root.display(), "app root missing; skipped");
                continue;
            }
            self.scan_root(root, &mut entries, &mut warnings);
        }

        warnings.log_summary(self.source_name());
        tracing::info!(
            source = self.source_name(),
            roots = self.roots.len(),
            found = entries.len(),
            "app scan finished"
        );
        RegistrySnapshot::from_entries(entries)
    }
}

/// Merges several sources into one snapshot.
pub struct CompositeSource {
    sources: Vec<Box<dyn AppSource>>,
}

impl CompositeSource {
    pub fn new(sources: Vec<Box<dyn AppSource>>) -> Self {
        Self { sources }
    }
}

impl AppSource for CompositeSource {
    fn source_name(&self) -> &'static str {
        "composite"
    }

    fn scan(&self) -> RegistrySnapshot {
        let entries = self
            .sources
            .iter()
            .flat_map(|source| source.scan().into_entries())
            .collect();
        RegistrySnapshot::from_entries(entries)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanWarningKind {
    Walk,
    Metadata,
}

#[derive(Debug, Default)]
struct ScanWarnings {
    walk_failed: u64,
    metadata_failed: u64,
    samples: Vec<String>,
}

impl ScanWarnings {
    fn record(&mut self, kind: ScanWarningKind, path: &Path) {
        match kind {
            ScanWarningKind::Walk => self.walk_failed = self.walk_failed.saturating_add(1),
            ScanWarningKind::Metadata => {
                self.metadata_failed = self.metadata_failed.saturating_add(1)
            }
        }
        if self.samples.len() < SCAN_WARNING_SAMPLE_LIMIT {
            self.samples.push(path.to_string_lossy().into_owned());
        }
    }

    fn log_summary(&self, source: &str) {
        let total = self.walk_failed.saturating_add(self.metadata_failed);
        if total == 0 {
            return;
        }

        tracing::warn!(
            source,
            total,
            walk_failed = self.walk_failed,
            metadata_failed = self.metadata_failed,
            samples = self.samples.join(" | "),
            "skipped unreadable entries during app scan"
        );
    }
}

fn app_entry_for(path: &Path) -> Option<AppEntry> {
    let name = path.file_stem()?.to_string_lossy().trim().to_string();
    if name.is_empty() {
        return None;
    }
    let path_text = path.to_string_lossy().into_owned();
    let icon = IconRef::new(path_text.clone());
    Some(AppEntry::from_owned(name, path_text, icon))
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}

fn is_launchable_file(path: &Path, metadata: &Metadata) -> bool {
    if LAUNCHABLE_EXTENSIONS
        .iter()
        .any(|ext| has_extension(path, ext))
    {
        return true;
    }
    is_executable(metadata)
}

#[cfg(unix)]
fn is_executable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;

    metadata.is_file() && metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &Metadata) -> bool {
    false
}
