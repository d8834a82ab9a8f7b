use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Full paths of applications kept out of every result set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoreSet {
    paths: BTreeSet<String>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for path in paths {
            set.add(path);
        }
        set
    }

    /// Returns `false` when the path was already present or is blank.
    pub fn add(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if path.trim().is_empty() {
            return false;
        }
        self.paths.insert(path)
    }

    pub fn remove(&mut self, path: &str) -> bool {
        self.paths.remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn is_superset(&self, other: &IgnoreSet) -> bool {
        self.paths.is_superset(&other.paths)
    }
}

/// The set the matcher should actually apply. An empty list behaves as if the
/// toggle were off.
pub fn effective(apply: bool, ignore: &IgnoreSet) -> Option<&IgnoreSet> {
    if apply && !ignore.is_empty() {
        Some(ignore)
    } else {
        None
    }
}
