use std::cmp::Ordering;
use std::sync::Arc;

use crate::ignore_list::IgnoreSet;
use crate::model::{fold_case, AppEntry};
use crate::registry::RegistrySnapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    pub match_path: bool,
}

/// Ordered matches for one query. Entries stay owned by the snapshot; the
/// set only keeps indices into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    snapshot: Arc<RegistrySnapshot>,
    indices: Vec<usize>,
}

impl Default for ResultSet {
    fn default() -> Self {
        Self {
            snapshot: Arc::new(RegistrySnapshot::default()),
            indices: Vec::new(),
        }
    }
}

impl ResultSet {
    pub fn snapshot(&self) -> &Arc<RegistrySnapshot> {
        &self.snapshot
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&AppEntry> {
        self.indices
            .get(row)
            .and_then(|&index| self.snapshot.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AppEntry> + '_ {
        self.indices
            .iter()
            .filter_map(move |&index| self.snapshot.get(index))
    }

    pub fn position_of(&self, path: &str) -> Option<usize> {
        self.iter().position(|entry| entry.path == path)
    }

    pub fn paths(&self) -> Vec<&str> {
        self.iter().map(|entry| entry.path.as_str()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|entry| entry.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchField {
    Name,
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct MatchRank {
    field: MatchField,
    position: usize,
}

/// Matches `query` against the snapshot with ignored paths removed first.
///
/// An empty query yields every remaining entry in snapshot order. Otherwise an
/// entry is kept when the case-folded query is a substring of its folded name
/// (or path, with `match_path`), ranked by match position, then folded name,
/// then path. Path-only matches rank after all name matches.
pub fn match_entries(
    query: &str,
    snapshot: &Arc<RegistrySnapshot>,
    ignore: &IgnoreSet,
    options: MatchOptions,
) -> ResultSet {
    let candidates = snapshot
        .iter()
        .enumerate()
        .filter(|(_, entry)| !ignore.contains(&entry.path));

    if query.is_empty() {
        return ResultSet {
            snapshot: Arc::clone(snapshot),
            indices: candidates.map(|(index, _)| index).collect(),
        };
    }

    let folded_query = fold_case(query);
    let mut ranked: Vec<(MatchRank, usize, &AppEntry)> = candidates
        .filter_map(|(index, entry)| {
            rank_entry(entry, &folded_query, options).map(|rank| (rank, index, entry))
        })
        .collect();

    ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| compare_entries(a.2, b.2)));

    ResultSet {
        snapshot: Arc::clone(snapshot),
        indices: ranked.into_iter().map(|(_, index, _)| index).collect(),
    }
}

fn rank_entry(entry: &AppEntry, folded_query: &str, options: MatchOptions) -> Option<MatchRank> {
    if let Some(position) = char_position(entry.folded_name(), folded_query) {
        return Some(MatchRank {
            field: MatchField::Name,
            position,
        });
    }

    if options.match_path {
        return char_position(entry.folded_path(), folded_query).map(|position| MatchRank {
            field: MatchField::Path,
            position,
        });
    }

    None
}

fn char_position(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .find(needle)
        .map(|byte_offset| haystack[..byte_offset].chars().count())
}

fn compare_entries(a: &AppEntry, b: &AppEntry) -> Ordering {
    a.folded_name()
        .cmp(b.folded_name())
        .then_with(|| a.path.cmp(&b.path))
}
