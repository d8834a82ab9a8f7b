//! The stateful side of the filter engine.
//!
//! A [`FilterSession`] lives on the thread that owns the displayed list. It
//! never locks anything itself; hosts that reach it from other threads must
//! hold their own exclusive guard for the duration of each call.

use std::sync::Arc;
use std::time::Instant;

use crate::debounce::{Arm, DebounceScheduler, DebounceTicket};
use crate::ignore_list::{self, IgnoreSet};
use crate::matcher::{match_entries, ResultSet};
use crate::registry::{AppSource, RegistrySnapshot};
use crate::settings::FilterSettings;

/// Top visible row plus the identity of the entry shown there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollAnchor {
    row: usize,
    entry_path: Option<String>,
}

impl ScrollAnchor {
    fn top_of(results: &ResultSet) -> Self {
        Self {
            row: 0,
            entry_path: results.get(0).map(|entry| entry.path.clone()),
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn entry_path(&self) -> Option<&str> {
        self.entry_path.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryUpdate {
    /// Results were rebuilt before returning (zero delay).
    Evaluated,
    /// The host must call [`FilterSession::on_delay_fired`] with `ticket` at `deadline`.
    Scheduled {
        ticket: DebounceTicket,
        deadline: Instant,
    },
}

pub struct FilterSession {
    source: Box<dyn AppSource>,
    snapshot: Option<Arc<RegistrySnapshot>>,
    ignore: Arc<IgnoreSet>,
    settings: FilterSettings,
    query: String,
    results: ResultSet,
    anchor: ScrollAnchor,
    debounce: DebounceScheduler,
    evaluations: u64,
}

impl FilterSession {
    pub fn new(
        source: Box<dyn AppSource>,
        settings: FilterSettings,
        ignore: Arc<IgnoreSet>,
    ) -> Self {
        Self {
            source,
            snapshot: None,
            ignore,
            settings,
            query: String::new(),
            results: ResultSet::default(),
            anchor: ScrollAnchor::default(),
            debounce: DebounceScheduler::new(settings.debounce),
            evaluations: 0,
        }
    }

    pub fn set_query(&mut self, text: &str) -> QueryUpdate {
        self.set_query_at(text, Instant::now())
    }

    pub fn set_query_at(&mut self, text: &str, now: Instant) -> QueryUpdate {
        self.query.clear();
        self.query.push_str(text);

        match self.debounce.on_query_changed(text, now) {
            Arm::Immediate(query) => {
                self.evaluate(&query);
                QueryUpdate::Evaluated
            }
            Arm::Scheduled { ticket, deadline } => QueryUpdate::Scheduled { ticket, deadline },
        }
    }

    /// Timer callback. Returns whether a rebuild ran; stale tickets are no-ops.
    pub fn on_delay_fired(&mut self, ticket: DebounceTicket) -> bool {
        match self.debounce.on_delay_fired(ticket) {
            Some(query) => {
                self.evaluate(&query);
                true
            }
            None => false,
        }
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        match self.debounce.fire_due(now) {
            Some(query) => {
                self.evaluate(&query);
                true
            }
            None => false,
        }
    }

    /// Installs `results` and keeps the anchor on the same entry when it
    /// survived the rebuild; otherwise the anchor returns to the top.
    pub fn on_rebuild_ready(&mut self, results: ResultSet) {
        let kept_row = self
            .anchor
            .entry_path()
            .and_then(|path| results.position_of(path));

        self.anchor = match kept_row {
            Some(row) => ScrollAnchor {
                row,
                entry_path: self.anchor.entry_path.take(),
            },
            None => ScrollAnchor::top_of(&results),
        };
        self.results = results;
    }

    pub fn on_ignore_list_changed(&mut self, ignore: Arc<IgnoreSet>) {
        self.debounce.cancel();
        self.ignore = ignore;
        tracing::debug!(ignored = self.ignore.len(), "ignore list changed");
        self.evaluate_current();
    }

    pub fn on_registry_invalidated(&mut self) {
        self.debounce.cancel();
        self.snapshot = Some(Arc::new(self.scan()));
        self.evaluate_current();
    }

    /// Installs a new settings value. The delay applies to the next keystroke;
    /// toggles that change matching re-run the current query right away.
    pub fn apply_settings(&mut self, settings: FilterSettings) {
        let rematch = self.settings.changes_matching(&settings);
        self.debounce.set_delay(settings.debounce);
        self.settings = settings;

        if rematch {
            self.debounce.cancel();
            self.evaluate_current();
        }
    }

    /// Sets the query and evaluates it without waiting, e.g. a saved search.
    pub fn restore_query(&mut self, text: &str) {
        self.debounce.cancel();
        self.query.clear();
        self.query.push_str(text);
        self.evaluate_current();
    }

    /// Drops pending work and empties the list, e.g. when the window closes.
    pub fn clear(&mut self) {
        self.debounce.cancel();
        self.query.clear();
        self.results = ResultSet::default();
        self.anchor = ScrollAnchor::default();
    }

    /// Records the row the shell currently shows at the top.
    pub fn set_scroll_anchor(&mut self, row: usize) {
        let row = row.min(self.results.len().saturating_sub(1));
        self.anchor = ScrollAnchor {
            row,
            entry_path: self.results.get(row).map(|entry| entry.path.clone()),
        };
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn current_results(&self) -> &ResultSet {
        &self.results
    }

    pub fn current_scroll_anchor(&self) -> &ScrollAnchor {
        &self.anchor
    }

    pub fn settings(&self) -> FilterSettings {
        self.settings
    }

    pub fn state(&self) -> SessionState {
        if self.debounce.is_pending() {
            SessionState::Pending
        } else {
            SessionState::Idle
        }
    }

    pub fn pending_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    fn scan(&self) -> RegistrySnapshot {
        let snapshot = self.source.scan();
        tracing::info!(
            source = self.source.source_name(),
            entries = snapshot.len(),
            "registry snapshot rebuilt"
        );
        snapshot
    }

    fn snapshot(&mut self) -> Arc<RegistrySnapshot> {
        if let Some(snapshot) = &self.snapshot {
            return Arc::clone(snapshot);
        }
        let snapshot = Arc::new(self.scan());
        self.snapshot = Some(Arc::clone(&snapshot));
        snapshot
    }

    fn evaluate_current(&mut self) {
        let query = self.query.clone();
        self.evaluate(&query);
    }

    fn evaluate(&mut self, query: &str) {
        let snapshot = self.snapshot();
        let no_ignores = IgnoreSet::new();
        let ignore = ignore_list::effective(self.settings.apply_ignore_list, &self.ignore)
            .unwrap_or(&no_ignores);
        let results = match_entries(query, &snapshot, ignore, self.settings.match_options());

        self.evaluations = self.evaluations.saturating_add(1);
        tracing::debug!(
            query,
            matches = results.len(),
            evaluations = self.evaluations,
            "filter rebuilt"
        );
        self.on_rebuild_ready(results);
    }
}

impl Drop for FilterSession {
    fn drop(&mut self) {
        self.debounce.cancel();
    }
}
