use std::time::Duration;

use crate::matcher::MatchOptions;

/// Immutable snapshot of the user-facing toggles the filter engine reads.
/// A settings change produces a new value rather than mutating this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSettings {
    pub debounce: Duration,
    pub match_path: bool,
    pub show_full_path: bool,
    pub apply_ignore_list: bool,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            debounce: Self::delay_from_millis(crate::config::DEFAULT_DEBOUNCE_MS),
            match_path: false,
            show_full_path: false,
            apply_ignore_list: true,
        }
    }
}

impl FilterSettings {
    /// Negative delays clamp to zero, which means synchronous evaluation.
    pub fn delay_from_millis(millis: i64) -> Duration {
        Duration::from_millis(millis.max(0) as u64)
    }

    pub fn with_debounce_ms(mut self, millis: i64) -> Self {
        self.debounce = Self::delay_from_millis(millis);
        self
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            match_path: self.match_path,
        }
    }

    /// True when switching to `other` can change which entries match.
    pub fn changes_matching(&self, other: &FilterSettings) -> bool {
        self.match_path != other.match_path || self.apply_ignore_list != other.apply_ignore_list
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::FilterSettings;

    #[test]
    fn negative_delay_clamps_to_zero() {
        assert_eq!(FilterSettings::delay_from_millis(-25), Duration::ZERO);
        assert_eq!(FilterSettings::delay_from_millis(40), Duration::from_millis(40));
    }

    #[test]
    fn display_only_toggle_does_not_change_matching() {
        let base = FilterSettings::default();
        let shown = FilterSettings {
            show_full_path: true,
            ..base
        };
        let delayed = base.with_debounce_ms(0);
        let by_path = FilterSettings {
            match_path: true,
            ..base
        };

        assert!(!base.changes_matching(&shown));
        assert!(!base.changes_matching(&delayed));
        assert!(base.changes_matching(&by_path));
    }
}
