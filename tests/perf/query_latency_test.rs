use std::sync::Arc;
use std::time::Instant;

use crate::ignore_list::IgnoreSet;
use crate::matcher::{match_entries, MatchOptions};
use crate::model::AppEntry;
use crate::registry::RegistrySnapshot;

fn p95_ms(samples: &mut [f64]) -> f64 {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let last = samples.len().saturating_sub(1);
    let idx = ((last as f64) * 0.95).round() as usize;
    samples[idx.min(last)]
}

#[test]
fn warm_keystroke_match_p95_under_budget() {
    let mut entries: Vec<AppEntry> = (0..10_000)
        .map(|i| {
            AppEntry::new(
                &format!("Application_{i:05}"),
                &format!("/apps/vendor_{}/Application_{i:05}", i % 37),
            )
        })
        .collect();
    entries.push(AppEntry::new("TextEditor", "/apps/TextEditor"));
    let snapshot = Arc::new(RegistrySnapshot::from_entries(entries));
    let ignore = IgnoreSet::from_paths(["/apps/vendor_3/Application_00003"]);
    let options = MatchOptions { match_path: true };

    for _ in 0..20 {
        let _ = match_entries("edit", &snapshot, &ignore, options);
    }

    let mut batch_p95 = Vec::with_capacity(5);
    for _ in 0..5 {
        let mut samples = Vec::with_capacity(40);
        for _ in 0..40 {
            let start = Instant::now();
            let results = match_entries("edit", &snapshot, &ignore, options);
            samples.push(start.elapsed().as_secs_f64() * 1000.0);
            assert_eq!(results.len(), 1);
        }
        batch_p95.push(p95_ms(&mut samples));
    }

    batch_p95.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median_p95 = batch_p95[batch_p95.len() / 2];

    assert!(
        median_p95 <= 50.0,
        "median batch p95 too high: {median_p95:.3}ms (budget 50.0ms); batches={batch_p95:?}",
    );
}
