//! In-process recorder that keeps run totals for the end-of-run summary.

use crate::metric_defs;
use metrics::{
    Counter, Gauge, Histogram, HistogramFn, Key, KeyName, Metadata, Recorder, SharedString, Unit,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

static INSTALLED: OnceLock<Arc<InMemoryRecorder>> = OnceLock::new();

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Count and sum of the values recorded into one histogram.
#[derive(Debug, Default)]
struct HistogramCell {
    totals: Mutex<(u64, f64)>,
}

impl HistogramFn for HistogramCell {
    fn record(&self, value: f64) {
        let mut totals = lock(&self.totals);
        totals.0 += 1;
        totals.1 += value;
    }
}

/// Recorder holding every counter and histogram in memory.
///
/// Gauges are accepted and discarded.
#[derive(Debug, Default)]
pub struct InMemoryRecorder {
    counters: Mutex<HashMap<Key, Arc<AtomicU64>>>,
    histograms: Mutex<HashMap<Key, Arc<HistogramCell>>>,
    descriptions: Mutex<HashMap<String, SharedString>>,
}

impl InMemoryRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the counter `name` with exactly `labels`.
    pub fn counter(&self, name: &str, labels: &[(&str, &str)]) -> u64 {
        lock(&self.counters)
            .iter()
            .filter(|(key, _)| key.name() == name && labels_match(key, labels))
            .map(|(_, value)| value.load(Ordering::Relaxed))
            .sum()
    }

    /// Sum of the counter `name` over all label sets.
    pub fn counter_total(&self, name: &str) -> u64 {
        lock(&self.counters)
            .iter()
            .filter(|(key, _)| key.name() == name)
            .map(|(_, value)| value.load(Ordering::Relaxed))
            .sum()
    }

    /// Number of samples and their sum for the histogram `name` over all
    /// label sets.
    pub fn histogram_total(&self, name: &str) -> (u64, f64) {
        lock(&self.histograms)
            .iter()
            .filter(|(key, _)| key.name() == name)
            .fold((0, 0.0), |(count, sum), (_, cell)| {
                let totals = lock(&cell.totals);
                (count + totals.0, sum + totals.1)
            })
    }

    /// Description registered for `name`, if any.
    pub fn description(&self, name: &str) -> Option<String> {
        lock(&self.descriptions).get(name).map(|d| d.to_string())
    }

    /// Totals over the whole run.
    pub fn summary(&self) -> RunSummary {
        let (resolutions, resolve_time_ms) = self.histogram_total(metric_defs::RESOLVE_TIME.name);
        RunSummary {
            links_generated: self.counter_total(metric_defs::LINKS_GENERATED.name),
            empty_resolutions: self.counter_total(metric_defs::EMPTY_RESOLUTIONS.name),
            source_failures: self.counter_total(metric_defs::SOURCE_FAILURES.name),
            years_snapped: self.counter_total(metric_defs::YEARS_SNAPPED.name),
            catalog_entries_fetched: self.counter_total(metric_defs::CATALOG_ENTRIES_FETCHED.name),
            resolutions,
            resolve_time_ms,
        }
    }

    fn describe(&self, key: KeyName, description: SharedString) {
        lock(&self.descriptions).insert(key.as_str().to_string(), description);
    }
}

fn labels_match(key: &Key, labels: &[(&str, &str)]) -> bool {
    key.labels().count() == labels.len()
        && labels
            .iter()
            .all(|(k, v)| key.labels().any(|label| label.key() == *k && label.value() == *v))
}

impl Recorder for InMemoryRecorder {
    fn describe_counter(&self, key: KeyName, _unit: Option<Unit>, description: SharedString) {
        self.describe(key, description);
    }

    fn describe_gauge(&self, key: KeyName, _unit: Option<Unit>, description: SharedString) {
        self.describe(key, description);
    }

    fn describe_histogram(&self, key: KeyName, _unit: Option<Unit>, description: SharedString) {
        self.describe(key, description);
    }

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        let cell = lock(&self.counters).entry(key.clone()).or_default().clone();
        Counter::from_arc(cell)
    }

    fn register_gauge(&self, _key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        let cell = lock(&self.histograms).entry(key.clone()).or_default().clone();
        Histogram::from_arc(cell)
    }
}

/// Run totals read back from an [`InMemoryRecorder`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunSummary {
    /// Links generated over all sources.
    pub links_generated: u64,
    /// Resolutions without matching tiles.
    pub empty_resolutions: u64,
    /// Resolutions skipped after an error.
    pub source_failures: u64,
    /// Requested years replaced by an available year.
    pub years_snapped: u64,
    /// Catalog entries downloaded.
    pub catalog_entries_fetched: u64,
    /// Resolver calls timed.
    pub resolutions: u64,
    /// Total resolver time in milliseconds.
    pub resolve_time_ms: f64,
}

/// Install an [`InMemoryRecorder`] as the global recorder and register the
/// metric descriptions with it.
///
/// Returns `None` when another recorder is already installed.
pub fn install_recorder() -> Option<Arc<InMemoryRecorder>> {
    let recorder = Arc::new(InMemoryRecorder::new());
    metrics::set_global_recorder(recorder.clone()).ok()?;
    let _ = INSTALLED.set(recorder.clone());
    crate::describe_metrics();
    Some(recorder)
}

/// Totals of the recorder installed by [`install_recorder`], if any.
pub fn run_summary() -> Option<RunSummary> {
    INSTALLED.get().map(|recorder| recorder.summary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{describe_metrics, record_failure, record_resolution, SourceLabels};

    #[test]
    fn test_summary_totals() {
        let recorder = InMemoryRecorder::new();
        metrics::with_local_recorder(&recorder, || {
            describe_metrics();
            let gsw = SourceLabels::new("GSW", 2020);
            let gfc = SourceLabels::new("GFC", 2015);
            record_resolution(&gsw, 4, 2.0);
            record_resolution(&gfc, 0, 0.5);
            record_failure(&gfc, "remote");
            metrics::counter!(metric_defs::YEARS_SNAPPED.name, "source" => "GFC").increment(1);
        });

        let summary = recorder.summary();
        assert_eq!(summary.links_generated, 4);
        assert_eq!(summary.empty_resolutions, 1);
        assert_eq!(summary.source_failures, 1);
        assert_eq!(summary.years_snapped, 1);
        assert_eq!(summary.catalog_entries_fetched, 0);
        assert_eq!(summary.resolutions, 2);
        assert!((summary.resolve_time_ms - 2.5).abs() < 1e-9);

        assert_eq!(
            recorder.counter(metric_defs::LINKS_GENERATED.name, &[("source", "GSW"), ("year", "2020")]),
            4
        );
        assert_eq!(recorder.counter(metric_defs::LINKS_GENERATED.name, &[("source", "GSW")]), 0);
        assert_eq!(
            recorder.description(metric_defs::SOURCE_FAILURES.name).as_deref(),
            Some(metric_defs::SOURCE_FAILURES.description)
        );
    }
}
