//! Metric declarations for the link generator.
//!
//! Every metric is a [`Metric`] constant in [`metric_defs`], so names and
//! label keys are spelled once. The binary installs an
//! [`InMemoryRecorder`] and logs a [`RunSummary`] at the end of a run;
//! without a recorder the recording helpers are no-ops.
//!
//! ```rust
//! use lclinks_metrics::{metric_defs, SourceLabels};
//!
//! let labels = SourceLabels::new("GSW", 2020);
//! metrics::counter!(metric_defs::LINKS_GENERATED.name, &labels.to_labels()).increment(4);
//! ```

pub use metrics;

mod recorder;

pub use recorder::{install_recorder, run_summary, InMemoryRecorder, RunSummary};

use metrics::{describe_counter, describe_histogram, Unit};

/// Counter or histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Monotonic count.
    Counter,
    /// Distribution of observed values.
    Histogram,
}

/// A metric name with its metadata.
#[derive(Debug, Clone)]
pub struct Metric {
    /// Exported name.
    pub name: &'static str,
    /// Counter or histogram.
    pub kind: MetricKind,
    /// Human-readable description.
    pub description: &'static str,
    /// Unit of the recorded values.
    pub unit: Unit,
    /// Label keys attached on every recording.
    pub labels: &'static [&'static str],
}

impl Metric {
    /// Declare a counter.
    pub const fn counter(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: MetricKind::Counter,
            description,
            unit: Unit::Count,
            labels: &[],
        }
    }

    /// Declare a histogram.
    pub const fn histogram(name: &'static str, description: &'static str, unit: Unit) -> Self {
        Self {
            name,
            kind: MetricKind::Histogram,
            description,
            unit,
            labels: &[],
        }
    }

    /// Set the label keys.
    pub const fn with_labels(mut self, labels: &'static [&'static str]) -> Self {
        self.labels = labels;
        self
    }

    /// Register the description with the installed recorder.
    pub fn describe(&self) {
        match self.kind {
            MetricKind::Counter => describe_counter!(self.name, self.unit, self.description),
            MetricKind::Histogram => describe_histogram!(self.name, self.unit, self.description),
        }
    }
}

/// All metrics emitted by a run.
pub mod metric_defs {
    use super::{Metric, Unit};

    /// Labels on every per-source metric.
    pub const SOURCE_LABELS: &[&str] = &["source", "year"];

    /// Download links written for a source and year.
    pub const LINKS_GENERATED: Metric =
        Metric::counter("lclinks.links_generated", "Download links generated").with_labels(SOURCE_LABELS);

    /// Resolutions that produced no links.
    pub const EMPTY_RESOLUTIONS: Metric =
        Metric::counter("lclinks.empty_resolutions", "Source/year pairs without matching tiles")
            .with_labels(SOURCE_LABELS);

    /// Resolutions that failed and were skipped.
    pub const SOURCE_FAILURES: Metric =
        Metric::counter("lclinks.source_failures", "Source/year pairs skipped after an error")
            .with_labels(&["source", "year", "reason"]);

    /// Requested years replaced by the nearest available year.
    pub const YEARS_SNAPPED: Metric =
        Metric::counter("lclinks.years_snapped", "Requested years replaced by an available year")
            .with_labels(&["source"]);

    /// Wall time spent in one resolver call.
    pub const RESOLVE_TIME: Metric =
        Metric::histogram("lclinks.resolve_time_ms", "Time spent resolving tiles", Unit::Milliseconds)
            .with_labels(SOURCE_LABELS);

    /// Entries retrieved by the catalog fetcher.
    pub const CATALOG_ENTRIES_FETCHED: Metric =
        Metric::counter("lclinks.catalog_entries_fetched", "Catalog entries downloaded")
            .with_labels(&["catalog"]);

    /// Every declared metric.
    pub const ALL: &[&Metric] = &[
        &LINKS_GENERATED,
        &EMPTY_RESOLUTIONS,
        &SOURCE_FAILURES,
        &YEARS_SNAPPED,
        &RESOLVE_TIME,
        &CATALOG_ENTRIES_FETCHED,
    ];
}

/// `source` / `year` labels for one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLabels {
    /// Registry name of the source.
    pub source: String,
    /// Resolved year.
    pub year: u16,
}

impl SourceLabels {
    /// Create labels.
    pub fn new(source: impl Into<String>, year: u16) -> Self {
        Self {
            source: source.into(),
            year,
        }
    }

    /// Labels in the form the `metrics` macros take.
    pub fn to_labels(&self) -> Vec<(&'static str, String)> {
        vec![("source", self.source.clone()), ("year", self.year.to_string())]
    }

    /// Labels plus extra pairs.
    pub fn with(&self, extra: &[(&'static str, String)]) -> Vec<(&'static str, String)> {
        let mut labels = self.to_labels();
        labels.extend_from_slice(extra);
        labels
    }
}

/// Record the outcome of one resolution.
pub fn record_resolution(labels: &SourceLabels, links: usize, elapsed_ms: f64) {
    let label_vec = labels.to_labels();
    metrics::counter!(metric_defs::LINKS_GENERATED.name, &label_vec).increment(links as u64);
    if links == 0 {
        metrics::counter!(metric_defs::EMPTY_RESOLUTIONS.name, &label_vec).increment(1);
    }
    metrics::histogram!(metric_defs::RESOLVE_TIME.name, &label_vec).record(elapsed_ms);
}

/// Record a skipped resolution.
pub fn record_failure(labels: &SourceLabels, reason: &'static str) {
    let label_vec = labels.with(&[("reason", reason.to_string())]);
    metrics::counter!(metric_defs::SOURCE_FAILURES.name, &label_vec).increment(1);
}

/// Register every metric description. Call once after installing a recorder.
pub fn describe_metrics() {
    for metric in metric_defs::ALL {
        metric.describe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_labels() {
        let labels = SourceLabels::new("GFC_FCS30D", 2010);
        assert_eq!(
            labels.to_labels(),
            vec![("source", "GFC_FCS30D".to_string()), ("year", "2010".to_string())]
        );

        let extended = labels.with(&[("reason", "aux_missing".to_string())]);
        assert_eq!(extended.len(), 3);
        assert!(extended.contains(&("reason", "aux_missing".to_string())));
    }

    #[test]
    fn test_definitions() {
        assert_eq!(metric_defs::LINKS_GENERATED.name, "lclinks.links_generated");
        assert_eq!(metric_defs::LINKS_GENERATED.kind, MetricKind::Counter);
        assert_eq!(metric_defs::LINKS_GENERATED.labels, &["source", "year"]);
        assert_eq!(metric_defs::RESOLVE_TIME.kind, MetricKind::Histogram);
        assert_eq!(metric_defs::RESOLVE_TIME.unit, Unit::Milliseconds);
        assert_eq!(metric_defs::ALL.len(), 6);
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        describe_metrics();
        let labels = SourceLabels::new("GSW", 2020);
        record_resolution(&labels, 0, 1.5);
        record_failure(&labels, "remote");
    }
}
