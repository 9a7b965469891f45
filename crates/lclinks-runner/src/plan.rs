//! Run planning: which (source, year) pairs get resolved.

use crate::{Result, RunnerError};
use lclinks_metrics::metric_defs;
use lclinks_sources::SourceId;
use std::ops::RangeInclusive;
use tracing::info;

/// One resolution to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedJob {
    /// Source to resolve.
    pub source: SourceId,
    /// Year as requested.
    pub requested_year: u16,
    /// Year after snapping onto the source's published years.
    pub year: u16,
    /// Year of the map file serving `year`.
    pub map_year: u16,
}

/// Parse source names, returning them in registry order without repeats.
///
/// An empty list selects every source.
pub fn parse_sources<S: AsRef<str>>(names: &[S]) -> Result<Vec<SourceId>> {
    if names.is_empty() {
        return Ok(SourceId::ALL.to_vec());
    }
    let mut sources = names
        .iter()
        .map(|name| name.as_ref().parse::<SourceId>())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    sources.sort();
    sources.dedup();
    Ok(sources)
}

/// Years accepted on the command line.
pub const YEAR_RANGE: RangeInclusive<u16> = 1900..=2100;

/// Reject an empty year list or a year outside [`YEAR_RANGE`].
pub fn validate_years(years: &[u16]) -> Result<()> {
    if years.is_empty() {
        return Err(RunnerError::InvalidYears("at least one year is required".into()));
    }
    if let Some(year) = years.iter().find(|y| !YEAR_RANGE.contains(*y)) {
        return Err(RunnerError::InvalidYears(format!(
            "{year} is outside {}-{}",
            YEAR_RANGE.start(),
            YEAR_RANGE.end()
        )));
    }
    Ok(())
}

/// Expand sources × years into jobs, in source order then year order.
///
/// Each requested year is snapped onto the source's published years.
/// Years a source rejects after snapping are dropped, as are repeats of an
/// already planned (source, year) pair.
pub fn build_plan(sources: &[SourceId], years: &[u16]) -> Vec<PlannedJob> {
    let mut jobs: Vec<PlannedJob> = Vec::new();

    for &source in sources {
        let descriptor = source.descriptor();
        for &requested_year in years {
            let year = descriptor.resolve_year(requested_year);
            if year != requested_year {
                info!(
                    source = %source,
                    requested_year,
                    year,
                    "source not available for requested year, using closest available year"
                );
                metrics::counter!(metric_defs::YEARS_SNAPPED.name, "source" => source.name()).increment(1);
            }

            if !descriptor.accepts_year(year) {
                info!(source = %source, year, "skipping year outside the known range");
                continue;
            }

            if jobs.iter().any(|j| j.source == source && j.year == year) {
                continue;
            }

            jobs.push(PlannedJob {
                source,
                requested_year,
                year,
                map_year: descriptor.map_year(year),
            });
        }
    }
    jobs
}
