//! Link-record assembly.
//!
//! Runs the resolver of every planned job and expands each returned URL
//! into a [`LinkRecord`]. A failing job is logged and contributes nothing;
//! it never aborts the others.

use crate::plan::PlannedJob;
use crate::Result;
use lclinks_geo::BoundingBox;
use lclinks_metrics::{record_failure, record_resolution, SourceLabels};
use lclinks_sources::{HeaderProfile, LinkType, ResolveContext, ResolveRequest, SourceError, TileResolver};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

/// One downloadable file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkRecord {
    /// Region name given for the run.
    pub region: String,
    /// Year as requested.
    pub requested_year: u16,
    /// Year after snapping.
    pub year: u16,
    /// Display name of the source.
    pub map_name: &'static str,
    /// Year of the map file.
    pub map_year: u16,
    /// How the link should be downloaded.
    #[serde(rename = "type")]
    pub link_type: LinkType,
    /// Download URL.
    pub url: String,
    /// Header profile a downloader must send.
    pub request_headers: Option<HeaderProfile>,
    /// AOI bounding box as a closed `[lon, lat]` ring.
    pub aoi: [[f64; 2]; 5],
}

/// How one job ended.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    /// Resolver ran; zero links is a valid outcome.
    Resolved(usize),
    /// Resolver failed; the job contributed no links.
    Failed(String),
}

/// Records and status of one job.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    /// The job.
    pub job: PlannedJob,
    /// Its records, in resolver order.
    pub records: Vec<LinkRecord>,
    /// Outcome.
    pub status: JobStatus,
}

fn failure_reason(error: &SourceError) -> &'static str {
    match error {
        SourceError::AuxiliaryDataMissing { .. } => "aux_missing",
        SourceError::RemoteQueryFailed { .. } | SourceError::HttpRequest(_) => "remote",
        _ => "error",
    }
}

/// Resolve one job into link records.
pub fn resolve_job(job: &PlannedJob, region: &str, bbox: &BoundingBox, ctx: &ResolveContext<'_>) -> JobOutcome {
    let descriptor = job.source.descriptor();
    let labels = SourceLabels::new(job.source.name(), job.year);
    let request = ResolveRequest::new(*bbox, job.year, job.map_year);

    let started = Instant::now();
    let result = job.source.resolver().resolve(&request, ctx);
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    match result {
        Ok(urls) => {
            info!(
                source = %job.source,
                year = job.year,
                map_year = job.map_year,
                links = urls.len(),
                "resolved links"
            );
            record_resolution(&labels, urls.len(), elapsed_ms);

            let template = LinkRecord {
                region: region.to_string(),
                requested_year: job.requested_year,
                year: job.year,
                map_name: descriptor.map_name,
                map_year: job.map_year,
                link_type: descriptor.link_type,
                url: String::new(),
                request_headers: descriptor.request_headers,
                aoi: bbox.ring(),
            };
            let count = urls.len();
            let records = urls
                .into_iter()
                .map(|url| LinkRecord {
                    url,
                    ..template.clone()
                })
                .collect();
            JobOutcome {
                job: *job,
                records,
                status: JobStatus::Resolved(count),
            }
        }
        Err(e) => {
            warn!(source = %job.source, year = job.year, error = %e, "source skipped");
            record_failure(&labels, failure_reason(&e));
            JobOutcome {
                job: *job,
                records: Vec::new(),
                status: JobStatus::Failed(e.to_string()),
            }
        }
    }
}

/// Resolve every job on a pool of `threads` workers.
///
/// Outcomes come back in plan order regardless of scheduling.
pub fn assemble(
    plan: &[PlannedJob],
    region: &str,
    bbox: &BoundingBox,
    ctx: &ResolveContext<'_>,
    threads: usize,
) -> Result<Vec<JobOutcome>> {
    if threads <= 1 {
        debug!(jobs = plan.len(), "resolving sequentially");
        return Ok(plan.iter().map(|job| resolve_job(job, region, bbox, ctx)).collect());
    }

    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    debug!(jobs = plan.len(), threads, "resolving on worker pool");
    Ok(pool.install(|| {
        plan.par_iter()
            .map(|job| resolve_job(job, region, bbox, ctx))
            .collect()
    }))
}

/// Flatten outcomes into records, preserving order.
pub fn into_records(outcomes: Vec<JobOutcome>) -> Vec<LinkRecord> {
    outcomes.into_iter().flat_map(|o| o.records).collect()
}
