//! Land-cover download link generator.
//!
//! Reads an area of interest, plans one job per (source, year), resolves the
//! matching tiles of every source and writes the resulting links to
//! `MULTISOURCE_{region}_download_links.csv`.
//!
//! # Pipeline
//!
//! 1. [`Aoi`] parsing and year/source validation; failures abort the run.
//! 2. [`plan::build_plan`] snaps years onto each source's published years.
//! 3. [`catalogs::fetch_missing_catalogs`] downloads absent FROM_GLC snapshots.
//! 4. [`AuxiliaryData::load`] reads the shapefiles, grids and catalogs once.
//! 5. [`assemble::assemble`] resolves the jobs on a rayon pool.
//! 6. [`output`] writes the CSV and the AOI.

pub mod assemble;
pub mod catalogs;
pub mod cli;
pub mod config;
mod error;
pub mod output;
pub mod plan;

pub use assemble::{JobOutcome, JobStatus, LinkRecord};
pub use cli::{Cli, Command, FetchCatalogArgs, GenerateArgs};
pub use config::Config;
pub use error::RunnerError;
pub use plan::PlannedJob;

use lclinks_geo::Aoi;
use lclinks_sources::{AuxiliaryData, CatalogKind, ReqwestClient, ResolveContext, SourceId, YearAvailability};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;

// ============================================================================
// Entry point
// ============================================================================

/// Execute a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate(args) => generate(&args).map(|_| ()),
        Command::FetchCatalog(args) => fetch_catalog(&args).map(|_| ()),
        Command::Sources => {
            let stdout = std::io::stdout();
            write_sources(&mut stdout.lock())
        }
    }
}

// ============================================================================
// generate
// ============================================================================

/// What a `generate` run produced.
#[derive(Debug, Clone)]
pub struct GenerateSummary {
    /// Written CSV, absent when no links were generated.
    pub csv: Option<PathBuf>,
    /// Saved AOI.
    pub aoi: PathBuf,
    /// Number of link rows.
    pub links: usize,
    /// Jobs planned.
    pub jobs: usize,
    /// Jobs whose resolver failed.
    pub failed_jobs: usize,
}

fn read_aoi_text(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(std::fs::read_to_string(path)?)
}

fn default_jobs() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

/// Run the whole pipeline for `args`.
pub fn generate(args: &GenerateArgs) -> Result<GenerateSummary> {
    let aoi = Aoi::from_geojson_str(&read_aoi_text(&args.aoi)?)?;
    plan::validate_years(&args.years)?;
    output::validate_region(&args.region)?;
    let sources = plan::parse_sources(&args.sources)?;
    let config = Config::load_or_default(args.config.as_deref())?;
    info!(region = %args.region, bbox = %aoi.bbox(), "area of interest loaded");

    let plan = plan::build_plan(&sources, &args.years);
    let http = ReqwestClient::with_timeout(config.http_timeout())?;

    if config.fetch_missing_catalogs && !args.no_fetch {
        catalogs::fetch_missing_catalogs(&plan, &config.aux, &http);
    }

    let jobs: Vec<(SourceId, u16)> = plan.iter().map(|j| (j.source, j.year)).collect();
    let aux = AuxiliaryData::load(&config.aux, &jobs);
    let ctx = ResolveContext::new(&aux, &http);

    let threads = args.jobs.unwrap_or_else(default_jobs).max(1);
    let outcomes = assemble::assemble(&plan, &args.region, aoi.bbox(), &ctx, threads)?;
    let failed_jobs = outcomes
        .iter()
        .filter(|o| matches!(o.status, JobStatus::Failed(_)))
        .count();
    let records = assemble::into_records(outcomes);

    let csv = output::write_links_csv(&records, &args.output_dir, &args.region)?;
    let aoi_path = output::save_aoi(&aoi, &args.output_dir, &args.region)?;

    info!(
        region = %args.region,
        jobs = plan.len(),
        links = records.len(),
        failed_jobs,
        "link generation finished"
    );
    if failed_jobs > 0 {
        warn!(failed_jobs, "some sources were skipped, see warnings above");
    }
    log_run_summary();

    Ok(GenerateSummary {
        csv,
        aoi: aoi_path,
        links: records.len(),
        jobs: plan.len(),
        failed_jobs,
    })
}

fn log_run_summary() {
    let Some(summary) = lclinks_metrics::run_summary() else {
        return;
    };
    info!(
        links_generated = summary.links_generated,
        empty_resolutions = summary.empty_resolutions,
        source_failures = summary.source_failures,
        years_snapped = summary.years_snapped,
        catalog_entries_fetched = summary.catalog_entries_fetched,
        resolutions = summary.resolutions,
        resolve_time_ms = summary.resolve_time_ms,
        "run metrics"
    );
}

// ============================================================================
// fetch-catalog
// ============================================================================

/// Download one catalog snapshot. Returns the file written, if any.
pub fn fetch_catalog(args: &FetchCatalogArgs) -> Result<Option<PathBuf>> {
    let kind: CatalogKind = args.catalog.parse()?;
    let config = Config::load_or_default(args.config.as_deref())?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.aux.catalog(kind).to_path_buf());

    let Some(dir_ids) = catalogs::dir_ids_for(kind, &config.aux)? else {
        return Err(RunnerError::Config {
            path: config.aux.from_glc_2010_dir_ids.clone(),
            reason: format!("{kind} needs a directory id list"),
        });
    };

    let http = ReqwestClient::with_timeout(config.http_timeout())?;
    let catalog = catalogs::fetch_catalog(kind, &dir_ids, &output, &http)?;
    Ok((!catalog.is_empty()).then_some(output))
}

// ============================================================================
// sources
// ============================================================================

fn describe_years(years: &YearAvailability) -> String {
    match years {
        YearAvailability::Any => "any".to_string(),
        YearAvailability::Listed(list) => list.iter().map(u16::to_string).collect::<Vec<_>>().join(","),
        YearAvailability::Range { start, end } => format!("{start}-{end}"),
    }
}

/// Print one line per supported source.
pub fn write_sources(out: &mut impl Write) -> Result<()> {
    for id in SourceId::ALL {
        let descriptor = id.descriptor();
        let mut years = describe_years(&descriptor.years);
        if let Some((start, end)) = descriptor.valid_years {
            years.push_str(&format!(" (valid {start}-{end})"));
        }
        writeln!(out, "{:<24} {:<14} {}", id.name(), descriptor.link_type.as_str(), years)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_years() {
        assert_eq!(describe_years(&YearAvailability::Any), "any");
        assert_eq!(describe_years(&YearAvailability::Listed(&[2015, 2019])), "2015,2019");
        assert_eq!(describe_years(&YearAvailability::Range { start: 1985, end: 2022 }), "1985-2022");
    }

    #[test]
    fn test_write_sources_lists_all() {
        let mut out = Vec::new();
        write_sources(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), SourceId::ALL.len());
        assert!(text.lines().any(|l| l.starts_with("GSW") && l.contains("valid 1984-2023")));
    }

    #[test]
    fn test_generate_rejects_bad_input_before_resolving() {
        let dir = tempfile::tempdir().unwrap();
        let aoi = dir.path().join("aoi.geojson");
        std::fs::write(&aoi, r#"{"type":"FeatureCollection","features":[]}"#).unwrap();

        let args = GenerateArgs {
            aoi,
            years: vec![2015],
            region: "r".into(),
            sources: vec![],
            output_dir: dir.path().join("out"),
            config: None,
            jobs: Some(1),
            no_fetch: true,
        };
        assert!(matches!(generate(&args), Err(RunnerError::Geo(_))));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_generate_rejects_unusable_region_and_year() {
        let dir = tempfile::tempdir().unwrap();
        let aoi = dir.path().join("aoi.geojson");
        std::fs::write(&aoi, r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}"#).unwrap();

        let mut args = GenerateArgs {
            aoi,
            years: vec![2015],
            region: "../outside".into(),
            sources: vec!["GFC".into()],
            output_dir: dir.path().join("out"),
            config: None,
            jobs: Some(1),
            no_fetch: true,
        };
        assert!(matches!(generate(&args), Err(RunnerError::InvalidRegion(_))));

        args.region = "r".into();
        args.years = vec![65535];
        assert!(matches!(generate(&args), Err(RunnerError::InvalidYears(_))));
        assert!(!dir.path().join("out").exists());
        assert!(!dir.path().join("outside_aoi.geojson").exists());
    }
}
