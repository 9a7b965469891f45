//! Link table and AOI files.

use crate::assemble::LinkRecord;
use crate::{Result, RunnerError};
use lclinks_geo::Aoi;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Check that `region` can be embedded in an output file name.
///
/// Rejects empty names, `.` and `..`, path separators and NUL.
pub fn validate_region(region: &str) -> Result<()> {
    let bad_char = region.chars().any(|c| matches!(c, '/' | '\\' | '\0'));
    if region.is_empty() || region == "." || region == ".." || bad_char {
        return Err(RunnerError::InvalidRegion(region.to_string()));
    }
    Ok(())
}

/// CSV file name for a region.
pub fn links_file_name(region: &str) -> String {
    format!("MULTISOURCE_{region}_download_links.csv")
}

/// Saved AOI file name for a region.
pub fn aoi_file_name(region: &str) -> String {
    format!("{region}_aoi.geojson")
}

/// One CSV row. Column order is the declaration order.
#[derive(Debug, Serialize)]
struct LinkRow<'a> {
    region: &'a str,
    year: u16,
    map_name: &'a str,
    map_year: u16,
    #[serde(rename = "type")]
    link_type: &'a str,
    url: &'a str,
    request_headers: &'a str,
    aoi: String,
}

impl<'a> LinkRow<'a> {
    fn from_record(record: &'a LinkRecord) -> Result<Self> {
        Ok(Self {
            region: &record.region,
            year: record.year,
            map_name: record.map_name,
            map_year: record.map_year,
            link_type: record.link_type.as_str(),
            url: &record.url,
            request_headers: record.request_headers.map_or("", |h| h.tag()),
            aoi: serde_json::to_string(&record.aoi)?,
        })
    }
}

/// Write `records` as `MULTISOURCE_{region}_download_links.csv` in `dir`.
///
/// Returns `None` without touching the filesystem when there are no records.
pub fn write_links_csv(records: &[LinkRecord], dir: &Path, region: &str) -> Result<Option<PathBuf>> {
    if records.is_empty() {
        info!(region, "no download links generated, nothing written");
        return Ok(None);
    }
    validate_region(region)?;

    fs::create_dir_all(dir)?;
    let path = dir.join(links_file_name(region));
    let mut writer = csv::Writer::from_path(&path)?;
    for record in records {
        writer.serialize(LinkRow::from_record(record)?)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = records.len(), "wrote download links");
    Ok(Some(path))
}

/// Save the AOI, indented, as `{region}_aoi.geojson` in `dir`.
pub fn save_aoi(aoi: &Aoi, dir: &Path, region: &str) -> Result<PathBuf> {
    validate_region(region)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(aoi_file_name(region));
    fs::write(&path, aoi.to_pretty_json()?)?;
    info!(path = %path.display(), "saved AOI");
    Ok(path)
}
