//! FROM_GLC catalog snapshots: downloading missing ones before a run, and
//! the standalone `fetch-catalog` command.

use crate::plan::PlannedJob;
use crate::Result;
use lclinks_metrics::metric_defs;
use lclinks_sources::catalog_fetch::load_dir_ids;
use lclinks_sources::{AuxiliaryPaths, Catalog, CatalogFetcher, CatalogKind, HttpClient};
use std::path::Path;
use tracing::{debug, info, warn};

/// Directory ids to list for `kind`.
///
/// FROM_GLC 2010 spans many directories whose ids come from a file; `None`
/// when that file is absent.
pub fn dir_ids_for(kind: CatalogKind, paths: &AuxiliaryPaths) -> Result<Option<Vec<String>>> {
    if let Some(id) = kind.builtin_dir_id() {
        return Ok(Some(vec![id.to_string()]));
    }
    let ids_path = &paths.from_glc_2010_dir_ids;
    if !ids_path.exists() {
        return Ok(None);
    }
    Ok(Some(load_dir_ids(ids_path)?))
}

/// Fetch the catalog for `kind` and save it to `output` when non-empty.
pub fn fetch_catalog(
    kind: CatalogKind,
    dir_ids: &[String],
    output: &Path,
    http: &dyn HttpClient,
) -> Result<Catalog> {
    let catalog = CatalogFetcher::new(http).fetch(kind, dir_ids);
    metrics::counter!(metric_defs::CATALOG_ENTRIES_FETCHED.name, "catalog" => kind.name())
        .increment(catalog.len() as u64);

    if catalog.is_empty() {
        warn!(catalog = %kind, "catalog fetch returned no entries, snapshot not saved");
    } else {
        catalog.save(output)?;
        info!(catalog = %kind, path = %output.display(), entries = catalog.len(), "saved catalog snapshot");
    }
    Ok(catalog)
}

/// Download the snapshots the plan needs that are not on disk yet.
///
/// Errors are logged; the affected source then reports its missing
/// auxiliary data during resolution. Returns the number of snapshots saved.
pub fn fetch_missing_catalogs(plan: &[PlannedJob], paths: &AuxiliaryPaths, http: &dyn HttpClient) -> usize {
    let mut saved = 0;
    for kind in CatalogKind::ALL {
        if !plan.iter().any(|job| job.source == kind.source()) {
            continue;
        }
        let output = paths.catalog(kind);
        if output.exists() {
            debug!(catalog = %kind, path = %output.display(), "catalog snapshot present");
            continue;
        }

        let dir_ids = match dir_ids_for(kind, paths) {
            Ok(Some(ids)) => ids,
            Ok(None) => {
                warn!(
                    catalog = %kind,
                    dir_ids = %paths.from_glc_2010_dir_ids.display(),
                    "no directory id list, cannot fetch catalog"
                );
                continue;
            }
            Err(e) => {
                warn!(catalog = %kind, error = %e, "unreadable directory id list");
                continue;
            }
        };

        info!(catalog = %kind, path = %output.display(), "catalog snapshot missing, fetching");
        match fetch_catalog(kind, &dir_ids, output, http) {
            Ok(catalog) if !catalog.is_empty() => saved += 1,
            Ok(_) => {}
            Err(e) => warn!(catalog = %kind, error = %e, "could not save catalog snapshot"),
        }
    }
    saved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::build_plan;
    use lclinks_sources::{SourceError, SourceId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers every directory listing with one FROM_GLC 2015 tile.
    struct OneTile {
        posts: AtomicUsize,
    }

    impl HttpClient for OneTile {
        fn get(&self, _url: &str) -> lclinks_sources::Result<Vec<u8>> {
            Err(SourceError::RemoteQueryFailed {
                service: "test",
                reason: "unexpected GET".into(),
            })
        }

        fn post_json(&self, _url: &str, _h: &[(&str, &str)], _b: &str) -> lclinks_sources::Result<Vec<u8>> {
            self.posts.fetch_add(1, Ordering::SeqCst);
            Ok(br#"{"success":true,"data":{"total":1,"list":[{"id":7,"name":"030E10N.tif"}]}}"#.to_vec())
        }
    }

    fn paths_in(dir: &Path) -> AuxiliaryPaths {
        AuxiliaryPaths::default().resolve_against(dir)
    }

    #[test]
    fn test_fetches_only_needed_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        let http = OneTile { posts: AtomicUsize::new(0) };

        let plan = build_plan(&[SourceId::FromGlc2015, SourceId::Gsw], &[2015]);
        assert_eq!(fetch_missing_catalogs(&plan, &paths, &http), 1);
        assert_eq!(http.posts.load(Ordering::SeqCst), 1);

        let saved = Catalog::load(&paths.from_glc_2015_catalog).unwrap();
        assert_eq!(saved.entries()[0].id, "7");

        // Second run finds the snapshot on disk.
        assert_eq!(fetch_missing_catalogs(&plan, &paths, &http), 0);
        assert_eq!(http.posts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_2010_needs_dir_id_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        let http = OneTile { posts: AtomicUsize::new(0) };

        assert_eq!(dir_ids_for(CatalogKind::FromGlc2010, &paths).unwrap(), None);
        let plan = build_plan(&[SourceId::FromGlc2010], &[2010]);
        assert_eq!(fetch_missing_catalogs(&plan, &paths, &http), 0);
        assert_eq!(http.posts.load(Ordering::SeqCst), 0);

        std::fs::create_dir_all(paths.from_glc_2010_dir_ids.parent().unwrap()).unwrap();
        std::fs::write(&paths.from_glc_2010_dir_ids, "[\"11\", 12]").unwrap();
        assert_eq!(
            dir_ids_for(CatalogKind::FromGlc2010, &paths).unwrap(),
            Some(vec!["11".to_string(), "12".to_string()])
        );
        assert_eq!(fetch_missing_catalogs(&plan, &paths, &http), 1);
        assert_eq!(http.posts.load(Ordering::SeqCst), 2);
    }
}
