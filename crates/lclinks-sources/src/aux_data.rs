//! Auxiliary data bundle.
//!
//! Shapefiles, grids and catalog snapshots are read once, before any
//! resolver runs, and then shared read-only. A file that is absent or
//! unreadable only disables the sources that need it.

use crate::catalog::{Catalog, CatalogIndex};
use crate::catalog_fetch::CatalogKind;
use crate::footprints::{self, Footprint, PathRow};
use crate::source::SourceId;
use crate::{Result, SourceError};
use lclinks_geo::{Reprojector, MOLLWEIDE_PROJ};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Locations of the auxiliary files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuxiliaryPaths {
    /// WRS-2 descending scene footprints.
    pub wrs2_descending: PathBuf,
    /// WRS-2 ascending scene footprints.
    pub wrs2_ascending: PathBuf,
    /// GHSL tile schema.
    pub ghs_tile_schema: PathBuf,
    /// PROJ.4 definition of the GHSL tile schema CRS.
    pub ghs_source_proj: String,
    /// FROM_GLC 2010 catalog snapshot.
    pub from_glc_2010_catalog: PathBuf,
    /// FROM_GLC 2015 catalog snapshot.
    pub from_glc_2015_catalog: PathBuf,
    /// FROM_GLC 2017 catalog snapshot.
    pub from_glc_2017_catalog: PathBuf,
    /// JSON list of directory ids holding the FROM_GLC 2010 scenes.
    pub from_glc_2010_dir_ids: PathBuf,
    /// WSF 2015 tile grid.
    pub wsf_2015_grid: PathBuf,
    /// WSF 2019 tile grid.
    pub wsf_2019_grid: PathBuf,
}

impl Default for AuxiliaryPaths {
    fn default() -> Self {
        Self {
            wrs2_descending: "2010/WRS2_descending_0/WRS2_descending.shp".into(),
            wrs2_ascending: "2010/WRS2_ascending_0/WRS2_ascending.shp".into(),
            ghs_tile_schema: "GHSL_data_54009_shapefile/GHSL2_0_MWD_L1_tile_schema_land.shp".into(),
            ghs_source_proj: MOLLWEIDE_PROJ.to_string(),
            from_glc_2010_catalog: "2010/FROM_GLC_2010_META.json".into(),
            from_glc_2015_catalog: "2015/FROM_GLC_2015_META.json".into(),
            from_glc_2017_catalog: "2017/FROM_GLC_2017_META.json".into(),
            from_glc_2010_dir_ids: "2010/data-starcloud.pcl.ac.cn.4.dir.id".into(),
            wsf_2015_grid: "WSF/WSF2015_grid.geojson".into(),
            wsf_2019_grid: "WSF/WSF2019_grid.geojson".into(),
        }
    }
}

impl AuxiliaryPaths {
    /// Rebase every relative path onto `base`.
    pub fn resolve_against(&self, base: &Path) -> Self {
        let rebase = |p: &PathBuf| if p.is_absolute() { p.clone() } else { base.join(p) };
        Self {
            wrs2_descending: rebase(&self.wrs2_descending),
            wrs2_ascending: rebase(&self.wrs2_ascending),
            ghs_tile_schema: rebase(&self.ghs_tile_schema),
            ghs_source_proj: self.ghs_source_proj.clone(),
            from_glc_2010_catalog: rebase(&self.from_glc_2010_catalog),
            from_glc_2015_catalog: rebase(&self.from_glc_2015_catalog),
            from_glc_2017_catalog: rebase(&self.from_glc_2017_catalog),
            from_glc_2010_dir_ids: rebase(&self.from_glc_2010_dir_ids),
            wsf_2015_grid: rebase(&self.wsf_2015_grid),
            wsf_2019_grid: rebase(&self.wsf_2019_grid),
        }
    }

    /// Snapshot file for a catalog.
    pub fn catalog(&self, kind: CatalogKind) -> &Path {
        match kind {
            CatalogKind::FromGlc2010 => &self.from_glc_2010_catalog,
            CatalogKind::FromGlc2015 => &self.from_glc_2015_catalog,
            CatalogKind::FromGlc2017 => &self.from_glc_2017_catalog,
        }
    }

    /// WSF grid for a published year.
    pub fn wsf_grid(&self, year: u16) -> Option<&Path> {
        match year {
            2015 => Some(&self.wsf_2015_grid),
            2019 => Some(&self.wsf_2019_grid),
            _ => None,
        }
    }
}

/// One loaded (or unavailable) auxiliary input.
#[derive(Debug)]
struct Slot<T> {
    path: PathBuf,
    value: Option<T>,
}

impl<T> Slot<T> {
    fn empty() -> Self {
        Self {
            path: PathBuf::new(),
            value: None,
        }
    }

    fn loaded(value: T) -> Self {
        Self {
            path: PathBuf::new(),
            value: Some(value),
        }
    }

    fn load(source: SourceId, path: &Path, read: impl FnOnce(&Path) -> Result<T>) -> Self {
        let value = if !path.exists() {
            warn!(source = %source, path = %path.display(), "auxiliary file not found, source will be skipped");
            None
        } else {
            match read(path) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(source = %source, path = %path.display(), error = %e, "failed to read auxiliary file");
                    None
                }
            }
        };
        Self {
            path: path.to_path_buf(),
            value,
        }
    }

    fn require(&self, source: SourceId) -> Result<&T> {
        self.value.as_ref().ok_or_else(|| SourceError::AuxiliaryDataMissing {
            source_name: source.name(),
            path: self.path.clone(),
        })
    }
}

/// Read-only auxiliary inputs shared by all resolvers.
#[derive(Debug)]
pub struct AuxiliaryData {
    wrs2_scenes: Slot<Vec<Footprint<PathRow>>>,
    ghs_tiles: Slot<Vec<Footprint<String>>>,
    from_glc_2010: Slot<CatalogIndex>,
    from_glc_2015: Slot<CatalogIndex>,
    from_glc_2017: Slot<Catalog>,
    wsf_grids: BTreeMap<u16, Slot<Vec<Footprint<String>>>>,
}

impl Default for AuxiliaryData {
    fn default() -> Self {
        Self::empty()
    }
}

impl AuxiliaryData {
    /// A bundle with nothing loaded.
    pub fn empty() -> Self {
        Self {
            wrs2_scenes: Slot::empty(),
            ghs_tiles: Slot::empty(),
            from_glc_2010: Slot::empty(),
            from_glc_2015: Slot::empty(),
            from_glc_2017: Slot::empty(),
            wsf_grids: BTreeMap::new(),
        }
    }

    /// Load the inputs needed by the planned `(source, resolved year)` jobs.
    pub fn load(paths: &AuxiliaryPaths, jobs: &[(SourceId, u16)]) -> Self {
        let mut data = Self::empty();
        let needs = |id: SourceId| jobs.iter().any(|(s, _)| *s == id);

        if needs(SourceId::FromGlc2010) {
            let source = SourceId::FromGlc2010;
            data.wrs2_scenes = Slot::load(source, &paths.wrs2_descending, |descending| {
                let mut scenes = footprints::read_wrs2_scenes(descending)?;
                if paths.wrs2_ascending.exists() {
                    scenes.extend(footprints::read_wrs2_scenes(&paths.wrs2_ascending)?);
                } else {
                    warn!(source = %source, path = %paths.wrs2_ascending.display(), "ascending WRS-2 footprints not found");
                }
                Ok(scenes)
            });
            data.from_glc_2010 = Slot::load(source, &paths.from_glc_2010_catalog, |p| {
                Ok(CatalogIndex::by_path_row(&Catalog::load(p)?))
            });
        }

        if needs(SourceId::GhsBuR2023a) {
            data.ghs_tiles = Slot::load(SourceId::GhsBuR2023a, &paths.ghs_tile_schema, |p| {
                let reprojector = Reprojector::to_wgs84(&paths.ghs_source_proj)?;
                footprints::read_ghs_tiles(p, &reprojector)
            });
        }

        if needs(SourceId::FromGlc2015) {
            data.from_glc_2015 = Slot::load(SourceId::FromGlc2015, &paths.from_glc_2015_catalog, |p| {
                Ok(CatalogIndex::by_name(&Catalog::load(p)?))
            });
        }

        if needs(SourceId::FromGlc2017) {
            data.from_glc_2017 = Slot::load(SourceId::FromGlc2017, &paths.from_glc_2017_catalog, Catalog::load);
        }

        for (source, year) in jobs.iter().filter(|(s, _)| *s == SourceId::Wsf) {
            if data.wsf_grids.contains_key(year) {
                continue;
            }
            let slot = match paths.wsf_grid(*year) {
                Some(path) => Slot::load(*source, path, footprints::read_wsf_grid),
                None => Slot::empty(),
            };
            data.wsf_grids.insert(*year, slot);
        }

        info!(
            wrs2_scenes = data.wrs2_scenes.value.as_ref().map_or(0, Vec::len),
            ghs_tiles = data.ghs_tiles.value.as_ref().map_or(0, Vec::len),
            wsf_grids = data.wsf_grids.values().filter(|s| s.value.is_some()).count(),
            "auxiliary data loaded"
        );
        data
    }

    /// Use these WRS-2 footprints.
    pub fn with_wrs2_scenes(mut self, scenes: Vec<Footprint<PathRow>>) -> Self {
        self.wrs2_scenes = Slot::loaded(scenes);
        self
    }

    /// Use these GHS tile footprints (already in WGS84).
    pub fn with_ghs_tiles(mut self, tiles: Vec<Footprint<String>>) -> Self {
        self.ghs_tiles = Slot::loaded(tiles);
        self
    }

    /// Use this catalog snapshot.
    pub fn with_catalog(mut self, kind: CatalogKind, catalog: Catalog) -> Self {
        match kind {
            CatalogKind::FromGlc2010 => self.from_glc_2010 = Slot::loaded(CatalogIndex::by_path_row(&catalog)),
            CatalogKind::FromGlc2015 => self.from_glc_2015 = Slot::loaded(CatalogIndex::by_name(&catalog)),
            CatalogKind::FromGlc2017 => self.from_glc_2017 = Slot::loaded(catalog),
        }
        self
    }

    /// Use this WSF grid for `year`.
    pub fn with_wsf_grid(mut self, year: u16, cells: Vec<Footprint<String>>) -> Self {
        self.wsf_grids.insert(year, Slot::loaded(cells));
        self
    }

    /// WRS-2 scene footprints, descending then ascending.
    pub fn wrs2_scenes(&self) -> Result<&[Footprint<PathRow>]> {
        self.wrs2_scenes.require(SourceId::FromGlc2010).map(Vec::as_slice)
    }

    /// GHS tiles in WGS84.
    pub fn ghs_tiles(&self) -> Result<&[Footprint<String>]> {
        self.ghs_tiles.require(SourceId::GhsBuR2023a).map(Vec::as_slice)
    }

    /// FROM_GLC 2010 scenes keyed by `{path}_{row}`.
    pub fn from_glc_2010(&self) -> Result<&CatalogIndex> {
        self.from_glc_2010.require(SourceId::FromGlc2010)
    }

    /// FROM_GLC 2015 tiles keyed by file name.
    pub fn from_glc_2015(&self) -> Result<&CatalogIndex> {
        self.from_glc_2015.require(SourceId::FromGlc2015)
    }

    /// FROM_GLC 2017 snapshot.
    pub fn from_glc_2017(&self) -> Result<&Catalog> {
        self.from_glc_2017.require(SourceId::FromGlc2017)
    }

    /// WSF grid cells for a published year.
    pub fn wsf_grid(&self, year: u16) -> Result<&[Footprint<String>]> {
        match self.wsf_grids.get(&year) {
            Some(slot) => slot.require(SourceId::Wsf).map(Vec::as_slice),
            None => Err(SourceError::AuxiliaryDataMissing {
                source_name: SourceId::Wsf.name(),
                path: PathBuf::from(format!("WSF{year}_grid.geojson")),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    #[test]
    fn test_resolve_against_keeps_absolute_paths() {
        let mut paths = AuxiliaryPaths::default();
        paths.wsf_2019_grid = PathBuf::from("/data/wsf2019.geojson");
        let rebased = paths.resolve_against(Path::new("/work"));

        assert_eq!(rebased.wsf_2019_grid, PathBuf::from("/data/wsf2019.geojson"));
        assert_eq!(
            rebased.from_glc_2015_catalog,
            PathBuf::from("/work/2015/FROM_GLC_2015_META.json")
        );
        assert_eq!(rebased.ghs_source_proj, MOLLWEIDE_PROJ);
    }

    #[test]
    fn test_missing_files_disable_only_their_sources() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AuxiliaryPaths::default().resolve_against(dir.path());

        let catalog_path = paths.catalog(CatalogKind::FromGlc2015).to_path_buf();
        std::fs::create_dir_all(catalog_path.parent().unwrap()).unwrap();
        std::fs::write(&catalog_path, r#"[{"id": 5, "name": "030E10N.tif"}]"#).unwrap();

        let data = AuxiliaryData::load(
            &paths,
            &[(SourceId::FromGlc2015, 2015), (SourceId::FromGlc2017, 2017), (SourceId::Wsf, 2019)],
        );

        assert_eq!(data.from_glc_2015().unwrap().first("030E10N.tif").unwrap().id, "5");
        assert!(matches!(
            data.from_glc_2017(),
            Err(SourceError::AuxiliaryDataMissing { source_name: "FROM_GLC_2017", .. })
        ));
        assert!(data.wsf_grid(2019).is_err());
        assert!(data.ghs_tiles().is_err());
    }

    #[test]
    fn test_builders() {
        let data = AuxiliaryData::empty()
            .with_catalog(
                CatalogKind::FromGlc2010,
                Catalog::new(vec![CatalogEntry::new("9", "L5119038_x.tif.tar.gz")]),
            )
            .with_wsf_grid(2015, Vec::new());

        assert_eq!(data.from_glc_2010().unwrap().len(), 1);
        assert!(data.wsf_grid(2015).unwrap().is_empty());
        assert!(data.wsf_grid(2019).is_err());
    }
}
