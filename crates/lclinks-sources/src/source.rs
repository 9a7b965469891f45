//! Static source registry.
//!
//! Every supported archive is a [`SourceId`] variant with one
//! [`SourceDescriptor`] describing the years it publishes, the link type
//! written to the output table and any request-header profile a downloader
//! must send. Descriptors are `'static` and never mutated.

use crate::resolver::{self, TileResolver};
use crate::years::YearAvailability;
use crate::SourceError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A supported land-cover archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceId {
    /// JRC Global Surface Water yearly classification.
    Gsw,
    /// Global wetland (GWL_FCS30) whole-world archive.
    Gfc,
    /// GWL_FCS30D with per-year region coverage.
    GfcFcs30d,
    /// Esri/Impact Observatory 10 m land use / land cover.
    Esri,
    /// GHSL built-up surface, release 2023A.
    GhsBuR2023a,
    /// FROM_GLC 30 m, Landsat WRS-2 scenes (2010).
    FromGlc2010,
    /// FROM_GLC 30 m, 10° tiles (2015).
    FromGlc2015,
    /// FROM_GLC 10 m, 2° tiles (2017).
    FromGlc2017,
    /// Global impervious surface dynamics, 30 m.
    Gisd30,
    /// World Settlement Footprint.
    Wsf,
    /// Hansen global forest change tree canopy cover for 2000.
    GfcTreeCover2000,
    /// GLC_FCS30D longitude-strip mirror on Zenodo.
    GlcFcs30dUnofficial,
}

impl SourceId {
    /// All sources, in the order they are processed and written.
    pub const ALL: [SourceId; 12] = [
        SourceId::Gsw,
        SourceId::Gfc,
        SourceId::GfcFcs30d,
        SourceId::Esri,
        SourceId::GhsBuR2023a,
        SourceId::FromGlc2010,
        SourceId::FromGlc2015,
        SourceId::FromGlc2017,
        SourceId::Gisd30,
        SourceId::Wsf,
        SourceId::GfcTreeCover2000,
        SourceId::GlcFcs30dUnofficial,
    ];

    /// Registry name, as accepted on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            SourceId::Gsw => "GSW",
            SourceId::Gfc => "GFC",
            SourceId::GfcFcs30d => "GFC_FCS30D",
            SourceId::Esri => "ESRI",
            SourceId::GhsBuR2023a => "GHS_BU_R2023A",
            SourceId::FromGlc2010 => "FROM_GLC_2010",
            SourceId::FromGlc2015 => "FROM_GLC_2015",
            SourceId::FromGlc2017 => "FROM_GLC_2017",
            SourceId::Gisd30 => "GISD30",
            SourceId::Wsf => "WSF",
            SourceId::GfcTreeCover2000 => "GFC_TreeCover2000",
            SourceId::GlcFcs30dUnofficial => "GLC_FCS30D_UNOFFICIAL",
        }
    }

    /// Static configuration for this source.
    pub fn descriptor(self) -> &'static SourceDescriptor {
        match self {
            SourceId::Gsw => &GSW,
            SourceId::Gfc => &GFC,
            SourceId::GfcFcs30d => &GFC_FCS30D,
            SourceId::Esri => &ESRI,
            SourceId::GhsBuR2023a => &GHS_BU_R2023A,
            SourceId::FromGlc2010 => &FROM_GLC_2010,
            SourceId::FromGlc2015 => &FROM_GLC_2015,
            SourceId::FromGlc2017 => &FROM_GLC_2017,
            SourceId::Gisd30 => &GISD30,
            SourceId::Wsf => &WSF,
            SourceId::GfcTreeCover2000 => &GFC_TREE_COVER_2000,
            SourceId::GlcFcs30dUnofficial => &GLC_FCS30D_UNOFFICIAL,
        }
    }

    /// The tile resolver registered for this source.
    pub fn resolver(self) -> &'static dyn TileResolver {
        match self {
            SourceId::Gsw => &resolver::Gsw,
            SourceId::Gfc => &resolver::Gfc,
            SourceId::GfcFcs30d => &resolver::GfcFcs30d,
            SourceId::Esri => &resolver::Esri,
            SourceId::GhsBuR2023a => &resolver::GhsBuiltUp,
            SourceId::FromGlc2010 => &resolver::FromGlc2010,
            SourceId::FromGlc2015 => &resolver::FromGlc2015,
            SourceId::FromGlc2017 => &resolver::FromGlc2017,
            SourceId::Gisd30 => &resolver::Gisd30,
            SourceId::Wsf => &resolver::Wsf,
            SourceId::GfcTreeCover2000 => &resolver::TreeCover2000,
            SourceId::GlcFcs30dUnofficial => &resolver::GlcFcs30dStrips,
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceId {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SourceId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SourceError::UnknownSource(s.to_string()))
    }
}

/// How a downloader should treat a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    /// Direct file download.
    Url,
    /// Archive that must be extracted after download.
    UrlUnarchive,
    /// Direct download from an unofficial mirror.
    UrlUnofficial,
}

impl LinkType {
    /// Tag written to the `type` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            LinkType::Url => "URL",
            LinkType::UrlUnarchive => "URL_UNARCHIVE",
            LinkType::UrlUnofficial => "URL_UNOFFICIAL",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LinkType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Named set of static request headers a downloader must send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderProfile {
    /// Browser-like headers expected by data-starcloud.pcl.ac.cn.
    FromGlc,
}

impl HeaderProfile {
    /// Tag written to the `request_headers` column.
    pub const fn tag(self) -> &'static str {
        match self {
            HeaderProfile::FromGlc => "FROM_GLC_Headers",
        }
    }

    /// Header name/value pairs.
    pub const fn headers(self) -> &'static [(&'static str, &'static str)] {
        match self {
            HeaderProfile::FromGlc => &[
                ("Accept", "application/json, text/plain, */*"),
                ("Content-Type", "application/json;charset=UTF-8"),
                ("Origin", "https://data-starcloud.pcl.ac.cn"),
                (
                    "User-Agent",
                    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36",
                ),
            ],
        }
    }

    /// Cookie header value.
    pub const fn cookie(self) -> &'static str {
        match self {
            HeaderProfile::FromGlc => "i18n_redirected=en",
        }
    }
}

impl Serialize for HeaderProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// Static per-source configuration.
#[derive(Debug)]
pub struct SourceDescriptor {
    /// Registry entry this describes.
    pub id: SourceId,
    /// Name written to the `map_name` column.
    pub map_name: &'static str,
    /// Link type tag.
    pub link_type: LinkType,
    /// Published years, used for nearest-year snapping.
    pub years: YearAvailability,
    /// Years outside this window are skipped after snapping.
    pub valid_years: Option<(u16, u16)>,
    /// Map year when the product exists for a single epoch only.
    pub fixed_map_year: Option<u16>,
    /// Requested years served by a differently dated map.
    pub map_year_aliases: &'static [(u16, u16)],
    /// Header profile a downloader must use, if any.
    pub request_headers: Option<HeaderProfile>,
}

impl SourceDescriptor {
    /// Snap a requested year onto the published years.
    pub fn resolve_year(&self, requested: u16) -> u16 {
        self.years.resolve(requested)
    }

    /// Whether a (snapped) year falls inside the known-valid window.
    pub fn accepts_year(&self, year: u16) -> bool {
        self.valid_years
            .map_or(true, |(start, end)| (start..=end).contains(&year))
    }

    /// Year of the map file that serves `year`.
    pub fn map_year(&self, year: u16) -> u16 {
        if let Some(fixed) = self.fixed_map_year {
            return fixed;
        }
        self.map_year_aliases
            .iter()
            .find(|(from, _)| *from == year)
            .map_or(year, |(_, to)| *to)
    }
}

static GSW: SourceDescriptor = SourceDescriptor {
    id: SourceId::Gsw,
    map_name: "GSW",
    link_type: LinkType::Url,
    years: YearAvailability::Any,
    valid_years: Some((1984, 2023)),
    fixed_map_year: None,
    map_year_aliases: &[],
    request_headers: None,
};

static GFC: SourceDescriptor = SourceDescriptor {
    id: SourceId::Gfc,
    map_name: "GFC",
    link_type: LinkType::UrlUnarchive,
    years: YearAvailability::Any,
    valid_years: None,
    fixed_map_year: None,
    map_year_aliases: &[],
    request_headers: None,
};

static GFC_FCS30D: SourceDescriptor = SourceDescriptor {
    id: SourceId::GfcFcs30d,
    map_name: "GWL_FCS30D",
    link_type: LinkType::UrlUnarchive,
    years: YearAvailability::Listed(&[2000, 2005, 2010, 2015, 2019, 2020, 2024]),
    valid_years: None,
    fixed_map_year: None,
    map_year_aliases: &[(2024, 2022)],
    request_headers: None,
};

static ESRI: SourceDescriptor = SourceDescriptor {
    id: SourceId::Esri,
    map_name: "ESRI",
    link_type: LinkType::Url,
    years: YearAvailability::Any,
    valid_years: None,
    fixed_map_year: None,
    map_year_aliases: &[],
    request_headers: None,
};

static GHS_BU_R2023A: SourceDescriptor = SourceDescriptor {
    id: SourceId::GhsBuR2023a,
    map_name: "GHS_BU_R2023A",
    link_type: LinkType::UrlUnarchive,
    years: YearAvailability::Listed(&[2018]),
    valid_years: None,
    fixed_map_year: Some(2018),
    map_year_aliases: &[],
    request_headers: None,
};

static FROM_GLC_2010: SourceDescriptor = SourceDescriptor {
    id: SourceId::FromGlc2010,
    map_name: "FROM_GLC_2010",
    link_type: LinkType::UrlUnarchive,
    years: YearAvailability::Listed(&[2010]),
    valid_years: None,
    fixed_map_year: None,
    map_year_aliases: &[],
    request_headers: Some(HeaderProfile::FromGlc),
};

static FROM_GLC_2015: SourceDescriptor = SourceDescriptor {
    id: SourceId::FromGlc2015,
    map_name: "FROM_GLC_2015",
    link_type: LinkType::Url,
    years: YearAvailability::Listed(&[2015]),
    valid_years: None,
    fixed_map_year: None,
    map_year_aliases: &[],
    request_headers: Some(HeaderProfile::FromGlc),
};

static FROM_GLC_2017: SourceDescriptor = SourceDescriptor {
    id: SourceId::FromGlc2017,
    map_name: "FROM_GLC_2017",
    link_type: LinkType::Url,
    years: YearAvailability::Listed(&[2017]),
    valid_years: None,
    fixed_map_year: None,
    map_year_aliases: &[],
    request_headers: Some(HeaderProfile::FromGlc),
};

static GISD30: SourceDescriptor = SourceDescriptor {
    id: SourceId::Gisd30,
    map_name: "GISD30",
    link_type: LinkType::UrlUnarchive,
    years: YearAvailability::Range { start: 1985, end: 2020 },
    valid_years: None,
    fixed_map_year: None,
    map_year_aliases: &[],
    request_headers: None,
};

static WSF: SourceDescriptor = SourceDescriptor {
    id: SourceId::Wsf,
    map_name: "WSF",
    link_type: LinkType::Url,
    years: YearAvailability::Listed(&[2015, 2019]),
    valid_years: None,
    fixed_map_year: None,
    map_year_aliases: &[],
    request_headers: None,
};

static GFC_TREE_COVER_2000: SourceDescriptor = SourceDescriptor {
    id: SourceId::GfcTreeCover2000,
    map_name: "GFC_TreeCover2000",
    link_type: LinkType::Url,
    years: YearAvailability::Listed(&[2000]),
    valid_years: None,
    fixed_map_year: None,
    map_year_aliases: &[],
    request_headers: None,
};

static GLC_FCS30D_UNOFFICIAL: SourceDescriptor = SourceDescriptor {
    id: SourceId::GlcFcs30dUnofficial,
    map_name: "GLC_FCS30D_UNOFFICIAL",
    link_type: LinkType::UrlUnofficial,
    years: YearAvailability::Range { start: 1985, end: 2022 },
    valid_years: None,
    fixed_map_year: None,
    map_year_aliases: &[],
    request_headers: None,
};
