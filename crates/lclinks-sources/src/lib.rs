//! # lclinks-sources
//!
//! Source registry and tile resolvers for land-cover download links.
//!
//! This crate provides:
//! - [`SourceId`] / [`SourceDescriptor`] - the static registry of archives
//! - [`resolve_year`] / [`YearAvailability`] - nearest-year snapping
//! - [`TileResolver`] implementations, one per source
//! - [`AuxiliaryData`] - shapefiles, grids and catalog snapshots loaded once
//! - [`CatalogFetcher`] - paginated download of FROM_GLC catalogs
//! - [`HttpClient`] / [`ReqwestClient`] - the network seam
//!
//! ## Example
//!
//! ```
//! use lclinks_geo::BoundingBox;
//! use lclinks_sources::{AuxiliaryData, ReqwestClient, ResolveContext, ResolveRequest, SourceId};
//!
//! let source: SourceId = "GISD30".parse()?;
//! let descriptor = source.descriptor();
//! let year = descriptor.resolve_year(2023);
//! assert_eq!(year, 2020);
//!
//! let bbox = BoundingBox::new(0.0, 5.0, -10.0, 10.0)?;
//! let aux = AuxiliaryData::empty();
//! let http = ReqwestClient::new()?;
//! let ctx = ResolveContext::new(&aux, &http);
//! let urls = source
//!     .resolver()
//!     .resolve(&ResolveRequest::new(bbox, year, descriptor.map_year(year)), &ctx)?;
//! assert_eq!(urls.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aux_data;
pub mod catalog;
pub mod catalog_fetch;
mod error;
pub mod footprints;
pub mod http;
pub mod resolver;
mod source;
mod years;

pub use aux_data::{AuxiliaryData, AuxiliaryPaths};
pub use catalog::{Catalog, CatalogEntry, CatalogIndex};
pub use catalog_fetch::{CatalogFetcher, CatalogKind};
pub use error::SourceError;
pub use http::{HttpClient, ReqwestClient};
pub use resolver::{ResolveContext, ResolveRequest, TileResolver};
pub use source::{HeaderProfile, LinkType, SourceDescriptor, SourceId};
pub use years::{resolve_year, YearAvailability};

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
