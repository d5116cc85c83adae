#![forbid(unsafe_code)]
//! geo_raster: run-length-encoded geographic raster classification and queries.
//!
//! Modules:
//! - coords: geographic positions and the equirectangular cell transform
//! - raster: color-key tables, pluggable classification, the row encoder, and
//!   the [`raster::GeoBitmap`] query engine (point, random-sample, and
//!   nearest-match queries over the compressed runs)
//! - planet: the aggregate owning property tables and derived rasters, with
//!   the domain-level query API
//!
//! Everything is built once at load time and immutable afterwards; queries
//! never fail and hold no random state of their own.
pub mod coords;
pub mod error;
pub mod planet;
pub mod raster;

/// Convenient re-exports for common types. Import with `use geo_raster::prelude::*;`.
pub mod prelude {
    pub use crate::coords::{GeoGrid, GeoPosition};
    pub use crate::error::{Error, Result};
    pub use crate::planet::{City, Country, Planet, PlanetSources, Region, Terrain};
    pub use crate::raster::{
        CellClass, ColorKey, ColorTable, EncodeOptions, GeoBitmap, LandMask, PixelBuffer,
        PixelClassifier, PropertyIndex, MAX_PROPERTIES,
    };
}
