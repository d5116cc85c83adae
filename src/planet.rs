//! The planet aggregate: property tables, their rasters, and the
//! domain-level geographic queries built on them.
//!
//! A [`Planet`] owns four bitmaps: regions (which must tile the whole
//! surface), countries (which may leave gaps), terrain, and a derived
//! land-masked region bitmap that classifies only the land portion of each
//! region. All of them are built once in [`Planet::load`] from decoded pixel
//! buffers and are immutable afterwards.
use rand::RngCore;
use tracing::{debug, warn};

use crate::coords::GeoPosition;
use crate::error::{Error, Result};
use crate::raster::classify::LandMask;
use crate::raster::color::{ColorKey, ColorTable};
use crate::raster::encode::{EncodeOptions, PixelBuffer};
use crate::raster::{GeoBitmap, PropertyIndex};

/// A geographic region. Regions tile the whole surface.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub name: String,
    pub color: ColorKey,
}

impl Region {
    pub fn new(name: impl Into<String>, color: ColorKey) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// A country. Not every location belongs to one.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Country {
    pub name: String,
    pub color: ColorKey,
}

impl Country {
    pub fn new(name: impl Into<String>, color: ColorKey) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// A terrain type. Exactly one entry per planet is flagged as water; that
/// entry drives the land mask and the water queries.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Terrain {
    pub name: String,
    pub color: ColorKey,
    pub water: bool,
}

impl Terrain {
    pub fn new(name: impl Into<String>, color: ColorKey, water: bool) -> Self {
        Self {
            name: name.into(),
            color,
            water,
        }
    }
}

/// A named point of interest.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    pub name: String,
    pub position: GeoPosition,
}

impl City {
    pub fn new(name: impl Into<String>, position: GeoPosition) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// Everything [`Planet::load`] consumes: the property tables and the decoded
/// classification buffers supplied by the image-loading collaborator.
///
/// Only these sources need persisting; the compressed query structures are a
/// derived cache and are rebuilt on every load.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanetSources {
    pub regions: Vec<Region>,
    pub countries: Vec<Country>,
    pub terrains: Vec<Terrain>,
    pub cities: Vec<City>,
    pub region_pixels: PixelBuffer,
    pub country_pixels: PixelBuffer,
    pub terrain_pixels: PixelBuffer,
}

/// Immutable geographic query aggregate.
pub struct Planet {
    regions: Vec<Region>,
    countries: Vec<Country>,
    terrains: Vec<Terrain>,
    cities: Vec<City>,
    region_bitmap: GeoBitmap,
    country_bitmap: GeoBitmap,
    terrain_bitmap: GeoBitmap,
    land_region_bitmap: GeoBitmap,
    water: PropertyIndex,
}

impl Planet {
    /// Builds all query structures, validating the sources against their
    /// schema. Any inconsistency aborts the load with a diagnostic naming
    /// the offending buffer and pixel or color.
    pub fn load(sources: PlanetSources) -> Result<Self> {
        let terrain_colors: Vec<ColorKey> = sources.terrains.iter().map(|t| t.color).collect();
        let terrain_table = ColorTable::new(terrain_colors.clone())?;
        let terrain_bitmap = GeoBitmap::encode(
            "terrains",
            &sources.terrain_pixels,
            &terrain_table,
            &terrain_colors,
            EncodeOptions::default(),
        )?;

        let water = sources
            .terrains
            .iter()
            .position(|t| t.water)
            .and_then(PropertyIndex::new)
            .ok_or_else(|| {
                Error::InvalidConfig("terrain table declares no water terrain".to_owned())
            })?;

        let region_colors: Vec<ColorKey> = sources.regions.iter().map(|r| r.color).collect();
        let region_table = ColorTable::new(region_colors.clone())?;
        // Regions must tile the surface with no gaps.
        let region_bitmap = GeoBitmap::encode(
            "regions",
            &sources.region_pixels,
            &region_table,
            &region_colors,
            EncodeOptions::default(),
        )?;

        let country_colors: Vec<ColorKey> = sources.countries.iter().map(|c| c.color).collect();
        let country_table = ColorTable::new(country_colors.clone())?;
        let country_bitmap = GeoBitmap::encode(
            "countries",
            &sources.country_pixels,
            &country_table,
            &country_colors,
            EncodeOptions {
                allow_undefined: true,
                allow_unused: false,
            },
        )?;

        // Land portion of each region, derived from the region buffer and
        // the terrain water mask. A region may be entirely ocean.
        let land_mask = LandMask::new(&region_table, &terrain_bitmap, water);
        let land_region_bitmap = GeoBitmap::encode(
            "regions-land",
            &sources.region_pixels,
            &land_mask,
            &region_colors,
            EncodeOptions {
                allow_undefined: false,
                allow_unused: true,
            },
        )?;

        debug!(
            regions = sources.regions.len(),
            countries = sources.countries.len(),
            terrains = sources.terrains.len(),
            cities = sources.cities.len(),
            "planet loaded"
        );

        Ok(Self {
            regions: sources.regions,
            countries: sources.countries,
            terrains: sources.terrains,
            cities: sources.cities,
            region_bitmap,
            country_bitmap,
            terrain_bitmap,
            land_region_bitmap,
            water,
        })
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn terrains(&self) -> &[Terrain] {
        &self.terrains
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Region at a location. Always present: the region raster disallows
    /// undefined areas.
    pub fn region_at(&self, position: GeoPosition) -> Option<&Region> {
        self.region_bitmap
            .property_at(position)
            .and_then(|i| self.regions.get(i.get()))
    }

    /// Country at a location, or `None` over oceans and unclaimed land.
    pub fn country_at(&self, position: GeoPosition) -> Option<&Country> {
        self.country_bitmap
            .property_at(position)
            .and_then(|i| self.countries.get(i.get()))
    }

    /// Terrain type at a location.
    pub fn terrain_at(&self, position: GeoPosition) -> Option<&Terrain> {
        self.terrain_bitmap
            .property_at(position)
            .and_then(|i| self.terrains.get(i.get()))
    }

    pub fn is_position_over_water(&self, position: GeoPosition) -> bool {
        self.terrain_bitmap.property_at(position) == Some(self.water)
    }

    /// Nearest non-water position, searching the query row and then rows
    /// south of it.
    pub fn closest_land(&self, position: GeoPosition) -> Option<GeoPosition> {
        self.terrain_bitmap.closest_match(position, Some(self.water))
    }

    /// Uniformly random position inside a region, land or sea.
    pub fn random_position_in_region(
        &self,
        name: &str,
        rng: &mut dyn RngCore,
    ) -> Option<GeoPosition> {
        let index = index_by_name("region", self.regions.iter().map(|r| r.name.as_str()), name)?;
        self.region_bitmap.random_position(index, rng)
    }

    /// Uniformly random land position inside a region, or `None` if the
    /// region has no land.
    pub fn random_land_position_in_region(
        &self,
        name: &str,
        rng: &mut dyn RngCore,
    ) -> Option<GeoPosition> {
        let index = index_by_name("region", self.regions.iter().map(|r| r.name.as_str()), name)?;
        self.land_region_bitmap.random_position(index, rng)
    }

    /// Uniformly random position inside a country.
    pub fn random_position_in_country(
        &self,
        name: &str,
        rng: &mut dyn RngCore,
    ) -> Option<GeoPosition> {
        let index = index_by_name(
            "country",
            self.countries.iter().map(|c| c.name.as_str()),
            name,
        )?;
        self.country_bitmap.random_position(index, rng)
    }

    /// City with the smallest great-circle distance to a position.
    pub fn closest_city(&self, position: GeoPosition) -> Option<&City> {
        self.cities.iter().min_by(|a, b| {
            position
                .angular_distance(a.position)
                .total_cmp(&position.angular_distance(b.position))
        })
    }
}

fn index_by_name<'a>(
    kind: &str,
    names: impl Iterator<Item = &'a str>,
    name: &str,
) -> Option<PropertyIndex> {
    let position = names.into_iter().position(|n| n == name);
    if position.is_none() {
        warn!("unknown {} '{}'", kind, name);
    }
    position.and_then(PropertyIndex::new)
}
