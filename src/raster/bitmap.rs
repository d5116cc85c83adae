//! The run-length-encoded raster query engine.
//!
//! A [`GeoBitmap`] owns the compressed runs of a classified raster together
//! with a row index and per-property cell counts. It is built once from a
//! pixel buffer and answers all queries without decompressing: point
//! classification, uniform random sampling of a property, and nearest
//! non-excluded cell search.
use rand::RngCore;
use tracing::debug;

use crate::coords::{GeoGrid, GeoPosition};
use crate::error::Result;
use crate::raster::classify::PixelClassifier;
use crate::raster::color::ColorKey;
use crate::raster::encode::{encode_rows, EncodeOptions, PixelBuffer, Run};
use crate::raster::PropertyIndex;

/// Compressed, immutable raster classification structure.
#[derive(Clone, Debug)]
pub struct GeoBitmap {
    grid: GeoGrid,
    runs: Vec<Run>,
    row_starts: Vec<u32>,
    sizes: Vec<u32>,
}

impl GeoBitmap {
    /// Encodes a pixel buffer into a query structure.
    ///
    /// `colors` is the property table's color column in table order;
    /// `classifier` decides the per-pixel classification (plain color lookup
    /// or a masked variant). `source_name` labels the buffer in diagnostics.
    pub fn encode(
        source_name: &str,
        pixels: &PixelBuffer,
        classifier: &dyn PixelClassifier,
        colors: &[ColorKey],
        options: EncodeOptions,
    ) -> Result<Self> {
        let encoded = encode_rows(source_name, pixels, classifier, colors, options)?;
        debug!(
            source = source_name,
            width = pixels.width(),
            height = pixels.height(),
            runs = encoded.runs.len(),
            properties = colors.len(),
            "encoded raster"
        );
        Ok(Self {
            grid: GeoGrid::new(pixels.width(), pixels.height()),
            runs: encoded.runs,
            row_starts: encoded.row_starts,
            sizes: encoded.sizes,
        })
    }

    /// The raster's dimensions and cell transform.
    pub fn grid(&self) -> GeoGrid {
        self.grid
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Number of cells classified with `index`.
    pub fn property_size(&self, index: PropertyIndex) -> u32 {
        self.sizes.get(index.get()).copied().unwrap_or(0)
    }

    fn runs_in_row(&self, y: u32) -> &[Run] {
        let start = self.row_starts[y as usize] as usize;
        let end = self.row_starts[y as usize + 1] as usize;
        &self.runs[start..end]
    }

    fn property_at_cell(&self, x: u32, y: u32) -> Option<PropertyIndex> {
        let mut end = 0u32;
        for run in self.runs_in_row(y) {
            end += u32::from(run.length);
            if x < end {
                return run.index;
            }
        }
        // Unreachable for in-range x: each row's runs sum to the width.
        None
    }

    /// Property of the cell containing `position`, or `None` for cells
    /// outside every property.
    pub fn property_at(&self, position: GeoPosition) -> Option<PropertyIndex> {
        let (x, y) = self.grid.cell_of(position);
        self.property_at_cell(x, y)
    }

    /// Uniformly random position among the cells classified with `index`.
    ///
    /// Returns the center of the chosen cell, or `None` if no cell carries
    /// the property. The engine holds no random state; the caller supplies
    /// the source.
    pub fn random_position(
        &self,
        index: PropertyIndex,
        rng: &mut dyn RngCore,
    ) -> Option<GeoPosition> {
        let size = self.property_size(index);
        if size == 0 {
            return None;
        }
        let r = (rng.next_u64() % u64::from(size)) as u32;

        let mut seen = 0u32;
        let mut pixel = 0u64;
        for run in &self.runs {
            let length = u32::from(run.length);
            if run.index == Some(index) {
                if r < seen + length {
                    let target = pixel + u64::from(r - seen);
                    let x = (target % u64::from(self.width())) as u32;
                    let y = (target / u64::from(self.width())) as u32;
                    return Some(self.grid.cell_center(x, y));
                }
                seen += length;
            }
            pixel += u64::from(length);
        }
        None
    }

    /// Nearest cell, by the raster's search order, whose classification is
    /// not `excluded`.
    ///
    /// Scans the query's row for the closest candidate west and east of the
    /// query column using circular (wraparound) column distance, then moves
    /// row by row south. Rows never wrap at the poles, so a query with no
    /// candidate anywhere south of it returns `None`.
    pub fn closest_match(
        &self,
        position: GeoPosition,
        excluded: Option<PropertyIndex>,
    ) -> Option<GeoPosition> {
        let (x, start_row) = self.grid.cell_of(position);

        for y in start_row..self.height() {
            let mut best_west: Option<(u32, u32)> = None;
            let mut best_east: Option<(u32, u32)> = None;

            let mut column = 0u32;
            for run in self.runs_in_row(y) {
                let start = column;
                let end = column + u32::from(run.length);
                column = end;

                if run.index == excluded {
                    continue;
                }
                if start <= x && x < end {
                    return Some(self.grid.cell_center(x, y));
                }
                if end <= x {
                    let candidate = end - 1;
                    let distance = self.grid.circular_distance(x, candidate);
                    if best_west.is_none_or(|(best, _)| distance < best) {
                        best_west = Some((distance, candidate));
                    }
                } else {
                    let candidate = start;
                    let distance = self.grid.circular_distance(x, candidate);
                    if best_east.is_none_or(|(best, _)| distance < best) {
                        best_east = Some((distance, candidate));
                    }
                }
                if best_west.is_some() && best_east.is_some() {
                    break;
                }
            }

            match (best_west, best_east) {
                // Ties go west: it is found first in the scan order.
                (Some((west, cw)), Some((east, ce))) => {
                    let column = if west <= east { cw } else { ce };
                    return Some(self.grid.cell_center(column, y));
                }
                (Some((_, column)), None) | (None, Some((_, column))) => {
                    return Some(self.grid.cell_center(column, y));
                }
                (None, None) => {}
            }
        }
        None
    }
}
