//! Pluggable per-pixel classification.
//!
//! The row encoder classifies each source pixel through a [`PixelClassifier`]
//! strategy. The base strategy is a plain [`ColorTable`] lookup; [`LandMask`]
//! layers a water mask from a second raster on top of it, which is how the
//! "land portion of each region" raster is derived without a hand-authored
//! bitmap.
use crate::coords::GeoPosition;
use crate::raster::bitmap::GeoBitmap;
use crate::raster::color::{ColorKey, ColorTable};
use crate::raster::PropertyIndex;

/// Classification of a single raster cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellClass {
    /// The cell belongs to a property.
    Property(PropertyIndex),
    /// The cell's color matched no property. Fatal when the raster
    /// disallows undefined areas.
    Undefined,
    /// The cell was suppressed by a mask. Always a legitimate
    /// "no property" cell, even when undefined areas are disallowed.
    Masked,
}

/// Per-pixel classification strategy used by the row encoder.
pub trait PixelClassifier {
    /// Classifies the pixel whose center is at `center` and whose source
    /// color is `color`.
    fn classify(&self, center: GeoPosition, color: ColorKey) -> CellClass;
}

impl PixelClassifier for ColorTable {
    fn classify(&self, _center: GeoPosition, color: ColorKey) -> CellClass {
        match self.index_of(color) {
            Some(index) => CellClass::Property(index),
            None => CellClass::Undefined,
        }
    }
}

/// Classifier that suppresses classification wherever a mask raster says
/// "water" before falling back to color lookup.
///
/// Holds non-owning references; the mask raster must outlive the encode
/// call that uses this classifier.
#[derive(Clone, Copy, Debug)]
pub struct LandMask<'a> {
    table: &'a ColorTable,
    mask: &'a GeoBitmap,
    water: PropertyIndex,
}

impl<'a> LandMask<'a> {
    /// Creates a mask over `table`, treating cells that `mask` classifies as
    /// `water` as excluded.
    pub fn new(table: &'a ColorTable, mask: &'a GeoBitmap, water: PropertyIndex) -> Self {
        Self { table, mask, water }
    }
}

impl PixelClassifier for LandMask<'_> {
    fn classify(&self, center: GeoPosition, color: ColorKey) -> CellClass {
        if self.mask.property_at(center) == Some(self.water) {
            return CellClass::Masked;
        }
        self.table.classify(center, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::GeoPosition;

    #[test]
    fn color_table_classifies_by_exact_match() {
        let table = ColorTable::new([ColorKey::new(1), ColorKey::new(2)]).unwrap();
        let center = GeoPosition::new(0.0, 0.0);

        assert_eq!(
            table.classify(center, ColorKey::new(2)),
            CellClass::Property(PropertyIndex::new(1).unwrap())
        );
        assert_eq!(table.classify(center, ColorKey::new(3)), CellClass::Undefined);
    }
}
